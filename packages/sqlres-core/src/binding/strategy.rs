//! Placeholder strategies
//!
//! Two executor pairings are supported and must not be merged:
//!
//! - `NumberedPlaceholders`: sprintf-style `%N$t` tokens. The executor binds
//!   explicitly positioned placeholders, so N must equal the value's 1-based
//!   position in the map and `t` carries the type (`d`, `f`, `s`).
//! - `ContentHashPlaceholders`: `:vN_hhhhhhhh` tokens for executors that bind
//!   anonymous placeholders in order of appearance. The hash only keeps the
//!   token from colliding with literal SQL text.

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hasher;
use std::sync::Arc;

use crate::error::Result;
use crate::value::{TypeTag, Value};

/// Produces the placeholder token for a value at a given map position
pub trait BindingStrategy: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    /// `canonical` is `value`'s canonical string form; `position` is 1-based.
    fn placeholder(&self, value: &Value, canonical: &str, position: usize) -> Result<String>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NumberedPlaceholders;

impl BindingStrategy for NumberedPlaceholders {
    fn name(&self) -> &'static str {
        "numbered"
    }

    fn placeholder(&self, value: &Value, _canonical: &str, position: usize) -> Result<String> {
        let tag = match value.type_tag() {
            TypeTag::String => {
                // Fails for values with no string form
                value.canonical_string()?;
                TypeTag::String
            }
            tag => tag,
        };
        Ok(format!("%{}${}", position, tag.as_char()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentHashPlaceholders;

impl ContentHashPlaceholders {
    /// 32-bit fold of the FxHash digest of `canonical`
    pub fn checksum(canonical: &str) -> u32 {
        let mut hasher = FxHasher::default();
        hasher.write(canonical.as_bytes());
        let digest = hasher.finish();
        (digest ^ (digest >> 32)) as u32
    }
}

impl BindingStrategy for ContentHashPlaceholders {
    fn name(&self) -> &'static str {
        "content_hash"
    }

    fn placeholder(&self, _value: &Value, canonical: &str, position: usize) -> Result<String> {
        Ok(format!(":v{}_{:08x}", position, Self::checksum(canonical)))
    }
}

/// Strategy selector, as named in configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderStyle {
    #[default]
    Numbered,
    ContentHash,
}

impl PlaceholderStyle {
    pub fn strategy(&self) -> Arc<dyn BindingStrategy> {
        match self {
            PlaceholderStyle::Numbered => Arc::new(NumberedPlaceholders),
            PlaceholderStyle::ContentHash => Arc::new(ContentHashPlaceholders),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlaceholderStyle::Numbered => "numbered",
            PlaceholderStyle::ContentHash => "content_hash",
        }
    }
}

impl fmt::Display for PlaceholderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
