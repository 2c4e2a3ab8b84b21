//! Placeholder rewriting for positional SQL drivers
//!
//! Numbered placeholders (`%3$d`) already carry their 1-based position, so
//! they map one-to-one onto SQLite's `?NNN` parameters. Content-hash
//! placeholders (`:v3_1a2b3c4d`) are valid named parameters as they stand and
//! are left untouched; their position is read back out of the name.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

static NUMBERED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"%(\d+)\$[dfs]").expect("numbered placeholder pattern"));

static PARAMETER_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\?(\d+)|:v(\d+)_[0-9a-f]{8})$").expect("parameter name pattern"));

/// `%N$t` → `?N`
pub fn numbered_to_indexed(sql: &str) -> Cow<'_, str> {
    NUMBERED.replace_all(sql, "?$1")
}

/// Argument position carried by a driver parameter name (`?N` or `:vN_xxxxxxxx`)
pub fn position_of(parameter_name: &str) -> Option<usize> {
    let caps = PARAMETER_NAME.captures(parameter_name)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .and_then(|m| m.as_str().parse().ok())
}
