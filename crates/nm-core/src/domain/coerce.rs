//! Lenient coercions from stored values to typed settings.
//!
//! Neither function can fail.  Input that does not look like a boolean is
//! `false`; input that does not look like a list is split on whitespace.

use super::value::SettingValue;

/// Strings (compared case-insensitively) that read as `true`.
const TRUE_WORDS: [&str; 4] = ["yes", "true", "t", "1"];

/// Interprets a stored value as a boolean.
///
/// Booleans pass through unchanged.  Text is `true` only if it is one of
/// `yes`, `true`, `t` or `1`, ignoring case.  Integers are compared by their
/// decimal text, so `1` is `true` and everything else is `false`.  Lists are
/// always `false`.
///
/// # Example
///
/// ```rust
/// use nm_core::{str2bool, SettingValue};
///
/// assert!(str2bool(&SettingValue::from("Yes")));
/// assert!(!str2bool(&SettingValue::from("on")));
/// assert!(str2bool(&SettingValue::from(true)));
/// ```
pub fn str2bool(v: &SettingValue) -> bool {
    match v {
        SettingValue::Bool(b) => *b,
        SettingValue::Text(s) => text_is_true(s),
        SettingValue::Int(i) => text_is_true(&i.to_string()),
        SettingValue::List(_) => false,
    }
}

fn text_is_true(s: &str) -> bool {
    TRUE_WORDS.iter().any(|w| w.eq_ignore_ascii_case(s))
}

/// Interprets a stored value as a list of strings.
///
/// Lists pass through unchanged.  Text is treated as the printed form of a
/// list: surrounding `[` and `]` are stripped, quote characters (including a
/// `u` string prefix directly before a quote) are removed, commas become
/// separators, and the remainder is split on whitespace with empty tokens
/// discarded.  Scalars become a single-element list.
///
/// # Example
///
/// ```rust
/// use nm_core::{str2list, SettingValue};
///
/// let parsed = str2list(&SettingValue::from("['.launch', \".yaml\"]"));
/// assert_eq!(parsed, vec![".launch", ".yaml"]);
/// ```
pub fn str2list(v: &SettingValue) -> Vec<String> {
    match v {
        SettingValue::List(items) => items.clone(),
        SettingValue::Text(s) => parse_list_text(s),
        other => parse_list_text(&other.to_ini_string()),
    }
}

fn parse_list_text(s: &str) -> Vec<String> {
    let inner = s.trim().trim_matches(|c| c == '[' || c == ']');
    inner
        .replace(',', " ")
        .split_whitespace()
        .map(|token| {
            let token = match token.strip_prefix('u') {
                Some(rest) if rest.starts_with(['"', '\'']) => rest,
                _ => token,
            };
            token.replace(['"', '\''], "")
        })
        .filter(|token| !token.is_empty())
        .collect()
}
