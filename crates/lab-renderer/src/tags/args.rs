//! Tag argument helpers.

use std::sync::LazyLock;

use regex::Regex;

/// Matches a double-quoted argument or a bare word.
static ARGUMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)"|(\S+)"#).expect("invalid argument regex"));

/// Strip all double quotes from a single-argument string and trim it.
///
/// `"Some label"` becomes `Some label`.
pub(crate) fn unquote(args: &str) -> String {
    args.replace('"', "").trim().to_owned()
}

/// Split an argument string into individual values.
///
/// Quoted values keep inner spaces: `"2024-03-01" "2:00 PM"` yields
/// `["2024-03-01", "2:00 PM"]`. Unquoted words are split on whitespace.
pub(crate) fn split_args(args: &str) -> Vec<String> {
    ARGUMENT
        .captures_iter(args)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().trim().to_owned())
        .collect()
}
