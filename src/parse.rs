//! Delimited-string parsing for the convenience constructors.
//!
//! This is deliberately outside [`dlx`](crate::dlx): the core matrix never parses a
//! string, it only ever sees already-split element/subset names.

/// Default separator set used by the convenience string-based constructors.
pub const DEFAULT_SEPARATORS: &str = ",;:|";

/// Splits `s` on any byte in `separators`, dropping empty tokens.
pub(crate) fn tokenize<'a, 'b>(s: &'a str, separators: &'b str) -> impl Iterator<Item = &'a str> + use<'a, 'b> {
    s.split(|c: char| separators.contains(c)).filter(|tok| !tok.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_splits_on_any_separator_and_skips_empties() {
        let tokens: Vec<&str> = tokenize("A,B;;C|D::E", ",;:|").collect();
        assert_eq!(tokens, vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn tokenize_with_no_separators_present_yields_one_token() {
        let tokens: Vec<&str> = tokenize("ABC", ",;:|").collect();
        assert_eq!(tokens, vec!["ABC"]);
    }

    #[test]
    fn tokenize_empty_string_yields_no_tokens() {
        let tokens: Vec<&str> = tokenize("", DEFAULT_SEPARATORS).collect();
        assert!(tokens.is_empty());
    }
}
