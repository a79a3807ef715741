//! Citation marker removal for engine output.
//!
//! Engines annotate answers with markers like `[src1]<page2>`. Only those
//! markers are removed; whitespace around them, line breaks and everything
//! else is left exactly as the engine printed it.

use std::sync::LazyLock;

use regex::Regex;

// The bracket and angle sections exclude only `)`, not `]` or `>`, so a match
// may span several markers on one line and a section containing `)` is never
// removed. Kept as-is: replies are expected to match this exact behavior.
static CITATION_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[[^)]*\]<[^)]*>").expect("citation marker regex is valid")
});

/// Remove every citation marker from `answer`.
pub fn sanitize_answer(answer: &str) -> String {
    CITATION_MARKER.replace_all(answer, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_without_markers_is_unchanged() {
        for s in [
            "",
            "plain answer",
            "  leading and trailing  \n",
            "brackets [alone] and <angles> apart",
            "line one\nline two\r\n\ttabbed",
            "angle first <a>[b]",
        ] {
            assert_eq!(sanitize_answer(s), s);
        }
    }

    #[test]
    fn marker_between_prefix_and_suffix_is_removed() {
        assert_eq!(sanitize_answer("abc[A]<B>xyz"), "abcxyz");
        assert_eq!(sanitize_answer("[cite]<detail>"), "");
        assert_eq!(sanitize_answer("x [] <>y"), "x [] <>y");
        assert_eq!(sanitize_answer("x []<>y"), "x y");
    }

    #[test]
    fn removal_leaves_surrounding_spaces() {
        assert_eq!(
            sanitize_answer("The sky is blue [src1]<page2> because of scattering."),
            "The sky is blue  because of scattering."
        );
    }

    #[test]
    fn closing_paren_blocks_removal() {
        let s = "see [note)]<p1> here";
        assert_eq!(sanitize_answer(s), s);
        let s = "see [note]<p1)> here";
        assert_eq!(sanitize_answer(s), s);
    }

    #[test]
    fn opening_paren_does_not_block_removal() {
        assert_eq!(sanitize_answer("a[(x]<y>b"), "ab");
    }

    #[test]
    fn greedy_match_spans_markers_on_one_line() {
        assert_eq!(sanitize_answer("a [1]<x> b [2]<y> c"), "a  c");
    }

    #[test]
    fn markers_on_separate_lines_span_newlines() {
        // `[^)]` also matches newlines.
        assert_eq!(sanitize_answer("a [1]<x>\nb [2]<y>\nc"), "a \nc");
    }

    #[test]
    fn paren_between_markers_splits_matches() {
        assert_eq!(sanitize_answer("a [1]<x> (b) [2]<y> c"), "a  (b)  c");
    }
}
