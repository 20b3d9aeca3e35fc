//! Grapheme segmentation for stepwise reveal.
//!
//! One animation step is one user-perceived character (extended grapheme
//! cluster), so combining sequences, ZWJ emoji and regional-indicator flags
//! are never split across two frames.

use unicode_segmentation::UnicodeSegmentation;

/// Splits `text` into its ordered extended grapheme clusters.
///
/// Concatenating the result reproduces `text` exactly.
pub fn segment(text: &str) -> Vec<&str> {
    text.graphemes(true).collect()
}

/// Number of animation steps needed to reveal `text`.
pub fn cluster_count(text: &str) -> usize {
    text.graphemes(true).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_concat_reproduces_input() {
        let inputs = [
            "",
            "Hi, I'm Becky!",
            "e\u{301}te\u{301}",
            "个人简介\n\n姓名",
            "👩‍💻 writes 🇧🇷 code",
            "line\r\nbreak",
        ];
        for input in inputs {
            assert_eq!(segment(input).concat(), input);
        }
    }

    #[test]
    fn test_segment_ascii_one_cluster_per_char() {
        assert_eq!(segment("Hello"), vec!["H", "e", "l", "l", "o"]);
    }

    #[test]
    fn test_combining_mark_is_single_cluster() {
        let clusters = segment("e\u{301}");
        assert_eq!(clusters, vec!["e\u{301}"]);
    }

    #[test]
    fn test_emoji_sequences_are_single_clusters() {
        assert_eq!(cluster_count("👩‍💻"), 1);
        assert_eq!(cluster_count("🇧🇷"), 1);
        assert_eq!(cluster_count("👍🏽"), 1);
    }

    #[test]
    fn test_crlf_is_single_cluster() {
        assert_eq!(segment("a\r\nb"), vec!["a", "\r\n", "b"]);
    }

    #[test]
    fn test_cjk_counts_characters() {
        assert_eq!(cluster_count("个人简介"), 4);
    }

    #[test]
    fn test_empty_has_no_steps() {
        assert!(segment("").is_empty());
        assert_eq!(cluster_count(""), 0);
    }
}
