//! Keyword-containment retrieval over an agent's training text.
//!
//! This is substring matching, not search: keywords are runs of CJK
//! ideographs, and a line qualifies when it contains any of them.

use regex::Regex;

use crate::traits::Tokenizer;

/// At most this many training lines make up a reply.
pub const MAX_MATCHED_LINES: usize = 3;

/// Separator between matched lines.
pub const LINE_JOINER: &str = "。";

/// Returned when nothing in the training data matches.
pub const FILLER_REPLIES: [&str; 2] = [
    "这个问题很有意思，不过我的知识里还没有相关内容，能换个角度再问问吗？",
    "我还在学习中，暂时答不上来。你可以为我上传更多训练资料。",
];

/// Every maximal run of CJK unified ideographs is one keyword.
#[derive(Debug, Clone)]
pub struct CjkRunTokenizer {
    pattern: Regex,
}

impl CjkRunTokenizer {
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"[\x{4e00}-\x{9fff}]+").expect("static pattern is valid"),
        }
    }
}

impl Default for CjkRunTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for CjkRunTokenizer {
    fn keywords(&self, text: &str) -> Vec<String> {
        self.pattern
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

/// Up to [`MAX_MATCHED_LINES`] training lines containing any keyword, in
/// document order.
pub fn matching_lines<'a>(keywords: &[String], training: &'a [String]) -> Vec<&'a str> {
    if keywords.is_empty() {
        return Vec::new();
    }
    training
        .iter()
        .flat_map(|doc| doc.lines())
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| keywords.iter().any(|k| line.contains(k.as_str())))
        .take(MAX_MATCHED_LINES)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizer_splits_on_non_ideographs() {
        let words = CjkRunTokenizer::new().keywords("聊聊，春天! spring 和 月亮");
        assert_eq!(words, vec!["聊聊", "春天", "和", "月亮"]);
    }

    #[test]
    fn tokenizer_ignores_latin_text() {
        assert!(CjkRunTokenizer::new().keywords("hello world").is_empty());
    }

    #[test]
    fn at_most_three_lines_in_order() {
        let training = vec![
            "月亮一\n无关\n月亮二".to_string(),
            "月亮三\n月亮四".to_string(),
        ];
        let lines = matching_lines(&["月亮".to_string()], &training);
        assert_eq!(lines, vec!["月亮一", "月亮二", "月亮三"]);
    }

    #[test]
    fn no_keywords_no_lines() {
        let training = vec!["春天的风很温柔".to_string()];
        assert!(matching_lines(&[], &training).is_empty());
    }
}
