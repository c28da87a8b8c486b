use crate::parsing::rope::content_lines;

/// Backtick code fence delimiter.
///
/// Any line whose first non-blank characters are three backticks both opens
/// and closes a fence; the closing line may carry its own info string.
pub struct CodeFence;

impl CodeFence {
    pub const BACKTICKS: &'static str = "```";

    /// Returns the info string when `line` is a fence delimiter.
    ///
    /// `Some(None)` is a bare fence, `Some(Some(lang))` carries a language: the
    /// run of non-whitespace directly after the backticks.
    pub fn sig(line: &str) -> Option<Option<String>> {
        let rest = line.trim_start().strip_prefix(Self::BACKTICKS)?;
        let lang: String = rest.chars().take_while(|c| !c.is_whitespace()).collect();
        Some((!lang.is_empty()).then_some(lang))
    }

    pub fn is_delimiter(line: &str) -> bool {
        line.trim_start().starts_with(Self::BACKTICKS)
    }

    /// Splits a code block's content into its body lines, dropping the opening
    /// fence and the closing fence when one is present.
    pub fn body_lines(content: &str) -> Vec<&str> {
        let lines: Vec<&str> = content_lines(content).collect();
        let closed = lines.len() > 1 && lines.last().is_some_and(|l| Self::is_delimiter(l));
        let end = if closed { lines.len() - 1 } else { lines.len() };
        lines.get(1..end).map(<[&str]>::to_vec).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_fence_with_language() {
        assert_eq!(CodeFence::sig("```rust"), Some(Some("rust".to_string())));
    }

    #[test]
    fn language_stops_at_whitespace() {
        assert_eq!(
            CodeFence::sig("  ```python title=x"),
            Some(Some("python".to_string()))
        );
    }

    #[test]
    fn bare_fence_has_no_language() {
        assert_eq!(CodeFence::sig("```"), Some(None));
        assert_eq!(CodeFence::sig("```   "), Some(None));
    }

    #[test]
    fn no_fence() {
        assert_eq!(CodeFence::sig("hello"), None);
        assert_eq!(CodeFence::sig("``inline``"), None);
        assert_eq!(CodeFence::sig("~~~"), None);
    }

    #[test]
    fn body_lines_strips_both_fences() {
        assert_eq!(
            CodeFence::body_lines("```rust\nfn a() {}\nfn b() {}\n```"),
            vec!["fn a() {}", "fn b() {}"]
        );
    }

    #[test]
    fn body_lines_of_unterminated_fence() {
        assert_eq!(CodeFence::body_lines("```\nx = 1"), vec!["x = 1"]);
        assert!(CodeFence::body_lines("```").is_empty());
    }
}
