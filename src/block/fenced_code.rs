//! Fenced code blocks.

use std::any::Any;

use super::{Block, BlockMatcher, LineMatch};
use crate::context::ParseContext;
use crate::line::LineCursor;

/// A backtick or tilde fenced code block.
#[derive(Debug)]
pub struct FencedCode {
    fence_char: u8,
    fence_len: usize,
    indent: usize,
    info: Option<String>,
    lines: Vec<String>,
}

impl FencedCode {
    pub fn new(fence_char: u8, fence_len: usize, indent: usize, info: Option<String>) -> Self {
        debug_assert!(fence_char == b'`' || fence_char == b'~');
        Self {
            fence_char,
            fence_len,
            indent,
            info,
            lines: Vec::new(),
        }
    }

    /// The info string after the opening fence, if any.
    pub fn info(&self) -> Option<&str> {
        self.info.as_deref()
    }

    /// Raw content lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Content joined with newlines.
    pub fn literal(&self) -> String {
        self.lines.join("\n")
    }
}

impl Block for FencedCode {
    fn kind(&self) -> &'static str {
        "fenced_code"
    }

    fn accepts_lines(&self) -> bool {
        true
    }

    fn is_code(&self) -> bool {
        true
    }

    fn try_continue(&mut self, line: &mut LineCursor<'_>) -> LineMatch {
        // Closing fence: same char, at least opening length, nothing
        // else on the line.
        let mut probe = *line;
        if probe.skip_indent() <= 3
            && probe.eat_run(self.fence_char) >= self.fence_len
            && probe.rest_is_blank()
        {
            line.consume_to_eol();
            return LineMatch::Close;
        }

        // Content line: strip at most the opening fence's indentation.
        line.skip_spaces_up_to(self.indent);
        LineMatch::Keep
    }

    fn add_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Starts a fenced code block at a run of 3+ backticks or tildes.
pub struct FencedCodeStart;

impl BlockMatcher for FencedCodeStart {
    fn name(&self) -> &'static str {
        "fenced_code"
    }

    fn try_start(&self, cx: &mut ParseContext, line: &mut LineCursor<'_>) -> bool {
        let mut probe = *line;
        let indent = probe.skip_indent();
        if indent > 3 {
            return false;
        }

        let fence_char = match probe.peek() {
            Some(b @ (b'`' | b'~')) => b,
            _ => return false,
        };
        let fence_len = probe.eat_run(fence_char);
        if fence_len < 3 {
            return false;
        }

        // Backtick fences reject backticks in the info string so inline
        // code spans starting with ``` stay unambiguous.
        let info = probe.rest().trim_matches([' ', '\t']);
        if fence_char == b'`' && info.contains('`') {
            return false;
        }
        let info = (!info.is_empty()).then(|| info.to_string());

        cx.attach_block(Box::new(FencedCode::new(
            fence_char, fence_len, indent, info,
        )));
        line.consume_to_eol();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fence() -> FencedCode {
        FencedCode::new(b'`', 3, 0, None)
    }

    #[test]
    fn closing_fence_consumes_line() {
        let mut block = fence();
        let mut line = LineCursor::new("```");
        assert_eq!(block.try_continue(&mut line), LineMatch::Close);
        assert!(line.is_eol());
    }

    #[test]
    fn longer_closing_fence_closes() {
        let mut block = fence();
        assert_eq!(
            block.try_continue(&mut LineCursor::new("`````")),
            LineMatch::Close
        );
    }

    #[test]
    fn shorter_closing_fence_is_content() {
        let mut block = FencedCode::new(b'`', 4, 0, None);
        assert_eq!(
            block.try_continue(&mut LineCursor::new("```")),
            LineMatch::Keep
        );
    }

    #[test]
    fn mismatched_char_is_content() {
        let mut block = fence();
        assert_eq!(
            block.try_continue(&mut LineCursor::new("~~~")),
            LineMatch::Keep
        );
    }

    #[test]
    fn closing_fence_with_trailing_text_is_content() {
        let mut block = fence();
        assert_eq!(
            block.try_continue(&mut LineCursor::new("``` x")),
            LineMatch::Keep
        );
    }

    #[test]
    fn content_strips_opening_indent_only() {
        let mut block = FencedCode::new(b'`', 3, 2, None);
        let mut line = LineCursor::new("    indented");
        assert_eq!(block.try_continue(&mut line), LineMatch::Keep);
        assert_eq!(line.rest(), "  indented");
    }

    #[test]
    fn literal_joins_lines() {
        let mut block = fence();
        block.add_line("a");
        block.add_line("");
        block.add_line("b");
        assert_eq!(block.literal(), "a\n\nb");
    }
}
