//! Thematic breaks (`---`, `***`, `___`).

use std::any::Any;

use super::{Block, BlockMatcher, LineMatch};
use crate::context::ParseContext;
use crate::line::LineCursor;

#[derive(Debug, Default)]
pub struct ThematicBreak;

impl ThematicBreak {
    pub fn new() -> Self {
        Self
    }
}

impl Block for ThematicBreak {
    fn kind(&self) -> &'static str {
        "thematic_break"
    }

    fn try_continue(&mut self, _line: &mut LineCursor<'_>) -> LineMatch {
        LineMatch::No
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Starts a thematic break at 3+ of the same marker, spaces allowed.
pub struct ThematicBreakStart;

impl BlockMatcher for ThematicBreakStart {
    fn name(&self) -> &'static str {
        "thematic_break"
    }

    fn try_start(&self, cx: &mut ParseContext, line: &mut LineCursor<'_>) -> bool {
        let mut probe = *line;
        if probe.skip_indent() > 3 {
            return false;
        }
        let marker = match probe.peek() {
            Some(b @ (b'-' | b'*' | b'_')) => b,
            _ => return false,
        };

        let mut count = 0;
        while let Some(b) = probe.peek() {
            if b == marker {
                count += 1;
                probe.bump();
            } else if b == b' ' || b == b'\t' {
                probe.bump();
            } else {
                return false;
            }
        }
        if count < 3 {
            return false;
        }

        cx.attach_block(Box::new(ThematicBreak::new()));
        line.consume_to_eol();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ParseContext;

    fn starts(text: &str) -> bool {
        let mut cx = ParseContext::new();
        cx.advance_line(text);
        ThematicBreakStart.try_start(&mut cx, &mut LineCursor::new(text))
    }

    #[test]
    fn three_markers_of_each_kind() {
        assert!(starts("---"));
        assert!(starts("***"));
        assert!(starts("___"));
    }

    #[test]
    fn spaces_between_markers_allowed() {
        assert!(starts("- - -"));
        assert!(starts("   -  -  - "));
    }

    #[test]
    fn too_few_or_mixed_markers_rejected() {
        assert!(!starts("--"));
        assert!(!starts("-*-"));
        assert!(!starts("--- x"));
    }
}
