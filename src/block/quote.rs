//! Block quotes.

use std::any::Any;

use super::{Block, BlockMatcher, LineMatch};
use crate::context::ParseContext;
use crate::line::LineCursor;

/// A `>`-marked container block.
#[derive(Debug, Default)]
pub struct BlockQuote;

impl BlockQuote {
    pub fn new() -> Self {
        Self
    }
}

impl Block for BlockQuote {
    fn kind(&self) -> &'static str {
        "block_quote"
    }

    fn is_container(&self) -> bool {
        true
    }

    fn can_contain(&self, _child: &dyn Block) -> bool {
        true
    }

    fn try_continue(&mut self, line: &mut LineCursor<'_>) -> LineMatch {
        match eat_quote_marker(line) {
            true => LineMatch::Keep,
            false => LineMatch::No,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Consume a `>` marker (with up to 3 columns of indentation and one
/// optional following space) from the line. Restores the cursor when
/// there is no marker.
fn eat_quote_marker(line: &mut LineCursor<'_>) -> bool {
    let mut probe = *line;
    if probe.skip_indent() > 3 || !probe.at(b'>') {
        return false;
    }
    probe.bump();
    if probe.at(b' ') || probe.at(b'\t') {
        probe.bump();
    }
    *line = probe;
    true
}

/// Starts a block quote at a `>` marker.
pub struct BlockQuoteStart;

impl BlockMatcher for BlockQuoteStart {
    fn name(&self) -> &'static str {
        "block_quote"
    }

    fn try_start(&self, cx: &mut ParseContext, line: &mut LineCursor<'_>) -> bool {
        if !eat_quote_marker(line) {
            return false;
        }
        cx.attach_block(Box::new(BlockQuote::new()));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_with_space_is_consumed() {
        let mut line = LineCursor::new("> text");
        assert!(eat_quote_marker(&mut line));
        assert_eq!(line.rest(), "text");
    }

    #[test]
    fn marker_without_space_is_consumed() {
        let mut line = LineCursor::new(">text");
        assert!(eat_quote_marker(&mut line));
        assert_eq!(line.rest(), "text");
    }

    #[test]
    fn indented_marker_up_to_three_columns() {
        let mut line = LineCursor::new("   > text");
        assert!(eat_quote_marker(&mut line));
        assert_eq!(line.rest(), "text");
    }

    #[test]
    fn four_columns_is_not_a_marker() {
        let mut line = LineCursor::new("    > text");
        assert!(!eat_quote_marker(&mut line));
        assert_eq!(line.offset(), 0);
    }

    #[test]
    fn no_marker_leaves_cursor_untouched() {
        let mut line = LineCursor::new("plain");
        assert!(!eat_quote_marker(&mut line));
        assert_eq!(line.offset(), 0);
    }
}
