//! Block kinds and the capabilities the tree builder consumes.
//!
//! The tree builder never sees a concrete block kind: it works against
//! the [`Block`] trait (accepts-child test, continuation, finalize) and
//! lets registered [`BlockMatcher`]s decide where new blocks start.
//!
//! Core kinds supplied here:
//! - Document (root container)
//! - Paragraph (fallback leaf, lazy continuation)
//! - Block quote
//! - ATX and setext headings
//! - Fenced code
//! - Thematic break

mod document;
mod fenced_code;
mod heading;
mod paragraph;
mod quote;
mod thematic_break;

pub use document::Document;
pub use fenced_code::{FencedCode, FencedCodeStart};
pub use heading::{AtxHeadingStart, Heading, SetextHeadingStart};
pub use paragraph::Paragraph;
pub use quote::{BlockQuote, BlockQuoteStart};
pub use thematic_break::{ThematicBreak, ThematicBreakStart};

use std::any::Any;
use std::sync::Arc;

use crate::context::ParseContext;
use crate::line::LineCursor;
use crate::reference::ReferenceMap;
use crate::registry::Extension;

/// Outcome of matching an open block against the next line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineMatch {
    /// The block continues; its marker (if any) has been consumed.
    Keep,
    /// The line belongs to the block and ends it (e.g. a closing fence).
    /// The whole line has been consumed.
    Close,
    /// The block does not continue on this line.
    No,
}

/// A block-level node kind.
///
/// One implementation per concrete kind. The tree builder holds these
/// only as trait objects and re-checks `can_contain` at every attach;
/// the result is never cached.
pub trait Block: std::fmt::Debug {
    /// Stable kind name, also the renderer lookup key.
    fn kind(&self) -> &'static str;

    /// Whether this kind may hold child blocks.
    fn is_container(&self) -> bool {
        false
    }

    /// Whether raw line content is appended to this block.
    fn accepts_lines(&self) -> bool {
        false
    }

    /// Code blocks take their content verbatim and suppress block starts.
    fn is_code(&self) -> bool {
        false
    }

    /// Whether a non-matching, non-blank line may still continue this
    /// block when it is the tip (lazy continuation).
    fn allows_lazy_continuation(&self) -> bool {
        false
    }

    /// Accepts-child test, re-checked at every attach.
    fn can_contain(&self, _child: &dyn Block) -> bool {
        false
    }

    /// Match this open block against the next line, consuming its
    /// marker from the cursor on success.
    fn try_continue(&mut self, line: &mut LineCursor<'_>) -> LineMatch;

    /// Append a content line. Only called when `accepts_lines` is true.
    fn add_line(&mut self, _line: &str) {}

    /// One-time hook run when the block closes.
    fn finalize(&mut self, _refs: &mut ReferenceMap, _line_number: u32) {}

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Decides whether a new block starts on the current line.
///
/// Matchers are registered through the extension registry and invoked
/// by the line driver in registration order. On success the matcher has
/// consumed the block's marker and attached (or replaced) the block
/// through the parse context.
pub trait BlockMatcher {
    fn name(&self) -> &'static str;

    fn try_start(&self, cx: &mut ParseContext, line: &mut LineCursor<'_>) -> bool;
}

/// The built-in block matchers, in interrupt-precedence order.
///
/// Setext must run before thematic break so `---` under a paragraph
/// reads as a heading underline.
pub struct CoreExtension;

impl Extension for CoreExtension {
    fn name(&self) -> &'static str {
        "core"
    }

    fn block_matchers(&self) -> Vec<Arc<dyn BlockMatcher>> {
        vec![
            Arc::new(BlockQuoteStart),
            Arc::new(AtxHeadingStart),
            Arc::new(FencedCodeStart),
            Arc::new(SetextHeadingStart),
            Arc::new(ThematicBreakStart),
        ]
    }
}
