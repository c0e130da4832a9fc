//! The line driver.
//!
//! Feeds the parse context one line at a time and runs the per-line
//! state machine: match open ancestors, try new block starts, then
//! place whatever text remains. The driver owns invariant maintenance
//! (arming the unmatched-block closer, lazy continuation); the context
//! owns the tree mutations.

use std::sync::Arc;

use memchr::memchr_iter;
use tracing::trace;

use crate::block::{BlockMatcher, LineMatch, Paragraph};
use crate::context::ParseContext;
use crate::limits::MAX_BLOCK_NESTING;
use crate::line::LineCursor;
use crate::reference::ReferenceMap;
use crate::registry::Registry;
use crate::tree::{BlockTree, NodeId};

/// The finished block tree of one document.
pub struct ParsedDocument {
    tree: BlockTree,
    root: NodeId,
    refs: ReferenceMap,
}

impl ParsedDocument {
    pub(crate) fn new(tree: BlockTree, root: NodeId, refs: ReferenceMap) -> Self {
        Self { tree, root, refs }
    }

    pub fn tree(&self) -> &BlockTree {
        &self.tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn reference_map(&self) -> &ReferenceMap {
        &self.refs
    }
}

/// Drives a [`ParseContext`] over a whole input, one line at a time.
pub struct DocParser {
    registry: Registry,
}

impl DocParser {
    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Parse a complete input into a block tree.
    pub fn parse(&mut self, input: &str) -> ParsedDocument {
        let matchers: Vec<Arc<dyn BlockMatcher>> = self.registry.block_matchers().to_vec();

        let mut cx = ParseContext::new();
        for line in split_lines(input) {
            self.incorporate_line(&mut cx, line, &matchers);
        }

        // Final flush: close every still-open block, descendants before
        // ancestors, document last.
        while let Some(tip) = cx.tip() {
            cx.finalize_block(tip);
        }
        cx.set_blocks_parsed(true);
        cx.into_document()
    }

    fn incorporate_line(
        &self,
        cx: &mut ParseContext,
        line: &str,
        matchers: &[Arc<dyn BlockMatcher>],
    ) {
        cx.advance_line(line);
        trace!(line = cx.line_number(), text = line, "incorporate line");
        let mut cursor = LineCursor::new(line);

        // Phase 1: match the line against the chain of open blocks,
        // deepening the container with every accepting ancestor.
        let mut container = cx.document();
        let mut all_matched = true;
        loop {
            let Some(child) = cx.tree().last_open_child(container) else {
                break;
            };
            match cx.tree_mut().kind_mut(child).try_continue(&mut cursor) {
                LineMatch::Keep => {
                    container = child;
                    cx.set_container(container);
                }
                LineMatch::Close => {
                    // The line was a closing marker: close anything
                    // deeper, then the block itself. Nothing remains.
                    cx.set_container(child);
                    cx.set_unmatched_block_closer(child);
                    cx.close_unmatched_blocks();
                    cx.finalize_block(child);
                    return;
                }
                LineMatch::No => {
                    all_matched = false;
                    break;
                }
            }
        }
        cx.set_container(container);
        cx.set_unmatched_block_closer(container);

        // Phase 2: let registered matchers open new blocks until a leaf
        // starts or nobody claims the line.
        let mut started_any = false;
        loop {
            let kind = cx.tree().kind(cx.container());
            if kind.is_code() || cursor.rest_is_blank() {
                break;
            }
            if cx.tree().depth(cx.container()) >= MAX_BLOCK_NESTING {
                break;
            }
            let started = matchers
                .iter()
                .any(|matcher| matcher.try_start(cx, &mut cursor));
            if !started {
                break;
            }
            started_any = true;
            if !cx.tree().kind(cx.container()).is_container() {
                break;
            }
        }

        // Phase 3: place the remaining text.
        let lazy_tip = cx.tip().filter(|&tip| {
            !all_matched
                && !started_any
                && !cursor.rest_is_blank()
                && cx.tree().kind(tip).allows_lazy_continuation()
                && cx.tree().is_open(tip)
        });
        if let Some(tip) = lazy_tip {
            // Lazy continuation: the line feeds the paragraph tip even
            // though its ancestors did not all match. The armed closer
            // is deliberately left unfired; the next line's match phase
            // overwrites it.
            let mut content = cursor;
            content.skip_indent();
            cx.tree_mut().kind_mut(tip).add_line(content.rest());
            return;
        }

        cx.close_unmatched_blocks();
        let container = cx.container();
        if cx.tree().kind(container).accepts_lines() {
            // A start matcher that consumed the whole line (an opening
            // fence) leaves nothing to add. An empty remainder on a
            // continuation line is real blank content.
            if !(started_any && cursor.is_eol()) {
                if !cx.tree().kind(container).is_code() {
                    cursor.skip_indent();
                }
                cx.tree_mut().kind_mut(container).add_line(cursor.rest());
            }
        } else if !cursor.rest_is_blank() {
            // Fallback leaf: some block always takes the line, so the
            // parse always makes forward progress.
            cursor.skip_indent();
            let paragraph = cx.attach_block(Box::new(Paragraph::new()));
            cx.tree_mut().kind_mut(paragraph).add_line(cursor.rest());
        }
    }
}

/// Split input into lines without terminators. A trailing newline does
/// not produce a final empty line.
fn split_lines(input: &str) -> impl Iterator<Item = &str> {
    let bytes = input.as_bytes();
    let mut start = 0;
    let mut newlines = memchr_iter(b'\n', bytes);
    std::iter::from_fn(move || {
        if start > bytes.len() {
            return None;
        }
        let line = match newlines.next() {
            Some(end) => {
                let line = &input[start..end];
                start = end + 1;
                line
            }
            None => {
                if start == bytes.len() {
                    start = bytes.len() + 1;
                    return None;
                }
                let line = &input[start..];
                start = bytes.len() + 1;
                line
            }
        };
        Some(line.strip_suffix('\r').unwrap_or(line))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(input: &str) -> Vec<&str> {
        split_lines(input).collect()
    }

    #[test]
    fn split_lines_basic() {
        assert_eq!(lines("a\nb"), vec!["a", "b"]);
        assert_eq!(lines("a\nb\n"), vec!["a", "b"]);
        assert_eq!(lines(""), Vec::<&str>::new());
    }

    #[test]
    fn split_lines_keeps_interior_blanks() {
        assert_eq!(lines("a\n\nb\n"), vec!["a", "", "b"]);
        assert_eq!(lines("\n"), vec![""]);
    }

    #[test]
    fn split_lines_strips_carriage_returns() {
        assert_eq!(lines("a\r\nb\r\n"), vec!["a", "b"]);
    }
}
