//! The parse context: line cursor, open-block chain, and the
//! close/attach/replace operations the whole algorithm hangs on.
//!
//! The invariants maintained here:
//!
//! - every open node's ancestors are open;
//! - the tip is always open once set;
//! - `can_contain` holds between every node and its child at attach
//!   time, re-checked on each attach, never cached;
//! - start lines are non-decreasing along any root-to-leaf path and
//!   across siblings in attach order.
//!
//! Structural misuse (attaching with no valid tip, closing toward a
//! node that is not an open ancestor) is a driver bug, not a runtime
//! error: it trips debug assertions instead of returning `Result`.

use tracing::trace;

use crate::block::Block;
use crate::parser::ParsedDocument;
use crate::reference::ReferenceMap;
use crate::tree::{BlockTree, NodeId};

/// Tree builder and per-parse state.
///
/// One instance per document parse; not shareable across parses.
pub struct ParseContext {
    tree: BlockTree,
    doc: NodeId,
    tip: Option<NodeId>,
    container: NodeId,
    line_number: u32,
    line: String,
    blocks_parsed: bool,
    refs: ReferenceMap,
    /// Deepest matched ancestor of the current line, when the driver
    /// has unmatched blocks pending below it. Firing closes every open
    /// block strictly below this node along the tip chain.
    unmatched_closer: Option<NodeId>,
}

impl ParseContext {
    /// Create a context with a fresh document root as tip and container.
    pub fn new() -> Self {
        let mut tree = BlockTree::new();
        let doc = tree.alloc(Box::new(crate::block::Document::new()), 0);
        Self {
            tree,
            doc,
            tip: Some(doc),
            container: doc,
            line_number: 0,
            line: String::new(),
            blocks_parsed: false,
            refs: ReferenceMap::new(),
            unmatched_closer: None,
        }
    }

    /// The document root.
    pub fn document(&self) -> NodeId {
        self.doc
    }

    pub fn tree(&self) -> &BlockTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut BlockTree {
        &mut self.tree
    }

    pub fn reference_map(&self) -> &ReferenceMap {
        &self.refs
    }

    pub fn reference_map_mut(&mut self) -> &mut ReferenceMap {
        &mut self.refs
    }

    /// Advance to the next raw line. No tree mutation happens here.
    ///
    /// Lines must be fed in order; the counter never resets.
    pub fn advance_line(&mut self, text: &str) {
        self.line_number += 1;
        self.line.clear();
        self.line.push_str(text);
    }

    /// 1-based number of the current line; 0 before the first line.
    pub fn line_number(&self) -> u32 {
        self.line_number
    }

    /// Raw text of the current line.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// The deepest open node; `None` only during final shutdown.
    pub fn tip(&self) -> Option<NodeId> {
        self.tip
    }

    /// Override the tip, e.g. after reclassifying a block. Passing
    /// `None` is legal only when the parse is fully closing down; a
    /// later `attach_block` requires a valid tip again.
    pub fn set_tip(&mut self, tip: Option<NodeId>) {
        self.tip = tip;
    }

    /// The deepest node matched against the current line so far.
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// Update the match-depth pointer while descending into open
    /// ancestors. Independent of whether a new block ends up attached.
    pub fn set_container(&mut self, container: NodeId) {
        self.container = container;
    }

    /// Attach a new block under the deepest open ancestor that accepts
    /// it, closing rejecting tips on the way up.
    ///
    /// This is the single entry point for attachment: it fires the
    /// pending unmatched-block closer, stamps the start line, walks the
    /// tip chain with `can_contain`, appends, and makes the new node
    /// both tip and container.
    pub fn attach_block(&mut self, kind: Box<dyn Block>) -> NodeId {
        self.close_unmatched_blocks();

        let id = self.tree.alloc(kind, self.line_number);
        let mut tip = self.tip.expect("attach_block requires an open tip");
        while !self.tree.kind(tip).can_contain(self.tree.kind(id)) {
            tip = self
                .finalize_block(tip)
                .expect("document accepts every block kind");
        }

        self.tree.append_child(tip, id);
        self.tip = Some(id);
        self.container = id;
        trace!(
            line = self.line_number,
            kind = self.tree.kind(id).kind(),
            parent = tip.index(),
            "attach block"
        );
        id
    }

    /// Swap the current container for `kind`, in place at its position
    /// in its parent's child list.
    ///
    /// The replaced node is detached with its children; re-homing them
    /// (and re-pointing the tip via [`set_tip`](Self::set_tip)) is the
    /// caller's responsibility. The replacement keeps the replaced
    /// node's start line.
    pub fn replace_container_block(&mut self, kind: Box<dyn Block>) -> NodeId {
        self.close_unmatched_blocks();

        let old = self.container;
        let parent = self
            .tree
            .parent(old)
            .expect("the document root cannot be replaced");
        let id = self.tree.alloc(kind, self.tree.start_line(old));
        self.tree.replace_child(parent, old, id);
        self.container = id;
        trace!(
            line = self.line_number,
            old = old.index(),
            new = id.index(),
            kind = self.tree.kind(id).kind(),
            "replace container block"
        );
        id
    }

    /// Register the deferred unmatched-block decision: when fired,
    /// every open block strictly below `deepest_matched` closes,
    /// deepest first.
    ///
    /// Overwrites any unfired previous value; only the latest decision
    /// matters. Attach and replace fire it automatically so deferred
    /// finalize side effects land before a sibling appears.
    pub fn set_unmatched_block_closer(&mut self, deepest_matched: NodeId) {
        if let Some(previous) = self.unmatched_closer {
            trace!(
                discarded = previous.index(),
                replaced_by = deepest_matched.index(),
                "unfired unmatched-block closer overwritten"
            );
        }
        self.unmatched_closer = Some(deepest_matched);
    }

    /// Fire and clear the pending closer. No-op when none is pending,
    /// so calling it twice in a row is safe.
    pub fn close_unmatched_blocks(&mut self) {
        let Some(keep) = self.unmatched_closer.take() else {
            return;
        };
        debug_assert!(self.tree.is_open(keep), "closer target must still be open");
        while let Some(tip) = self.tip {
            if tip == keep {
                break;
            }
            self.finalize_block(tip);
        }
    }

    /// Whether an unmatched-block decision is pending.
    pub fn has_pending_closer(&self) -> bool {
        self.unmatched_closer.is_some()
    }

    /// Close a block: mark it closed, stamp the end line, run the
    /// kind's finalize hook, and promote the tip to the parent when the
    /// block was the tip. Returns the parent.
    ///
    /// Finalize runs exactly once per node; a second call is a no-op
    /// guarded by a debug assertion.
    pub fn finalize_block(&mut self, id: NodeId) -> Option<NodeId> {
        if !self.tree.is_open(id) {
            debug_assert!(false, "finalize_block called twice on the same node");
            return self.tree.parent(id);
        }

        self.tree.set_closed(id, self.line_number);
        self.tree.kind_mut(id).finalize(&mut self.refs, self.line_number);

        let parent = self.tree.parent(id);
        if self.tip == Some(id) {
            self.tip = parent;
        }
        trace!(
            line = self.line_number,
            node = id.index(),
            kind = self.tree.kind(id).kind(),
            "finalize block"
        );
        parent
    }

    /// Flipped once block-level scanning of the whole document is done;
    /// later phases read it to assert ordering.
    pub fn blocks_parsed(&self) -> bool {
        self.blocks_parsed
    }

    pub fn set_blocks_parsed(&mut self, done: bool) {
        self.blocks_parsed = done;
    }

    /// Consume the context into the finished document.
    pub fn into_document(self) -> ParsedDocument {
        debug_assert!(
            self.blocks_parsed,
            "into_document before block parsing finished"
        );
        ParsedDocument::new(self.tree, self.doc, self.refs)
    }
}

impl Default for ParseContext {
    fn default() -> Self {
        Self::new()
    }
}
