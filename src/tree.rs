//! Arena-backed block tree.
//!
//! Nodes live in a flat `Vec` and are addressed by [`NodeId`]. Ids are
//! stable for the lifetime of a parse: replacing a block swaps the child
//! slot in its parent, it never reuses or moves slots, so ids held by
//! matchers stay valid.

use smallvec::SmallVec;

use crate::block::Block;

/// Stable index of a node in a [`BlockTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    fn new(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize);
        Self(index as u32)
    }

    /// Position of this node in the arena.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

struct Node {
    kind: Box<dyn Block>,
    parent: Option<NodeId>,
    children: SmallVec<[NodeId; 4]>,
    start_line: u32,
    end_line: u32,
    open: bool,
}

/// Arena of block nodes plus parent/child structure.
#[derive(Default)]
pub struct BlockTree {
    nodes: Vec<Node>,
}

impl BlockTree {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Number of nodes allocated, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate an open, unattached node stamped with its start line.
    /// The start line is immutable from here on.
    pub(crate) fn alloc(&mut self, kind: Box<dyn Block>, start_line: u32) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: None,
            children: SmallVec::new(),
            start_line,
            end_line: start_line,
            open: true,
        });
        id
    }

    /// The block kind behind a node.
    pub fn kind(&self, id: NodeId) -> &dyn Block {
        &*self.nodes[id.index()].kind
    }

    pub fn kind_mut(&mut self, id: NodeId) -> &mut dyn Block {
        &mut *self.nodes[id.index()].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    pub fn start_line(&self, id: NodeId) -> u32 {
        self.nodes[id.index()].start_line
    }

    pub fn end_line(&self, id: NodeId) -> u32 {
        self.nodes[id.index()].end_line
    }

    pub fn is_open(&self, id: NodeId) -> bool {
        self.nodes[id.index()].open
    }

    /// Mark a node closed. Only the finalize path calls this.
    pub(crate) fn set_closed(&mut self, id: NodeId, end_line: u32) {
        let node = &mut self.nodes[id.index()];
        node.open = false;
        node.end_line = end_line;
    }

    /// The last child of `id`, provided it is still open.
    ///
    /// Only the rightmost spine of the tree can be open, so this is the
    /// next candidate when matching a line against open descendants.
    pub fn last_open_child(&self, id: NodeId) -> Option<NodeId> {
        let child = self.nodes[id.index()].children.last().copied()?;
        if self.nodes[child.index()].open {
            Some(child)
        } else {
            None
        }
    }

    /// Append `child` as the last child of `parent`.
    pub(crate) fn append_child(&mut self, parent: NodeId, child: NodeId) {
        debug_assert!(self.nodes[child.index()].parent.is_none());
        debug_assert!(
            self.nodes[parent.index()]
                .children
                .last()
                .is_none_or(|&prev| self.start_line(prev) <= self.start_line(child)),
            "siblings must attach in non-decreasing line order"
        );
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
    }

    /// Substitute `new` for `old` at the same position in `parent`'s
    /// child list. `old` is detached; its children stay with it.
    pub(crate) fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) {
        debug_assert!(self.nodes[new.index()].parent.is_none());
        let pos = self.nodes[parent.index()]
            .children
            .iter()
            .position(|&c| c == old)
            .expect("replace_child: old node is not a child of parent");
        self.nodes[parent.index()].children[pos] = new;
        self.nodes[new.index()].parent = Some(parent);
        self.nodes[old.index()].parent = None;
    }

    /// Depth of a node: the document root is at depth 0.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            depth += 1;
            current = parent;
        }
        depth
    }

    /// Preorder walk of the subtree rooted at `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            out.push(node);
            for &child in self.children(node).iter().rev() {
                stack.push(child);
            }
        }
        out
    }
}

impl std::fmt::Debug for BlockTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut list = f.debug_list();
        for (i, node) in self.nodes.iter().enumerate() {
            list.entry(&format_args!(
                "{}: {} [{}..{}] open={} parent={:?}",
                i,
                node.kind.kind(),
                node.start_line,
                node.end_line,
                node.open,
                node.parent.map(|p| p.index()),
            ));
        }
        list.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{Document, Paragraph};

    fn tree_with_root() -> (BlockTree, NodeId) {
        let mut tree = BlockTree::new();
        let root = tree.alloc(Box::new(Document::new()), 0);
        (tree, root)
    }

    #[test]
    fn alloc_starts_open_and_unattached() {
        let (mut tree, root) = tree_with_root();
        let p = tree.alloc(Box::new(Paragraph::new()), 1);
        assert!(tree.is_open(p));
        assert_eq!(tree.parent(p), None);
        assert_eq!(tree.start_line(p), 1);
        assert!(tree.children(root).is_empty());
    }

    #[test]
    fn append_links_both_directions() {
        let (mut tree, root) = tree_with_root();
        let p = tree.alloc(Box::new(Paragraph::new()), 1);
        tree.append_child(root, p);
        assert_eq!(tree.parent(p), Some(root));
        assert_eq!(tree.children(root), &[p]);
        assert_eq!(tree.depth(p), 1);
    }

    #[test]
    fn last_open_child_ignores_closed() {
        let (mut tree, root) = tree_with_root();
        let p = tree.alloc(Box::new(Paragraph::new()), 1);
        tree.append_child(root, p);
        assert_eq!(tree.last_open_child(root), Some(p));
        tree.set_closed(p, 2);
        assert_eq!(tree.last_open_child(root), None);
    }

    #[test]
    fn replace_keeps_position_and_detaches_old() {
        let (mut tree, root) = tree_with_root();
        let a = tree.alloc(Box::new(Paragraph::new()), 1);
        let b = tree.alloc(Box::new(Paragraph::new()), 2);
        let c = tree.alloc(Box::new(Paragraph::new()), 3);
        tree.append_child(root, a);
        tree.append_child(root, b);
        tree.replace_child(root, a, c);
        assert_eq!(tree.children(root), &[c, b]);
        assert_eq!(tree.parent(a), None);
        assert_eq!(tree.parent(c), Some(root));
    }

    #[test]
    fn descendants_is_preorder() {
        let (mut tree, root) = tree_with_root();
        let a = tree.alloc(Box::new(Paragraph::new()), 1);
        let b = tree.alloc(Box::new(Paragraph::new()), 1);
        let c = tree.alloc(Box::new(Paragraph::new()), 2);
        tree.append_child(root, a);
        tree.append_child(a, b);
        tree.append_child(root, c);
        assert_eq!(tree.descendants(root), vec![root, a, b, c]);
    }
}
