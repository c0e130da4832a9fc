//! tidemark: incremental block-structure parser for Markdown.
//!
//! Consumes raw text one line at a time and builds a rooted tree of
//! block-level nodes (document, container blocks, leaf blocks). A line
//! continues a block only while every ancestor still accepts it;
//! closing of unmatched ancestors is deferred so paragraph content can
//! continue lazily.
//!
//! # Design
//! - Arena tree: nodes addressed by stable [`NodeId`] indices, so
//!   in-place block replacement never invalidates ids held elsewhere.
//! - The tree builder ([`ParseContext`]) is kind-agnostic: block kinds
//!   plug in behind the [`Block`] trait and are discovered through the
//!   write-once [`Registry`].
//! - Single-threaded and synchronous: one driver loop per document, no
//!   yield points. Output is an in-memory tree for a downstream
//!   renderer; no HTML is produced here.
//!
//! # Example
//! ```
//! use tidemark::Block;
//!
//! let doc = tidemark::parse("# Title\n\n> quoted\n> text\n");
//! let tree = doc.tree();
//! let kinds: Vec<_> = tree
//!     .children(doc.root())
//!     .iter()
//!     .map(|&id| tree.kind(id).kind())
//!     .collect();
//! assert_eq!(kinds, vec!["heading", "block_quote"]);
//! ```

pub mod block;
pub mod config;
pub mod context;
pub mod limits;
pub mod line;
pub mod parser;
pub mod reference;
pub mod registry;
pub mod tree;

// Re-export primary types
pub use block::{Block, BlockMatcher, CoreExtension, LineMatch};
pub use config::Config;
pub use context::ParseContext;
pub use line::LineCursor;
pub use parser::{DocParser, ParsedDocument};
pub use reference::{Reference, ReferenceMap};
pub use registry::{BlockRenderer, Extension, InlineMatcher, Registry, RegistryError};
pub use tree::{BlockTree, NodeId};

/// Parse Markdown into a block tree with the core block kinds.
///
/// This is the primary API for simple use cases. Use [`DocParser`] with
/// a custom [`Registry`] to plug in additional matchers.
pub fn parse(input: &str) -> ParsedDocument {
    DocParser::new(Registry::core()).parse(input)
}
