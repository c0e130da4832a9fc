//! Paragraphs: the fallback leaf.
//!
//! Any line no other block claims becomes paragraph content, which is
//! what lets the algorithm always make forward progress. Paragraphs are
//! the one kind that continues lazily, and at finalize time they hand
//! leading reference definitions to the document's reference map.

use std::any::Any;

use super::{Block, LineMatch};
use crate::line::LineCursor;
use crate::reference::{self, ReferenceMap};

#[derive(Debug, Default)]
pub struct Paragraph {
    lines: Vec<String>,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// The accumulated source lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Content joined with newlines, trailing whitespace stripped.
    pub fn text(&self) -> String {
        let mut text = self.lines.join("\n");
        while text.ends_with([' ', '\t']) {
            text.pop();
        }
        text
    }
}

impl Block for Paragraph {
    fn kind(&self) -> &'static str {
        "paragraph"
    }

    fn accepts_lines(&self) -> bool {
        true
    }

    fn allows_lazy_continuation(&self) -> bool {
        true
    }

    fn try_continue(&mut self, line: &mut LineCursor<'_>) -> LineMatch {
        // A blank line always ends a paragraph; any other line keeps it
        // alive for now. Consumes nothing: an interrupting block start
        // still closes the paragraph through the attach walk.
        if line.rest_is_blank() {
            LineMatch::No
        } else {
            LineMatch::Keep
        }
    }

    fn add_line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }

    fn finalize(&mut self, refs: &mut ReferenceMap, _line_number: u32) {
        while let Some(first) = self.lines.first() {
            match reference::parse_definition(first) {
                Some((label, definition)) => {
                    refs.insert(&label, definition);
                    self.lines.remove(0);
                }
                None => break,
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
