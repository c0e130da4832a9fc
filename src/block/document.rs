//! The document root.

use std::any::Any;

use super::{Block, LineMatch};
use crate::line::LineCursor;

/// Root of the block tree. Accepts every block and every line.
#[derive(Debug, Default)]
pub struct Document;

impl Document {
    pub fn new() -> Self {
        Self
    }
}

impl Block for Document {
    fn kind(&self) -> &'static str {
        "document"
    }

    fn is_container(&self) -> bool {
        true
    }

    fn can_contain(&self, _child: &dyn Block) -> bool {
        true
    }

    fn try_continue(&mut self, _line: &mut LineCursor<'_>) -> LineMatch {
        LineMatch::Keep
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
