//! ATX (`# ...`) and setext (underlined) headings.

use std::any::Any;

use super::{Block, BlockMatcher, LineMatch, Paragraph};
use crate::context::ParseContext;
use crate::line::LineCursor;

/// A heading, level 1-6. Single-line; never continues.
#[derive(Debug)]
pub struct Heading {
    level: u8,
    text: String,
    setext: bool,
}

impl Heading {
    pub fn atx(level: u8, text: String) -> Self {
        debug_assert!((1..=6).contains(&level));
        Self {
            level,
            text,
            setext: false,
        }
    }

    pub fn setext(level: u8, text: String) -> Self {
        debug_assert!(level == 1 || level == 2);
        Self {
            level,
            text,
            setext: true,
        }
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_setext(&self) -> bool {
        self.setext
    }
}

impl Block for Heading {
    fn kind(&self) -> &'static str {
        "heading"
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

/// Starts a heading at `#`-`######` followed by space or end of line.
pub struct AtxHeadingStart;

impl BlockMatcher for AtxHeadingStart {
    fn name(&self) -> &'static str {
        "atx_heading"
    }

    fn try_start(&self, cx: &mut ParseContext, line: &mut LineCursor<'_>) -> bool {
        let mut probe = *line;
        if probe.skip_indent() > 3 {
            return false;
        }

        let level = probe.eat_run(b'#');
        if level == 0 || level > 6 {
            return false;
        }
        if !probe.is_eol() && !probe.at(b' ') && !probe.at(b'\t') {
            return false;
        }

        probe.skip_indent();
        let text = trim_heading_end(probe.rest());
        cx.attach_block(Box::new(Heading::atx(level as u8, text.to_string())));
        line.consume_to_eol();
        true
    }
}

/// Trim trailing whitespace and an optional closing `#` run. Closing
/// hashes count only when preceded by whitespace or alone on the line.
fn trim_heading_end(content: &str) -> &str {
    let content = content.trim_end_matches([' ', '\t']);
    let without_hashes = content.trim_end_matches('#');
    if without_hashes.len() == content.len() {
        return content;
    }
    if without_hashes.is_empty() || without_hashes.ends_with([' ', '\t']) {
        without_hashes.trim_end_matches([' ', '\t'])
    } else {
        content
    }
}

/// Reclassifies the current paragraph as a heading when the line is a
/// `=` or `-` underline.
///
/// This is the replace path: the paragraph is swapped out of the tree in
/// place and the tip re-pointed at the new heading.
pub struct SetextHeadingStart;

impl BlockMatcher for SetextHeadingStart {
    fn name(&self) -> &'static str {
        "setext_heading"
    }

    fn try_start(&self, cx: &mut ParseContext, line: &mut LineCursor<'_>) -> bool {
        let container = cx.container();
        if cx.tree().kind(container).kind() != "paragraph" {
            return false;
        }
        // A lazily-continued paragraph cannot become a heading: the
        // underline has to sit directly under content in the same
        // container chain.
        if cx.tip() != Some(container) {
            return false;
        }

        let mut probe = *line;
        if probe.skip_indent() > 3 {
            return false;
        }
        let marker = match probe.peek() {
            Some(b @ (b'=' | b'-')) => b,
            _ => return false,
        };
        let level = if marker == b'=' { 1 } else { 2 };
        probe.eat_run(marker);
        if !probe.rest_is_blank() {
            return false;
        }

        let text = cx
            .tree()
            .kind(container)
            .as_any()
            .downcast_ref::<Paragraph>()
            .map(Paragraph::text)
            .unwrap_or_default();
        if text.is_empty() {
            // Nothing to promote; let the underline fall through to the
            // thematic break matcher or plain content.
            return false;
        }

        let heading = cx.replace_container_block(Box::new(Heading::setext(level, text)));
        cx.set_tip(Some(heading));
        line.consume_to_eol();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_whitespace() {
        assert_eq!(trim_heading_end("Heading  "), "Heading");
    }

    #[test]
    fn trims_closing_hashes_after_space() {
        assert_eq!(trim_heading_end("Heading ##"), "Heading");
        assert_eq!(trim_heading_end("Heading #  "), "Heading");
    }

    #[test]
    fn keeps_hashes_without_preceding_space() {
        assert_eq!(trim_heading_end("Heading#"), "Heading#");
    }

    #[test]
    fn all_hashes_trims_to_empty() {
        assert_eq!(trim_heading_end("###"), "");
    }
}
