//! Link reference definitions.
//!
//! The document root owns a [`ReferenceMap`]; paragraphs feed it during
//! finalize by stripping leading definition lines. Only the lookup side
//! is part of this crate's contract, so the definition syntax handled
//! here is the common single-line form.

use rustc_hash::FxHashMap;

/// A link reference definition (destination + optional title).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub destination: String,
    pub title: Option<String>,
}

/// Store of reference definitions, keyed by normalized label.
#[derive(Debug, Default)]
pub struct ReferenceMap {
    refs: Vec<Reference>,
    by_label: FxHashMap<String, usize>,
}

impl ReferenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition if the label is new. First definition wins.
    pub fn insert(&mut self, label: &str, reference: Reference) {
        let label = normalize_label(label);
        if label.is_empty() || self.by_label.contains_key(&label) {
            return;
        }
        let idx = self.refs.len();
        self.refs.push(reference);
        self.by_label.insert(label, idx);
    }

    /// Look up a definition by raw label.
    pub fn get(&self, label: &str) -> Option<&Reference> {
        let idx = *self.by_label.get(&normalize_label(label))?;
        self.refs.get(idx)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.by_label.contains_key(&normalize_label(label))
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}

/// Normalize a link label: trim, collapse internal whitespace to single
/// spaces, and lowercase.
pub fn normalize_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut last_was_space = true;
    for ch in label.chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                out.push(' ');
                last_was_space = true;
            }
            continue;
        }
        last_was_space = false;
        for lc in ch.to_lowercase() {
            out.push(lc);
        }
    }
    if out.ends_with(' ') {
        out.pop();
    }
    out
}

/// Parse a full-line reference definition: `[label]: destination "title"`.
///
/// Returns the raw label and the definition, or `None` when the line is
/// not a definition. Multi-line definitions are not recognized.
pub(crate) fn parse_definition(line: &str) -> Option<(String, Reference)> {
    let rest = line.strip_prefix('[')?;
    let close = find_label_end(rest)?;
    let label = &rest[..close];
    if label.trim().is_empty() {
        return None;
    }

    let rest = rest[close + 1..].strip_prefix(':')?;
    let rest = rest.trim_start_matches([' ', '\t']);
    if rest.is_empty() {
        return None;
    }

    let (destination, rest) = split_destination(rest);
    if destination.is_empty() {
        return None;
    }

    let rest = rest.trim_start_matches([' ', '\t']);
    let title = if rest.is_empty() {
        None
    } else {
        Some(parse_title(rest)?)
    };

    Some((
        label.to_string(),
        Reference {
            destination: destination.to_string(),
            title,
        },
    ))
}

/// Find the unescaped `]` closing a label.
fn find_label_end(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if i + 1 < bytes.len() => i += 2,
            b']' => return Some(i),
            b'[' => return None,
            _ => i += 1,
        }
    }
    None
}

/// Split off the destination: either `<...>` or a run of non-whitespace.
fn split_destination(s: &str) -> (&str, &str) {
    if let Some(inner) = s.strip_prefix('<') {
        if let Some(end) = inner.find('>') {
            return (&inner[..end], &inner[end + 1..]);
        }
    }
    match s.find([' ', '\t']) {
        Some(end) => (&s[..end], &s[end..]),
        None => (s, ""),
    }
}

/// Parse a quoted title occupying the rest of the line.
fn parse_title(s: &str) -> Option<String> {
    let (open, close) = match s.as_bytes().first()? {
        b'"' => ('"', '"'),
        b'\'' => ('\'', '\''),
        b'(' => ('(', ')'),
        _ => return None,
    };
    let inner = s.strip_prefix(open)?;
    let end = inner.find(close)?;
    if !inner[end + 1..].trim_matches([' ', '\t']).is_empty() {
        return None;
    }
    Some(inner[..end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_and_lowercases() {
        assert_eq!(normalize_label("  Foo   BAR "), "foo bar");
        assert_eq!(normalize_label("ToUpper"), "toupper");
    }

    #[test]
    fn first_definition_wins() {
        let mut refs = ReferenceMap::new();
        refs.insert(
            "foo",
            Reference {
                destination: "/first".into(),
                title: None,
            },
        );
        refs.insert(
            "FOO",
            Reference {
                destination: "/second".into(),
                title: None,
            },
        );
        assert_eq!(refs.len(), 1);
        assert_eq!(refs.get("Foo").unwrap().destination, "/first");
    }

    #[test]
    fn parses_bare_definition() {
        let (label, reference) = parse_definition("[foo]: /url").unwrap();
        assert_eq!(label, "foo");
        assert_eq!(reference.destination, "/url");
        assert_eq!(reference.title, None);
    }

    #[test]
    fn parses_definition_with_title() {
        let (_, reference) = parse_definition("[foo]: /url \"the title\"").unwrap();
        assert_eq!(reference.destination, "/url");
        assert_eq!(reference.title.as_deref(), Some("the title"));
    }

    #[test]
    fn parses_angle_bracket_destination() {
        let (_, reference) = parse_definition("[foo]: </url with space>").unwrap();
        assert_eq!(reference.destination, "/url with space");
    }

    #[test]
    fn rejects_non_definitions() {
        assert!(parse_definition("plain text").is_none());
        assert!(parse_definition("[foo] /url").is_none());
        assert!(parse_definition("[]: /url").is_none());
        assert!(parse_definition("[foo]:").is_none());
        assert!(parse_definition("[foo]: /url \"unterminated").is_none());
        assert!(parse_definition("[foo]: /url \"title\" extra").is_none());
    }
}
