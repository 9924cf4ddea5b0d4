//! Recovers a tree of tagged elements from raw news markup.
//!
//! The input is semi-structured: declarations, attribute quoting styles and
//! broken tags all occur in the wild, so the parser degrades gracefully —
//! a tag with no matching close is skipped and scanning resumes, it never
//! aborts the document.

use std::collections::HashMap;
use std::ops::Range;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref SELF_CLOSING_RE: Regex = Regex::new(r"^<(\w+)([^>]*)/>").expect("valid regex");
    static ref OPEN_TAG_RE: Regex = Regex::new(r"^<(\w+)([^>]*)>").expect("valid regex");
    static ref ATTR_RE: Regex = Regex::new(r#"(\w+)=["']([^"']*)["']"#).expect("valid regex");
    static ref TAG_SYNTAX_RE: Regex = Regex::new(r"<[^>]*>").expect("valid regex");
}

/// One markup tag instance. `own_text` is the text appearing directly inside
/// this element; text belonging to a nested element lives on that child.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Element {
    pub tag: String,
    pub attributes: HashMap<String, String>,
    pub own_text: String,
    pub children: Vec<Element>,
}

impl Element {
    /// This element followed by all of its descendants in document order.
    pub fn preorder(&self) -> PreOrder<'_> {
        PreOrder { stack: vec![self] }
    }
}

/// Depth-first, document-order traversal over a parsed forest.
pub fn preorder(roots: &[Element]) -> PreOrder<'_> {
    PreOrder {
        stack: roots.iter().rev().collect(),
    }
}

pub struct PreOrder<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        self.stack.extend(element.children.iter().rev());
        Some(element)
    }
}

/// Parses raw markup into its ordered top-level elements. Text outside all
/// top-level tags is discarded.
pub fn parse(text: &str) -> Vec<Element> {
    parse_spanned(text).into_iter().map(|(el, _)| el).collect()
}

/// Recursive worker: elements plus the byte span each occupies in `content`,
/// so the caller can cut child spans out of its own text.
fn parse_spanned(content: &str) -> Vec<(Element, Range<usize>)> {
    let mut elements = Vec::new();
    let mut pos = 0;

    while pos < content.len() {
        let Some(offset) = content[pos..].find('<') else {
            break;
        };
        let tag_start = pos + offset;
        let rest = &content[tag_start..];

        // Declarations and comments produce no element of their own.
        if rest.starts_with("<?") || rest.starts_with("<!") {
            match rest.find('>') {
                Some(end) => {
                    pos = tag_start + end + 1;
                    continue;
                }
                None => break,
            }
        }

        if let Some(caps) = SELF_CLOSING_RE.captures(rest) {
            let whole = caps.get(0).expect("whole match");
            elements.push((
                Element {
                    tag: caps[1].to_string(),
                    attributes: parse_attributes(caps[2].trim()),
                    own_text: String::new(),
                    children: Vec::new(),
                },
                tag_start..tag_start + whole.end(),
            ));
            pos = tag_start + whole.end();
            continue;
        }

        let Some(caps) = OPEN_TAG_RE.captures(rest) else {
            // Not a parsable tag, resume just past the '<'.
            pos = tag_start + 1;
            continue;
        };
        let tag = caps[1].to_string();
        let attributes = parse_attributes(caps[2].trim());
        let inner_start = tag_start + caps.get(0).expect("whole match").end();

        match find_matching_close(content, &tag, inner_start) {
            Some((inner_end, close_end)) => {
                let inner = &content[inner_start..inner_end];
                let children = parse_spanned(inner);
                let own_text = extract_own_text(inner, &children);
                elements.push((
                    Element {
                        tag,
                        attributes,
                        own_text,
                        children: children.into_iter().map(|(el, _)| el).collect(),
                    },
                    tag_start..close_end,
                ));
                pos = close_end;
            }
            None => {
                // Unterminated element: skip the '<' and keep scanning.
                pos = tag_start + 1;
            }
        }
    }

    elements
}

/// Locates the close tag matching an element whose inner content starts at
/// `from`, counting same-named nested opens. An open occurrence counts only
/// when followed by a space, `>` or `/`, so a longer tag name sharing the
/// prefix does not inflate the nesting level.
///
/// Returns `(inner_end, close_end)`: where the inner content stops and where
/// scanning resumes after the close tag.
fn find_matching_close(content: &str, tag: &str, from: usize) -> Option<(usize, usize)> {
    let open_pat = format!("<{tag}");
    let close_pat = format!("</{tag}>");
    let bytes = content.as_bytes();

    let mut nesting = 1usize;
    let mut cursor = from;
    while cursor < content.len() {
        let next_close = content[cursor..].find(&close_pat).map(|i| cursor + i)?;
        let next_open = content[cursor..].find(&open_pat).map(|i| cursor + i);
        match next_open {
            Some(open) if open < next_close => {
                cursor = open + open_pat.len();
                if matches!(bytes.get(cursor).copied(), Some(b' ' | b'>' | b'/')) {
                    nesting += 1;
                }
            }
            _ => {
                nesting -= 1;
                if nesting == 0 {
                    return Some((next_close, next_close + close_pat.len()));
                }
                cursor = next_close + close_pat.len();
            }
        }
    }
    None
}

/// Text belonging directly to an element: the inner content minus each
/// child's full serialized span (in child order), with any remaining tag
/// syntax stripped and the result trimmed.
fn extract_own_text(inner: &str, children: &[(Element, Range<usize>)]) -> String {
    let mut kept = String::with_capacity(inner.len());
    let mut cursor = 0;
    for (_, span) in children {
        kept.push_str(&inner[cursor..span.start]);
        cursor = span.end;
    }
    kept.push_str(&inner[cursor..]);
    TAG_SYNTAX_RE.replace_all(&kept, "").trim().to_string()
}

/// `name="value"` / `name='value'` pairs; a repeated name keeps its last
/// value.
fn parse_attributes(raw: &str) -> HashMap<String, String> {
    ATTR_RE
        .captures_iter(raw)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect()
}
