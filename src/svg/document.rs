//! Streaming scan of SVG markup.
//!
//! Pulls out the little the engine needs from the XML itself: the root
//! element's declared dimensions and every `fill` attribute in document
//! order. Anything heavier goes through the renderer instead.

use quick_xml::Reader;
use quick_xml::errors::IllFormedError;
use quick_xml::events::{BytesStart, Event};

use crate::meta::MetaError;

/// Declared shape of an SVG document plus its raw fill attributes.
#[derive(Debug)]
pub struct VectorDocument {
    /// Root `width` attribute, `0.0` when absent or not a bare number.
    pub width: f64,
    /// Root `height` attribute, `0.0` when absent or not a bare number.
    pub height: f64,
    /// Every `fill` attribute value, in document order, verbatim.
    pub fills: Vec<String>,
}

impl VectorDocument {
    /// Scan `markup` in one streaming pass.
    ///
    /// Fails on markup that is not well-formed XML (mismatched or missing
    /// end tags included). Attribute-level noise is skipped rather than
    /// failed: a broken attribute reads as absent.
    pub fn parse(markup: &[u8]) -> Result<Self, MetaError> {
        let mut reader = Reader::from_reader(markup);
        let mut buf = Vec::new();

        let mut document = Self {
            width: 0.0,
            height: 0.0,
            fills: Vec::new(),
        };
        let mut saw_root = false;
        // The reader flags mismatched end tags itself but reads clean past
        // unclosed ones, so open elements are tracked here.
        let mut open_tags: Vec<String> = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(element)) => {
                    open_tags
                        .push(String::from_utf8_lossy(element.name().as_ref()).into_owned());
                    document.scan_element(&element, &mut saw_root);
                }
                Ok(Event::Empty(element)) => document.scan_element(&element, &mut saw_root),
                Ok(Event::End(_)) => {
                    open_tags.pop();
                }
                Ok(Event::Eof) => {
                    if let Some(tag) = open_tags.pop() {
                        return Err(MetaError::Parse(quick_xml::Error::IllFormed(
                            IllFormedError::MissingEndTag(tag),
                        )));
                    }
                    break;
                }
                Ok(_) => {}
                Err(e) => return Err(MetaError::Parse(e)),
            }
            buf.clear();
        }

        Ok(document)
    }

    fn scan_element(&mut self, element: &BytesStart<'_>, saw_root: &mut bool) {
        if !*saw_root && element.local_name().as_ref() == b"svg" {
            *saw_root = true;
            self.width = parse_dimension(attribute(element, b"width"));
            self.height = parse_dimension(attribute(element, b"height"));
        }
        if let Some(fill) = attribute(element, b"fill") {
            self.fills.push(fill);
        }
    }
}

/// Look up an attribute by its exact (unprefixed) name.
fn attribute(element: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    element
        .attributes()
        .filter_map(Result::ok)
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| a.unescape_value().ok())
        .map(|v| v.into_owned())
}

/// Strictly numeric dimension parse. Unit suffixes like `px` do not count.
fn parse_dimension(value: Option<String>) -> f64 {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(0.0)
}

// ============================================================================
// Tests
// ============================================================================
