//! Streaming extraction of `updateAction` from XML payloads.
//!
//! The payload is read as a sequence of pull events; nothing but the text of
//! the target element is retained. [`XmlActionScanner`] holds the per-payload
//! state, so every inspection owns an isolated session.
//!
//! # Scanner rules
//!
//! - An open tag named `updateAction` moves the scanner to
//!   [`ScanState::InsideTarget`]; *any other* open tag, including one nested
//!   inside `updateAction`, moves it back to [`ScanState::Outside`].
//! - Close tags do not change the state.
//! - Text seen while inside the target is concatenated, so a value delivered
//!   in several chunks is reassembled before translation.
//!
//! The nested-tag rule means `<updateAction>APP<b/>END</updateAction>` yields
//! the text `APP`, which has no mapping. That truncation is deliberate.

use crate::action::{translate_action, Action};
use crate::error::{ClassificationError, ClassificationResult};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Name of the element carrying the update action.
pub const UPDATE_ACTION_ELEMENT: &str = "updateAction";

/// Position of the scanner relative to the target element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    /// Not reading action text.
    #[default]
    Outside,
    /// The most recent open tag was `updateAction`.
    InsideTarget,
}

/// Event-driven state machine that accumulates the `updateAction` text.
///
/// # Example
///
/// ```
/// use ngsi_pep_core::{Action, XmlActionScanner};
///
/// let mut scanner = XmlActionScanner::new();
/// scanner.on_open_tag("updateContextRequest");
/// scanner.on_open_tag("updateAction");
/// scanner.on_text("AP");
/// scanner.on_text("PEND");
/// assert_eq!(scanner.finish().unwrap(), Some(Action::Create));
/// ```
#[derive(Debug, Default)]
pub struct XmlActionScanner {
    state: ScanState,
    text: String,
}

impl XmlActionScanner {
    /// Creates a scanner in the [`ScanState::Outside`] state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Returns the text accumulated so far.
    #[must_use]
    pub fn accumulated(&self) -> &str {
        &self.text
    }

    /// Handles an open-tag (or self-closing tag) event.
    pub fn on_open_tag(&mut self, name: impl AsRef<[u8]>) {
        self.state = if name.as_ref() == UPDATE_ACTION_ELEMENT.as_bytes() {
            ScanState::InsideTarget
        } else {
            ScanState::Outside
        };
    }

    /// Handles a text event.
    pub fn on_text(&mut self, chunk: &str) {
        if self.state == ScanState::InsideTarget {
            self.text.push_str(chunk);
        }
    }

    /// Handles end-of-document.
    ///
    /// Trims the accumulated text and translates it. Text that is empty
    /// after trimming is a [`ClassificationError::MalformedXml`]; text that
    /// does not translate is a successful `None`.
    pub fn finish(self) -> ClassificationResult<Option<Action>> {
        let token = self.text.trim();
        if token.is_empty() {
            return Err(ClassificationError::missing_xml_action());
        }
        Ok(translate_action(token))
    }
}

/// Extracts the action from a raw XML payload.
///
/// The payload need not follow any schema: an `updateAction` element
/// anywhere in a well-formed document is accepted. Parse failures carry the
/// parser diagnostic.
///
/// # Example
///
/// ```
/// use ngsi_pep_core::{inspect_xml, Action};
///
/// let body = b"<updateContextRequest><updateAction>DELETE</updateAction></updateContextRequest>";
/// assert_eq!(inspect_xml(body).unwrap(), Some(Action::Delete));
/// assert!(inspect_xml(b"<updateContextRequest>").is_err());
/// ```
pub fn inspect_xml(body: &[u8]) -> ClassificationResult<Option<Action>> {
    let document = std::str::from_utf8(body)
        .map_err(|e| ClassificationError::malformed_xml(format!("invalid UTF-8: {e}")))?;

    let mut reader = Reader::from_str(document);
    let mut scanner = XmlActionScanner::new();
    let mut shape = DocumentShape::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                shape.open()?;
                scanner.on_open_tag(e.name());
            }
            Ok(Event::Empty(ref e)) => {
                shape.open()?;
                shape.close();
                scanner.on_open_tag(e.name());
            }
            Ok(Event::End(_)) => shape.close(),
            Ok(Event::Text(ref e)) => {
                let chunk = e.unescape().map_err(|err| {
                    ClassificationError::malformed_xml(format!(
                        "at position {}: {err}",
                        reader.buffer_position()
                    ))
                })?;
                shape.text(&chunk)?;
                scanner.on_text(&chunk);
            }
            // CDATA is not action text, only checked for placement.
            Ok(Event::CData(ref e)) => {
                let chunk = std::str::from_utf8(e)
                    .map_err(|err| ClassificationError::malformed_xml(format!("CDATA: {err}")))?;
                shape.text(chunk)?;
            }
            Ok(Event::Eof) => {
                shape.end()?;
                break;
            }
            // Declarations, comments, processing instructions, DOCTYPE
            Ok(_) => {}
            Err(err) => {
                return Err(ClassificationError::malformed_xml(format!(
                    "at position {}: {err}",
                    reader.error_position()
                )));
            }
        }
    }

    scanner.finish()
}

/// Well-formedness checks the pull parser leaves to the caller.
#[derive(Debug, Default)]
struct DocumentShape {
    depth: usize,
    seen_root: bool,
}

impl DocumentShape {
    fn open(&mut self) -> ClassificationResult<()> {
        if self.depth == 0 {
            if self.seen_root {
                return Err(ClassificationError::malformed_xml(
                    "multiple root elements",
                ));
            }
            self.seen_root = true;
        }
        self.depth += 1;
        Ok(())
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn text(&self, chunk: &str) -> ClassificationResult<()> {
        if self.depth == 0 && !chunk.trim().is_empty() {
            return Err(ClassificationError::malformed_xml(
                "text data outside of root element",
            ));
        }
        Ok(())
    }

    fn end(&self) -> ClassificationResult<()> {
        if self.depth > 0 {
            return Err(ClassificationError::malformed_xml("unclosed root element"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_bare_update_action() {
        assert_eq!(
            inspect_xml(b"<updateAction>APPEND</updateAction>").unwrap(),
            Some(Action::Create)
        );
    }

    #[test]
    fn test_wrapped_update_action() {
        let body = br#"<?xml version="1.0" encoding="UTF-8"?>
<updateContextRequest>
  <contextElementList>
    <contextElement>
      <entityId type="Room" isPattern="false"><id>Room1</id></entityId>
    </contextElement>
  </contextElementList>
  <updateAction>
    UPDATE
  </updateAction>
</updateContextRequest>"#;

        assert_eq!(inspect_xml(body).unwrap(), Some(Action::Update));
    }

    #[test]
    fn test_text_chunks_are_concatenated() {
        let mut scanner = XmlActionScanner::new();
        scanner.on_open_tag("updateAction");
        scanner.on_text("AP");
        scanner.on_text("PEND");
        assert_eq!(scanner.accumulated(), "APPEND");
        assert_eq!(scanner.finish().unwrap(), Some(Action::Create));
    }

    #[test]
    fn test_cdata_is_not_action_text() {
        // Only "DEL" is read, which maps to nothing.
        let body = b"<r><updateAction>DEL<![CDATA[ETE]]></updateAction></r>";
        assert_eq!(inspect_xml(body).unwrap(), None);
    }

    #[test]
    fn test_cdata_only_action_is_malformed() {
        let err = inspect_xml(b"<r><updateAction><![CDATA[APPEND]]></updateAction></r>")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedXml);
        assert_eq!(err.diagnostic(), None);
    }

    #[test]
    fn test_cdata_outside_root_is_malformed() {
        let err = inspect_xml(b"<r><updateAction>APPEND</updateAction></r><![CDATA[x]]>")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedXml);
    }

    #[test]
    fn test_entities_are_unescaped() {
        let body = b"<r><updateAction>&#65;PPEND</updateAction></r>";
        assert_eq!(inspect_xml(body).unwrap(), Some(Action::Create));
    }

    #[test]
    fn test_missing_element_is_malformed() {
        let err = inspect_xml(b"<updateContextRequest><foo>APPEND</foo></updateContextRequest>")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedXml);
        assert_eq!(err.diagnostic(), None);
    }

    #[test]
    fn test_whitespace_only_is_malformed() {
        let err = inspect_xml(b"<r><updateAction>  \n\t </updateAction></r>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedXml);
    }

    #[test]
    fn test_empty_element_is_malformed() {
        assert!(inspect_xml(b"<r><updateAction/></r>").is_err());
        assert!(inspect_xml(b"<r><updateAction></updateAction></r>").is_err());
    }

    #[test]
    fn test_unknown_token_is_success_without_action() {
        assert_eq!(
            inspect_xml(b"<r><updateAction>REPLACE</updateAction></r>").unwrap(),
            None
        );
    }

    #[test]
    fn test_nested_tag_truncates_action_text() {
        // Text after the nested tag is dropped: only "APP" is read.
        assert_eq!(
            inspect_xml(b"<r><updateAction>APP<b/>END</updateAction></r>").unwrap(),
            None
        );
        assert!(inspect_xml(b"<r><updateAction><b>APPEND</b></updateAction></r>").is_err());
    }

    #[test]
    fn test_close_tag_does_not_leave_target() {
        let body = b"<r><updateAction>APP</updateAction>END</r>";
        assert_eq!(inspect_xml(body).unwrap(), Some(Action::Create));
    }

    #[test]
    fn test_prefixed_name_does_not_match() {
        let body = br#"<r xmlns:n="urn:x"><n:updateAction>APPEND</n:updateAction></r>"#;
        assert!(inspect_xml(body).is_err());
    }

    #[test]
    fn test_parse_errors_carry_diagnostic() {
        for body in [
            &b"<r><updateAction>APPEND</updateAction>"[..],
            b"<r><updateAction>APPEND</other></r>",
            b"<r><updateAction>&bogus;</updateAction></r>",
            b"APPEND",
            b"<a/><b/>",
            b"\xff\xfe<r/>",
        ] {
            let err = inspect_xml(body).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedXml);
            assert!(err.diagnostic().is_some(), "no diagnostic for {body:?}");
        }
    }

    #[test]
    fn test_empty_payload_is_malformed() {
        let err = inspect_xml(b"").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedXml);
    }

    #[test]
    fn test_scanner_state_transitions() {
        let mut scanner = XmlActionScanner::new();
        assert_eq!(scanner.state(), ScanState::Outside);

        scanner.on_text("ignored");
        scanner.on_open_tag("updateAction");
        assert_eq!(scanner.state(), ScanState::InsideTarget);

        scanner.on_open_tag("nested");
        assert_eq!(scanner.state(), ScanState::Outside);
        assert_eq!(scanner.accumulated(), "");
    }

    #[test]
    fn test_sessions_are_isolated() {
        let first = inspect_xml(b"<updateAction>APPEND</updateAction>").unwrap();
        let second = inspect_xml(b"<updateAction>DELETE</updateAction>").unwrap();
        assert_eq!(first, Some(Action::Create));
        assert_eq!(second, Some(Action::Delete));
    }
}
