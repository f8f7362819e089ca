//! Request inspectors.
//!
//! Each inspector looks at one signal of the request and is independent of
//! the others:
//!
//! - [`xml`] - incremental scan of an XML payload for `updateAction`
//! - [`json`] - field lookup on a parsed JSON payload
//! - [`url`] - ordered substring matching on the request path

pub mod json;
pub mod url;
pub mod xml;

pub use json::inspect_json;
pub use url::{inspect_url, ROUTE_TABLE};
pub use xml::{inspect_xml, ScanState, XmlActionScanner};
