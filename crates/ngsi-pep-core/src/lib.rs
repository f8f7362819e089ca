//! # NGSI PEP Core
//!
//! Action classification for requests aimed at an NGSI context broker.
//!
//! A policy enforcement point needs to know *what* a request is trying to do
//! before it can ask a policy engine whether the caller may do it. This crate
//! answers that question from two independent signals:
//!
//! - the **URL shape** (`/ngsi10/queryContext` is a read, `/ngsi9/registerContext`
//!   is a register, and so on), and
//! - the **body content** of `/ngsi10/updateContext` requests, whose
//!   `updateAction` field says whether the update creates, updates or deletes.
//!
//! ```text
//!                 ┌───────────────────────┐
//!   request ────► │       classify        │
//!                 └──────────┬────────────┘
//!          updatecontext?    │ no
//!        ┌───────────────────┴──────────────┐
//!        ▼ yes                              ▼
//!  content-type                       inspect_url
//!  ├─ application/json ─► inspect_json ─┐
//!  ├─ application/xml  ─► inspect_xml  ─┼─► translate_action
//!  └─ text/xml         ─► inspect_xml  ─┘
//! ```
//!
//! # Example
//!
//! ```
//! use ngsi_pep_core::{classify, Action, ActionRequest};
//!
//! let mut request = ActionRequest::builder("/NGSI10/queryContext").build();
//! assert_eq!(classify(&mut request).unwrap(), Some(Action::Read));
//! assert_eq!(request.action(), Some(Action::Read));
//!
//! let mut update = ActionRequest::builder("/ngsi10/updateContext")
//!     .header("content-type", "application/xml")
//!     .body("<updateContextRequest><updateAction>APPEND</updateAction></updateContextRequest>")
//!     .build();
//! assert_eq!(classify(&mut update).unwrap(), Some(Action::Create));
//! ```

#![doc(html_root_url = "https://docs.rs/ngsi-pep-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod dispatch;
mod error;
pub mod inspect;
mod request;

pub use action::{translate_action, Action, ParseActionError};
pub use dispatch::{classify, extract_action, BodyFormat, Completion, UPDATE_CONTEXT_PATH};
pub use error::{ClassificationError, ClassificationResult, ErrorKind};
pub use inspect::{inspect_json, inspect_url, inspect_xml, XmlActionScanner};
pub use request::{ActionRequest, ActionRequestBuilder, CONTENT_TYPE};
