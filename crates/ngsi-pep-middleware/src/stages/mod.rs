//! Pipeline stages.
//!
//! The stages execute in a fixed order:
//!
//! 1. [`request_id`] - Generate/propagate request ID
//! 2. [`classification`] - Compute the NGSI action of the request
//! 3. [`authorization`] - Allow or deny the computed action

pub mod authorization;
pub mod classification;
pub mod request_id;

pub use authorization::{AuthorizationMiddleware, AuthorizationResult, PolicyDecision, PolicyEvaluator};
pub use classification::{ActionClassification, ActionClassificationMiddleware, DEFAULT_MAX_BODY_BYTES};
pub use request_id::{RequestIdMiddleware, REQUEST_ID_HEADER};
