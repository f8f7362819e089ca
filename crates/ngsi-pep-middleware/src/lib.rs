//! # NGSI PEP Middleware
//!
//! Fixed-order middleware pipeline that classifies every request aimed at an
//! NGSI context broker and hands the computed action to an authorization
//! stage before the request is forwarded.
//!
//! ## Pipeline Stages
//!
//! ```text
//! Request → RequestId → ActionClassification → Authorization → Handler
//! ```
//!
//! | Stage | Middleware            | Purpose                                     |
//! |-------|-----------------------|---------------------------------------------|
//! | 1     | Request ID            | Generate/propagate request ID (UUID v7)     |
//! | 2     | Action Classification | Compute the NGSI action from URL or body    |
//! | 3     | Authorization         | Ask the policy evaluator about the action   |
//!
//! ## Example
//!
//! ```
//! use ngsi_pep_middleware::pipeline::Stage;
//!
//! let stages = Stage::all();
//! assert_eq!(stages.len(), 3);
//! assert_eq!(stages[0].name(), "request_id");
//! assert_eq!(stages[1].name(), "action_classification");
//! ```

#![doc(html_root_url = "https://docs.rs/ngsi-pep-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod context;
pub mod middleware;
pub mod pipeline;
pub mod stages;
pub mod types;

// Re-export main types at crate root
pub use context::{MiddlewareContext, RequestId};
pub use middleware::{BoxFuture, Middleware, Next};
pub use pipeline::{Pipeline, PipelineBuilder, Stage};
pub use stages::{
    ActionClassification, ActionClassificationMiddleware, AuthorizationMiddleware,
    AuthorizationResult, PolicyDecision, PolicyEvaluator, RequestIdMiddleware,
};
pub use types::{Request, Response, ResponseExt};
