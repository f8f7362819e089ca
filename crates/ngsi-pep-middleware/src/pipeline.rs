//! Fixed-order middleware pipeline.
//!
//! Every request flows through the same stages in the same order:
//!
//! 1. **Request ID** - Generate or propagate request ID (UUID v7)
//! 2. **Action Classification** - Determine the NGSI action of the request
//! 3. **Authorization** - Evaluate the policy for the computed action
//!
//! The authorization stage depends on the classification stage having run,
//! so the order is not configurable.

use crate::context::MiddlewareContext;
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::stages::{ActionClassificationMiddleware, AuthorizationMiddleware, RequestIdMiddleware};
use crate::types::{Request, Response};
use std::sync::Arc;

/// A type-erased middleware that can be stored in a vector.
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// The fixed-order middleware pipeline.
///
/// # Example
///
/// ```ignore
/// use ngsi_pep_middleware::pipeline::Pipeline;
///
/// let pipeline = Pipeline::builder()
///     .classification(ActionClassificationMiddleware::new())
///     .authorization(AuthorizationMiddleware::allow_all())
///     .build();
///
/// let response = pipeline.process(ctx, request, forward_to_broker).await;
/// ```
pub struct Pipeline {
    stages: Vec<BoxedMiddleware>,
}

impl Pipeline {
    /// Creates a new pipeline builder.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Processes a request through every stage, then the handler.
    pub async fn process<H>(
        &self,
        mut ctx: MiddlewareContext,
        request: Request,
        handler: H,
    ) -> Response
    where
        H: FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, Response> + Send + 'static,
    {
        let next = self.build_chain(handler);
        next.run(&mut ctx, request).await
    }

    /// Builds the middleware chain for a request, back to front.
    fn build_chain<'a, H>(&'a self, handler: H) -> Next<'a>
    where
        H: FnOnce(&mut MiddlewareContext, Request) -> BoxFuture<'static, Response> + Send + 'a,
    {
        let mut next = Next::handler(handler);

        for middleware in self.stages.iter().rev() {
            next = Next::new(middleware.as_ref(), next);
        }

        next
    }

    /// Returns the names of all middleware stages in order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|mw| mw.name()).collect()
    }

    /// Returns the number of middleware stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}

/// Builder for constructing a [`Pipeline`].
///
/// Each stage slot is filled independently; [`build`](Self::build) assembles
/// them in [`Stage`] order and uses defaults for any slot left empty.
#[derive(Default)]
pub struct PipelineBuilder {
    request_id: Option<RequestIdMiddleware>,
    classification: Option<ActionClassificationMiddleware>,
    authorization: Option<AuthorizationMiddleware>,
}

impl PipelineBuilder {
    /// Creates a new pipeline builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request ID stage.
    #[must_use]
    pub fn request_id(mut self, middleware: RequestIdMiddleware) -> Self {
        self.request_id = Some(middleware);
        self
    }

    /// Sets the action classification stage.
    #[must_use]
    pub fn classification(mut self, middleware: ActionClassificationMiddleware) -> Self {
        self.classification = Some(middleware);
        self
    }

    /// Sets the authorization stage.
    #[must_use]
    pub fn authorization(mut self, middleware: AuthorizationMiddleware) -> Self {
        self.authorization = Some(middleware);
        self
    }

    /// Builds the pipeline.
    ///
    /// Unset stages default to a non-trusting request ID stage, a
    /// classification stage with the default body cap and an allow-all
    /// authorization stage.
    #[must_use]
    pub fn build(self) -> Pipeline {
        let stages: Vec<BoxedMiddleware> = vec![
            Arc::new(self.request_id.unwrap_or_default()),
            Arc::new(self.classification.unwrap_or_default()),
            Arc::new(
                self.authorization
                    .unwrap_or_else(AuthorizationMiddleware::allow_all),
            ),
        ];

        Pipeline { stages }
    }
}

/// Middleware stage marker for the fixed ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Stage {
    /// Stage 1: Request ID generation/propagation
    RequestId = 1,
    /// Stage 2: Action classification
    ActionClassification = 2,
    /// Stage 3: Authorization
    Authorization = 3,
}

impl Stage {
    /// Returns the stage name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::RequestId => "request_id",
            Self::ActionClassification => "action_classification",
            Self::Authorization => "authorization",
        }
    }

    /// Returns all stages in order.
    #[must_use]
    pub const fn all() -> [Stage; 3] {
        [Self::RequestId, Self::ActionClassification, Self::Authorization]
    }
}
