//! Authorization middleware stage.
//!
//! Decides whether a classified request may proceed, based on the action the
//! classification stage computed.
//!
//! # Pipeline Position
//!
//! ```text
//! Request → RequestId → ActionClassification → [Authorization] → Handler
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use ngsi_pep_core::Action;
//! use ngsi_pep_middleware::stages::AuthorizationMiddleware;
//!
//! // Allow all requests (development mode)
//! let allow_all = AuthorizationMiddleware::allow_all();
//!
//! // Read-only access
//! let read_only = AuthorizationMiddleware::allowed_actions([Action::Read, Action::Discover]);
//! ```

use crate::{
    context::MiddlewareContext,
    middleware::{BoxFuture, Middleware, Next},
    types::{Request, Response, ResponseExt},
};
use http::StatusCode;
use ngsi_pep_core::Action;
use ngsi_pep_telemetry::metrics;
use std::collections::HashSet;
use std::sync::Arc;

/// Authorization middleware that enforces an action policy.
#[derive(Debug, Clone)]
pub struct AuthorizationMiddleware {
    mode: AuthorizationMode,
}

#[derive(Debug, Clone)]
enum AuthorizationMode {
    AllowAll,
    DenyAll,
    /// Only the listed actions pass; requests without an action are denied.
    AllowList(Arc<HashSet<Action>>),
    Custom(Arc<dyn PolicyEvaluator>),
}

/// Custom policy evaluator trait.
pub trait PolicyEvaluator: Send + Sync + std::fmt::Debug {
    /// Evaluates whether a request with the given action and path may pass.
    ///
    /// `action` is `None` when classification succeeded without a
    /// recognized action.
    fn evaluate(&self, action: Option<Action>, path: &str) -> PolicyDecision;
}

/// Policy evaluation result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyDecision {
    /// Request is allowed.
    Allow,
    /// Request is denied with a reason.
    Deny {
        /// The reason for denial.
        reason: String,
    },
}

impl AuthorizationMiddleware {
    /// Creates an authorization stage that allows all requests.
    #[must_use]
    pub fn allow_all() -> Self {
        Self {
            mode: AuthorizationMode::AllowAll,
        }
    }

    /// Creates an authorization stage that denies all requests.
    #[must_use]
    pub fn deny_all() -> Self {
        Self {
            mode: AuthorizationMode::DenyAll,
        }
    }

    /// Creates an authorization stage that allows only the given actions.
    #[must_use]
    pub fn allowed_actions<I>(actions: I) -> Self
    where
        I: IntoIterator<Item = Action>,
    {
        Self {
            mode: AuthorizationMode::AllowList(Arc::new(actions.into_iter().collect())),
        }
    }

    /// Creates an authorization stage with a custom policy evaluator.
    #[must_use]
    pub fn custom<P: PolicyEvaluator + 'static>(evaluator: P) -> Self {
        Self {
            mode: AuthorizationMode::Custom(Arc::new(evaluator)),
        }
    }

    fn evaluate(&self, action: Option<Action>, path: &str) -> PolicyDecision {
        match &self.mode {
            AuthorizationMode::AllowAll => PolicyDecision::Allow,
            AuthorizationMode::DenyAll => PolicyDecision::Deny {
                reason: "authorization denied (deny-all mode)".to_string(),
            },
            AuthorizationMode::AllowList(allowed) => match action {
                Some(action) if allowed.contains(&action) => PolicyDecision::Allow,
                Some(action) => PolicyDecision::Deny {
                    reason: format!("action '{action}' is not permitted"),
                },
                None => PolicyDecision::Deny {
                    reason: "request has no recognized action".to_string(),
                },
            },
            AuthorizationMode::Custom(evaluator) => evaluator.evaluate(action, path),
        }
    }
}

impl Middleware for AuthorizationMiddleware {
    fn name(&self) -> &'static str {
        "authorization"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let action = ctx.action();
            let path = ctx
                .classification()
                .map_or_else(|| request.uri().path().to_string(), |c| c.path.clone());

            let decision = self.evaluate(action, &path);
            metrics::record_authz_decision(decision == PolicyDecision::Allow);

            match decision {
                PolicyDecision::Allow => {
                    ctx.set_extension(AuthorizationResult {
                        allowed: true,
                        action,
                        reason: None,
                    });
                    next.run(ctx, request).await
                }
                PolicyDecision::Deny { reason } => {
                    tracing::info!(
                        request_id = %ctx.request_id(),
                        path = %path,
                        reason = %reason,
                        "request denied"
                    );
                    ctx.set_extension(AuthorizationResult {
                        allowed: false,
                        action,
                        reason: Some(reason.clone()),
                    });
                    Response::json_error(
                        StatusCode::FORBIDDEN,
                        "AUTHORIZATION_DENIED",
                        &reason,
                        ctx.request_id(),
                    )
                }
            }
        })
    }
}

/// Authorization result stored in context for auditing.
#[derive(Debug, Clone)]
pub struct AuthorizationResult {
    /// Whether the request was allowed.
    pub allowed: bool,
    /// The action that was evaluated.
    pub action: Option<Action>,
    /// Denial reason if not allowed.
    pub reason: Option<String>,
}
