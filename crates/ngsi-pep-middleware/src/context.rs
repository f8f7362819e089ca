//! Middleware context types.
//!
//! The [`MiddlewareContext`] carries per-request state through the pipeline:
//! the request ID, the action classification and typed extensions left by
//! individual stages.

use crate::stages::classification::ActionClassification;
use ngsi_pep_core::Action;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::time::Instant;
use uuid::Uuid;

/// A unique identifier for each request, using UUID v7.
///
/// UUID v7 is time-ordered, which makes it ideal for request tracking
/// and log correlation.
///
/// # Example
///
/// ```
/// use ngsi_pep_middleware::RequestId;
///
/// let id = RequestId::new();
/// assert_eq!(id.to_string().len(), 36);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID using UUID v7.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `RequestId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Context that flows through the middleware pipeline.
///
/// # Example
///
/// ```
/// use ngsi_pep_middleware::context::MiddlewareContext;
///
/// let ctx = MiddlewareContext::new();
/// assert!(ctx.classification().is_none());
/// assert!(ctx.action().is_none());
/// ```
#[derive(Debug)]
pub struct MiddlewareContext {
    /// Unique identifier for this request.
    request_id: RequestId,

    /// Outcome of the classification stage, once it has run successfully.
    classification: Option<ActionClassification>,

    /// When the request started processing.
    started_at: Instant,

    /// Type-erased extension data.
    extensions: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl MiddlewareContext {
    /// Creates a new middleware context with a fresh request ID.
    #[must_use]
    pub fn new() -> Self {
        Self::with_request_id(RequestId::new())
    }

    /// Creates a context with a specific request ID.
    #[must_use]
    pub fn with_request_id(request_id: RequestId) -> Self {
        Self {
            request_id,
            classification: None,
            started_at: Instant::now(),
            extensions: HashMap::new(),
        }
    }

    /// Returns the request ID.
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Sets the request ID.
    ///
    /// This should only be called by the RequestId middleware.
    pub fn set_request_id(&mut self, request_id: RequestId) {
        self.request_id = request_id;
    }

    /// Returns the classification, if the classification stage succeeded.
    #[must_use]
    pub fn classification(&self) -> Option<&ActionClassification> {
        self.classification.as_ref()
    }

    /// Records the classification outcome.
    ///
    /// This should only be called by the ActionClassification middleware.
    pub fn set_classification(&mut self, classification: ActionClassification) {
        self.classification = Some(classification);
    }

    /// Returns the computed action, if any.
    ///
    /// `None` both before classification and when classification succeeded
    /// without determining an action.
    #[must_use]
    pub fn action(&self) -> Option<Action> {
        self.classification.as_ref().and_then(|c| c.action)
    }

    /// Returns when the request started processing.
    #[must_use]
    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Returns the elapsed time since the request started.
    #[must_use]
    pub fn elapsed(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }

    /// Stores a typed extension value.
    pub fn set_extension<T: Send + Sync + 'static>(&mut self, value: T) {
        self.extensions.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Retrieves a typed extension value.
    #[must_use]
    pub fn get_extension<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Removes and returns a typed extension value.
    pub fn remove_extension<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.extensions
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|b| *b)
    }
}

impl Default for MiddlewareContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_context_is_unclassified() {
        let ctx = MiddlewareContext::new();
        assert!(ctx.classification().is_none());
        assert_eq!(ctx.action(), None);
    }

    #[test]
    fn test_set_classification() {
        let mut ctx = MiddlewareContext::new();
        ctx.set_classification(ActionClassification {
            action: Some(Action::Read),
            path: "/ngsi10/queryContext".to_string(),
        });

        assert_eq!(ctx.action(), Some(Action::Read));
        assert_eq!(ctx.classification().unwrap().path, "/ngsi10/queryContext");
    }

    #[test]
    fn test_classified_without_action() {
        let mut ctx = MiddlewareContext::new();
        ctx.set_classification(ActionClassification {
            action: None,
            path: "/ngsi10/updateContext".to_string(),
        });

        assert!(ctx.classification().is_some());
        assert_eq!(ctx.action(), None);
    }

    #[test]
    fn test_request_id_roundtrip() {
        let id = RequestId::new();
        let ctx = MiddlewareContext::with_request_id(id);
        assert_eq!(ctx.request_id(), id);
        assert_eq!(RequestId::from_uuid(*id.as_uuid()), id);
    }

    #[test]
    fn test_extensions() {
        #[derive(Debug, Clone, PartialEq)]
        struct Marker(u32);

        let mut ctx = MiddlewareContext::new();
        assert!(ctx.get_extension::<Marker>().is_none());

        ctx.set_extension(Marker(42));
        assert_eq!(ctx.get_extension::<Marker>(), Some(&Marker(42)));

        assert_eq!(ctx.remove_extension::<Marker>(), Some(Marker(42)));
        assert!(ctx.get_extension::<Marker>().is_none());
    }

    #[test]
    fn test_elapsed_time() {
        let ctx = MiddlewareContext::new();
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(ctx.elapsed() >= std::time::Duration::from_millis(5));
    }
}
