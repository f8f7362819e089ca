//! Classification by endpoint path.

use crate::action::Action;
use crate::error::{ClassificationError, ClassificationResult};

/// Known endpoint signatures, checked in order.
///
/// Entries are lowercase substrings, not exact paths, and they are not
/// mutually exclusive: the first entry contained in the path wins.
pub const ROUTE_TABLE: [(&str, Action); 5] = [
    ("/ngsi10/querycontext", Action::Read),
    ("/ngsi10/subscribecontext", Action::Subscribe),
    ("/ngsi9/registercontext", Action::Register),
    ("/ngsi9/discovercontextavailability", Action::Discover),
    ("/ngsi9/subscribecontextavailability", Action::SubscribeAvailability),
];

/// Determines the action from the request path alone.
///
/// Matching is a case-insensitive substring search over [`ROUTE_TABLE`].
///
/// # Example
///
/// ```
/// use ngsi_pep_core::{inspect_url, Action};
///
/// assert_eq!(inspect_url("/NGSI10/queryContext").unwrap(), Action::Read);
/// assert!(inspect_url("/foo/bar").is_err());
/// ```
pub fn inspect_url(path: &str) -> ClassificationResult<Action> {
    let lowered = path.to_lowercase();

    ROUTE_TABLE
        .iter()
        .find(|(signature, _)| lowered.contains(signature))
        .map(|&(_, action)| action)
        .ok_or_else(|| ClassificationError::route_not_found(path))
}
