//! Canonical actions and the update-action translator.
//!
//! The [`Action`] enum is the closed vocabulary handed to the downstream
//! access-control decision. [`translate_action`] maps the raw `updateAction`
//! tokens found in NGSI update payloads onto that vocabulary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical operation category of an NGSI request.
///
/// # Example
///
/// ```
/// use ngsi_pep_core::Action;
///
/// assert_eq!(Action::SubscribeAvailability.as_str(), "subscribe-availability");
/// assert_eq!("read".parse::<Action>().unwrap(), Action::Read);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// Entity creation (`APPEND` updates).
    Create,
    /// Entity modification (`UPDATE` updates).
    Update,
    /// Entity removal (`DELETE` updates).
    Delete,
    /// Context queries.
    Read,
    /// Context subscriptions.
    Subscribe,
    /// Context provider registrations.
    Register,
    /// Context availability discovery.
    Discover,
    /// Context availability subscriptions.
    SubscribeAvailability,
}

impl Action {
    /// All actions in declaration order.
    pub const ALL: [Action; 8] = [
        Self::Create,
        Self::Update,
        Self::Delete,
        Self::Read,
        Self::Subscribe,
        Self::Register,
        Self::Discover,
        Self::SubscribeAvailability,
    ];

    /// Returns the canonical string used by the access controller.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Read => "read",
            Self::Subscribe => "subscribe",
            Self::Register => "register",
            Self::Discover => "discover",
            Self::SubscribeAvailability => "subscribe-availability",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string is not one of the canonical action names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action: {0}")]
pub struct ParseActionError(pub String);

impl FromStr for Action {
    type Err = ParseActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| ParseActionError(s.to_string()))
    }
}

/// Translates a raw `updateAction` token into its canonical action.
///
/// Matching is case-insensitive: `APPEND` maps to [`Action::Create`],
/// `UPDATE` to [`Action::Update`] and `DELETE` to [`Action::Delete`].
/// Any other token, including the empty string, has no mapping and
/// yields `None`. Callers decide whether that is an error.
///
/// # Example
///
/// ```
/// use ngsi_pep_core::{translate_action, Action};
///
/// assert_eq!(translate_action("Append"), Some(Action::Create));
/// assert_eq!(translate_action("REPLACE"), None);
/// ```
#[must_use]
pub fn translate_action(token: &str) -> Option<Action> {
    if token.eq_ignore_ascii_case("APPEND") {
        Some(Action::Create)
    } else if token.eq_ignore_ascii_case("UPDATE") {
        Some(Action::Update)
    } else if token.eq_ignore_ascii_case("DELETE") {
        Some(Action::Delete)
    } else {
        None
    }
}
