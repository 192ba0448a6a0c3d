use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter, IntoStaticStr};

use super::OgpMetadata;

/// Why a card failed. Carries the kind only, never the raw error detail.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FailureReason {
    Network,
    InvalidResponse,
    MissingMetadata,
    Timeout,
}

impl FailureReason {
    /// Short user-facing message shown in a failed card.
    pub fn message(self) -> &'static str {
        match self {
            FailureReason::Network => "The linked site could not be reached.",
            FailureReason::InvalidResponse => "The linked site returned an unexpected response.",
            FailureReason::MissingMetadata => "The linked page has no preview information.",
            FailureReason::Timeout => "The preview took too long to load.",
        }
    }
}

/// Lifecycle of one OGP card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, IntoStaticStr)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CardState {
    #[default]
    Idle,
    Loading,
    Loaded(OgpMetadata),
    Failed(FailureReason),
}

impl CardState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, CardState::Loaded(_) | CardState::Failed(_))
    }

    pub fn name(&self) -> &'static str {
        self.into()
    }

    pub fn metadata(&self) -> Option<&OgpMetadata> {
        match self {
            CardState::Loaded(meta) => Some(meta),
            _ => None,
        }
    }
}
