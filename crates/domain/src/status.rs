//! Status a live event exposes to its owner.

use serde::Serialize;

use crate::error::{CommunicationError, ConfigurationError, LiveEventError};

/// Why a live event is offline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusDetail {
    BridgeOffline,
    ConfigurationError,
    CommunicationError,
}

/// Operational status of a live event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LiveStatus {
    #[default]
    Unknown,
    Online,
    Offline {
        detail: StatusDetail,
        reason: Option<String>,
    },
}

impl LiveStatus {
    #[must_use]
    pub fn offline(detail: StatusDetail) -> Self {
        Self::Offline {
            detail,
            reason: None,
        }
    }

    #[must_use]
    pub fn offline_with_reason(detail: StatusDetail, reason: impl Into<String>) -> Self {
        Self::Offline {
            detail,
            reason: Some(reason.into()),
        }
    }

    /// The offline detail, if any.
    #[must_use]
    pub fn detail(&self) -> Option<StatusDetail> {
        match self {
            Self::Offline { detail, .. } => Some(*detail),
            Self::Unknown | Self::Online => None,
        }
    }
}

impl From<&ConfigurationError> for LiveStatus {
    fn from(err: &ConfigurationError) -> Self {
        Self::offline_with_reason(StatusDetail::ConfigurationError, err.to_string())
    }
}

impl From<&CommunicationError> for LiveStatus {
    fn from(err: &CommunicationError) -> Self {
        match err {
            CommunicationError::BridgeOffline => Self::offline(StatusDetail::BridgeOffline),
            other => Self::offline_with_reason(StatusDetail::CommunicationError, other.to_string()),
        }
    }
}

impl From<&LiveEventError> for LiveStatus {
    fn from(err: &LiveEventError) -> Self {
        match err {
            LiveEventError::Configuration(inner) => inner.into(),
            LiveEventError::Communication(inner) => inner.into(),
            other => Self::offline_with_reason(StatusDetail::CommunicationError, other.reason()),
        }
    }
}

impl std::fmt::Display for LiveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => f.write_str("UNKNOWN"),
            Self::Online => f.write_str("ONLINE"),
            Self::Offline {
                detail,
                reason: None,
            } => write!(f, "OFFLINE ({detail:?})"),
            Self::Offline {
                detail,
                reason: Some(reason),
            } => write!(f, "OFFLINE ({detail:?}): {reason}"),
        }
    }
}
