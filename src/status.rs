use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::codes::CodeFamily;

/// Outcome of the technical observation of a claimed tyre.
///
/// Stored and serialized as its display label, e.g. `"Not Recommended"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationStatus {
    #[serde(rename = "Pending")]
    Pending,
    #[serde(rename = "Recommended")]
    Recommended,
    #[serde(rename = "Not Recommended")]
    NotRecommended,
    #[serde(rename = "Forwarded for Management Decision")]
    ForwardedForManagementDecision,
    #[serde(rename = "Return to Dealer")]
    ReturnToDealer,
    #[serde(rename = "Sent to CEAT")]
    SentToCeat,
}

impl ObservationStatus {
    pub const ALL: [ObservationStatus; 6] = [
        ObservationStatus::Pending,
        ObservationStatus::Recommended,
        ObservationStatus::NotRecommended,
        ObservationStatus::ForwardedForManagementDecision,
        ObservationStatus::ReturnToDealer,
        ObservationStatus::SentToCeat,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ObservationStatus::Pending => "Pending",
            ObservationStatus::Recommended => "Recommended",
            ObservationStatus::NotRecommended => "Not Recommended",
            ObservationStatus::ForwardedForManagementDecision => {
                "Forwarded for Management Decision"
            }
            ObservationStatus::ReturnToDealer => "Return to Dealer",
            ObservationStatus::SentToCeat => "Sent to CEAT",
        }
    }

    /// The code family an entry in this status draws its number from.
    /// `Return to Dealer` and `Sent to CEAT` carry no code.
    pub const fn code_family(self) -> Option<CodeFamily> {
        match self {
            ObservationStatus::Recommended => Some(CodeFamily::Recommended),
            ObservationStatus::NotRecommended => Some(CodeFamily::NotRecommended),
            ObservationStatus::ForwardedForManagementDecision => {
                Some(CodeFamily::ManagementDecision)
            }
            ObservationStatus::Pending
            | ObservationStatus::ReturnToDealer
            | ObservationStatus::SentToCeat => None,
        }
    }
}

impl fmt::Display for ObservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown observation status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for ObservationStatus {
    type Err = UnknownStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        ObservationStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownStatus(value.to_string()))
    }
}
