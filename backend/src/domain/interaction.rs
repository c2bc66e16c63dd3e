//! Interaction events recorded against product features.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::domain::feature::FeatureName;

/// The gesture a user performed on a feature.
///
/// Wire values are the exact lowercase strings; anything else is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Click,
    Hover,
    Focus,
    Scroll,
}

/// Error returned when parsing an interaction kind from string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid interaction type")]
pub struct ParseInteractionKindError;

impl InteractionKind {
    /// All kinds in wire order.
    pub const ALL: [Self; 4] = [Self::Click, Self::Hover, Self::Focus, Self::Scroll];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Hover => "hover",
            Self::Focus => "focus",
            Self::Scroll => "scroll",
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InteractionKind {
    type Err = ParseInteractionKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "click" => Ok(Self::Click),
            "hover" => Ok(Self::Hover),
            "focus" => Ok(Self::Focus),
            "scroll" => Ok(Self::Scroll),
            _ => Err(ParseInteractionKindError),
        }
    }
}

/// Validation errors for interaction drafts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InteractionValidationError {
    #[error("duration must not be negative")]
    NegativeDuration,
}

/// A recorded interaction event.
///
/// Interactions are immutable once stored and are never deleted through the
/// API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub feature_name: FeatureName,
    pub interaction_type: InteractionKind,
    pub occurred_at: DateTime<Utc>,
    pub duration_seconds: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_metadata: Option<Value>,
}

/// Validated payload for recording one interaction.
///
/// The timestamp is assigned by the service at persistence time, never taken
/// from the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionDraft {
    pub feature_name: FeatureName,
    pub interaction_type: InteractionKind,
    pub duration_seconds: i32,
    pub additional_metadata: Option<Value>,
}

impl InteractionDraft {
    pub fn new(
        feature_name: FeatureName,
        interaction_type: InteractionKind,
        duration_seconds: i32,
        additional_metadata: Option<Value>,
    ) -> Result<Self, InteractionValidationError> {
        if duration_seconds < 0 {
            return Err(InteractionValidationError::NegativeDuration);
        }
        Ok(Self {
            feature_name,
            interaction_type,
            duration_seconds,
            additional_metadata,
        })
    }
}

/// Optional narrowing criteria for a per-user interaction listing.
///
/// Timestamp bounds are inclusive on both ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionFilter {
    pub kind: Option<InteractionKind>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl InteractionFilter {
    /// Whether the given interaction satisfies every present criterion.
    pub fn matches(&self, interaction: &Interaction) -> bool {
        if self
            .kind
            .is_some_and(|kind| kind != interaction.interaction_type)
        {
            return false;
        }
        if self.start.is_some_and(|start| interaction.occurred_at < start) {
            return false;
        }
        if self.end.is_some_and(|end| interaction.occurred_at > end) {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::rstest;

    use super::*;

    fn interaction_at(ts: DateTime<Utc>, kind: InteractionKind) -> Interaction {
        Interaction {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            feature_name: FeatureName::new("dashboard").expect("valid name"),
            interaction_type: kind,
            occurred_at: ts,
            duration_seconds: 5,
            additional_metadata: None,
        }
    }

    #[rstest]
    #[case("click", InteractionKind::Click)]
    #[case("hover", InteractionKind::Hover)]
    #[case("focus", InteractionKind::Focus)]
    #[case("scroll", InteractionKind::Scroll)]
    fn kind_round_trips_through_strings(#[case] raw: &str, #[case] kind: InteractionKind) {
        assert_eq!(raw.parse::<InteractionKind>().expect("valid kind"), kind);
        assert_eq!(kind.as_str(), raw);
    }

    #[rstest]
    #[case("Click")]
    #[case("tap")]
    #[case("")]
    fn kind_rejects_unknown_values(#[case] raw: &str) {
        assert!(raw.parse::<InteractionKind>().is_err());
    }

    #[rstest]
    fn draft_rejects_negative_duration() {
        let err = InteractionDraft::new(
            FeatureName::new("dashboard").expect("valid name"),
            InteractionKind::Click,
            -1,
            None,
        )
        .expect_err("negative duration rejected");
        assert_eq!(err, InteractionValidationError::NegativeDuration);
    }

    #[rstest]
    fn filter_bounds_are_inclusive() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single().expect("valid ts");
        let interaction = interaction_at(ts, InteractionKind::Click);
        let filter = InteractionFilter {
            kind: None,
            start: Some(ts),
            end: Some(ts),
        };
        assert!(filter.matches(&interaction));
    }

    #[rstest]
    fn filter_narrows_by_kind() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).single().expect("valid ts");
        let interaction = interaction_at(ts, InteractionKind::Hover);
        let filter = InteractionFilter {
            kind: Some(InteractionKind::Click),
            ..InteractionFilter::default()
        };
        assert!(!filter.matches(&interaction));
    }
}
