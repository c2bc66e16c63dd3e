//! Domain entities, services, and ports.
//!
//! Types here are transport and storage agnostic. Each value type documents
//! its invariants and serde contract in its own Rustdoc; adapters on either
//! side of the hexagon translate to and from these types.

pub mod analytics;
pub mod error;
pub mod feature;
pub mod feedback;
pub mod ingestion;
pub mod interaction;
pub mod ports;
pub mod user;

pub use self::analytics::AnalyticsService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::feature::{Feature, FeatureName, FeatureValidationError};
pub use self::feedback::{Feedback, FeedbackCategory, FeedbackDraft, FeedbackValidationError, Rating};
pub use self::ingestion::IngestionService;
pub use self::interaction::{
    Interaction, InteractionDraft, InteractionFilter, InteractionKind,
    InteractionValidationError,
};
pub use self::user::{Email, NewUser, Role, User, UserValidationError, Username};
