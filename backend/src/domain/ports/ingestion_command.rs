//! Driving port for recording interaction and feedback events.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::feedback::{Feedback, FeedbackDraft};
use crate::domain::interaction::{Interaction, InteractionDraft};
use crate::domain::Error;

/// Domain use-case port for event ingestion.
///
/// Every write binds the record to the supplied caller identity and
/// invalidates the affected analytics cache namespace.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IngestionCommand: Send + Sync {
    /// Record a single interaction with a server-assigned timestamp.
    async fn create_interaction(
        &self,
        user_id: Uuid,
        draft: InteractionDraft,
    ) -> Result<Interaction, Error>;

    /// Record a batch of interactions atomically.
    ///
    /// Items that already failed adapter-side validation arrive as errors,
    /// positioned where the client sent them, so one per-item report covers
    /// every invalid index. Any invalid item rejects the whole batch and
    /// nothing is persisted.
    async fn bulk_create_interactions(
        &self,
        user_id: Uuid,
        items: Vec<Result<InteractionDraft, Error>>,
    ) -> Result<usize, Error>;

    /// Record one feedback entry with a server-assigned timestamp.
    async fn create_feedback(
        &self,
        user_id: Uuid,
        draft: FeedbackDraft,
    ) -> Result<Feedback, Error>;
}
