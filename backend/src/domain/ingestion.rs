//! Event ingestion: interaction and feedback writes with cache invalidation.
//!
//! Writes always bind the record to the caller's identity and assign the
//! timestamp server-side. Every successful write purges the affected cache
//! namespace so fresh aggregates never sit behind a stale hourly snapshot.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::domain::feedback::{Feedback, FeedbackDraft};
use crate::domain::interaction::{Interaction, InteractionDraft};
use crate::domain::ports::{
    AnalyticsCache, CacheNamespace, FeatureRepository, FeedbackRepository, IngestionCommand,
    InteractionRepository,
};
use crate::domain::Error;

/// Implementation of [`IngestionCommand`] over the repository ports.
pub struct IngestionService {
    interactions: Arc<dyn InteractionRepository>,
    feedback: Arc<dyn FeedbackRepository>,
    features: Arc<dyn FeatureRepository>,
    cache: Arc<dyn AnalyticsCache>,
    clock: Arc<dyn Clock>,
}

impl IngestionService {
    pub fn new(
        interactions: Arc<dyn InteractionRepository>,
        feedback: Arc<dyn FeedbackRepository>,
        features: Arc<dyn FeatureRepository>,
        cache: Arc<dyn AnalyticsCache>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            interactions,
            feedback,
            features,
            cache,
            clock,
        }
    }

    /// Purge a namespace after a write. A failed purge leaves stale entries
    /// behind until their TTL, so it is logged rather than failing the
    /// already-persisted write.
    async fn purge(&self, namespace: CacheNamespace) {
        if let Err(error) = self.cache.purge_namespace(namespace).await {
            warn!(%error, namespace = %namespace, "cache purge after write failed");
        }
    }

    fn build_interaction(&self, user_id: Uuid, draft: InteractionDraft) -> Interaction {
        Interaction {
            id: Uuid::new_v4(),
            user_id,
            feature_name: draft.feature_name,
            interaction_type: draft.interaction_type,
            occurred_at: self.clock.utc(),
            duration_seconds: draft.duration_seconds,
            additional_metadata: draft.additional_metadata,
        }
    }
}

#[async_trait]
impl IngestionCommand for IngestionService {
    async fn create_interaction(
        &self,
        user_id: Uuid,
        draft: InteractionDraft,
    ) -> Result<Interaction, Error> {
        if self.features.find_by_name(&draft.feature_name).await?.is_none() {
            return Err(Error::invalid_request(format!(
                "Unknown feature: {}",
                draft.feature_name
            )));
        }
        let interaction = self.build_interaction(user_id, draft);
        self.interactions
            .insert_batch(std::slice::from_ref(&interaction))
            .await?;
        self.purge(CacheNamespace::InteractionStats).await;
        Ok(interaction)
    }

    async fn bulk_create_interactions(
        &self,
        user_id: Uuid,
        items: Vec<Result<InteractionDraft, Error>>,
    ) -> Result<usize, Error> {
        if items.is_empty() {
            return Err(Error::invalid_request("interactions list must not be empty"));
        }
        let names: Vec<_> = items
            .iter()
            .filter_map(|item| item.as_ref().ok())
            .map(|draft| draft.feature_name.clone())
            .collect();
        let known = self.features.find_by_names(&names).await?;
        // One pass merges malformed items and unknown features, so the
        // report covers every bad index in a single response.
        let mut drafts = Vec::with_capacity(items.len());
        let mut item_errors = Vec::new();
        for (index, item) in items.into_iter().enumerate() {
            match item {
                Err(err) => item_errors.push(json!({
                    "index": index,
                    "detail": err.message(),
                })),
                Ok(draft) if !known.contains_key(&draft.feature_name) => {
                    item_errors.push(json!({
                        "index": index,
                        "detail": format!("Unknown feature: {}", draft.feature_name),
                    }));
                }
                Ok(draft) => drafts.push(draft),
            }
        }
        if !item_errors.is_empty() {
            return Err(Error::invalid_request("one or more interactions are invalid")
                .with_details(json!({ "errors": item_errors })));
        }

        let interactions: Vec<Interaction> = drafts
            .into_iter()
            .map(|draft| self.build_interaction(user_id, draft))
            .collect();
        self.interactions.insert_batch(&interactions).await?;
        self.purge(CacheNamespace::InteractionStats).await;
        Ok(interactions.len())
    }

    async fn create_feedback(
        &self,
        user_id: Uuid,
        draft: FeedbackDraft,
    ) -> Result<Feedback, Error> {
        let feedback = Feedback {
            id: Uuid::new_v4(),
            user_id,
            category: draft.category,
            rating: draft.rating,
            feedback_text: draft.feedback_text,
            submitted_at: self.clock.utc(),
        };
        self.feedback.insert(&feedback).await?;
        self.purge(CacheNamespace::FeedbackAnalytics).await;
        Ok(feedback)
    }
}
