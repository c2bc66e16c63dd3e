//! Analytics and ingestion handlers under `/api/v1/stats`.
//!
//! ```text
//! GET  /api/v1/stats                       (admin) interaction statistics
//! GET  /api/v1/stats/interactions          (admin) alias of the above
//! POST /api/v1/stats                       record one interaction
//! POST /api/v1/stats/bulk-create           record a batch of interactions
//! GET  /api/v1/stats/user/{user_id}        (admin) one user's interactions
//! POST /api/v1/stats/feedback              submit feedback
//! GET  /api/v1/stats/feedback/analytics    (admin) feedback analytics
//! ```

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::domain::feature::FeatureName;
use crate::domain::feedback::{FeedbackCategory, FeedbackDraft, FeedbackValidationError, Rating};
use crate::domain::interaction::{Interaction, InteractionDraft, InteractionFilter};
use crate::domain::Error;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    parse_interaction_kind, parse_optional_interaction_kind, parse_optional_rfc3339_timestamp,
    FieldName,
};
use crate::inbound::http::ApiResult;

const TYPE_FIELD: FieldName = FieldName::new("interaction_type");
const QUERY_TYPE_FIELD: FieldName = FieldName::new("type");
const START_DATE_FIELD: FieldName = FieldName::new("start_date");
const END_DATE_FIELD: FieldName = FieldName::new("end_date");

/// One interaction item as submitted by clients. Clients send the seconds
/// under `duration`.
///
/// The kind is kept as a string so batch validation can report bad values
/// per item instead of failing the whole body at the serde layer.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InteractionItem {
    pub feature_name: String,
    pub interaction_type: String,
    pub duration: i32,
    #[serde(default)]
    pub additional_metadata: Option<Value>,
}

fn item_to_draft(item: InteractionItem) -> Result<InteractionDraft, Error> {
    let feature_name = FeatureName::new(item.feature_name).map_err(|err| {
        Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "feature_name", "code": "invalid_feature_name" }))
    })?;
    let kind = parse_interaction_kind(&item.interaction_type, TYPE_FIELD)?;
    InteractionDraft::new(feature_name, kind, item.duration, item.additional_metadata).map_err(
        |err| {
            Error::invalid_request(err.to_string())
                .with_details(json!({ "field": "duration", "code": "negative_duration" }))
        },
    )
}

async fn interaction_statistics_response(
    session: &SessionContext,
    state: &HttpState,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let stats = state.analytics.interaction_statistics().await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// Aggregated interaction statistics.
#[get("/stats")]
pub async fn get_statistics(
    session: SessionContext,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    interaction_statistics_response(&session, &state).await
}

/// Alias of [`get_statistics`] kept for clients using the longer path.
#[get("/stats/interactions")]
pub async fn get_interaction_statistics(
    session: SessionContext,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    interaction_statistics_response(&session, &state).await
}

/// Record a single interaction for the calling user.
#[post("/stats")]
pub async fn create_interaction(
    session: SessionContext,
    state: web::Data<HttpState>,
    payload: web::Json<InteractionItem>,
) -> ApiResult<HttpResponse> {
    let identity = session.require_user()?;
    let draft = item_to_draft(payload.into_inner())?;
    let interaction: Interaction = state
        .ingestion
        .create_interaction(identity.user_id, draft)
        .await?;
    Ok(HttpResponse::Created().json(interaction))
}

/// Record a batch of interactions for the calling user.
#[post("/stats/bulk-create")]
pub async fn bulk_create_interactions(
    session: SessionContext,
    state: web::Data<HttpState>,
    payload: web::Json<Vec<InteractionItem>>,
) -> ApiResult<HttpResponse> {
    let identity = session.require_user()?;
    // Items are converted individually so malformed ones stay at their
    // submitted index; the ingestion service folds them into one report.
    let items = payload.into_inner().into_iter().map(item_to_draft).collect();
    let created = state
        .ingestion
        .bulk_create_interactions(identity.user_id, items)
        .await?;
    Ok(HttpResponse::Created().json(json!({
        "message": format!("{created} interactions created successfully"),
    })))
}

/// Query string accepted by the per-user interaction listing.
#[derive(Debug, Default, Deserialize)]
pub struct UserInteractionsQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl UserInteractionsQuery {
    fn into_filter(self) -> Result<InteractionFilter, Error> {
        Ok(InteractionFilter {
            kind: parse_optional_interaction_kind(self.kind.as_deref(), QUERY_TYPE_FIELD)?,
            start: parse_optional_rfc3339_timestamp(
                self.start_date.as_deref(),
                START_DATE_FIELD,
            )?,
            end: parse_optional_rfc3339_timestamp(self.end_date.as_deref(), END_DATE_FIELD)?,
        })
    }
}

/// One user's interactions, optionally narrowed by kind and time bounds.
#[get("/stats/user/{user_id}")]
pub async fn get_user_interactions(
    session: SessionContext,
    state: web::Data<HttpState>,
    path: web::Path<Uuid>,
    query: web::Query<UserInteractionsQuery>,
) -> ApiResult<web::Json<Vec<Interaction>>> {
    session.require_admin()?;
    let user_id = path.into_inner();
    let filter = query.into_inner().into_filter()?;
    let interactions = state.analytics.user_interactions(user_id, &filter).await?;
    Ok(web::Json(interactions))
}

/// Request body for `POST /api/v1/stats/feedback`.
#[derive(Debug, Deserialize, Serialize)]
pub struct FeedbackRequest {
    pub category: String,
    pub rating: f64,
    #[serde(default)]
    pub feedback_text: Option<String>,
}

fn map_feedback_validation_error(err: FeedbackValidationError) -> Error {
    let (field, code) = match err {
        FeedbackValidationError::EmptyCategory => ("category", "empty_category"),
        FeedbackValidationError::CategoryTooLong { .. } => ("category", "category_too_long"),
        FeedbackValidationError::RatingOutOfRange => ("rating", "rating_out_of_range"),
        FeedbackValidationError::RatingTooPrecise => ("rating", "rating_too_precise"),
    };
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": field, "code": code }))
}

/// Submit feedback for the calling user.
#[post("/stats/feedback")]
pub async fn create_feedback(
    session: SessionContext,
    state: web::Data<HttpState>,
    payload: web::Json<FeedbackRequest>,
) -> ApiResult<HttpResponse> {
    let identity = session.require_user()?;
    let FeedbackRequest {
        category,
        rating,
        feedback_text,
    } = payload.into_inner();
    let draft = FeedbackDraft {
        category: FeedbackCategory::new(category).map_err(map_feedback_validation_error)?,
        rating: Rating::from_f64(rating).map_err(map_feedback_validation_error)?,
        feedback_text,
    };
    let feedback = state
        .ingestion
        .create_feedback(identity.user_id, draft)
        .await?;
    Ok(HttpResponse::Created().json(feedback))
}

/// Aggregated feedback analytics.
#[get("/stats/feedback/analytics")]
pub async fn get_feedback_analytics(
    session: SessionContext,
    state: web::Data<HttpState>,
) -> ApiResult<HttpResponse> {
    session.require_admin()?;
    let analytics = state.analytics.feedback_analytics().await?;
    Ok(HttpResponse::Ok().json(analytics))
}
