use axum::{
    Json,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, info, instrument};

use super::STATUS_HEADER;
use super::error::GatewayError;
use super::payload::{
    AskRequest, AskResponse, ComparisonRequest, ContextRequest, ContextResponse,
    EvaluateRequest, ScoreResponse, TextRequest,
};
use super::state::HandlerState;
use crate::evaluation::{EvaluationResult, ReferenceDictionary};
use crate::safety::{KnowledgeGap, ToxicityVerdict};

const CONTEXT_LOADED_MESSAGE: &str = "✅ Document context loaded.";

/// Runs CPU-bound model work off the async runtime.
async fn run_blocking<T, F>(work: F) -> Result<T, GatewayError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| GatewayError::InternalError(format!("worker task failed: {}", e)))
}

fn require_text(value: &str, field: &str) -> Result<(), GatewayError> {
    if value.trim().is_empty() {
        return Err(GatewayError::InvalidRequest(format!(
            "{} must not be empty",
            field
        )));
    }
    Ok(())
}

#[instrument(skip(state, request), fields(chars = request.text.len()))]
pub async fn context_handler(
    State(state): State<HandlerState>,
    Json(request): Json<ContextRequest>,
) -> Result<Json<ContextResponse>, GatewayError> {
    require_text(&request.text, "text")?;

    let preview = {
        let mut session = state.session.lock();
        state
            .service
            .load_context(&mut session, &request.text)
            .map(|doc| doc.prefix(state.preview_chars).to_string())
            .unwrap_or_default()
    };

    Ok(Json(ContextResponse {
        message: CONTEXT_LOADED_MESSAGE.to_string(),
        preview,
    }))
}

#[instrument(skip(state, request), fields(has_context = request.context.is_some()))]
pub async fn ask_handler(
    State(state): State<HandlerState>,
    Json(request): Json<AskRequest>,
) -> Result<Response, GatewayError> {
    require_text(&request.question, "question")?;

    let plan = {
        let mut session = state.session.lock();
        state
            .service
            .plan(&mut session, &request.question, request.context.as_deref())
    };
    debug!(intent = %plan.intent(), "Routing plan ready");

    let reply = state.service.execute(plan).await;
    state.session.lock().record(&request.question, &reply);

    info!(intent = %reply.intent, status = %reply.status, "Question answered");

    let mut headers = HeaderMap::new();
    headers.insert(
        STATUS_HEADER,
        HeaderValue::from_static(reply.status.label()),
    );

    Ok((StatusCode::OK, headers, Json(AskResponse::from(reply))).into_response())
}

#[instrument(skip(state, request))]
pub async fn evaluate_handler(
    State(state): State<HandlerState>,
    Json(request): Json<EvaluateRequest>,
) -> Result<Json<EvaluationResult>, GatewayError> {
    if let Some(threshold) = request.threshold
        && !(0.0..=1.0).contains(&threshold)
    {
        return Err(GatewayError::InvalidRequest(format!(
            "threshold must be between 0.0 and 1.0, got {}",
            threshold
        )));
    }

    let service = state.service.clone();
    let result = run_blocking(move || {
        let references = request.references.map(ReferenceDictionary::from);
        service.evaluate(
            &request.response,
            &request.prompt,
            references.as_ref(),
            request.threshold,
        )
    })
    .await?;

    Ok(Json(result))
}

#[instrument(skip(state, request))]
pub async fn toxicity_handler(
    State(state): State<HandlerState>,
    Json(request): Json<TextRequest>,
) -> Result<Json<ToxicityVerdict>, GatewayError> {
    let service = state.service.clone();
    let verdict = run_blocking(move || service.check_toxicity(&request.text)).await??;
    Ok(Json(verdict))
}

#[instrument(skip(state, request))]
pub async fn hallucination_handler(
    State(state): State<HandlerState>,
    Json(request): Json<ComparisonRequest>,
) -> Result<Json<ScoreResponse>, GatewayError> {
    let service = state.service.clone();
    let score = run_blocking(move || {
        service.check_hallucination(&request.response, &request.reference)
    })
    .await??;
    Ok(Json(ScoreResponse { score }))
}

#[instrument(skip(state, request))]
pub async fn knowledge_gap_handler(
    State(state): State<HandlerState>,
    Json(request): Json<ComparisonRequest>,
) -> Result<Json<KnowledgeGap>, GatewayError> {
    let service = state.service.clone();
    let gap = run_blocking(move || {
        service.check_knowledge_gap(&request.response, &request.reference)
    })
    .await??;
    Ok(Json(gap))
}
