use axum::extract::{Path, State};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};

use dearbaby_core::ServiceError;

use crate::api::{AppState, OrFail, Payload};
use crate::model::{ReactionInput, ReactionKind};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/posts/{id}/like", post(like).delete(unlike))
        .route("/posts/{id}/dislike", post(dislike).delete(undislike))
}

fn set(
    svc: &AppState,
    post_id: &str,
    input: ReactionInput,
    kind: ReactionKind,
    failure: &str,
) -> Result<Json<Value>, ServiceError> {
    let reaction = svc.set_reaction(post_id, input.user_id, kind).or_fail(failure)?;
    let key = kind.envelope_key();
    Ok(Json(json!({ key: reaction })))
}

fn clear(
    svc: &AppState,
    post_id: &str,
    input: ReactionInput,
    kind: ReactionKind,
    failure: &str,
) -> Result<Json<Value>, ServiceError> {
    svc.clear_reaction(post_id, input.user_id, kind).or_fail(failure)?;
    Ok(Json(json!({ "success": true })))
}

async fn like(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Payload(input): Payload<ReactionInput>,
) -> Result<Json<Value>, ServiceError> {
    set(&svc, &id, input, ReactionKind::Like, "Failed to like post")
}

async fn unlike(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Payload(input): Payload<ReactionInput>,
) -> Result<Json<Value>, ServiceError> {
    clear(&svc, &id, input, ReactionKind::Like, "Failed to unlike post")
}

async fn dislike(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Payload(input): Payload<ReactionInput>,
) -> Result<Json<Value>, ServiceError> {
    set(&svc, &id, input, ReactionKind::Dislike, "Failed to dislike post")
}

async fn undislike(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Payload(input): Payload<ReactionInput>,
) -> Result<Json<Value>, ServiceError> {
    clear(&svc, &id, input, ReactionKind::Dislike, "Failed to undislike post")
}
