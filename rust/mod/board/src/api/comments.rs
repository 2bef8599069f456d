use axum::extract::{Path, State};
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde_json::{Value, json};

use dearbaby_core::ServiceError;

use crate::api::{AppState, OrFail, Payload};
use crate::model::CreateComment;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/posts/{id}/comments", get(list_comments).post(create_comment))
        .route("/comments/{id}", delete(delete_comment))
}

async fn list_comments(
    State(svc): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<Value>, ServiceError> {
    let comments = svc.list_comments(&post_id).or_fail("Failed to fetch comments")?;
    Ok(Json(json!({ "comments": comments })))
}

async fn create_comment(
    State(svc): State<AppState>,
    Path(post_id): Path<String>,
    Payload(input): Payload<CreateComment>,
) -> Result<Json<Value>, ServiceError> {
    let comment = svc
        .create_comment(&post_id, input)
        .or_fail_detailed("Failed to create comment")?;
    Ok(Json(json!({ "comment": comment })))
}

async fn delete_comment(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ServiceError> {
    svc.delete_comment(&id).or_fail("Failed to delete comment")?;
    Ok(Json(json!({ "success": true })))
}
