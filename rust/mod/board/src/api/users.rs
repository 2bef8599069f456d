use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};

use dearbaby_core::ServiceError;

use crate::api::{AppState, Caller, OrFail, Payload};
use crate::model::{CreateProfile, UpdateProfile};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", post(create_profile))
        .route("/users/count", get(count_users))
        .route("/users/profile", put(update_profile))
        .route("/users/{id}", get(get_user))
}

async fn count_users(State(svc): State<AppState>) -> Result<Json<Value>, ServiceError> {
    let count = svc.count_users().or_fail("Failed to fetch user count")?;
    Ok(Json(json!({ "count": count })))
}

async fn get_user(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ServiceError> {
    let user = svc.get_user(&id).or_fail("Failed to fetch user")?;
    Ok(Json(json!({ "user": user })))
}

/// POST /users: create the profile row for the authenticated identity.
async fn create_profile(
    State(svc): State<AppState>,
    Caller(caller): Caller,
    Payload(input): Payload<CreateProfile>,
) -> Result<Json<Value>, ServiceError> {
    let user = svc.create_profile(&caller, input).or_fail("Failed to create profile")?;
    Ok(Json(json!({ "user": user })))
}

/// PUT /users/profile: update the authenticated user's own profile.
async fn update_profile(
    State(svc): State<AppState>,
    Caller(caller): Caller,
    Payload(input): Payload<UpdateProfile>,
) -> Result<Json<Value>, ServiceError> {
    let user = svc.update_profile(&caller, input).or_fail("Failed to update profile")?;
    Ok(Json(json!({ "user": user })))
}
