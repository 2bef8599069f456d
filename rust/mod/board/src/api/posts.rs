use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};

use dearbaby_core::{Page, ServiceError};

use crate::api::{AppState, Caller, OrFail, Payload};
use crate::model::{CreatePost, PostFilter, UpdatePost};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/count", get(count_posts))
        .route("/posts/{id}", get(get_post).put(update_post).delete(delete_post))
}

/// Raw listing query. Numbers are parsed leniently so a bad `page` or
/// `limit` falls back to the default instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    page: Option<String>,
    limit: Option<String>,
    search: Option<String>,
    user_id: Option<String>,
}

fn parse_u32(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|s| s.trim().parse().ok())
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.is_empty())
}

/// GET /posts?page&limit&search&user_id
async fn list_posts(
    State(svc): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ServiceError> {
    let config = svc.config();
    let filter = PostFilter {
        page: Page::new(
            parse_u32(query.page.as_deref()),
            parse_u32(query.limit.as_deref()),
            config.default_page_size,
            config.max_page_size,
        ),
        search: non_empty(query.search),
        viewer: non_empty(query.user_id),
    };
    let posts = svc.list_posts(&filter).or_fail("Failed to fetch posts")?;
    Ok(Json(json!({ "posts": posts })))
}

async fn create_post(
    State(svc): State<AppState>,
    Payload(input): Payload<CreatePost>,
) -> Result<Json<Value>, ServiceError> {
    let post = svc.create_post(input).or_fail_detailed("Failed to create post")?;
    Ok(Json(json!({ "post": post })))
}

async fn count_posts(State(svc): State<AppState>) -> Result<Json<Value>, ServiceError> {
    let count = svc.count_posts().or_fail("Failed to fetch post count")?;
    Ok(Json(json!({ "count": count })))
}

/// GET /posts/{id}: the post with its author and full comment thread.
async fn get_post(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ServiceError> {
    let post = svc.get_post(&id).or_fail("Failed to fetch post")?;
    Ok(Json(json!({ "post": post })))
}

/// PUT /posts/{id}, author only.
async fn update_post(
    State(svc): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
    Payload(input): Payload<UpdatePost>,
) -> Result<Json<Value>, ServiceError> {
    let post = svc.update_post(&caller, &id, input).or_fail("Failed to update post")?;
    Ok(Json(json!({ "post": post })))
}

async fn delete_post(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ServiceError> {
    svc.delete_post(&id).or_fail("Failed to delete post")?;
    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lenient_numbers() {
        assert_eq!(parse_u32(Some("3")), Some(3));
        assert_eq!(parse_u32(Some(" 7 ")), Some(7));
        assert_eq!(parse_u32(Some("abc")), None);
        assert_eq!(parse_u32(Some("-1")), None);
        assert_eq!(parse_u32(None), None);
    }
}
