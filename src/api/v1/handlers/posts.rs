/*
 * Responsibility
 * - /posts 系 handler (list / create / my / modify / delete)
 * - すべて AuthCtxExtractor 必須 (匿名なら 401)
 * - 所有者チェックは PostService 側で行う。handler は user name を渡すだけ
 */
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    api::v1::{
        dto::posts::{CreatePostRequest, ModifyPostRequest, PageQuery, PageResponse, PostResponse},
        extractors::AuthCtxExtractor,
    },
    domain::{Post, PostId},
    error::AppError,
    services::post::PageRequest,
    state::AppState,
};

fn page_of(posts: Vec<Post>, page: PageRequest) -> PageResponse<PostResponse> {
    PageResponse {
        items: posts.into_iter().map(PostResponse::from).collect(),
        page: page.page,
        size: page.size,
    }
}

pub async fn list_posts(
    State(state): State<AppState>,
    AuthCtxExtractor(_auth): AuthCtxExtractor,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageResponse<PostResponse>>, AppError> {
    let page = PageRequest::from(query);
    let posts = state.posts.list(page).await?;

    Ok(Json(page_of(posts, page)))
}

pub async fn my_posts(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageResponse<PostResponse>>, AppError> {
    let page = PageRequest::from(query);
    let posts = state.posts.my(auth.user_name(), page).await?;

    Ok(Json(page_of(posts, page)))
}

pub async fn create_post(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    Json(req): Json<CreatePostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_POST", msg))?;

    let post = state
        .posts
        .create(&req.title, &req.body, auth.user_name())
        .await?;

    Ok((StatusCode::CREATED, Json(post.into())))
}

pub async fn modify_post(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    Path(post_id): Path<PostId>,
    Json(req): Json<ModifyPostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    req.validate()
        .map_err(|msg| AppError::bad_request("INVALID_POST", msg))?;

    let post = state
        .posts
        .modify(&req.title, &req.body, auth.user_name(), post_id)
        .await?;

    Ok(Json(post.into()))
}

pub async fn delete_post(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    Path(post_id): Path<PostId>,
) -> Result<StatusCode, AppError> {
    state.posts.delete(auth.user_name(), post_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
