use std::collections::HashMap;

use axum::{
    extract::{Path, Query},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
    Extension, Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use bytes::Bytes;
use rand::{distributions::Alphanumeric, Rng};

use crate::{
    authentication::{
        get_jwt_token, hash_password_argon2, verify_password_argon2, AuthUser, MaybeUser,
    },
    data_formats::{
        ChangePasswordRequest, CommentForm, CommentResponse, GroupPostsWrapper, GroupResponse,
        ImageUpload, LoginRequest, PostDetailWrapper, PostEditForm, PostForm, PostListWrapper,
        PostResponse,
        ProfileResponse, ProfileWrapper, SignupRequest, UserResponse, UserWrapper,
    },
    db_helpers::{
        follow, get_group_by_slug, get_post, get_user_by_id, get_user_by_username, insert_comment,
        insert_post, insert_user, is_following, list_author_posts, list_feed_posts,
        list_group_posts, list_post_comments, list_posts, unfollow, update_password, update_post,
    },
    errors::RequestError,
    pagination::{self, paginate},
    AppState,
};

type JsonResult<T> = Result<Json<T>, RequestError>;
type UserJson = UserWrapper<UserResponse>;

fn requested_page(params: &HashMap<String, String>) -> u32 {
    pagination::page_number(params.get("page").map(String::as_str))
}

fn post_responses(posts: Vec<crate::models::Post>) -> Vec<PostResponse> {
    posts.into_iter().map(PostResponse::new).collect()
}

// ----------------- Helper Handlers -----------------
pub async fn alive() -> &'static str {
    "alive"
}

pub async fn not_found(uri: Uri) -> Result<(), (StatusCode, String)> {
    Err((
        StatusCode::NOT_FOUND,
        format!("URL {} provided was not found", uri),
    ))
}

// ----------------- Listing Handlers -----------------

/// Home feed: globally newest posts, served through the page cache. All
/// visitors share one cached rendering per page, so content changed inside
/// the cache window may be stale.
pub async fn index(
    Extension(state): Extension<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Response, RequestError> {
    let requested = requested_page(&params);
    if let Some(body) = state.cache.get(&format!("/?page={}", requested)).await {
        return Ok(json_body(body));
    }

    let posts = list_posts(&state.pool).await?;
    let page = paginate(posts, requested);
    // Key by the clamped page so the key space is bounded by actual content,
    // not by whatever page numbers clients ask for.
    let cache_key = format!("/?page={}", page.meta.page);
    let wrapper = PostListWrapper {
        posts: post_responses(page.items),
        pagination: page.meta,
    };
    let body = Bytes::from(serde_json::to_vec(&wrapper).map_err(|_| RequestError::ServerError)?);
    state.cache.set(&cache_key, body.clone()).await;
    Ok(json_body(body))
}

fn json_body(body: Bytes) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

pub async fn group_posts(
    Extension(state): Extension<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> JsonResult<GroupPostsWrapper> {
    let group = get_group_by_slug(&state.pool, &slug)
        .await?
        .ok_or(RequestError::NotFound)?;
    let posts = list_group_posts(&state.pool, group.id).await?;
    let page = paginate(posts, requested_page(&params));
    Ok(Json(GroupPostsWrapper {
        group: GroupResponse::new(group),
        posts: post_responses(page.items),
        pagination: page.meta,
    }))
}

pub async fn profile(
    Extension(state): Extension<AppState>,
    maybe_user: MaybeUser,
    Path(username): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> JsonResult<ProfileWrapper> {
    let user = get_user_by_username(&state.pool, &username)
        .await?
        .ok_or(RequestError::NotFound)?;
    let following = match maybe_user.get_id() {
        Some(viewer_id) => is_following(&state.pool, viewer_id, user.id).await?,
        None => false,
    };
    let posts = list_author_posts(&state.pool, user.id).await?;
    let page = paginate(posts, requested_page(&params));
    Ok(Json(ProfileWrapper {
        profile: ProfileResponse::new(user, following),
        posts: post_responses(page.items),
        pagination: page.meta,
    }))
}

pub async fn post_detail(
    Extension(state): Extension<AppState>,
    Path(post_id): Path<i64>,
) -> JsonResult<PostDetailWrapper> {
    let post = get_post(&state.pool, post_id)
        .await?
        .ok_or(RequestError::NotFound)?;
    let comments = list_post_comments(&state.pool, post_id).await?;
    Ok(Json(PostDetailWrapper {
        post: PostResponse::new(post),
        comments: comments.into_iter().map(CommentResponse::new).collect(),
    }))
}

pub async fn follow_index(
    user: AuthUser,
    Extension(state): Extension<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> JsonResult<PostListWrapper> {
    let posts = list_feed_posts(&state.pool, user.id).await?;
    let page = paginate(posts, requested_page(&params));
    Ok(Json(PostListWrapper {
        posts: post_responses(page.items),
        pagination: page.meta,
    }))
}

// ----------------- Post Mutation Handlers -----------------

pub async fn create_post(
    user: AuthUser,
    Extension(state): Extension<AppState>,
    Json(form): Json<PostForm>,
) -> Result<Redirect, RequestError> {
    form.validate()?;
    let author = get_user_by_id(&state.pool, user.id)
        .await?
        .ok_or_else(|| RequestError::LoginRequired("/posts".to_string()))?;
    let image_path = match &form.image {
        Some(upload) => Some(save_image(&state.media_root, upload).await?),
        None => None,
    };
    let result = insert_post(
        &state.pool,
        author.id,
        form.text.trim(),
        form.group,
        image_path.as_deref(),
    )
    .await;
    let post = match result {
        Ok(post) => post,
        Err(e) => {
            // The upload was written before the insert; don't orphan it.
            if let Some(path) = &image_path {
                let _ = tokio::fs::remove_file(state.media_root.join(path)).await;
            }
            return Err(map_group_fk_error(e));
        }
    };
    tracing::debug!(post_id = post.id, author = %author.username, "post created");
    Ok(Redirect::to(&format!("/profiles/{}", author.username)))
}

pub async fn edit_post(
    user: AuthUser,
    Extension(state): Extension<AppState>,
    Path(post_id): Path<i64>,
    Json(form): Json<PostEditForm>,
) -> Result<Redirect, RequestError> {
    let post = get_post(&state.pool, post_id)
        .await?
        .ok_or(RequestError::NotFound)?;
    // Non-authors are sent back to the post page with nothing modified.
    if post.author_id != user.id {
        return Ok(Redirect::to(&format!("/posts/{}", post_id)));
    }
    form.validate()?;
    update_post(&state.pool, post_id, form.text.trim(), form.group)
        .await
        .map_err(map_group_fk_error)?;
    Ok(Redirect::to(&format!("/posts/{}", post_id)))
}

fn map_group_fk_error(error: RequestError) -> RequestError {
    if let RequestError::DatabaseError(sqlx::Error::Database(e)) = &error {
        if e.message().contains("FOREIGN KEY constraint failed") {
            return RequestError::Validation(vec!["group: unknown group".to_string()]);
        }
    }
    error
}

async fn save_image(
    media_root: &std::path::Path,
    upload: &ImageUpload,
) -> Result<String, RequestError> {
    let data = BASE64.decode(upload.data.as_bytes()).map_err(|_| {
        RequestError::Validation(vec!["image.data: is not valid base64".to_string()])
    })?;
    // Uploaded names are untrusted; keep a conservative character set.
    let safe_name = upload
        .filename
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect::<String>();
    let prefix = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect::<String>();
    let relative = format!("posts/{}_{}", prefix, safe_name);
    let full = media_root.join(&relative);
    if let Some(parent) = full.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|_| RequestError::ServerError)?;
    }
    tokio::fs::write(&full, data)
        .await
        .map_err(|_| RequestError::ServerError)?;
    Ok(relative)
}

// ----------------- Comment Handlers -----------------

pub async fn add_comment(
    user: AuthUser,
    Extension(state): Extension<AppState>,
    Path(post_id): Path<i64>,
    Json(form): Json<CommentForm>,
) -> Result<Redirect, RequestError> {
    form.validate()?;
    get_post(&state.pool, post_id)
        .await?
        .ok_or(RequestError::NotFound)?;
    insert_comment(&state.pool, post_id, user.id, form.text.trim()).await?;
    Ok(Redirect::to(&format!("/posts/{}", post_id)))
}

// ----------------- Follow Handlers -----------------

pub async fn follow_profile(
    user: AuthUser,
    Extension(state): Extension<AppState>,
    Path(username): Path<String>,
) -> Result<Redirect, RequestError> {
    let target = get_user_by_username(&state.pool, &username)
        .await?
        .ok_or(RequestError::NotFound)?;
    if target.id == user.id {
        return Err(self_follow_error());
    }
    follow(&state.pool, user.id, target.id).await.map_err(|e| {
        // The CHECK constraint is the authoritative backstop.
        if let RequestError::DatabaseError(sqlx::Error::Database(e)) = &e {
            if e.message().contains("CHECK constraint failed") {
                return self_follow_error();
            }
        }
        e
    })?;
    Ok(Redirect::to(&format!("/profiles/{}", username)))
}

pub async fn unfollow_profile(
    user: AuthUser,
    Extension(state): Extension<AppState>,
    Path(username): Path<String>,
) -> Result<Redirect, RequestError> {
    let target = get_user_by_username(&state.pool, &username)
        .await?
        .ok_or(RequestError::NotFound)?;
    unfollow(&state.pool, user.id, target.id).await?;
    Ok(Redirect::to(&format!("/profiles/{}", username)))
}

fn self_follow_error() -> RequestError {
    RequestError::Validation(vec!["author: you cannot follow yourself".to_string()])
}

// ----------------- Identity Handlers -----------------

pub async fn signup(
    Extension(state): Extension<AppState>,
    Json(UserWrapper { user: mut request }): Json<UserWrapper<SignupRequest>>,
) -> JsonResult<UserJson> {
    request.validate()?;
    request.password = hash_password_argon2(request.password)
        .await
        .map_err(|_| RequestError::ServerError)?;
    let user = insert_user(&state.pool, &request).await.map_err(|e| {
        if let RequestError::DatabaseError(sqlx::Error::Database(e)) = &e {
            let message = e.message();
            if message.contains("users.username") {
                return RequestError::Validation(vec!["username: already taken".to_string()]);
            }
            if message.contains("users.email") {
                return RequestError::Validation(vec!["email: already registered".to_string()]);
            }
        }
        e
    })?;
    let token = get_jwt_token(user.id).map_err(|_| RequestError::ServerError)?;
    tracing::info!(username = %user.username, "new account");
    Ok(Json(UserWrapper::wrap_with_user_data(UserResponse::new(
        user, token,
    ))))
}

pub async fn login(
    Extension(state): Extension<AppState>,
    Json(UserWrapper { user: request }): Json<UserWrapper<LoginRequest>>,
) -> JsonResult<UserJson> {
    request.validate()?;
    let user = get_user_by_username(&state.pool, &request.username)
        .await?
        .ok_or_else(|| RequestError::Validation(vec!["username: unknown username".to_string()]))?;
    let password_correct = verify_password_argon2(request.password, &user.password)
        .await
        .map_err(|_| RequestError::ServerError)?;
    if !password_correct {
        return Err(RequestError::Validation(vec![
            "password: incorrect password".to_string(),
        ]));
    }
    let token = get_jwt_token(user.id).map_err(|_| RequestError::ServerError)?;
    Ok(Json(UserWrapper::wrap_with_user_data(UserResponse::new(
        user, token,
    ))))
}

pub async fn current_user(
    user: AuthUser,
    Extension(state): Extension<AppState>,
) -> JsonResult<UserJson> {
    let account = get_user_by_id(&state.pool, user.id)
        .await?
        .ok_or(RequestError::NotFound)?;
    Ok(Json(UserWrapper::wrap_with_user_data(UserResponse::new(
        account, user.token,
    ))))
}

pub async fn change_password(
    user: AuthUser,
    Extension(state): Extension<AppState>,
    Json(request): Json<ChangePasswordRequest>,
) -> JsonResult<UserJson> {
    request.validate()?;
    let account = get_user_by_id(&state.pool, user.id)
        .await?
        .ok_or(RequestError::NotFound)?;
    let password_correct = verify_password_argon2(request.old_password, &account.password)
        .await
        .map_err(|_| RequestError::ServerError)?;
    if !password_correct {
        return Err(RequestError::Validation(vec![
            "old_password: incorrect password".to_string(),
        ]));
    }
    let hash = hash_password_argon2(request.new_password)
        .await
        .map_err(|_| RequestError::ServerError)?;
    update_password(&state.pool, user.id, &hash).await?;
    Ok(Json(UserWrapper::wrap_with_user_data(UserResponse::new(
        account, user.token,
    ))))
}
