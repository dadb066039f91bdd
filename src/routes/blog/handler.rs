use axum::{
    Extension,
    extract::{Json, Path, Query, State},
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    AppState,
    database::operations::{
        CommentOperations, LikeOperations, LikeTarget, PostOperations, ToggleOutcome,
    },
    error::AppError,
    middleware::CurrentUser,
    pagination::paginate,
    utils::{get_random, success_message, success_to_api_response},
};

use super::model::{
    CommentCreateRequest, CommentData, DataType, LikeData, LikesQuery, PaginatedCommentsData,
    PaginatedLikesData, PaginatedPostsData, PaginatedRepliesData, PostCreateRequest, PostData,
    PostsQuery, ReplyData, SortedPageQuery, ToggleQuery, parse_data_type, parse_sort,
};

fn validate_title(title: &str) -> Result<(), AppError> {
    if title.is_empty() || title.len() > 200 {
        return Err(AppError::validation("title", "200 characters max"));
    }
    Ok(())
}

fn validate_text(text: &str) -> Result<(), AppError> {
    if text.is_empty() || text.len() > 10_000 {
        return Err(AppError::validation("text", "10000 characters max"));
    }
    Ok(())
}

/// 由标题生成slug，撞库时追加随机后缀保证唯一
async fn make_slug(state: &AppState, title: &str) -> Result<String, AppError> {
    let base = slug::slugify(title);
    let base = if base.is_empty() {
        "post".to_string()
    } else {
        base
    };
    if !PostOperations::slug_exists(&state.pool, &base).await? {
        return Ok(base);
    }
    Ok(format!("{}-{}", base, get_random(8).to_lowercase()))
}

// ---------- 帖子 ----------

#[axum::debug_handler]
pub async fn get_posts(
    State(state): State<AppState>,
    Query(query): Query<PostsQuery>,
) -> Result<impl IntoResponse, AppError> {
    let rows = PostOperations::list(&state.pool, query.search.as_deref()).await?;
    let page = paginate(rows, query.page, query.limit)?;

    Ok(success_to_api_response(
        "Posts returned successfully",
        PaginatedPostsData {
            posts: page.items.into_iter().map(PostData::from).collect(),
            meta: page.meta,
        },
    ))
}

#[axum::debug_handler]
pub async fn create_post(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Json(req): Json<PostCreateRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_title(&req.title)?;
    validate_text(&req.text)?;

    let slug = make_slug(&state, &req.title).await?;
    let post =
        PostOperations::create(&state.pool, current.user.id, &req.title, &slug, &req.text).await?;

    let detail = PostOperations::find_detail_by_slug(&state.pool, &post.slug)
        .await?
        .ok_or_else(|| AppError::server_error("An unexpected error occurred"))?;

    Ok(success_to_api_response(
        "Post created successfully",
        PostData::from(detail),
    ))
}

#[axum::debug_handler]
pub async fn get_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let detail = PostOperations::find_detail_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::not_found("Post not found"))?;

    Ok(success_to_api_response(
        "Post returned successfully",
        PostData::from(detail),
    ))
}

#[axum::debug_handler]
pub async fn update_post(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<PostCreateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let post = PostOperations::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::not_found("Post not found"))?;

    if post.author_id != current.user.id {
        return Err(AppError::invalid_owner(
            "You are not authorized to update this post",
        ));
    }

    validate_title(&req.title)?;
    validate_text(&req.text)?;

    PostOperations::update(&state.pool, post.id, &req.title, &req.text).await?;
    let detail = PostOperations::find_detail_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::server_error("An unexpected error occurred"))?;

    Ok(success_to_api_response(
        "Post updated successfully",
        PostData::from(detail),
    ))
}

#[axum::debug_handler]
pub async fn delete_post(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let post = PostOperations::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::not_found("Post not found"))?;

    if post.author_id != current.user.id {
        return Err(AppError::invalid_owner(
            "You are not authorized to delete this post",
        ));
    }

    PostOperations::delete(&state.pool, post.id).await?;
    Ok(success_message("Post deleted successfully"))
}

// ---------- 评论 ----------

#[axum::debug_handler]
pub async fn get_comments(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<SortedPageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let sort = parse_sort(query.sort.as_deref())?;

    let post = PostOperations::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::not_found("Post not found"))?;

    let rows = CommentOperations::list_for_post(&state.pool, post.id, sort).await?;
    let page = paginate(rows, query.page, query.limit)?;

    Ok(success_to_api_response(
        "Comments returned successfully",
        PaginatedCommentsData {
            comments: page.items.into_iter().map(CommentData::from).collect(),
            meta: page.meta,
        },
    ))
}

#[axum::debug_handler]
pub async fn create_comment(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<CommentCreateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let post = PostOperations::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::not_found("Post not found"))?;

    validate_text(&req.text)?;

    let comment =
        CommentOperations::create(&state.pool, current.user.id, post.id, None, &req.text).await?;
    let detail = CommentOperations::detail_by_id(&state.pool, comment.id)
        .await?
        .ok_or_else(|| AppError::server_error("An unexpected error occurred"))?;

    Ok(success_to_api_response(
        "Comment created successfully",
        CommentData::from(detail),
    ))
}

#[axum::debug_handler]
pub async fn get_comment(
    State(state): State<AppState>,
    Path(comment_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = CommentOperations::detail_by_id(&state.pool, comment_id)
        .await?
        .filter(|c| c.parent_id.is_none())
        .ok_or_else(|| AppError::not_found("Comment not found"))?;

    Ok(success_to_api_response(
        "Comment returned successfully",
        CommentData::from(detail),
    ))
}

#[axum::debug_handler]
pub async fn update_comment(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(comment_id): Path<Uuid>,
    Json(req): Json<CommentCreateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let comment = CommentOperations::find_comment(&state.pool, comment_id)
        .await?
        .ok_or_else(|| AppError::not_found("Comment not found"))?;

    if comment.author_id != current.user.id {
        return Err(AppError::invalid_owner(
            "You are not authorized to update this comment",
        ));
    }

    validate_text(&req.text)?;

    CommentOperations::update_text(&state.pool, comment.id, &req.text).await?;
    let detail = CommentOperations::detail_by_id(&state.pool, comment.id)
        .await?
        .ok_or_else(|| AppError::server_error("An unexpected error occurred"))?;

    Ok(success_to_api_response(
        "Comment updated successfully",
        CommentData::from(detail),
    ))
}

#[axum::debug_handler]
pub async fn delete_comment(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(comment_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let comment = CommentOperations::find_comment(&state.pool, comment_id)
        .await?
        .ok_or_else(|| AppError::not_found("Comment not found"))?;

    if comment.author_id != current.user.id {
        return Err(AppError::invalid_owner(
            "You are not authorized to update this comment",
        ));
    }

    CommentOperations::delete(&state.pool, comment.id).await?;
    Ok(success_message("Comment deleted successfully"))
}

// ---------- 回复 ----------

#[axum::debug_handler]
pub async fn get_replies(
    State(state): State<AppState>,
    Path(comment_id): Path<Uuid>,
    Query(query): Query<SortedPageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let sort = parse_sort(query.sort.as_deref())?;

    let comment = CommentOperations::find_comment(&state.pool, comment_id)
        .await?
        .ok_or_else(|| AppError::not_found("Comment not found"))?;

    let rows = CommentOperations::list_replies(&state.pool, comment.id, sort).await?;
    let page = paginate(rows, query.page, query.limit)?;

    Ok(success_to_api_response(
        "Replies returned successfully",
        PaginatedRepliesData {
            replies: page.items.into_iter().map(ReplyData::from).collect(),
            meta: page.meta,
        },
    ))
}

#[axum::debug_handler]
pub async fn create_reply(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(comment_id): Path<Uuid>,
    Json(req): Json<CommentCreateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let comment = CommentOperations::find_comment(&state.pool, comment_id)
        .await?
        .ok_or_else(|| AppError::not_found("Comment not found"))?;

    validate_text(&req.text)?;

    let reply = CommentOperations::create(
        &state.pool,
        current.user.id,
        comment.post_id,
        Some(comment.id),
        &req.text,
    )
    .await?;
    let detail = CommentOperations::detail_by_id(&state.pool, reply.id)
        .await?
        .ok_or_else(|| AppError::server_error("An unexpected error occurred"))?;

    Ok(success_to_api_response(
        "Reply created successfully",
        ReplyData::from(detail),
    ))
}

#[axum::debug_handler]
pub async fn get_reply(
    State(state): State<AppState>,
    Path(reply_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let detail = CommentOperations::detail_by_id(&state.pool, reply_id)
        .await?
        .filter(|c| c.parent_id.is_some())
        .ok_or_else(|| AppError::not_found("Reply not found"))?;

    Ok(success_to_api_response(
        "Reply returned successfully",
        ReplyData::from(detail),
    ))
}

#[axum::debug_handler]
pub async fn update_reply(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(reply_id): Path<Uuid>,
    Json(req): Json<CommentCreateRequest>,
) -> Result<impl IntoResponse, AppError> {
    let reply = CommentOperations::find_reply(&state.pool, reply_id)
        .await?
        .ok_or_else(|| AppError::not_found("Reply not found"))?;

    if reply.author_id != current.user.id {
        return Err(AppError::invalid_owner(
            "You are not authorized to update this reply",
        ));
    }

    validate_text(&req.text)?;

    CommentOperations::update_text(&state.pool, reply.id, &req.text).await?;
    let detail = CommentOperations::detail_by_id(&state.pool, reply.id)
        .await?
        .ok_or_else(|| AppError::server_error("An unexpected error occurred"))?;

    Ok(success_to_api_response(
        "Reply updated successfully",
        ReplyData::from(detail),
    ))
}

#[axum::debug_handler]
pub async fn delete_reply(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(reply_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let reply = CommentOperations::find_reply(&state.pool, reply_id)
        .await?
        .ok_or_else(|| AppError::not_found("Reply not found"))?;

    if reply.author_id != current.user.id {
        return Err(AppError::invalid_owner(
            "You are not authorized to update this reply",
        ));
    }

    CommentOperations::delete(&state.pool, reply.id).await?;
    Ok(success_message("Reply deleted successfully"))
}

// ---------- 反应 ----------

/// 校验目标存在并映射到存储层目标
/// 回复与评论在存储里同列，但种类不符一律按未找到处理
async fn resolve_target(
    state: &AppState,
    data_type: DataType,
    object_id: Uuid,
) -> Result<LikeTarget, AppError> {
    match data_type {
        DataType::Post => {
            PostOperations::find_by_id(&state.pool, object_id)
                .await?
                .ok_or_else(|| AppError::not_found("Post not found"))?;
            Ok(LikeTarget::Post(object_id))
        }
        DataType::Comment => {
            CommentOperations::find_comment(&state.pool, object_id)
                .await?
                .ok_or_else(|| AppError::not_found("Comment not found"))?;
            Ok(LikeTarget::Comment(object_id))
        }
        DataType::Reply => {
            CommentOperations::find_reply(&state.pool, object_id)
                .await?
                .ok_or_else(|| AppError::not_found("Reply not found"))?;
            Ok(LikeTarget::Comment(object_id))
        }
    }
}

#[axum::debug_handler]
pub async fn get_likes(
    State(state): State<AppState>,
    Path(object_id): Path<Uuid>,
    Query(query): Query<LikesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let data_type = parse_data_type(query.data_type.as_deref())?;
    let target = resolve_target(&state, data_type, object_id).await?;

    let rows = LikeOperations::list_for_target(&state.pool, target, query.is_dislike).await?;
    let page = paginate(rows, query.page, query.limit)?;

    Ok(success_to_api_response(
        "Likes/Dislikes returned successfully",
        PaginatedLikesData {
            likes_or_dislikes: page.items.into_iter().map(LikeData::from).collect(),
            meta: page.meta,
        },
    ))
}

#[axum::debug_handler]
pub async fn toggle_like(
    Extension(current): Extension<CurrentUser>,
    State(state): State<AppState>,
    Path(object_id): Path<Uuid>,
    Query(query): Query<ToggleQuery>,
) -> Result<impl IntoResponse, AppError> {
    let data_type = parse_data_type(query.data_type.as_deref())?;
    let target = resolve_target(&state, data_type, object_id).await?;

    let outcome =
        LikeOperations::toggle(&state.pool, current.user.id, target, query.is_dislike).await?;

    let kind = if query.is_dislike { "Dislike" } else { "Like" };
    let verb = match outcome {
        ToggleOutcome::Added => "added",
        ToggleOutcome::Removed => "removed",
        ToggleOutcome::Updated => "updated",
    };
    Ok(success_message(&format!("{} {} successfully", kind, verb)))
}
