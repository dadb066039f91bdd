mod handler;
mod model;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::{
    AppState,
    cache::{CacheContext, InvalidateContext, cache_response, invalidate_cache},
    middleware::auth_middleware,
};

pub use handler::{
    create_comment, create_post, create_reply, delete_comment, delete_post, delete_reply,
    get_comment, get_comments, get_likes, get_post, get_posts, get_replies, get_reply,
    toggle_like, update_comment, update_post, update_reply,
};

/// 详情类响应的缓存时长；列表类用配置里的默认TTL
pub const DETAIL_TTL: u64 = 60;

/// 各读接口的缓存键模板
/// 占位符由路径参数与认证用户填充，查询串摘要由缓存层自动追加
pub mod cache_keys {
    pub const POSTS_LIST: &str = "posts:list:{user_id}";
    pub const POST_DETAIL: &str = "posts:detail:{slug}:{user_id}";
    pub const COMMENTS_LIST: &str = "comments:list:{slug}:{user_id}";
    pub const COMMENT_DETAIL: &str = "comments:detail:{comment_id}:{user_id}";
    pub const REPLIES_LIST: &str = "replies:list:{comment_id}:{user_id}";
    pub const REPLY_DETAIL: &str = "replies:detail:{reply_id}:{user_id}";
    pub const LIKES_LIST: &str = "likes:list:{object_id}:{user_id}";
}

/// 各写接口成功后要清除的缓存模式
/// 反应与评论的增删会改动父对象上的统计数，相关详情/列表一并失效
pub mod invalidation {
    pub const POST_CREATE: &[&str] = &["posts:list:*"];
    pub const POST_MUTATION: &[&str] = &[
        "posts:detail:{slug}:*",
        "posts:list:*",
        "comments:list:{slug}:*",
    ];
    pub const COMMENT_CREATE: &[&str] = &[
        "comments:list:{slug}:*",
        "posts:detail:{slug}:*",
        "posts:list:*",
    ];
    pub const COMMENT_MUTATION: &[&str] = &[
        "comments:detail:{comment_id}:*",
        "comments:list:*",
        "replies:list:{comment_id}:*",
        "posts:detail:*",
        "posts:list:*",
    ];
    pub const REPLY_CREATE: &[&str] = &[
        "replies:list:{comment_id}:*",
        "comments:detail:{comment_id}:*",
        "comments:list:*",
    ];
    pub const REPLY_MUTATION: &[&str] = &[
        "replies:detail:{reply_id}:*",
        "replies:list:*",
        "comments:detail:*",
        "comments:list:*",
    ];
    pub const LIKE_TOGGLE: &[&str] = &[
        "likes:list:{object_id}:*",
        "posts:list:*",
        "posts:detail:*",
        "comments:list:*",
        "comments:detail:*",
        "replies:list:*",
        "replies:detail:*",
    ];
}

pub fn router(state: AppState) -> Router<AppState> {
    let list_ttl = state.config.cache_default_ttl_secs;
    let cached = |template: &'static str, ttl: u64| {
        axum::middleware::from_fn_with_state(
            CacheContext::new(state.clone(), template, ttl),
            cache_response,
        )
    };
    let invalidates = |patterns: &'static [&'static str]| {
        axum::middleware::from_fn_with_state(
            InvalidateContext::new(state.clone(), patterns),
            invalidate_cache,
        )
    };
    let auth = || axum::middleware::from_fn_with_state(state.clone(), auth_middleware);

    // 公开读接口，带响应缓存
    let reads = Router::new()
        .merge(
            Router::new()
                .route("/posts", get(get_posts))
                .route_layer(cached(cache_keys::POSTS_LIST, list_ttl)),
        )
        .merge(
            Router::new()
                .route("/posts/{slug}", get(get_post))
                .route_layer(cached(cache_keys::POST_DETAIL, DETAIL_TTL)),
        )
        .merge(
            Router::new()
                .route("/posts/{slug}/comments", get(get_comments))
                .route_layer(cached(cache_keys::COMMENTS_LIST, list_ttl)),
        )
        .merge(
            Router::new()
                .route("/comments/{comment_id}", get(get_comment))
                .route_layer(cached(cache_keys::COMMENT_DETAIL, DETAIL_TTL)),
        )
        .merge(
            Router::new()
                .route("/comments/{comment_id}/replies", get(get_replies))
                .route_layer(cached(cache_keys::REPLIES_LIST, list_ttl)),
        )
        .merge(
            Router::new()
                .route("/replies/{reply_id}", get(get_reply))
                .route_layer(cached(cache_keys::REPLY_DETAIL, DETAIL_TTL)),
        )
        .merge(
            Router::new()
                .route("/likes/{object_id}", get(get_likes))
                .route_layer(cached(cache_keys::LIKES_LIST, list_ttl)),
        );

    // 需认证的写接口，成功后按模式清缓存；认证层在外，失效层能读到当前用户
    let writes = Router::new()
        .merge(
            Router::new()
                .route("/posts", post(create_post))
                .route_layer(invalidates(invalidation::POST_CREATE))
                .route_layer(auth()),
        )
        .merge(
            Router::new()
                .route("/posts/{slug}", put(update_post).delete(delete_post))
                .route_layer(invalidates(invalidation::POST_MUTATION))
                .route_layer(auth()),
        )
        .merge(
            Router::new()
                .route("/posts/{slug}/comments", post(create_comment))
                .route_layer(invalidates(invalidation::COMMENT_CREATE))
                .route_layer(auth()),
        )
        .merge(
            Router::new()
                .route(
                    "/comments/{comment_id}",
                    put(update_comment).delete(delete_comment),
                )
                .route_layer(invalidates(invalidation::COMMENT_MUTATION))
                .route_layer(auth()),
        )
        .merge(
            Router::new()
                .route("/comments/{comment_id}/replies", post(create_reply))
                .route_layer(invalidates(invalidation::REPLY_CREATE))
                .route_layer(auth()),
        )
        .merge(
            Router::new()
                .route("/replies/{reply_id}", put(update_reply).delete(delete_reply))
                .route_layer(invalidates(invalidation::REPLY_MUTATION))
                .route_layer(auth()),
        )
        .merge(
            Router::new()
                .route("/likes/{object_id}/toggle", get(toggle_like))
                .route_layer(invalidates(invalidation::LIKE_TOGGLE))
                .route_layer(auth()),
        );

    reads.merge(writes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::keys::template_placeholders;

    // 模板里的占位符必须能被对应路由的上下文填充，配置错误在这里暴露
    #[test]
    fn cache_key_templates_only_use_available_params() {
        let cases: &[(&str, &[&str])] = &[
            (cache_keys::POSTS_LIST, &["user_id"]),
            (cache_keys::POST_DETAIL, &["slug", "user_id"]),
            (cache_keys::COMMENTS_LIST, &["slug", "user_id"]),
            (cache_keys::COMMENT_DETAIL, &["comment_id", "user_id"]),
            (cache_keys::REPLIES_LIST, &["comment_id", "user_id"]),
            (cache_keys::REPLY_DETAIL, &["reply_id", "user_id"]),
            (cache_keys::LIKES_LIST, &["object_id", "user_id"]),
        ];
        for (template, available) in cases {
            for placeholder in template_placeholders(template) {
                assert!(
                    available.contains(&placeholder.as_str()),
                    "template '{}' uses unavailable placeholder '{}'",
                    template,
                    placeholder
                );
            }
        }
    }

    #[test]
    fn invalidation_patterns_only_use_available_params() {
        let cases: &[(&[&str], &[&str])] = &[
            (invalidation::POST_CREATE, &["user_id"]),
            (invalidation::POST_MUTATION, &["slug", "user_id"]),
            (invalidation::COMMENT_CREATE, &["slug", "user_id"]),
            (invalidation::COMMENT_MUTATION, &["comment_id", "user_id"]),
            (invalidation::REPLY_CREATE, &["comment_id", "user_id"]),
            (invalidation::REPLY_MUTATION, &["reply_id", "user_id"]),
            (invalidation::LIKE_TOGGLE, &["object_id", "user_id"]),
        ];
        for (patterns, available) in cases {
            for pattern in *patterns {
                for placeholder in template_placeholders(pattern) {
                    assert!(
                        available.contains(&placeholder.as_str()),
                        "pattern '{}' uses unavailable placeholder '{}'",
                        pattern,
                        placeholder
                    );
                }
            }
        }
    }
}
