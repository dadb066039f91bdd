use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::{CommentDetail, LikeDetail, PostDetail};
use crate::database::operations::SortOrder;
use crate::error::AppError;
use crate::pagination::PageMeta;

// 请求

#[derive(Debug, Deserialize)]
pub struct PostCreateRequest {
    pub title: String,
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct CommentCreateRequest {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct PostsQuery {
    #[serde(default = "crate::routes::blog::model::default_page")]
    pub page: u32,
    #[serde(default = "crate::routes::blog::model::default_limit")]
    pub limit: u32,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SortedPageQuery {
    #[serde(default = "crate::routes::blog::model::default_page")]
    pub page: u32,
    #[serde(default = "crate::routes::blog::model::default_limit")]
    pub limit: u32,
    pub sort: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LikesQuery {
    #[serde(default = "crate::routes::blog::model::default_page")]
    pub page: u32,
    #[serde(default = "crate::routes::blog::model::default_limit")]
    pub limit: u32,
    pub data_type: Option<String>,
    #[serde(default)]
    pub is_dislike: bool,
}

#[derive(Debug, Deserialize)]
pub struct ToggleQuery {
    pub data_type: Option<String>,
    #[serde(default)]
    pub is_dislike: bool,
}

pub(crate) fn default_page() -> u32 {
    1
}

pub(crate) fn default_limit() -> u32 {
    crate::pagination::DEFAULT_PER_PAGE
}

/// 反应目标的种类；回复与评论同表但在API层是不同目标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Post,
    Comment,
    Reply,
}

pub fn parse_data_type(value: Option<&str>) -> Result<DataType, AppError> {
    match value {
        Some("post") => Ok(DataType::Post),
        Some("comment") => Ok(DataType::Comment),
        Some("reply") => Ok(DataType::Reply),
        _ => Err(AppError::invalid_query_param(
            "data_type must be either 'post', 'comment' or 'reply'",
        )),
    }
}

pub fn parse_sort(value: Option<&str>) -> Result<SortOrder, AppError> {
    match value {
        None => Ok(SortOrder::Desc),
        Some("asc") => Ok(SortOrder::Asc),
        Some("desc") => Ok(SortOrder::Desc),
        Some(_) => Err(AppError::invalid_query_param(
            "Sort must be either 'asc' or 'desc'",
        )),
    }
}

// 响应

#[derive(Debug, Serialize)]
pub struct AuthorData {
    pub name: String,
    pub avatar: Option<String>,
}

impl AuthorData {
    pub fn new(
        first_name: &str,
        last_name: &str,
        avatar: Option<&str>,
        social_avatar: Option<&str>,
    ) -> Self {
        Self {
            name: format!("{} {}", first_name, last_name),
            avatar: avatar
                .map(str::to_string)
                .or_else(|| social_avatar.map(str::to_string)),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostData {
    pub id: Uuid,
    pub author: AuthorData,
    pub title: String,
    pub slug: String,
    pub text: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub likes_count: i64,
    pub dislikes_count: i64,
    pub comments_count: i64,
}

impl From<PostDetail> for PostData {
    fn from(row: PostDetail) -> Self {
        Self {
            id: row.id,
            author: AuthorData::new(
                &row.author_first_name,
                &row.author_last_name,
                row.author_avatar.as_deref(),
                row.author_social_avatar.as_deref(),
            ),
            title: row.title,
            slug: row.slug,
            text: row.text,
            image: row.image,
            created_at: row.created_at,
            updated_at: row.updated_at,
            likes_count: row.likes_count,
            dislikes_count: row.dislikes_count,
            comments_count: row.comments_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommentData {
    pub id: Uuid,
    pub author: AuthorData,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub replies_count: i64,
    pub likes_count: i64,
    pub dislikes_count: i64,
}

impl From<CommentDetail> for CommentData {
    fn from(row: CommentDetail) -> Self {
        Self {
            id: row.id,
            author: AuthorData::new(
                &row.author_first_name,
                &row.author_last_name,
                row.author_avatar.as_deref(),
                row.author_social_avatar.as_deref(),
            ),
            text: row.text,
            created_at: row.created_at,
            updated_at: row.updated_at,
            replies_count: row.replies_count,
            likes_count: row.likes_count,
            dislikes_count: row.dislikes_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReplyData {
    pub id: Uuid,
    pub author: AuthorData,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub likes_count: i64,
    pub dislikes_count: i64,
}

impl From<CommentDetail> for ReplyData {
    fn from(row: CommentDetail) -> Self {
        Self {
            id: row.id,
            author: AuthorData::new(
                &row.author_first_name,
                &row.author_last_name,
                row.author_avatar.as_deref(),
                row.author_social_avatar.as_deref(),
            ),
            text: row.text,
            created_at: row.created_at,
            updated_at: row.updated_at,
            likes_count: row.likes_count,
            dislikes_count: row.dislikes_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LikeData {
    pub id: Uuid,
    pub author: AuthorData,
    pub is_disliked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LikeDetail> for LikeData {
    fn from(row: LikeDetail) -> Self {
        Self {
            id: row.id,
            author: AuthorData::new(
                &row.author_first_name,
                &row.author_last_name,
                row.author_avatar.as_deref(),
                row.author_social_avatar.as_deref(),
            ),
            is_disliked: row.is_disliked,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaginatedPostsData {
    pub posts: Vec<PostData>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct PaginatedCommentsData {
    pub comments: Vec<CommentData>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct PaginatedRepliesData {
    pub replies: Vec<ReplyData>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct PaginatedLikesData {
    pub likes_or_dislikes: Vec<LikeData>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_type_accepts_the_three_kinds() {
        assert_eq!(parse_data_type(Some("post")).unwrap(), DataType::Post);
        assert_eq!(parse_data_type(Some("comment")).unwrap(), DataType::Comment);
        assert_eq!(parse_data_type(Some("reply")).unwrap(), DataType::Reply);
    }

    #[test]
    fn data_type_rejects_unknown_values() {
        let err = parse_data_type(Some("invalid")).unwrap_err();
        assert_eq!(
            err.message,
            "data_type must be either 'post', 'comment' or 'reply'"
        );
        assert!(parse_data_type(None).is_err());
    }

    #[test]
    fn sort_defaults_to_desc() {
        assert_eq!(parse_sort(None).unwrap(), SortOrder::Desc);
        assert_eq!(parse_sort(Some("asc")).unwrap(), SortOrder::Asc);
        assert_eq!(parse_sort(Some("desc")).unwrap(), SortOrder::Desc);
    }

    #[test]
    fn sort_rejects_unknown_values() {
        let err = parse_sort(Some("invalid")).unwrap_err();
        assert_eq!(err.message, "Sort must be either 'asc' or 'desc'");
    }

    #[test]
    fn author_prefers_uploaded_avatar() {
        let author = AuthorData::new("John", "Doe", Some("/avatars/a.png"), Some("http://g"));
        assert_eq!(author.name, "John Doe");
        assert_eq!(author.avatar.as_deref(), Some("/avatars/a.png"));

        let fallback = AuthorData::new("John", "Doe", None, Some("http://g"));
        assert_eq!(fallback.avatar.as_deref(), Some("http://g"));
    }

    #[test]
    fn paginated_posts_flatten_page_meta() {
        let data = PaginatedPostsData {
            posts: vec![],
            meta: crate::pagination::PageMeta {
                total: 0,
                per_page: 50,
                current_page: 1,
                last_page: 1,
            },
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["total"], 0);
        assert_eq!(json["per_page"], 50);
        assert_eq!(json["posts"], serde_json::json!([]));
    }
}
