use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// 帖子实体
#[derive(Debug, Clone, FromRow)]
pub struct PostEntity {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub text: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 帖子详情行，附带作者信息与统计数
#[derive(Debug, Clone, FromRow)]
pub struct PostDetail {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub text: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_first_name: String,
    pub author_last_name: String,
    pub author_avatar: Option<String>,
    pub author_social_avatar: Option<String>,
    pub likes_count: i64,
    pub dislikes_count: i64,
    pub comments_count: i64,
}
