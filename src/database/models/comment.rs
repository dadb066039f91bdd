use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// 评论实体；parent_id 非空时是对某条评论的回复
#[derive(Debug, Clone, FromRow)]
pub struct CommentEntity {
    pub id: Uuid,
    pub author_id: Uuid,
    pub post_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 评论/回复详情行，附带作者信息与统计数
#[derive(Debug, Clone, FromRow)]
pub struct CommentDetail {
    pub id: Uuid,
    pub author_id: Uuid,
    pub post_id: Uuid,
    pub parent_id: Option<Uuid>,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub author_first_name: String,
    pub author_last_name: String,
    pub author_avatar: Option<String>,
    pub author_social_avatar: Option<String>,
    pub replies_count: i64,
    pub likes_count: i64,
    pub dislikes_count: i64,
}
