use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// 反应记录：post_id 与 comment_id 恰有其一非空
/// is_disliked 为 false 表示赞，true 表示踩
#[derive(Debug, Clone, FromRow)]
pub struct LikeEntity {
    pub id: Uuid,
    pub author_id: Uuid,
    pub post_id: Option<Uuid>,
    pub comment_id: Option<Uuid>,
    pub is_disliked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 反应列表行，附带作者信息
#[derive(Debug, Clone, FromRow)]
pub struct LikeDetail {
    pub id: Uuid,
    pub author_first_name: String,
    pub author_last_name: String,
    pub author_avatar: Option<String>,
    pub author_social_avatar: Option<String>,
    pub is_disliked: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
