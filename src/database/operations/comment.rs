use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::comment::{CommentDetail, CommentEntity};
use crate::database::operations::SortOrder;

const COMMENT_COLUMNS: &str = "id, author_id, post_id, parent_id, text, created_at, updated_at";

const COMMENT_DETAIL_SELECT: &str = "SELECT c.id, c.author_id, c.post_id, c.parent_id, c.text, \
     c.created_at, c.updated_at, \
     u.first_name AS author_first_name, u.last_name AS author_last_name, \
     u.avatar AS author_avatar, u.social_avatar AS author_social_avatar, \
     (SELECT COUNT(*) FROM comments r WHERE r.parent_id = c.id) AS replies_count, \
     (SELECT COUNT(*) FROM likes l WHERE l.comment_id = c.id AND NOT l.is_disliked) AS likes_count, \
     (SELECT COUNT(*) FROM likes l WHERE l.comment_id = c.id AND l.is_disliked) AS dislikes_count \
     FROM comments c JOIN users u ON u.id = c.author_id";

/// 评论存储库；回复与评论同表存储，靠 parent_id 区分
pub struct CommentOperations;

impl CommentOperations {
    /// 某帖子的顶层评论列表
    pub async fn list_for_post(
        pool: &PgPool,
        post_id: Uuid,
        sort: SortOrder,
    ) -> Result<Vec<CommentDetail>, sqlx::Error> {
        sqlx::query_as::<_, CommentDetail>(&format!(
            "{COMMENT_DETAIL_SELECT} \
             WHERE c.post_id = $1 AND c.parent_id IS NULL \
             ORDER BY c.created_at {}",
            sort.as_sql()
        ))
        .bind(post_id)
        .fetch_all(pool)
        .await
    }

    /// 某条评论下的回复列表
    pub async fn list_replies(
        pool: &PgPool,
        parent_id: Uuid,
        sort: SortOrder,
    ) -> Result<Vec<CommentDetail>, sqlx::Error> {
        sqlx::query_as::<_, CommentDetail>(&format!(
            "{COMMENT_DETAIL_SELECT} \
             WHERE c.parent_id = $1 \
             ORDER BY c.created_at {}",
            sort.as_sql()
        ))
        .bind(parent_id)
        .fetch_all(pool)
        .await
    }

    pub async fn detail_by_id(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<CommentDetail>, sqlx::Error> {
        sqlx::query_as::<_, CommentDetail>(&format!("{COMMENT_DETAIL_SELECT} WHERE c.id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// 按顶层评论查找；回复走 find_reply，两个接口面互不可见
    pub async fn find_comment(
        pool: &PgPool,
        id: Uuid,
    ) -> Result<Option<CommentEntity>, sqlx::Error> {
        sqlx::query_as::<_, CommentEntity>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1 AND parent_id IS NULL"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_reply(pool: &PgPool, id: Uuid) -> Result<Option<CommentEntity>, sqlx::Error> {
        sqlx::query_as::<_, CommentEntity>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1 AND parent_id IS NOT NULL"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &PgPool,
        author_id: Uuid,
        post_id: Uuid,
        parent_id: Option<Uuid>,
        text: &str,
    ) -> Result<CommentEntity, sqlx::Error> {
        sqlx::query_as::<_, CommentEntity>(&format!(
            "INSERT INTO comments (author_id, post_id, parent_id, text) VALUES ($1, $2, $3, $4) \
             RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(author_id)
        .bind(post_id)
        .bind(parent_id)
        .bind(text)
        .fetch_one(pool)
        .await
    }

    pub async fn update_text(
        pool: &PgPool,
        id: Uuid,
        text: &str,
    ) -> Result<CommentEntity, sqlx::Error> {
        sqlx::query_as::<_, CommentEntity>(&format!(
            "UPDATE comments SET text = $1, updated_at = NOW() WHERE id = $2 \
             RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(text)
        .bind(id)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
