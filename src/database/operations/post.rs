use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::post::{PostDetail, PostEntity};

const POST_COLUMNS: &str = "id, author_id, title, slug, text, image, created_at, updated_at";

/// 帖子详情查询的公共部分：作者信息与统计数
const POST_DETAIL_SELECT: &str = "SELECT p.id, p.author_id, p.title, p.slug, p.text, p.image, \
     p.created_at, p.updated_at, \
     u.first_name AS author_first_name, u.last_name AS author_last_name, \
     u.avatar AS author_avatar, u.social_avatar AS author_social_avatar, \
     (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id AND NOT l.is_disliked) AS likes_count, \
     (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id AND l.is_disliked) AS dislikes_count, \
     (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id AND c.parent_id IS NULL) AS comments_count \
     FROM posts p JOIN users u ON u.id = p.author_id";

/// 帖子存储库
pub struct PostOperations;

impl PostOperations {
    /// 帖子列表，可按标题/正文/作者名模糊搜索，按创建时间倒序
    pub async fn list(pool: &PgPool, search: Option<&str>) -> Result<Vec<PostDetail>, sqlx::Error> {
        match search.filter(|s| !s.is_empty()) {
            Some(term) => {
                let pattern = format!("%{}%", term);
                sqlx::query_as::<_, PostDetail>(&format!(
                    "{POST_DETAIL_SELECT} \
                     WHERE p.title ILIKE $1 OR p.text ILIKE $1 \
                        OR u.first_name ILIKE $1 OR u.last_name ILIKE $1 \
                     ORDER BY p.created_at DESC"
                ))
                .bind(pattern)
                .fetch_all(pool)
                .await
            }
            None => {
                sqlx::query_as::<_, PostDetail>(&format!(
                    "{POST_DETAIL_SELECT} ORDER BY p.created_at DESC"
                ))
                .fetch_all(pool)
                .await
            }
        }
    }

    pub async fn find_detail_by_slug(
        pool: &PgPool,
        slug: &str,
    ) -> Result<Option<PostDetail>, sqlx::Error> {
        sqlx::query_as::<_, PostDetail>(&format!("{POST_DETAIL_SELECT} WHERE p.slug = $1"))
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<PostEntity>, sqlx::Error> {
        sqlx::query_as::<_, PostEntity>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<PostEntity>, sqlx::Error> {
        sqlx::query_as::<_, PostEntity>(&format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn slug_exists(pool: &PgPool, slug: &str) -> Result<bool, sqlx::Error> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM posts WHERE slug = $1)")
                .bind(slug)
                .fetch_one(pool)
                .await?;
        Ok(exists.0)
    }

    pub async fn create(
        pool: &PgPool,
        author_id: Uuid,
        title: &str,
        slug: &str,
        text: &str,
    ) -> Result<PostEntity, sqlx::Error> {
        sqlx::query_as::<_, PostEntity>(&format!(
            "INSERT INTO posts (author_id, title, slug, text) VALUES ($1, $2, $3, $4) \
             RETURNING {POST_COLUMNS}"
        ))
        .bind(author_id)
        .bind(title)
        .bind(slug)
        .bind(text)
        .fetch_one(pool)
        .await
    }

    /// 更新标题与正文；slug 创建后保持不变
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        title: &str,
        text: &str,
    ) -> Result<PostEntity, sqlx::Error> {
        sqlx::query_as::<_, PostEntity>(&format!(
            "UPDATE posts SET title = $1, text = $2, updated_at = NOW() WHERE id = $3 \
             RETURNING {POST_COLUMNS}"
        ))
        .bind(title)
        .bind(text)
        .bind(id)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
