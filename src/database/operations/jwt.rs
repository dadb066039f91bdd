use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::user::JwtEntity;

const JWT_COLUMNS: &str = "id, user_id, access, refresh, created_at, updated_at";

/// 令牌对存储库
pub struct JwtOperations;

impl JwtOperations {
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        access: &str,
        refresh: &str,
    ) -> Result<JwtEntity, sqlx::Error> {
        sqlx::query_as::<_, JwtEntity>(&format!(
            "INSERT INTO jwts (user_id, access, refresh) VALUES ($1, $2, $3) \
             RETURNING {JWT_COLUMNS}"
        ))
        .bind(user_id)
        .bind(access)
        .bind(refresh)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_user_and_access(
        pool: &PgPool,
        user_id: Uuid,
        access: &str,
    ) -> Result<Option<JwtEntity>, sqlx::Error> {
        sqlx::query_as::<_, JwtEntity>(&format!(
            "SELECT {JWT_COLUMNS} FROM jwts WHERE user_id = $1 AND access = $2"
        ))
        .bind(user_id)
        .bind(access)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_refresh(
        pool: &PgPool,
        refresh: &str,
    ) -> Result<Option<JwtEntity>, sqlx::Error> {
        sqlx::query_as::<_, JwtEntity>(&format!(
            "SELECT {JWT_COLUMNS} FROM jwts WHERE refresh = $1"
        ))
        .bind(refresh)
        .fetch_optional(pool)
        .await
    }

    /// 刷新时就地替换令牌对，旧令牌随之失效
    pub async fn update_pair(
        pool: &PgPool,
        id: Uuid,
        access: &str,
        refresh: &str,
    ) -> Result<JwtEntity, sqlx::Error> {
        sqlx::query_as::<_, JwtEntity>(&format!(
            "UPDATE jwts SET access = $1, refresh = $2, updated_at = NOW() WHERE id = $3 \
             RETURNING {JWT_COLUMNS}"
        ))
        .bind(access)
        .bind(refresh)
        .bind(id)
        .fetch_one(pool)
        .await
    }

    pub async fn delete_by_user_and_access(
        pool: &PgPool,
        user_id: Uuid,
        access: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM jwts WHERE user_id = $1 AND access = $2")
            .bind(user_id)
            .bind(access)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn delete_all_for_user(pool: &PgPool, user_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM jwts WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
