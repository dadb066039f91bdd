use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::user::UserEntity;

const USER_COLUMNS: &str = "id, first_name, last_name, email, password_hash, avatar, \
     social_avatar, bio, dob, is_email_verified, is_active, otp_code, otp_expires_at, \
     created_at, updated_at";

/// 用户存储库
pub struct UserOperations;

impl UserOperations {
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserEntity>, sqlx::Error> {
        sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<UserEntity>, sqlx::Error> {
        sqlx::query_as::<_, UserEntity>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &PgPool,
        first_name: &str,
        last_name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<UserEntity, sqlx::Error> {
        sqlx::query_as::<_, UserEntity>(&format!(
            "INSERT INTO users (first_name, last_name, email, password_hash) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .await
    }

    /// 创建第三方登录用户，邮箱直接视为已验证
    pub async fn create_verified(
        pool: &PgPool,
        first_name: &str,
        last_name: &str,
        email: &str,
        password_hash: &str,
        social_avatar: Option<&str>,
    ) -> Result<UserEntity, sqlx::Error> {
        sqlx::query_as::<_, UserEntity>(&format!(
            "INSERT INTO users (first_name, last_name, email, password_hash, social_avatar, is_email_verified) \
             VALUES ($1, $2, $3, $4, $5, TRUE) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .bind(password_hash)
        .bind(social_avatar)
        .fetch_one(pool)
        .await
    }

    pub async fn set_otp(
        pool: &PgPool,
        id: Uuid,
        otp_code: i32,
        otp_expires_at: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET otp_code = $1, otp_expires_at = $2, updated_at = NOW() WHERE id = $3",
        )
        .bind(otp_code)
        .bind(otp_expires_at)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// 邮箱验证通过：置位并清除OTP
    pub async fn mark_email_verified(pool: &PgPool, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET is_email_verified = TRUE, otp_code = NULL, otp_expires_at = NULL, \
             updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn set_password(
        pool: &PgPool,
        id: Uuid,
        password_hash: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET password_hash = $1, otp_code = NULL, otp_expires_at = NULL, \
             updated_at = NOW() WHERE id = $2",
        )
        .bind(password_hash)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn update_profile(
        pool: &PgPool,
        id: Uuid,
        first_name: &str,
        last_name: &str,
        bio: Option<&str>,
        dob: Option<NaiveDate>,
    ) -> Result<UserEntity, sqlx::Error> {
        sqlx::query_as::<_, UserEntity>(&format!(
            "UPDATE users SET first_name = $1, last_name = $2, bio = $3, dob = $4, \
             updated_at = NOW() WHERE id = $5 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(first_name)
        .bind(last_name)
        .bind(bio)
        .bind(dob)
        .bind(id)
        .fetch_one(pool)
        .await
    }
}
