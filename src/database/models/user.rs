use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// 用户实体
#[derive(Debug, Clone, FromRow)]
pub struct UserEntity {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub avatar: Option<String>,
    pub social_avatar: Option<String>,
    pub bio: Option<String>,
    pub dob: Option<NaiveDate>,
    pub is_email_verified: bool,
    pub is_active: bool,
    pub otp_code: Option<i32>,
    pub otp_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserEntity {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// 上传头像优先，其次是第三方登录带来的头像
    pub fn avatar_url(&self) -> Option<String> {
        self.avatar
            .clone()
            .or_else(|| self.social_avatar.clone())
    }

    pub fn is_otp_expired(&self) -> bool {
        match self.otp_expires_at {
            Some(expires_at) => Utc::now() > expires_at,
            None => true,
        }
    }
}

/// 已签发的访问/刷新令牌对，登出时删除对应记录即可使令牌失效
#[derive(Debug, Clone, FromRow)]
pub struct JwtEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub access: String,
    pub refresh: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
