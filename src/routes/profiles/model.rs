use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::database::models::user::UserEntity;

#[derive(Debug, Deserialize)]
pub struct UserUpdateRequest {
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub dob: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct ProfileData {
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub dob: Option<NaiveDate>,
    pub avatar_url: Option<String>,
}

impl From<&UserEntity> for ProfileData {
    fn from(user: &UserEntity) -> Self {
        Self {
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            bio: user.bio.clone(),
            dob: user.dob,
            avatar_url: user.avatar_url(),
        }
    }
}
