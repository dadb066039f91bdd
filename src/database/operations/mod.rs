pub mod comment;
pub mod jwt;
pub mod like;
pub mod post;
pub mod user;

pub use comment::CommentOperations;
pub use jwt::JwtOperations;
pub use like::{LikeOperations, LikeTarget, ToggleOutcome};
pub use post::PostOperations;
pub use user::UserOperations;

/// 列表接口的排序方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}
