use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::like::{LikeDetail, LikeEntity};

const LIKE_COLUMNS: &str = "id, author_id, post_id, comment_id, is_disliked, created_at, updated_at";

/// 反应挂载的目标；回复与评论共用 comment_id 列
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeTarget {
    Post(Uuid),
    Comment(Uuid),
}

impl LikeTarget {
    fn column(self) -> &'static str {
        match self {
            LikeTarget::Post(_) => "post_id",
            LikeTarget::Comment(_) => "comment_id",
        }
    }

    fn id(self) -> Uuid {
        match self {
            LikeTarget::Post(id) | LikeTarget::Comment(id) => id,
        }
    }
}

/// 某用户对某目标的当前反应状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionState {
    None,
    Liked,
    Disliked,
}

/// 用户请求的动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionAction {
    Like,
    Dislike,
}

/// 状态机给出的存储层变更
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Create { is_disliked: bool },
    Remove,
    Update { is_disliked: bool },
}

/// 切换结果，决定响应消息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
    Updated,
}

/// 反应切换状态机
/// 重复同一动作删除记录，相反动作翻转 is_disliked，六种组合全部显式覆盖
pub fn next_transition(current: ReactionState, action: ReactionAction) -> Transition {
    match (current, action) {
        (ReactionState::None, ReactionAction::Like) => Transition::Create { is_disliked: false },
        (ReactionState::None, ReactionAction::Dislike) => Transition::Create { is_disliked: true },
        (ReactionState::Liked, ReactionAction::Like) => Transition::Remove,
        (ReactionState::Liked, ReactionAction::Dislike) => Transition::Update { is_disliked: true },
        (ReactionState::Disliked, ReactionAction::Dislike) => Transition::Remove,
        (ReactionState::Disliked, ReactionAction::Like) => Transition::Update { is_disliked: false },
    }
}

/// 反应存储库
/// (author, post) 与 (author, comment) 上的唯一约束是并发切换的兜底，
/// 同一用户并发创建时后写的一方会收到约束冲突而不会产生重复记录
pub struct LikeOperations;

impl LikeOperations {
    pub async fn find_for_target(
        pool: &PgPool,
        author_id: Uuid,
        target: LikeTarget,
    ) -> Result<Option<LikeEntity>, sqlx::Error> {
        sqlx::query_as::<_, LikeEntity>(&format!(
            "SELECT {LIKE_COLUMNS} FROM likes WHERE author_id = $1 AND {} = $2",
            target.column()
        ))
        .bind(author_id)
        .bind(target.id())
        .fetch_optional(pool)
        .await
    }

    /// 执行一次切换并返回结果
    pub async fn toggle(
        pool: &PgPool,
        author_id: Uuid,
        target: LikeTarget,
        is_dislike: bool,
    ) -> Result<ToggleOutcome, sqlx::Error> {
        let existing = Self::find_for_target(pool, author_id, target).await?;
        let current = match &existing {
            None => ReactionState::None,
            Some(like) if like.is_disliked => ReactionState::Disliked,
            Some(_) => ReactionState::Liked,
        };
        let action = if is_dislike {
            ReactionAction::Dislike
        } else {
            ReactionAction::Like
        };

        match next_transition(current, action) {
            Transition::Create { is_disliked } => {
                sqlx::query(&format!(
                    "INSERT INTO likes (author_id, {}, is_disliked) VALUES ($1, $2, $3)",
                    target.column()
                ))
                .bind(author_id)
                .bind(target.id())
                .bind(is_disliked)
                .execute(pool)
                .await?;
                Ok(ToggleOutcome::Added)
            }
            Transition::Remove => {
                let like = existing.expect("remove transition requires an existing record");
                sqlx::query("DELETE FROM likes WHERE id = $1")
                    .bind(like.id)
                    .execute(pool)
                    .await?;
                Ok(ToggleOutcome::Removed)
            }
            Transition::Update { is_disliked } => {
                let like = existing.expect("update transition requires an existing record");
                sqlx::query("UPDATE likes SET is_disliked = $1, updated_at = NOW() WHERE id = $2")
                    .bind(is_disliked)
                    .bind(like.id)
                    .execute(pool)
                    .await?;
                Ok(ToggleOutcome::Updated)
            }
        }
    }

    /// 某目标的反应列表，按 is_dislike 过滤，最新在前
    pub async fn list_for_target(
        pool: &PgPool,
        target: LikeTarget,
        is_dislike: bool,
    ) -> Result<Vec<LikeDetail>, sqlx::Error> {
        sqlx::query_as::<_, LikeDetail>(&format!(
            "SELECT l.id, u.first_name AS author_first_name, u.last_name AS author_last_name, \
             u.avatar AS author_avatar, u.social_avatar AS author_social_avatar, \
             l.is_disliked, l.created_at, l.updated_at \
             FROM likes l JOIN users u ON u.id = l.author_id \
             WHERE l.{} = $1 AND l.is_disliked = $2 \
             ORDER BY l.created_at DESC",
            target.column()
        ))
        .bind(target.id())
        .bind(is_dislike)
        .fetch_all(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 对纯状态机按顺序施加动作，返回最终状态
    fn run(actions: &[ReactionAction]) -> ReactionState {
        let mut state = ReactionState::None;
        for action in actions {
            state = match next_transition(state, *action) {
                Transition::Create { is_disliked } | Transition::Update { is_disliked } => {
                    if is_disliked {
                        ReactionState::Disliked
                    } else {
                        ReactionState::Liked
                    }
                }
                Transition::Remove => ReactionState::None,
            };
        }
        state
    }

    #[test]
    fn all_six_transitions_are_defined() {
        assert_eq!(
            next_transition(ReactionState::None, ReactionAction::Like),
            Transition::Create { is_disliked: false }
        );
        assert_eq!(
            next_transition(ReactionState::None, ReactionAction::Dislike),
            Transition::Create { is_disliked: true }
        );
        assert_eq!(
            next_transition(ReactionState::Liked, ReactionAction::Like),
            Transition::Remove
        );
        assert_eq!(
            next_transition(ReactionState::Liked, ReactionAction::Dislike),
            Transition::Update { is_disliked: true }
        );
        assert_eq!(
            next_transition(ReactionState::Disliked, ReactionAction::Dislike),
            Transition::Remove
        );
        assert_eq!(
            next_transition(ReactionState::Disliked, ReactionAction::Like),
            Transition::Update { is_disliked: false }
        );
    }

    #[test]
    fn repeated_action_is_a_net_noop() {
        use ReactionAction::*;
        assert_eq!(run(&[Like, Like]), ReactionState::None);
        assert_eq!(run(&[Dislike, Dislike]), ReactionState::None);
    }

    #[test]
    fn switching_then_repeating_removes() {
        use ReactionAction::*;
        assert_eq!(run(&[Like, Dislike, Dislike]), ReactionState::None);
        assert_eq!(run(&[Dislike, Like, Like]), ReactionState::None);
    }

    #[test]
    fn switching_back_restores_like() {
        use ReactionAction::*;
        assert_eq!(run(&[Like, Dislike, Like]), ReactionState::Liked);
    }

    #[test]
    fn long_sequences_stay_in_the_three_states() {
        use ReactionAction::*;
        assert_eq!(run(&[Like, Dislike, Like, Like, Dislike]), ReactionState::Disliked);
        assert_eq!(run(&[Dislike, Dislike, Dislike]), ReactionState::Disliked);
    }
}
