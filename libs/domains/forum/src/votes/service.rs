use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::models::{CreateVote, NewVote, Vote, VoteTally, VoteTarget};
use super::repository::VoteRepository;
use crate::caller::Caller;
use crate::error::{ForumError, ForumResult};

#[derive(Clone)]
pub struct VoteService<R: VoteRepository> {
    repository: Arc<R>,
}

impl<R: VoteRepository> VoteService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    pub fn from_shared(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Duplicates are not pre-checked; the store's uniqueness rule rejects them.
    pub async fn create_vote(&self, caller: &Caller, input: CreateVote) -> ForumResult<Vote> {
        input
            .validate()
            .map_err(|e| ForumError::BadRequest(e.to_string()))?;

        self.repository
            .create_vote(NewVote {
                id: Uuid::now_v7(),
                user_id: caller.id,
                target: input.target(),
                value: input.value,
            })
            .await
    }

    pub async fn tally(&self, target: VoteTarget) -> ForumResult<VoteTally> {
        self.repository.tally(target).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::votes::models::VoteTargetType;
    use crate::votes::repository::MockVoteRepository;
    use chrono::Utc;

    #[tokio::test]
    async fn test_create_vote_maps_target() {
        let voter = Uuid::now_v7();
        let post_id = Uuid::now_v7();

        let mut repo = MockVoteRepository::new();
        repo.expect_create_vote()
            .withf(move |v| v.user_id == voter && v.target == VoteTarget::Post(post_id))
            .times(1)
            .returning(|v| {
                Ok(Vote {
                    id: v.id,
                    user_id: v.user_id,
                    target_type: v.target.target_type(),
                    target_id: v.target.id(),
                    value: v.value,
                    created_at: Utc::now(),
                })
            });

        let vote = VoteService::new(repo)
            .create_vote(
                &Caller::user(voter),
                CreateVote {
                    target_type: VoteTargetType::Post,
                    target_id: post_id,
                    value: -1,
                },
            )
            .await
            .unwrap();

        assert_eq!(vote.value, -1);
        assert_eq!(vote.target(), VoteTarget::Post(post_id));
    }

    #[tokio::test]
    async fn test_out_of_range_value_is_bad_request() {
        let mut repo = MockVoteRepository::new();
        repo.expect_create_vote().never();

        let result = VoteService::new(repo)
            .create_vote(
                &Caller::user(Uuid::now_v7()),
                CreateVote {
                    target_type: VoteTargetType::Comment,
                    target_id: Uuid::now_v7(),
                    value: 5,
                },
            )
            .await;

        assert!(matches!(result, Err(ForumError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_duplicate_surfaces_constraint_violation() {
        let mut repo = MockVoteRepository::new();
        repo.expect_create_vote()
            .returning(|_| Err(ForumError::ConstraintViolation("Already voted".into())));

        let result = VoteService::new(repo)
            .create_vote(
                &Caller::user(Uuid::now_v7()),
                CreateVote {
                    target_type: VoteTargetType::Post,
                    target_id: Uuid::now_v7(),
                    value: 1,
                },
            )
            .await;

        assert!(matches!(result, Err(ForumError::ConstraintViolation(_))));
    }
}
