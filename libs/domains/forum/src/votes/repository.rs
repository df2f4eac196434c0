use async_trait::async_trait;

use super::models::{NewVote, Vote, VoteTally, VoteTarget};
use crate::error::ForumResult;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// The target must be live (`NotFound`). A second vote by the same user on the same
    /// target is a `ConstraintViolation` raised by storage.
    async fn create_vote(&self, input: NewVote) -> ForumResult<Vote>;

    /// `NotFound` when the target is missing or deleted
    async fn tally(&self, target: VoteTarget) -> ForumResult<VoteTally>;
}
