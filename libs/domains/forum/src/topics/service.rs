use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::models::{CreateTopic, Topic, UpdateTopic};
use super::repository::TopicRepository;
use crate::caller::Caller;
use crate::error::{ForumError, ForumResult};
use crate::lifecycle::LiveOrNotFound;
use crate::users::Author;

#[derive(Clone)]
pub struct TopicService<R: TopicRepository> {
    repository: Arc<R>,
}

impl<R: TopicRepository> TopicService<R> {
    pub fn new(repository: R) -> Self {
        Self::from_shared(Arc::new(repository))
    }

    pub fn from_shared(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Any authenticated caller may open a topic
    pub async fn create_topic(&self, caller: &Caller, input: CreateTopic) -> ForumResult<Topic> {
        input
            .validate()
            .map_err(|e| ForumError::BadRequest(e.to_string()))?;

        let topic = self.repository.create_topic(Topic::new(input)).await?;
        tracing::debug!(topic_id = %topic.id, created_by = %caller.id, "Topic opened");
        Ok(topic)
    }

    pub async fn get_topic(&self, id: Uuid) -> ForumResult<Topic> {
        self.repository
            .get_topic(id)
            .await?
            .live_or_not_found("Topic", id)
    }

    pub async fn list_topics(&self) -> ForumResult<Vec<Topic>> {
        self.repository.list_topics().await
    }

    pub async fn update_topic(
        &self,
        caller: &Caller,
        id: Uuid,
        input: UpdateTopic,
    ) -> ForumResult<Topic> {
        input
            .validate()
            .map_err(|e| ForumError::BadRequest(e.to_string()))?;

        let topic = self.get_topic(id).await?;
        self.ensure_can_manage(caller, &topic).await?;

        if input.is_empty() {
            return Ok(topic);
        }

        self.repository
            .update_topic(id, input)
            .await?
            .ok_or_else(|| ForumError::not_found("Topic", id))
    }

    pub async fn delete_topic(&self, caller: &Caller, id: Uuid) -> ForumResult<()> {
        let topic = self.get_topic(id).await?;
        self.ensure_can_manage(caller, &topic).await?;

        if !self.repository.soft_delete_topic(id).await? {
            return Err(ForumError::not_found("Topic", id));
        }
        Ok(())
    }

    pub async fn list_moderators(&self, topic_id: Uuid) -> ForumResult<Vec<Author>> {
        self.get_topic(topic_id).await?;
        self.repository.list_moderators(topic_id).await
    }

    pub async fn add_moderator(
        &self,
        caller: &Caller,
        topic_id: Uuid,
        user_id: Uuid,
    ) -> ForumResult<()> {
        ensure_sys_admin(caller)?;
        self.get_topic(topic_id).await?;
        self.repository.add_moderator(topic_id, user_id).await
    }

    pub async fn remove_moderator(
        &self,
        caller: &Caller,
        topic_id: Uuid,
        user_id: Uuid,
    ) -> ForumResult<()> {
        ensure_sys_admin(caller)?;
        self.get_topic(topic_id).await?;

        if !self.repository.remove_moderator(topic_id, user_id).await? {
            return Err(ForumError::not_found("Moderator", user_id));
        }
        Ok(())
    }

    /// sys_admin, or a moderator of this topic
    async fn ensure_can_manage(&self, caller: &Caller, topic: &Topic) -> ForumResult<()> {
        if caller.is_sys_admin() || self.repository.is_moderator(topic.id, caller.id).await? {
            return Ok(());
        }

        Err(ForumError::Unauthorized(
            "Only administrators and topic moderators can manage a topic".to_string(),
        ))
    }
}

fn ensure_sys_admin(caller: &Caller) -> ForumResult<()> {
    if caller.is_sys_admin() {
        Ok(())
    } else {
        Err(ForumError::Unauthorized(
            "Only administrators can change topic moderators".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::Lifecycle;
    use crate::topics::repository::MockTopicRepository;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn tech() -> Topic {
        Topic::new(CreateTopic {
            slug: "tech".into(),
            title: "Technology".into(),
            description: "Tech News & Programming".into(),
        })
    }

    fn repo_with(topic: &Topic) -> MockTopicRepository {
        let mut repo = MockTopicRepository::new();
        let stored = topic.clone();
        repo.expect_get_topic()
            .with(eq(topic.id))
            .returning(move |_| Ok(Some(Lifecycle::Live(stored.clone()))));
        repo
    }

    #[tokio::test]
    async fn test_update_requires_admin_or_moderator() {
        let topic = tech();
        let moderator = Uuid::now_v7();

        let mut repo = repo_with(&topic);
        repo.expect_is_moderator()
            .returning(move |_, user_id| Ok(user_id == moderator));
        repo.expect_update_topic().times(2).returning(|id, input| {
            let mut topic = tech();
            topic.id = id;
            topic.apply_update(input);
            Ok(Some(topic))
        });
        let service = TopicService::new(repo);

        let input = UpdateTopic {
            title: Some("Tech".into()),
            description: None,
        };

        let err = service
            .update_topic(&Caller::user(Uuid::now_v7()), topic.id, input.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, ForumError::Unauthorized(_)));

        let updated = service
            .update_topic(&Caller::user(moderator), topic.id, input.clone())
            .await
            .unwrap();
        assert_eq!(updated.title, "Tech");

        service
            .update_topic(&Caller::sys_admin(Uuid::now_v7()), topic.id, input)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_deleted_topic_is_not_found() {
        let topic = tech();
        let mut repo = MockTopicRepository::new();
        let stored = topic.clone();
        repo.expect_get_topic().returning(move |_| {
            Ok(Some(Lifecycle::Deleted {
                record: stored.clone(),
                deleted_at: Utc::now(),
            }))
        });
        repo.expect_soft_delete_topic().never();

        let err = TopicService::new(repo)
            .delete_topic(&Caller::sys_admin(Uuid::now_v7()), topic.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ForumError::NotFound { entity: "Topic", .. }));
    }

    #[tokio::test]
    async fn test_moderator_management_is_admin_only() {
        let topic = tech();
        let user_id = Uuid::now_v7();

        let mut repo = repo_with(&topic);
        repo.expect_add_moderator()
            .with(eq(topic.id), eq(user_id))
            .times(1)
            .returning(|_, _| Ok(()));
        let service = TopicService::new(repo);

        let err = service
            .add_moderator(&Caller::user(user_id), topic.id, user_id)
            .await
            .unwrap_err();
        assert!(matches!(err, ForumError::Unauthorized(_)));

        service
            .add_moderator(&Caller::sys_admin(Uuid::now_v7()), topic.id, user_id)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_create_topic_rejects_bad_slug() {
        let mut repo = MockTopicRepository::new();
        repo.expect_create_topic().never();

        let err = TopicService::new(repo)
            .create_topic(
                &Caller::user(Uuid::now_v7()),
                CreateTopic {
                    slug: "Not A Slug".into(),
                    title: "x".into(),
                    description: String::new(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ForumError::BadRequest(_)));
    }
}
