pub use sea_orm_migration::prelude::*;

mod m20261001_000000_bootstrap;
mod m20261001_000001_create_users;
mod m20261001_000002_create_topics;
mod m20261001_000003_create_posts;
mod m20261001_000004_create_comments;
mod m20261001_000005_create_votes;
mod m20261001_000006_seed_topics;

pub use m20261001_000006_seed_topics::{SEED_TOPICS, seed_topics};

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000000_bootstrap::Migration),
            Box::new(m20261001_000001_create_users::Migration),
            Box::new(m20261001_000002_create_topics::Migration),
            Box::new(m20261001_000003_create_posts::Migration),
            Box::new(m20261001_000004_create_comments::Migration),
            Box::new(m20261001_000005_create_votes::Migration),
            Box::new(m20261001_000006_seed_topics::Migration),
        ]
    }
}
