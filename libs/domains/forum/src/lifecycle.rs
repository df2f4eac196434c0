use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{ForumError, ForumResult};

/// A stored row together with its soft-delete state.
///
/// Single-row lookups return this instead of silently hiding deleted rows, so callers
/// decide whether a deleted record counts as absent.
#[derive(Debug, Clone, PartialEq)]
pub enum Lifecycle<T> {
    Live(T),
    Deleted { record: T, deleted_at: DateTime<Utc> },
}

impl<T> Lifecycle<T> {
    pub fn from_parts(record: T, deleted_at: Option<DateTime<Utc>>) -> Self {
        match deleted_at {
            Some(deleted_at) => Self::Deleted { record, deleted_at },
            None => Self::Live(record),
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live(_))
    }

    pub fn record(&self) -> &T {
        match self {
            Self::Live(record) | Self::Deleted { record, .. } => record,
        }
    }

    pub fn live(self) -> Option<T> {
        match self {
            Self::Live(record) => Some(record),
            Self::Deleted { .. } => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lifecycle<U> {
        match self {
            Self::Live(record) => Lifecycle::Live(f(record)),
            Self::Deleted { record, deleted_at } => Lifecycle::Deleted {
                record: f(record),
                deleted_at,
            },
        }
    }
}

/// Collapses a lookup result: absent and soft-deleted are both `NotFound`.
pub(crate) trait LiveOrNotFound<T> {
    fn live_or_not_found(self, entity: &'static str, id: Uuid) -> ForumResult<T>;
}

impl<T> LiveOrNotFound<T> for Option<Lifecycle<T>> {
    fn live_or_not_found(self, entity: &'static str, id: Uuid) -> ForumResult<T> {
        self.and_then(Lifecycle::live)
            .ok_or_else(|| ForumError::not_found(entity, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts() {
        assert!(Lifecycle::from_parts(1, None).is_live());

        let deleted = Lifecycle::from_parts(1, Some(Utc::now()));
        assert!(!deleted.is_live());
        assert_eq!(*deleted.record(), 1);
        assert_eq!(deleted.live(), None);
    }

    #[test]
    fn test_deleted_is_not_found() {
        let id = Uuid::now_v7();
        let lookup = Some(Lifecycle::from_parts("post", Some(Utc::now())));

        let err = lookup.live_or_not_found("Post", id).unwrap_err();
        assert!(matches!(err, ForumError::NotFound { entity: "Post", .. }));

        let missing: Option<Lifecycle<&str>> = None;
        assert!(missing.live_or_not_found("Post", id).is_err());
    }
}
