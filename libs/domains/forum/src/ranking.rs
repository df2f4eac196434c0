//! Post feed ordering: chronological browsing or similarity to a search embedding.

use chrono::{DateTime, Utc};
use domain_embeddings::Embedding;
use serde::Deserialize;
use std::cmp::Ordering;
use utoipa::IntoParams;
use uuid::Uuid;

/// Maximum number of posts a similarity search returns.
pub const SIMILARITY_PAGE_SIZE: usize = 10;

/// Distance assigned when cosine distance is undefined (zero or non-finite vectors).
pub const MAX_COSINE_DISTANCE: f32 = 2.0;

/// Query string of the post feed
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FeedQuery {
    /// Free-text search; when present the feed is ranked by semantic similarity
    pub search: Option<String>,
    /// Restrict the feed to one topic
    pub topic_id: Option<Uuid>,
}

impl FeedQuery {
    /// The search text, if it has any non-whitespace content.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeedOrder {
    /// Newest first, unbounded
    Chronological,
    /// Ascending cosine distance to the embedding, at most [`SIMILARITY_PAGE_SIZE`]
    Similarity(Embedding),
}

impl FeedOrder {
    pub fn limit(&self) -> Option<usize> {
        match self {
            Self::Chronological => None,
            Self::Similarity(_) => Some(SIMILARITY_PAGE_SIZE),
        }
    }
}

/// `1 - cos(a, b)`, in `[0, 2]`.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return MAX_COSINE_DISTANCE;
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denominator = norm_a.sqrt() * norm_b.sqrt();
    if denominator == 0.0 || !denominator.is_finite() || !dot.is_finite() {
        return MAX_COSINE_DISTANCE;
    }

    (1.0 - dot / denominator).clamp(0.0, f64::from(MAX_COSINE_DISTANCE)) as f32
}

/// A candidate for similarity ranking. `distance` is None for posts without an embedding.
#[derive(Debug)]
pub struct Scored<T> {
    pub distance: Option<f32>,
    pub created_at: DateTime<Utc>,
    pub item: T,
}

/// Orders by ascending distance, unembedded last, ties newest first; keeps `limit`.
pub fn rank_by_distance<T>(mut candidates: Vec<Scored<T>>, limit: usize) -> Vec<T> {
    candidates.sort_by(|a, b| {
        compare_distance(a.distance, b.distance).then_with(|| b.created_at.cmp(&a.created_at))
    });

    candidates
        .into_iter()
        .take(limit)
        .map(|candidate| candidate.item)
        .collect()
}

fn compare_distance(a: Option<f32>, b: Option<f32>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_cosine_distance_basics() {
        assert!(cosine_distance(&[1.0, 0.0], &[1.0, 0.0]).abs() < 1e-6);
        assert!((cosine_distance(&[1.0, 0.0], &[0.0, 1.0]) - 1.0).abs() < 1e-6);
        assert!((cosine_distance(&[1.0, 0.0], &[-1.0, 0.0]) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_distance_degenerate_inputs() {
        assert_eq!(cosine_distance(&[0.0, 0.0], &[1.0, 0.0]), MAX_COSINE_DISTANCE);
        assert_eq!(cosine_distance(&[1.0], &[1.0, 0.0]), MAX_COSINE_DISTANCE);
        assert_eq!(cosine_distance(&[], &[]), MAX_COSINE_DISTANCE);
    }

    #[test]
    fn test_rank_orders_by_distance_then_recency() {
        let now = Utc::now();
        let candidates = vec![
            Scored { distance: None, created_at: now, item: "unembedded" },
            Scored { distance: Some(0.7), created_at: now, item: "far" },
            Scored { distance: Some(0.1), created_at: now - Duration::minutes(5), item: "close_old" },
            Scored { distance: Some(0.1), created_at: now, item: "close_new" },
        ];

        let ranked = rank_by_distance(candidates, SIMILARITY_PAGE_SIZE);
        assert_eq!(ranked, vec!["close_new", "close_old", "far", "unembedded"]);
    }

    #[test]
    fn test_rank_truncates_to_limit() {
        let now = Utc::now();
        let candidates = (0..25)
            .map(|i| Scored {
                distance: Some(i as f32 / 25.0),
                created_at: now,
                item: i,
            })
            .collect();

        let ranked = rank_by_distance(candidates, SIMILARITY_PAGE_SIZE);
        assert_eq!(ranked, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_search_term_ignores_blank() {
        let query = FeedQuery {
            search: Some("   ".into()),
            topic_id: None,
        };
        assert_eq!(query.search_term(), None);

        let query = FeedQuery {
            search: Some(" rust ownership ".into()),
            topic_id: None,
        };
        assert_eq!(query.search_term(), Some("rust ownership"));
    }
}
