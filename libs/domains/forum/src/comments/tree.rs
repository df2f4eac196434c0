//! Rebuilds a post's comment thread from the flat, parent-linked rows.
//!
//! Nodes are addressed by their index in the input; the hierarchy is held in index
//! lists while it is being discovered and only turned into owned [`CommentNode`]s at
//! the end. Everything is iterative, so thread depth is bounded only by memory.

use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;
use uuid::Uuid;

use super::models::Comment;

/// A comment and its replies, in creation order.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CommentNode {
    pub comment: Comment,
    #[schema(no_recursion)]
    pub replies: Vec<CommentNode>,
}

// Derived drop recurses once per level; a long reply chain would overflow the stack.
impl Drop for CommentNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.replies);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.replies);
        }
    }
}

/// Builds the forest for `comments`, which must be in creation order.
///
/// - comments without a parent, or whose parent is not in the input, are roots
/// - replies keep input order
/// - comments caught in a parent cycle are unreachable from any root; each one still
///   unplaced after the root walk becomes a root itself, in input order
///
/// Every input comment appears exactly once in the output.
pub fn assemble(comments: Vec<Comment>) -> Vec<CommentNode> {
    let count = comments.len();

    let mut position: HashMap<Uuid, usize> = HashMap::with_capacity(count);
    for (i, comment) in comments.iter().enumerate() {
        position.entry(comment.id).or_insert(i);
    }

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); count];
    let mut roots = Vec::new();
    for (i, comment) in comments.iter().enumerate() {
        match comment.parent_id.and_then(|p| position.get(&p)) {
            Some(&parent) => children[parent].push(i),
            None => roots.push(i),
        }
    }

    let mut placed = vec![false; count];
    let mut replies: Vec<Vec<usize>> = vec![Vec::new(); count];
    let mut discovery = Vec::with_capacity(count);
    let mut tops = Vec::new();

    for start in roots.into_iter().chain(0..count) {
        if placed[start] {
            continue;
        }
        placed[start] = true;
        tops.push(start);

        let mut stack = vec![start];
        while let Some(i) = stack.pop() {
            discovery.push(i);
            for &child in &children[i] {
                if !placed[child] {
                    placed[child] = true;
                    replies[i].push(child);
                    stack.push(child);
                }
            }
        }
    }

    // A node is discovered before its replies, so the reverse builds leaves first
    let mut pending: Vec<Option<Comment>> = comments.into_iter().map(Some).collect();
    let mut built: Vec<Option<CommentNode>> = (0..count).map(|_| None).collect();
    for &i in discovery.iter().rev() {
        let node_replies = replies[i]
            .iter()
            .filter_map(|&child| built[child].take())
            .collect();
        if let Some(comment) = pending[i].take() {
            built[i] = Some(CommentNode {
                comment,
                replies: node_replies,
            });
        }
    }

    tops.into_iter().filter_map(|i| built[i].take()).collect()
}
