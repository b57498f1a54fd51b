use crate::common::{comment::RemoteComment, newtypes::CommentId};
use log::warn;
use std::collections::{HashMap, HashSet};

/// Reorder a flat list of comments so that every comment is immediately followed by all of its
/// descendants (pre-order), with siblings kept in the order they arrived in.
///
/// Comments whose parent is not part of the list are treated as top level comments at their own
/// position. Comments caught in a parent cycle are never dropped, they are emitted as top level
/// comments after everything else.
pub fn order_by_nesting(comments: Vec<RemoteComment>) -> Vec<RemoteComment> {
    let present: HashSet<CommentId> = comments.iter().map(|c| c.id).collect();
    let mut children: HashMap<CommentId, Vec<usize>> = HashMap::new();
    let mut roots = vec![];
    for (i, comment) in comments.iter().enumerate() {
        match comment.parent_id {
            Some(parent) if parent != comment.id && present.contains(&parent) => {
                children.entry(parent).or_default().push(i)
            }
            Some(parent) => {
                warn!(
                    "Comment {} has parent {parent} which is not in this page",
                    comment.id
                );
                roots.push(i)
            }
            None => roots.push(i),
        }
    }

    let mut emitted = vec![false; comments.len()];
    let mut order = Vec::with_capacity(comments.len());
    for root in roots {
        visit(root, &comments, &children, &mut emitted, &mut order);
    }
    for (i, comment) in comments.iter().enumerate() {
        if !emitted[i] {
            warn!("Comment {} is part of a parent cycle", comment.id);
            visit(i, &comments, &children, &mut emitted, &mut order);
        }
    }

    let mut slots: Vec<Option<RemoteComment>> = comments.into_iter().map(Some).collect();
    order.into_iter().filter_map(|i| slots[i].take()).collect()
}

fn visit(
    start: usize,
    comments: &[RemoteComment],
    children: &HashMap<CommentId, Vec<usize>>,
    emitted: &mut [bool],
    order: &mut Vec<usize>,
) {
    let mut stack = vec![start];
    while let Some(i) = stack.pop() {
        if emitted[i] {
            continue;
        }
        emitted[i] = true;
        order.push(i);
        if let Some(c) = children.get(&comments[i].id) {
            // reversed so that the first child is popped first
            stack.extend(c.iter().rev());
        }
    }
}
