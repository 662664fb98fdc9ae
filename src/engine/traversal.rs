//! Per-worker traversal of one top-level recipe of the target.
//!
//! The worker's frontier holds `(left, right)` choices into the ingredients' subtree lists.
//! BFS pops from the front of a queue, which walks the choice grid diagonal by diagonal;
//! DFS pops from a stack, which exhausts the right choices for one left choice before moving
//! on. Both share the completeness test, cache and dedup key; only the order differs.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::SearchMode;
use crate::engine::expand::Expander;
use crate::engine::tree::BuildTree;
use crate::graph::CraftRelation;

/// What the receiver of a finished tree wants next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

#[derive(Clone, Copy, Debug)]
struct Choice {
    left: usize,
    right: usize,
}

/// Worker-local frontier. Never shared.
enum Frontier {
    Queue(VecDeque<Choice>),
    Stack(Vec<Choice>),
}

impl Frontier {
    fn new(mode: SearchMode) -> Self {
        match mode {
            SearchMode::Bfs => Frontier::Queue(VecDeque::new()),
            SearchMode::Dfs => Frontier::Stack(Vec::new()),
        }
    }

    fn push(&mut self, choice: Choice) {
        match self {
            Frontier::Queue(q) => q.push_back(choice),
            Frontier::Stack(s) => s.push(choice),
        }
    }

    fn pop(&mut self) -> Option<Choice> {
        match self {
            Frontier::Queue(q) => q.pop_front(),
            Frontier::Stack(s) => s.pop(),
        }
    }
}

/// Enumerate complete trees for `target_name` built through `relation`, handing each to `emit`.
/// Returns `Flow::Stop` when `emit` or the stop signal ended the walk early.
pub fn explore_relation<F>(
    expander: &Expander<'_>,
    target_name: &str,
    relation: &CraftRelation,
    mode: SearchMode,
    mut emit: F,
) -> Flow
where
    F: FnMut(Arc<BuildTree>) -> Flow,
{
    let Some((l, r)) = relation.pair() else {
        return Flow::Continue;
    };
    if expander.should_stop() {
        return Flow::Stop;
    }
    expander.visit();
    let (Some(left), Some(right)) = (expander.subtrees(l), expander.subtrees(r)) else {
        return Flow::Stop;
    };
    let (rows, cols) = (left.trees.len(), right.trees.len());
    if rows == 0 || cols == 0 {
        // An ingredient cannot be grounded: nothing to emit through this recipe.
        return Flow::Continue;
    }
    let symmetric = l == r;
    let row_start = |i: usize| if symmetric { i } else { 0 };

    let mut frontier = Frontier::new(mode);
    frontier.push(Choice { left: 0, right: 0 });
    while let Some(Choice { left: i, right: j }) = frontier.pop() {
        if expander.should_stop() {
            return Flow::Stop;
        }
        expander.visit();

        // Row advance is pushed first so a stack finishes the current row before the next.
        if j == row_start(i) && i + 1 < rows && row_start(i + 1) < cols {
            frontier.push(Choice {
                left: i + 1,
                right: row_start(i + 1),
            });
        }
        if j + 1 < cols {
            frontier.push(Choice {
                left: i,
                right: j + 1,
            });
        }

        let tree = BuildTree::craft(
            target_name,
            Arc::clone(&left.trees[i]),
            Arc::clone(&right.trees[j]),
        );
        if !tree.is_complete() {
            continue;
        }
        if emit(Arc::new(tree)) == Flow::Stop {
            return Flow::Stop;
        }
    }
    Flow::Continue
}
