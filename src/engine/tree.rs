//! Build trees: the search output unit, plus key / clone / merge helpers.
//!
//! Subtrees are held behind `Arc` and never mutated once built, so combinations that share a
//! prefix share it structurally instead of copying it. [`BuildTree::deep_clone`] gives a fully
//! independent copy when a caller needs one.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One concrete way to build `item`.
///
/// A leaf has no recipe and no ingredients. A crafted node has a recipe and exactly two
/// ingredients, in recipe order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildTree {
    #[serde(rename = "element")]
    item: String,
    recipe: Option<[String; 2]>,
    #[serde(rename = "ingredients", default)]
    children: Vec<Arc<BuildTree>>,
}

impl BuildTree {
    pub fn leaf(item: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            recipe: None,
            children: Vec::new(),
        }
    }

    pub fn craft(item: impl Into<String>, left: Arc<BuildTree>, right: Arc<BuildTree>) -> Self {
        Self {
            item: item.into(),
            recipe: Some([left.item.clone(), right.item.clone()]),
            children: vec![left, right],
        }
    }

    pub fn item(&self) -> &str {
        &self.item
    }

    pub fn recipe(&self) -> Option<&[String; 2]> {
        self.recipe.as_ref()
    }

    pub fn children(&self) -> &[Arc<BuildTree>] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.recipe.is_none()
    }

    /// Every crafted node has exactly two ingredients matching its recipe; every leaf has none.
    pub fn is_complete(&self) -> bool {
        let mut stack: Vec<&BuildTree> = vec![self];
        while let Some(node) = stack.pop() {
            match &node.recipe {
                None => {
                    if !node.children.is_empty() {
                        return false;
                    }
                }
                Some([a, b]) => {
                    let [left, right] = node.children.as_slice() else {
                        return false;
                    };
                    if left.item != *a || right.item != *b {
                        return false;
                    }
                    stack.push(left);
                    stack.push(right);
                }
            }
        }
        true
    }

    /// Total node count.
    pub fn complexity(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|c| c.complexity())
            .sum::<usize>()
    }

    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(|c| c.depth()).max().unwrap_or(0)
    }

    /// Leaf item names, left to right.
    pub fn leaves(&self) -> Vec<&str> {
        let mut out = Vec::new();
        let mut stack: Vec<&BuildTree> = vec![self];
        while let Some(node) = stack.pop() {
            if node.children.is_empty() {
                out.push(node.item.as_str());
            }
            stack.extend(node.children.iter().rev().map(|c| c.as_ref()));
        }
        out
    }

    /// Order-independent fingerprint: a tree and its mirror image share a key.
    /// Separator characters inside item names are backslash-escaped.
    pub fn canonical_key(&self) -> String {
        let Some([a, b]) = &self.recipe else {
            return escape_key_part(&self.item);
        };
        let (a, b) = if a <= b { (a, b) } else { (b, a) };
        let mut keys: Vec<String> = self.children.iter().map(|c| c.canonical_key()).collect();
        keys.sort();
        format!(
            "{}[{}+{}]({})",
            escape_key_part(&self.item),
            escape_key_part(a),
            escape_key_part(b),
            keys.join(",")
        )
    }

    /// Copy that shares no allocation with `self`.
    pub fn deep_clone(&self) -> Self {
        Self {
            item: self.item.clone(),
            recipe: self.recipe.clone(),
            children: self
                .children
                .iter()
                .map(|c| Arc::new(c.deep_clone()))
                .collect(),
        }
    }

    /// Indented text view, one `Item = A + B` line per crafted node.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_into(&mut out, 0);
        out
    }

    fn render_into(&self, out: &mut String, level: usize) {
        let indent = "  ".repeat(level);
        match &self.recipe {
            Some([a, b]) => out.push_str(&format!("{indent}{} = {a} + {b}\n", self.item)),
            None => out.push_str(&format!("{indent}{}\n", self.item)),
        }
        for child in &self.children {
            child.render_into(out, level + 1);
        }
    }
}

fn escape_key_part(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if matches!(c, '\\' | '[' | ']' | '+' | '(' | ')' | ',') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Synthetic root over the accepted trees of one search. Never a build itself.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootTree {
    pub target: String,
    pub ingredients: Vec<Arc<BuildTree>>,
}

impl RootTree {
    pub fn trees(&self) -> &[Arc<BuildTree>] {
        &self.ingredients
    }
}

/// Wrap accepted trees under a [`RootTree`], stable-sorted by complexity (simpler first).
pub fn merge(target: impl Into<String>, mut trees: Vec<Arc<BuildTree>>) -> RootTree {
    trees.sort_by_key(|t| t.complexity());
    RootTree {
        target: target.into(),
        ingredients: trees,
    }
}
