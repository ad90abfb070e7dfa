//! Branching conversation history.
//!
//! [`BranchTree`] keeps a forest of [`Branch`] records in an arena keyed by id.
//! Every slot lists its children's ids in creation order, and each branch is
//! owned exactly once: by its parent's child list or by the root list. No
//! mutation clones the structure.

pub mod render;

use std::collections::{HashMap, VecDeque};

use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::models::{Branch, BranchNode};

pub use render::render_tree;

/// Branch tree errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("Parent branch not found: {0}")]
    ParentNotFound(Uuid),

    #[error("Branch already exists: {0}")]
    DuplicateId(Uuid),
}

#[derive(Debug, Clone)]
struct Slot {
    branch: Branch,
    children: Vec<Uuid>,
}

/// A forest of question/answer branches with one optional current branch.
///
/// Not internally synchronized: one session owns a tree, and callers sharing
/// one must serialize mutations themselves.
#[derive(Debug, Clone, Default)]
pub struct BranchTree {
    slots: HashMap<Uuid, Slot>,
    roots: Vec<Uuid>,
    current: Option<Uuid>,
}

impl BranchTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a tree from stored records in any order.
    ///
    /// Siblings keep their relative input order. Records whose parent is
    /// missing are skipped with a warning instead of becoming orphans.
    pub fn from_branches(branches: Vec<Branch>) -> Self {
        let mut by_parent: HashMap<Option<Uuid>, Vec<Branch>> = HashMap::new();
        for branch in branches {
            by_parent.entry(branch.parent_id).or_default().push(branch);
        }

        let mut tree = Self::new();
        let mut queue: VecDeque<Branch> = by_parent.remove(&None).unwrap_or_default().into();

        while let Some(branch) = queue.pop_front() {
            let id = branch.id;
            if let Err(e) = tree.insert(branch) {
                warn!("Skipping stored branch: {}", e);
                continue;
            }
            if let Some(children) = by_parent.remove(&Some(id)) {
                queue.extend(children);
            }
        }

        let orphans: usize = by_parent.values().map(Vec::len).sum();
        if orphans > 0 {
            warn!(orphans, "Skipped stored branches whose parent is missing");
        }

        tree
    }

    /// Record a new exchange and make it the current branch.
    ///
    /// With `parent_id == None` the branch becomes another root. An unknown
    /// parent leaves the tree untouched and returns
    /// [`TreeError::ParentNotFound`].
    pub fn create_branch(
        &mut self,
        parent_id: Option<Uuid>,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Result<Uuid, TreeError> {
        let id = self.insert(Branch::new(parent_id, question, answer))?;
        self.current = Some(id);
        Ok(id)
    }

    /// Attach an existing record under its `parent_id`. Does not move the
    /// current branch.
    pub fn insert(&mut self, branch: Branch) -> Result<Uuid, TreeError> {
        let id = branch.id;
        if self.slots.contains_key(&id) {
            return Err(TreeError::DuplicateId(id));
        }

        match branch.parent_id {
            Some(parent_id) => self
                .slots
                .get_mut(&parent_id)
                .ok_or(TreeError::ParentNotFound(parent_id))?
                .children
                .push(id),
            None => self.roots.push(id),
        }

        self.slots.insert(
            id,
            Slot {
                branch,
                children: Vec::new(),
            },
        );
        Ok(id)
    }

    /// Make `id` the current branch. The id is not checked against the tree.
    pub fn select_branch(&mut self, id: Uuid) {
        self.current = Some(id);
    }

    pub fn current(&self) -> Option<Uuid> {
        self.current
    }

    pub fn get(&self, id: Uuid) -> Option<&Branch> {
        self.slots.get(&id).map(|s| &s.branch)
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.slots.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn roots(&self) -> Vec<&Branch> {
        self.roots.iter().filter_map(|id| self.get(*id)).collect()
    }

    /// Direct children of `id` in creation order.
    pub fn children(&self, id: Uuid) -> Vec<&Branch> {
        self.slots
            .get(&id)
            .map(|s| s.children.iter().filter_map(|c| self.get(*c)).collect())
            .unwrap_or_default()
    }

    /// Branches from the root down to `id`, inclusive. Empty if `id` is unknown.
    pub fn get_branch_path(&self, id: Uuid) -> Vec<&Branch> {
        let mut path = Vec::new();
        let mut next = Some(id);
        while let Some(branch) = next.and_then(|id| self.get(id)) {
            path.push(branch);
            next = branch.parent_id;
        }
        path.reverse();
        path
    }

    /// Remove `id` and its whole subtree. Returns the removed ids, empty if `id`
    /// is unknown.
    ///
    /// If the current branch was inside the removed subtree, there is no
    /// current branch afterwards.
    pub fn delete_branch(&mut self, id: Uuid) -> Vec<Uuid> {
        let Some(parent_id) = self.slots.get(&id).map(|s| s.branch.parent_id) else {
            return Vec::new();
        };

        match parent_id {
            Some(parent_id) => {
                if let Some(parent) = self.slots.get_mut(&parent_id) {
                    parent.children.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }

        let mut removed = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(slot) = self.slots.remove(&next) {
                stack.extend(slot.children);
                removed.push(next);
            }
        }

        if self.current.is_some_and(|c| removed.contains(&c)) {
            self.current = None;
        }
        removed
    }

    /// Nested snapshot of the whole forest, roots in creation order.
    pub fn forest(&self) -> Vec<BranchNode> {
        self.roots.iter().filter_map(|id| self.build_node(*id)).collect()
    }

    /// ASCII rendering of the forest with the current branch marked.
    pub fn render(&self) -> String {
        render_tree(&self.forest(), self.current)
    }

    fn build_node(&self, id: Uuid) -> Option<BranchNode> {
        let slot = self.slots.get(&id)?;
        Some(BranchNode {
            branch: slot.branch.clone(),
            children: slot
                .children
                .iter()
                .filter_map(|c| self.build_node(*c))
                .collect(),
        })
    }
}
