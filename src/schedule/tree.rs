//! Arena-backed Schedule B tree with expand/collapse and leaf selection.
//!
//! Nodes live in a generational arena and link to their parent and
//! children by index. Building, the leaf-descendant search and row
//! rendering all walk the arena with explicit stacks, so hierarchy depth
//! never turns into call-stack depth.

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use super::describe::combine_nested_descriptions;
use super::node::{digits_only, is_leaf_code, ScheduleNode, ScheduleResponse};
use super::SelectedCode;

/// A node stored in the arena.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Code, if any.
    pub code: Option<String>,
    /// Description, if any.
    pub description: Option<String>,
    /// Alternate label.
    pub name: Option<String>,
    /// Unit of measure.
    pub unit_of_measure: Option<String>,
    parent: Option<Index>,
    children: Vec<Index>,
    leaf_below: bool,
    expanded: bool,
}

impl TreeNode {
    fn from_node(node: ScheduleNode, parent: Option<Index>) -> Self {
        Self {
            code: node.code,
            description: node.description,
            name: node.name,
            unit_of_measure: node.unit_of_measure,
            parent,
            children: Vec::new(),
            leaf_below: false,
            expanded: false,
        }
    }

    /// Whether this node is a selectable ten-digit code.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.code.as_deref().is_some_and(is_leaf_code)
    }

    /// Description, falling back to the name, then to empty.
    #[must_use]
    pub fn label(&self) -> &str {
        [self.description.as_deref(), self.name.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .unwrap_or("")
    }

    /// Whether the node has children to expand.
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Whether children are currently shown.
    #[must_use]
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Parent index, `None` for top-level nodes.
    #[must_use]
    pub fn parent(&self) -> Option<Index> {
        self.parent
    }

    /// Child indices in document order.
    #[must_use]
    pub fn children(&self) -> &[Index] {
        &self.children
    }
}

/// One visible line of the rendered tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row {
    /// Node shown on this line.
    pub index: Index,
    /// Nesting depth, zero for top-level nodes.
    pub depth: usize,
}

/// The whole hierarchy returned by one lookup.
#[derive(Debug, Default)]
pub struct ScheduleTree {
    arena: Arena<TreeNode>,
    roots: Vec<Index>,
    preorder: Vec<Index>,
}

impl ScheduleTree {
    /// Builds the tree from a lookup response.
    #[must_use]
    pub fn from_response(response: ScheduleResponse) -> Self {
        Self::from_nodes(response.items)
    }

    /// Builds the tree from top-level nodes, preserving document order.
    #[instrument(level = "trace", skip_all)]
    #[must_use]
    pub fn from_nodes(nodes: Vec<ScheduleNode>) -> Self {
        let mut tree = Self::default();
        let mut stack: Vec<(ScheduleNode, Option<Index>)> =
            nodes.into_iter().rev().map(|node| (node, None)).collect();

        while let Some((mut node, parent)) = stack.pop() {
            let children = std::mem::take(&mut node.items);
            let idx = tree.arena.insert(TreeNode::from_node(node, parent));
            match parent.and_then(|p| tree.arena.get_mut(p)) {
                Some(parent_node) => parent_node.children.push(idx),
                None => tree.roots.push(idx),
            }
            tree.preorder.push(idx);
            stack.extend(children.into_iter().rev().map(|child| (child, Some(idx))));
        }

        // Reverse preorder visits every child before its parent.
        for &idx in tree.preorder.iter().rev() {
            let leaf_below = {
                let node = &tree.arena[idx];
                node.is_leaf() || node.children.iter().any(|&c| tree.arena[c].leaf_below)
            };
            let node = &mut tree.arena[idx];
            node.leaf_below = leaf_below;
            node.expanded = node.has_children() && !node.is_leaf() && leaf_below;
        }

        debug!(nodes = tree.preorder.len(), roots = tree.roots.len(), "schedule tree built");
        tree
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.preorder.len()
    }

    /// Whether the lookup returned nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.preorder.is_empty()
    }

    /// Top-level nodes in document order.
    #[must_use]
    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    /// Node at `idx`.
    #[must_use]
    pub fn get(&self, idx: Index) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    /// All nodes in document order.
    pub fn iter(&self) -> impl Iterator<Item = (Index, &TreeNode)> + '_ {
        self.preorder.iter().map(|&idx| (idx, &self.arena[idx]))
    }

    /// First node whose code has the same digits as `code`.
    #[must_use]
    pub fn find_code(&self, code: &str) -> Option<Index> {
        let wanted = digits_only(code);
        self.iter()
            .find(|(_, node)| node.code.as_deref().is_some_and(|c| digits_only(c) == wanted))
            .map(|(idx, _)| idx)
    }

    /// Whether the node or anything beneath it is a leaf.
    #[must_use]
    pub fn has_leaf_descendant(&self, idx: Index) -> bool {
        self.arena.get(idx).is_some_and(|node| node.leaf_below)
    }

    /// Flips expansion of a node with children; returns the new state.
    ///
    /// Nodes without children never expand.
    pub fn toggle(&mut self, idx: Index) -> bool {
        match self.arena.get_mut(idx) {
            Some(node) if node.has_children() => {
                node.expanded = !node.expanded;
                node.expanded
            }
            _ => false,
        }
    }

    /// Visible rows in document order, skipping collapsed subtrees.
    #[must_use]
    pub fn visible_rows(&self) -> Vec<Row> {
        let mut rows = Vec::new();
        let mut stack: Vec<Row> =
            self.roots.iter().rev().map(|&index| Row { index, depth: 0 }).collect();

        while let Some(row) = stack.pop() {
            rows.push(row);
            let node = &self.arena[row.index];
            if node.expanded {
                stack.extend(
                    node.children.iter().rev().map(|&index| Row { index, depth: row.depth + 1 }),
                );
            }
        }
        rows
    }

    /// Selects a leaf. Returns `None` for anything that is not a leaf.
    #[must_use]
    pub fn select(&self, idx: Index) -> Option<SelectedCode> {
        let node = self.arena.get(idx).filter(|node| node.is_leaf())?;
        Some(SelectedCode {
            code: node.code.clone().unwrap_or_default(),
            description: node.label().to_string(),
            unit_of_measure: node.unit_of_measure.clone(),
        })
    }

    /// Ancestor indices, root first, excluding `idx` itself.
    #[must_use]
    pub fn ancestors(&self, idx: Index) -> Vec<Index> {
        let mut chain = Vec::new();
        let mut cursor = self.arena.get(idx).and_then(TreeNode::parent);
        while let Some(parent) = cursor {
            chain.push(parent);
            cursor = self.arena.get(parent).and_then(TreeNode::parent);
        }
        chain.reverse();
        chain
    }

    /// The node's label prefixed by its ancestors' labels, normalized.
    #[must_use]
    pub fn full_description(&self, idx: Index) -> String {
        let Some(node) = self.arena.get(idx) else {
            return String::new();
        };
        let ancestors: Vec<&str> =
            self.ancestors(idx).into_iter().map(|a| self.arena[a].label()).collect();
        combine_nested_descriptions(&ancestors, node.label())
    }
}
