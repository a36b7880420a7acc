//! Tree traversal helpers.

use std::collections::HashMap;

use tree_sitter::{Node, TreeCursor};

/// Lazy pre-order traversal yielding `(node, depth)`.
///
/// The starting node has depth 0. Anonymous nodes (keywords, punctuation)
/// are included.
pub struct Walk<'tree> {
    cursor: TreeCursor<'tree>,
    depth: usize,
    done: bool,
}

impl<'tree> Walk<'tree> {
    /// Starts a traversal at `node`.
    #[must_use]
    pub fn new(node: Node<'tree>) -> Self {
        Self {
            cursor: node.walk(),
            depth: 0,
            done: false,
        }
    }
}

impl<'tree> Iterator for Walk<'tree> {
    type Item = (Node<'tree>, usize);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = (self.cursor.node(), self.depth);

        if self.cursor.goto_first_child() {
            self.depth += 1;
            return Some(item);
        }
        loop {
            if self.depth == 0 {
                self.done = true;
                break;
            }
            if self.cursor.goto_next_sibling() {
                break;
            }
            if !self.cursor.goto_parent() {
                self.done = true;
                break;
            }
            self.depth -= 1;
        }
        Some(item)
    }
}

/// Parent back-links for every node below a root, keyed by node id.
///
/// Tree-sitter nodes are immutable views, so instead of installing a
/// `.parent` attribute the links live in a side table built in one pass.
pub struct ParentMap<'tree> {
    parents: HashMap<usize, Node<'tree>>,
}

impl<'tree> ParentMap<'tree> {
    /// Records the parent of every node reachable from `root`.
    #[must_use]
    pub fn build(root: Node<'tree>) -> Self {
        let mut parents = HashMap::new();
        let mut stack = vec![root];
        let mut cursor = root.walk();
        while let Some(node) = stack.pop() {
            for child in node.children(&mut cursor) {
                parents.insert(child.id(), node);
                stack.push(child);
            }
        }
        Self { parents }
    }

    /// Parent of `node`, or `None` for the root.
    #[must_use]
    pub fn parent(&self, node: Node<'tree>) -> Option<Node<'tree>> {
        self.parents.get(&node.id()).copied()
    }

    /// Ancestors of `node`, innermost first.
    pub fn ancestors(&self, node: Node<'tree>) -> impl Iterator<Item = Node<'tree>> + '_ {
        std::iter::successors(self.parent(node), move |n| self.parent(*n))
    }
}
