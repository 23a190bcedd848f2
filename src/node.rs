//! Trie vertices and the arena that owns them.
//!
//! Every node lives in a single `Vec` owned by the tree. Parents refer to
//! their children by [`NodeRef`] index, so each child has exactly one owning
//! slot (its parent's `left` or `right`) and traversal stacks can hold plain
//! copies of the index without co-owning anything.

use std::ops::{Index, IndexMut};

/// Index of a node inside a [`NodeArena`].
///
/// `NULL` marks an absent child, in the same spirit as a null pointer.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(crate) struct NodeRef(usize);

impl NodeRef {
    pub(crate) const NULL: NodeRef = NodeRef(usize::MAX);
    /// The root is always the first slot and is never released.
    pub(crate) const ROOT: NodeRef = NodeRef(0);

    #[inline]
    pub(crate) fn is_null(self) -> bool {
        self == Self::NULL
    }

    #[inline]
    fn index(self) -> usize {
        debug_assert!(!self.is_null(), "dereferenced a NULL node");
        self.0
    }
}

/// A trie vertex: bit 0 descends `left`, bit 1 descends `right`.
///
/// The node is terminal exactly when it holds a value, so marking and
/// storing happen in one assignment.
#[derive(Clone, Debug)]
pub(crate) struct Node<V> {
    left: NodeRef,
    right: NodeRef,
    root: bool,
    value: Option<V>,
}

impl<V> Node<V> {
    pub(crate) fn new() -> Self {
        Self {
            left: NodeRef::NULL,
            right: NodeRef::NULL,
            root: false,
            value: None,
        }
    }

    fn new_root() -> Self {
        Self {
            root: true,
            ..Self::new()
        }
    }

    #[inline]
    pub(crate) fn is_root(&self) -> bool {
        self.root
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.left.is_null() && self.right.is_null()
    }

    #[inline]
    pub(crate) fn is_terminal(&self) -> bool {
        self.value.is_some()
    }

    #[inline]
    pub(crate) fn value(&self) -> Option<&V> {
        self.value.as_ref()
    }

    pub(crate) fn mark_terminal(&mut self, value: V) {
        debug_assert!(!self.root, "the root cannot hold a value");
        self.value = Some(value);
    }

    /// Clears the terminal marking, handing back the stored value.
    pub(crate) fn unmark_terminal(&mut self) -> Option<V> {
        self.value.take()
    }

    #[inline]
    pub(crate) fn left(&self) -> NodeRef {
        self.left
    }

    #[inline]
    pub(crate) fn right(&self) -> NodeRef {
        self.right
    }

    #[inline]
    pub(crate) fn child(&self, bit: bool) -> NodeRef {
        if bit {
            self.right
        } else {
            self.left
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, bit: bool, child: NodeRef) {
        if bit {
            self.right = child;
        } else {
            self.left = child;
        }
    }

    /// Drops whichever link points at `child`.
    pub(crate) fn unlink(&mut self, child: NodeRef) {
        if self.right == child {
            self.right = NodeRef::NULL;
        } else {
            debug_assert_eq!(self.left, child, "unlinking a node that is not a child");
            self.left = NodeRef::NULL;
        }
    }
}

/// Slab of nodes with a free list for released slots.
#[derive(Clone, Debug)]
pub(crate) struct NodeArena<V> {
    nodes: Vec<Node<V>>,
    free: Vec<NodeRef>,
}

impl<V> NodeArena<V> {
    /// Creates an arena holding only the root.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(Node::new_root());
        Self {
            nodes,
            free: Vec::new(),
        }
    }

    pub(crate) fn alloc(&mut self) -> NodeRef {
        if let Some(slot) = self.free.pop() {
            log::trace!("reusing arena slot {}", slot.0);
            self.nodes[slot.index()] = Node::new();
            return slot;
        }
        self.nodes.push(Node::new());
        NodeRef(self.nodes.len() - 1)
    }

    /// Returns a detached node's slot to the free list.
    ///
    /// The caller must already have unlinked `node` from its parent.
    pub(crate) fn release(&mut self, node: NodeRef) -> Option<V> {
        debug_assert_ne!(node, NodeRef::ROOT, "the root is never released");
        let slot = &mut self.nodes[node.index()];
        debug_assert!(slot.is_leaf(), "released a node that still has children");
        let value = slot.value.take();
        self.free.push(node);
        value
    }

    /// Nodes currently linked into the tree, root included.
    pub(crate) fn live(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    pub(crate) fn memory_usage(&self) -> usize {
        self.nodes.capacity() * std::mem::size_of::<Node<V>>()
            + self.free.capacity() * std::mem::size_of::<NodeRef>()
    }

    #[cfg(test)]
    pub(crate) fn free_slots(&self) -> &[NodeRef] {
        &self.free
    }
}

impl<V> Index<NodeRef> for NodeArena<V> {
    type Output = Node<V>;

    #[inline]
    fn index(&self, node: NodeRef) -> &Node<V> {
        &self.nodes[node.index()]
    }
}

impl<V> IndexMut<NodeRef> for NodeArena<V> {
    #[inline]
    fn index_mut(&mut self, node: NodeRef) -> &mut Node<V> {
        &mut self.nodes[node.index()]
    }
}
