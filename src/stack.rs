use smallvec::SmallVec;

use crate::node::NodeRef;

/// LIFO of non-owning node references.
///
/// Lives only for the duration of one tree operation. Depth is bounded by the
/// key's bit length, so most stacks never leave the inline buffer.
#[derive(Debug, Default)]
pub(crate) struct NodeStack {
    refs: SmallVec<[NodeRef; 32]>,
}

impl NodeStack {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            refs: SmallVec::with_capacity(capacity),
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, node: NodeRef) {
        self.refs.push(node);
    }

    #[inline]
    pub(crate) fn pop(&mut self) -> Option<NodeRef> {
        self.refs.pop()
    }

    #[inline]
    pub(crate) fn peek(&self) -> Option<NodeRef> {
        self.refs.last().copied()
    }

    #[inline]
    pub(crate) fn size(&self) -> usize {
        self.refs.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}
