use crate::node::{NodeArena, NodeRef};
use crate::stack::NodeStack;

/// Post-order, left-first iterator over stored values.
///
/// Runs an explicit stack machine instead of recursing, so depth is bounded
/// by memory rather than the call stack. `Tree::walk` is driven by it.
pub struct Values<'a, V> {
    nodes: &'a NodeArena<V>,
    stack: NodeStack,
    /// Set while unwinding: the subtree rooted here has been fully visited.
    finished: Option<NodeRef>,
}

impl<'a, V> Values<'a, V> {
    pub(crate) fn new(nodes: &'a NodeArena<V>, empty: bool) -> Self {
        let mut stack = NodeStack::new();
        if !empty {
            stack.push(NodeRef::ROOT);
        }
        Self {
            nodes,
            stack,
            finished: None,
        }
    }

    /// Emits the value of a node whose subtrees are done.
    #[inline]
    fn visit(&self, node: NodeRef) -> Option<&'a V> {
        let n = &self.nodes[node];
        if n.is_root() {
            return None;
        }
        n.value()
    }
}

impl<'a, V> Iterator for Values<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<&'a V> {
        loop {
            if let Some(done) = self.finished {
                // Climb until some ancestor still has an unvisited right child.
                let parent = self.stack.peek()?;
                let right = self.nodes[parent].right();
                if !right.is_null() && right != done {
                    self.stack.push(right);
                    self.finished = None;
                    continue;
                }
                self.stack.pop();
                self.finished = Some(parent);
                if let Some(value) = self.visit(parent) {
                    return Some(value);
                }
                continue;
            }

            let top = self.stack.peek()?;
            let node = &self.nodes[top];
            if !node.left().is_null() {
                self.stack.push(node.left());
                continue;
            }
            if !node.right().is_null() {
                self.stack.push(node.right());
                continue;
            }

            self.stack.pop();
            self.finished = Some(top);
            if let Some(value) = self.visit(top) {
                return Some(value);
            }
        }
    }
}
