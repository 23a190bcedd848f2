//! Lock-free core of the bit trie: descent, growth and pruning.
//!
//! Callers validate input and hold whatever lock they need; nothing here
//! knows about lock hooks.

use std::iter;

use crate::bits::MaskedBits;
use crate::error::{Result, TreeError};
use crate::iter::Values;
use crate::node::{NodeArena, NodeRef};
use crate::stack::NodeStack;
use crate::{MatchType, OpResult};

#[derive(Clone, Debug)]
pub(crate) struct Trie<V> {
    pub(crate) nodes: NodeArena<V>,
    /// Terminal nodes currently in the tree.
    pub(crate) count: u64,
}

impl<V> Trie<V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: NodeArena::with_capacity(capacity),
            count: 0,
        }
    }

    /// Stores `value` under the masked key, growing the path as needed.
    ///
    /// Key and mask must be the same non-empty length with the leading mask
    /// bit set.
    pub(crate) fn insert(&mut self, key: &[u8], mask: &[u8], value: V) -> Result<OpResult> {
        let mut bits = MaskedBits::new(key, mask);
        let mut node = NodeRef::ROOT;

        // Follow existing links as far as they go.
        let mut diverged = None;
        for bit in bits.by_ref() {
            let next = self.nodes[node].child(bit);
            if next.is_null() {
                diverged = Some(bit);
                break;
            }
            node = next;
        }

        match diverged {
            None => {
                if self.nodes[node].is_root() {
                    return Err(TreeError::InsertFailed);
                }
                if self.nodes[node].is_terminal() {
                    log::trace!("duplicate insert of {key:02x?}/{mask:02x?}");
                    return Ok(OpResult::Dup);
                }
            }
            Some(first) => {
                for bit in iter::once(first).chain(bits) {
                    let child = self.nodes.alloc();
                    self.nodes[node].set_child(bit, child);
                    node = child;
                }
            }
        }

        self.nodes[node].mark_terminal(value);
        self.count += 1;
        Ok(OpResult::Ok)
    }

    /// Descends from the root along the masked key.
    ///
    /// With `ancestors`, every node visited before stepping to its child is
    /// pushed, so the stack ends holding the root through the match's parent.
    pub(crate) fn find(
        &self,
        key: &[u8],
        mask: &[u8],
        match_type: MatchType,
        mut ancestors: Option<&mut NodeStack>,
    ) -> Result<(NodeRef, OpResult)> {
        if self.count == 0 {
            return Err(TreeError::KeyNotFound);
        }
        if key.is_empty() {
            return Err(TreeError::InvalidKeyLength(key.len()));
        }
        if !crate::bits::leading_bit_set(mask) {
            return Err(TreeError::InvalidKeyMask);
        }

        let mut node = NodeRef::ROOT;
        let mut result = OpResult::Match;

        for bit in MaskedBits::new(key, mask) {
            let current = &self.nodes[node];

            // The first stored prefix on the way down wins.
            if match_type == MatchType::Partial && current.is_terminal() {
                result = OpResult::PartialMatch;
                break;
            }

            if let Some(stack) = ancestors.as_deref_mut() {
                stack.push(node);
            }

            node = current.child(bit);
            if node.is_null() {
                log::trace!("no path for {key:02x?}/{mask:02x?}");
                return Err(TreeError::KeyNotFound);
            }
        }

        let found = &self.nodes[node];
        if found.is_root() || !found.is_terminal() {
            return Err(TreeError::KeyNotFound);
        }
        Ok((node, result))
    }

    pub(crate) fn get(&self, key: &[u8], mask: &[u8], match_type: MatchType) -> Result<(OpResult, &V)> {
        let (node, result) = self.find(key, mask, match_type, None)?;
        let accepted = match match_type {
            MatchType::Exact => result == OpResult::Match,
            MatchType::Partial => matches!(result, OpResult::Match | OpResult::PartialMatch),
        };
        if !accepted {
            return Err(TreeError::KeyNotFound);
        }
        let value = self.nodes[node].value().ok_or(TreeError::KeyNotFound)?;
        Ok((result, value))
    }

    /// Removes the exact masked key, pruning routing nodes left without purpose.
    pub(crate) fn delete(&mut self, key: &[u8], mask: &[u8]) -> Result<(OpResult, V)> {
        let mut ancestors = NodeStack::with_capacity(key.len() * 8);
        let (found, result) = self.find(key, mask, MatchType::Exact, Some(&mut ancestors))?;
        if result != OpResult::Match {
            return Err(TreeError::KeyNotFound);
        }

        // Still routes to other keys: keep it, just drop the marking.
        if !self.nodes[found].is_leaf() {
            let value = self.nodes[found].unmark_terminal().ok_or(TreeError::KeyNotFound)?;
            self.count = self.count.saturating_sub(1);
            return Ok((OpResult::Match, value));
        }

        let value = self.nodes[found].unmark_terminal().ok_or(TreeError::KeyNotFound)?;

        let mut child = found;
        let mut pruned = 0usize;
        while let Some(parent) = ancestors.pop() {
            self.nodes[parent].unlink(child);
            self.nodes.release(child);
            pruned += 1;

            let p = &self.nodes[parent];
            if !p.is_leaf() || p.is_terminal() || p.is_root() {
                break;
            }
            child = parent;
        }
        log::trace!("pruned {pruned} node(s) deleting {key:02x?}/{mask:02x?}");

        self.count = self.count.saturating_sub(1);
        Ok((OpResult::Match, value))
    }

    pub(crate) fn values(&self) -> Values<'_, V> {
        Values::new(&self.nodes, self.count == 0)
    }
}
