//! Textual keys on top of [`Tree`]: IPv4/IPv6 CIDR blocks, plain strings and
//! reversed strings.
//!
//! Each adapter is an [`AdapterTree`] parameterised by a [`KeyEncoder`] that
//! turns the caller's string into the (key, mask) pair the tree consumes.
//! `search` is always a partial lookup; `search_exact` is the exact one.

mod ip;
mod strings;

use std::marker::PhantomData;

use smallvec::SmallVec;

use crate::error::Result;
use crate::lock::TreeLock;
use crate::{Config, OpResult, Tree};

pub use ip::{Ipv4Key, Ipv6Key};
pub use strings::{ReversedStringKey, StringKey};

pub type V4Tree<V, C = ()> = AdapterTree<Ipv4Key, V, C>;
pub type V6Tree<V, C = ()> = AdapterTree<Ipv6Key, V, C>;
pub type StringsTree<V, C = ()> = AdapterTree<StringKey, V, C>;
pub type ReversedStringsTree<V, C = ()> = AdapterTree<ReversedStringKey, V, C>;

/// Key and mask bytes of equal length. Addresses fit inline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedKey {
    pub key: SmallVec<[u8; 16]>,
    pub mask: SmallVec<[u8; 16]>,
}

/// Converts a textual key into tree bytes.
pub trait KeyEncoder {
    fn encode(input: &str) -> Result<EncodedKey>;
}

/// A [`Tree`] addressed through a [`KeyEncoder`].
pub struct AdapterTree<E, V, C = ()> {
    tree: Tree<V, C>,
    _encoder: PhantomData<fn() -> E>,
}

impl<E: KeyEncoder, V, C> AdapterTree<E, V, C> {
    pub fn new() -> Self {
        Self::from_tree(Tree::new())
    }

    pub fn with_config(config: Config) -> Self {
        Self::from_tree(Tree::with_config(config))
    }

    pub fn with_lock_handlers(lock: impl TreeLock<C> + 'static) -> Self {
        Self::from_tree(Tree::with_lock_handlers(lock))
    }

    pub fn from_tree(tree: Tree<V, C>) -> Self {
        Self {
            tree,
            _encoder: PhantomData,
        }
    }

    pub fn set_lock_handlers(&mut self, lock: impl TreeLock<C> + 'static) {
        self.tree.set_lock_handlers(lock);
    }

    pub fn insert(&mut self, ctx: &C, input: &str, value: V) -> Result<OpResult> {
        let k = E::encode(input)?;
        self.tree.insert(ctx, &k.key, &k.mask, value)
    }

    pub fn delete(&mut self, ctx: &C, input: &str) -> Result<(OpResult, V)> {
        let k = E::encode(input)?;
        self.tree.delete(ctx, &k.key, &k.mask)
    }

    /// Partial lookup: the shortest stored prefix covering `input` wins.
    pub fn search(&self, ctx: &C, input: &str) -> Result<(OpResult, &V)> {
        let k = E::encode(input)?;
        self.tree.search_partial(ctx, &k.key, &k.mask)
    }

    pub fn search_exact(&self, ctx: &C, input: &str) -> Result<(OpResult, &V)> {
        let k = E::encode(input)?;
        self.tree.search_exact(ctx, &k.key, &k.mask)
    }

    pub fn walk<Err, F>(&self, ctx: &C, f: F) -> Result<(), Err>
    where
        F: FnMut(&V) -> Result<(), Err>,
    {
        self.tree.walk(ctx, f)
    }

    pub fn nodes_count(&self) -> u64 {
        self.tree.nodes_count()
    }

    pub fn tree(&self) -> &Tree<V, C> {
        &self.tree
    }

    pub fn into_tree(self) -> Tree<V, C> {
        self.tree
    }
}

impl<E: KeyEncoder, V, C> Default for AdapterTree<E, V, C> {
    fn default() -> Self {
        Self::new()
    }
}
