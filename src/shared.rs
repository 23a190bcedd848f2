use parking_lot::RwLock;

use crate::error::Result;
use crate::{MatchType, OpResult, Tree};

/// A [`Tree`] behind a `parking_lot` read-write lock, usable from many
/// threads through `&self`.
///
/// Lookups return clones because a reference cannot outlive the read guard.
/// Lock hooks installed on the inner tree still run, inside the `RwLock`.
pub struct SharedTree<V, C = ()> {
    inner: RwLock<Tree<V, C>>,
}

impl<V, C> SharedTree<V, C> {
    pub fn new(tree: Tree<V, C>) -> Self {
        Self {
            inner: RwLock::new(tree),
        }
    }

    pub fn insert(&self, ctx: &C, key: &[u8], mask: &[u8], value: V) -> Result<OpResult> {
        self.inner.write().insert(ctx, key, mask, value)
    }

    pub fn delete(&self, ctx: &C, key: &[u8], mask: &[u8]) -> Result<(OpResult, V)> {
        self.inner.write().delete(ctx, key, mask)
    }

    pub fn search(&self, ctx: &C, key: &[u8], mask: &[u8], match_type: MatchType) -> Result<(OpResult, V)>
    where
        V: Clone,
    {
        let inner = self.inner.read();
        let (result, value) = inner.search(ctx, key, mask, match_type)?;
        Ok((result, value.clone()))
    }

    pub fn search_exact(&self, ctx: &C, key: &[u8], mask: &[u8]) -> Result<(OpResult, V)>
    where
        V: Clone,
    {
        self.search(ctx, key, mask, MatchType::Exact)
    }

    pub fn search_partial(&self, ctx: &C, key: &[u8], mask: &[u8]) -> Result<(OpResult, V)>
    where
        V: Clone,
    {
        self.search(ctx, key, mask, MatchType::Partial)
    }

    /// Walks under the read lock; `f` must not call back into this tree
    /// for writing.
    pub fn walk<E, F>(&self, ctx: &C, f: F) -> Result<(), E>
    where
        F: FnMut(&V) -> Result<(), E>,
    {
        self.inner.read().walk(ctx, f)
    }

    pub fn nodes_count(&self) -> u64 {
        self.inner.read().nodes_count()
    }

    pub fn into_inner(self) -> Tree<V, C> {
        self.inner.into_inner()
    }
}

impl<V, C> Default for SharedTree<V, C> {
    fn default() -> Self {
        Self::new(Tree::new())
    }
}

impl<V, C> From<Tree<V, C>> for SharedTree<V, C> {
    fn from(tree: Tree<V, C>) -> Self {
        Self::new(tree)
    }
}
