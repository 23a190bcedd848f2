use crate::bits::leading_bit_set;
use crate::error::{Result, TreeError};
use crate::iter::Values;
use crate::lock::{NoLock, ReadGuard, TreeLock, WriteGuard};
use crate::trie::Trie;
use crate::{Config, MatchType, OpResult};

/// Binary prefix tree keyed by (key bytes, mask bytes).
///
/// Every masked bit of the key is one edge: `0` goes left, `1` goes right.
/// There is no path compression, so a /24 occupies 24 nodes below the root.
///
/// Masks must be a run of leading ones followed only by zeros. This is not
/// checked; bits after the first zero are ignored.
///
/// `C` is the context token handed to the lock hooks on every call.
pub struct Tree<V, C = ()> {
    pub(crate) trie: Trie<V>,
    lock: Box<dyn TreeLock<C>>,
}

impl<V, C> Tree<V, C> {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            trie: Trie::with_capacity(config.initial_capacity),
            lock: Box::new(NoLock),
        }
    }

    pub fn with_lock_handlers(lock: impl TreeLock<C> + 'static) -> Self {
        let mut tree = Self::new();
        tree.set_lock_handlers(lock);
        tree
    }

    /// Replaces all four lock hooks at once.
    pub fn set_lock_handlers(&mut self, lock: impl TreeLock<C> + 'static) {
        log::debug!("installing tree lock handlers");
        self.lock = Box::new(lock);
    }

    /// Number of stored keys.
    #[inline]
    pub fn nodes_count(&self) -> u64 {
        self.trie.count
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.trie.count as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.trie.count == 0
    }

    /// Nodes linked into the tree, the root and routing nodes included.
    pub fn allocated_nodes(&self) -> usize {
        self.trie.nodes.live()
    }

    pub fn memory_usage(&self) -> usize {
        self.trie.nodes.memory_usage()
    }

    /// Inserts `value` under the masked key.
    ///
    /// Returns [`OpResult::Dup`] without touching the stored value if the key
    /// is already present.
    pub fn insert(&mut self, ctx: &C, key: &[u8], mask: &[u8], value: V) -> Result<OpResult> {
        if key.len() != mask.len() {
            return Err(TreeError::InvalidKeyMask);
        }
        if key.is_empty() {
            return Err(TreeError::InvalidKeyLength(key.len()));
        }
        // Storing at depth zero would mean marking the root.
        if !leading_bit_set(mask) {
            return Err(TreeError::InvalidKeyMask);
        }

        let _guard = WriteGuard::acquire(self.lock.as_ref(), ctx);
        self.trie.insert(key, mask, value)
    }

    /// Removes the exact masked key and hands back its value.
    pub fn delete(&mut self, ctx: &C, key: &[u8], mask: &[u8]) -> Result<(OpResult, V)> {
        if key.len() != mask.len() {
            return Err(TreeError::InvalidKeyMask);
        }

        let _guard = WriteGuard::acquire(self.lock.as_ref(), ctx);
        self.trie.delete(key, mask)
    }

    /// Looks up the masked key.
    ///
    /// `Partial` stops at the first stored prefix met on the way down from
    /// the root, i.e. the shortest covering prefix, and reports
    /// [`OpResult::PartialMatch`] unless that prefix is the key itself.
    pub fn search(&self, ctx: &C, key: &[u8], mask: &[u8], match_type: MatchType) -> Result<(OpResult, &V)> {
        if key.len() != mask.len() {
            return Err(TreeError::InvalidKeyMask);
        }

        let _guard = ReadGuard::acquire(self.lock.as_ref(), ctx);
        self.trie.get(key, mask, match_type)
    }

    pub fn search_exact(&self, ctx: &C, key: &[u8], mask: &[u8]) -> Result<(OpResult, &V)> {
        self.search(ctx, key, mask, MatchType::Exact)
    }

    pub fn search_partial(&self, ctx: &C, key: &[u8], mask: &[u8]) -> Result<(OpResult, &V)> {
        self.search(ctx, key, mask, MatchType::Partial)
    }

    /// Calls `f` once per stored value, depth first with left subtrees first.
    ///
    /// The first error returned by `f` stops the walk and is passed through.
    pub fn walk<E, F>(&self, ctx: &C, mut f: F) -> Result<(), E>
    where
        F: FnMut(&V) -> Result<(), E>,
    {
        if self.is_empty() {
            return Ok(());
        }

        let _guard = ReadGuard::acquire(self.lock.as_ref(), ctx);
        for value in self.trie.values() {
            f(value)?;
        }
        Ok(())
    }

    /// Iterates stored values in walk order without invoking the lock hooks.
    pub fn values(&self) -> Values<'_, V> {
        self.trie.values()
    }
}

impl<V, C> Default for Tree<V, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: std::fmt::Debug, C> std::fmt::Debug for Tree<V, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.values()).finish()
    }
}
