//! Caller-supplied lock hooks.
//!
//! The tree never embeds a locking primitive of its own. Insert and delete
//! run between `write_lock` and `unlock`; search and walk run between
//! `read_lock` and `read_unlock`. Each hook receives the context token the
//! caller passed to that operation. The tree does not inspect the token, so
//! honouring cancellation is up to the hook.

use std::sync::Arc;

/// Lock hooks invoked around every tree operation. All default to no-ops.
pub trait TreeLock<C = ()>: Send + Sync {
    fn read_lock(&self, _ctx: &C) {}
    fn read_unlock(&self, _ctx: &C) {}
    fn write_lock(&self, _ctx: &C) {}
    fn unlock(&self, _ctx: &C) {}
}

/// Installs nothing; every hook is a no-op.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoLock;

impl<C> TreeLock<C> for NoLock {}

impl<C, L> TreeLock<C> for Arc<L>
where
    L: TreeLock<C> + ?Sized,
{
    fn read_lock(&self, ctx: &C) {
        (**self).read_lock(ctx)
    }

    fn read_unlock(&self, ctx: &C) {
        (**self).read_unlock(ctx)
    }

    fn write_lock(&self, ctx: &C) {
        (**self).write_lock(ctx)
    }

    fn unlock(&self, ctx: &C) {
        (**self).unlock(ctx)
    }
}

pub type LockFn<C> = Box<dyn Fn(&C) + Send + Sync>;

/// Four optional closure slots; an empty slot does nothing.
///
/// ```rust
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use bitrie::{LockHandlers, Tree};
///
/// let writes = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&writes);
/// let handlers = LockHandlers::new().on_write_lock(move |_: &()| {
///     counter.fetch_add(1, Ordering::Relaxed);
/// });
///
/// let mut tree: Tree<u32> = Tree::with_lock_handlers(handlers);
/// tree.insert(&(), &[0x80], &[0xFF], 1).unwrap();
/// assert_eq!(writes.load(Ordering::Relaxed), 1);
/// ```
pub struct LockHandlers<C = ()> {
    read_lock: Option<LockFn<C>>,
    read_unlock: Option<LockFn<C>>,
    write_lock: Option<LockFn<C>>,
    unlock: Option<LockFn<C>>,
}

impl<C> LockHandlers<C> {
    pub fn new() -> Self {
        Self {
            read_lock: None,
            read_unlock: None,
            write_lock: None,
            unlock: None,
        }
    }

    pub fn on_read_lock(mut self, f: impl Fn(&C) + Send + Sync + 'static) -> Self {
        self.read_lock = Some(Box::new(f));
        self
    }

    pub fn on_read_unlock(mut self, f: impl Fn(&C) + Send + Sync + 'static) -> Self {
        self.read_unlock = Some(Box::new(f));
        self
    }

    pub fn on_write_lock(mut self, f: impl Fn(&C) + Send + Sync + 'static) -> Self {
        self.write_lock = Some(Box::new(f));
        self
    }

    pub fn on_unlock(mut self, f: impl Fn(&C) + Send + Sync + 'static) -> Self {
        self.unlock = Some(Box::new(f));
        self
    }
}

impl<C> Default for LockHandlers<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> std::fmt::Debug for LockHandlers<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockHandlers")
            .field("read_lock", &self.read_lock.is_some())
            .field("read_unlock", &self.read_unlock.is_some())
            .field("write_lock", &self.write_lock.is_some())
            .field("unlock", &self.unlock.is_some())
            .finish()
    }
}

impl<C> TreeLock<C> for LockHandlers<C> {
    fn read_lock(&self, ctx: &C) {
        if let Some(f) = &self.read_lock {
            f(ctx);
        }
    }

    fn read_unlock(&self, ctx: &C) {
        if let Some(f) = &self.read_unlock {
            f(ctx);
        }
    }

    fn write_lock(&self, ctx: &C) {
        if let Some(f) = &self.write_lock {
            f(ctx);
        }
    }

    fn unlock(&self, ctx: &C) {
        if let Some(f) = &self.unlock {
            f(ctx);
        }
    }
}

/// Holds the read hooks open; `read_unlock` runs on drop.
pub(crate) struct ReadGuard<'a, C> {
    lock: &'a dyn TreeLock<C>,
    ctx: &'a C,
}

impl<'a, C> ReadGuard<'a, C> {
    pub(crate) fn acquire(lock: &'a dyn TreeLock<C>, ctx: &'a C) -> Self {
        lock.read_lock(ctx);
        Self { lock, ctx }
    }
}

impl<C> Drop for ReadGuard<'_, C> {
    fn drop(&mut self) {
        self.lock.read_unlock(self.ctx);
    }
}

/// Holds the write hooks open; `unlock` runs on drop.
pub(crate) struct WriteGuard<'a, C> {
    lock: &'a dyn TreeLock<C>,
    ctx: &'a C,
}

impl<'a, C> WriteGuard<'a, C> {
    pub(crate) fn acquire(lock: &'a dyn TreeLock<C>, ctx: &'a C) -> Self {
        lock.write_lock(ctx);
        Self { lock, ctx }
    }
}

impl<C> Drop for WriteGuard<'_, C> {
    fn drop(&mut self) {
        self.lock.unlock(self.ctx);
    }
}
