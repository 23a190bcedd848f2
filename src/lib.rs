//! # bitrie
//!
//! A binary prefix tree keyed by arbitrary-length bit strings plus a mask of
//! significant bits. Suited to CIDR tables and prefix/suffix string matching.
//!
//! ## Example
//!
//! ```rust
//! use bitrie::{OpResult, Tree};
//!
//! let mut tree: Tree<&str> = Tree::new();
//! tree.insert(&(), &[10, 0, 1, 0], &[0xFF, 0xFF, 0xFF, 0x00], "10.0.1.0/24").unwrap();
//!
//! let (result, value) = tree
//!     .search_partial(&(), &[10, 0, 1, 42], &[0xFF; 4])
//!     .unwrap();
//! assert_eq!(result, OpResult::PartialMatch);
//! assert_eq!(*value, "10.0.1.0/24");
//! ```
//!
//! Textual keys go through the [`adapters`]:
//!
//! ```rust
//! use bitrie::adapters::ReversedStringsTree;
//!
//! let mut domains: ReversedStringsTree<u32> = ReversedStringsTree::new();
//! domains.insert(&(), "google.com", 1).unwrap();
//! assert_eq!(*domains.search(&(), "mail.google.com").unwrap().1, 1);
//! ```

pub mod adapters;
mod bits;
mod error;
mod iter;
mod lock;
mod node;
mod shared;
mod stack;
mod tree;
mod trie;


pub use bits::cidr_mask;
pub use error::{Result, TreeError};
pub use iter::Values;
pub use lock::{LockFn, LockHandlers, NoLock, TreeLock};
pub use shared::SharedTree;
pub use tree::Tree;

/// Outcome codes reported by tree operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpResult {
    Error,
    Ok,
    /// The key was already stored; nothing changed.
    Dup,
    Match,
    /// A shorter stored prefix covering the key was found.
    PartialMatch,
    NoMatch,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum MatchType {
    #[default]
    Exact,
    Partial,
}

/// Configuration for a [`Tree`].
#[derive(Debug, Clone)]
pub struct Config {
    /// Nodes to reserve up front, root included.
    pub initial_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
        }
    }
}

#[cfg(test)]
mod proptests;
