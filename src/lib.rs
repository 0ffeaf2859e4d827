//! An ordered map implemented with an AVL tree.
//!
//! [`OrderedMap`] keeps its entries sorted by key and restores the AVL
//! condition after every insert and remove, so lookups, inserts and removes
//! take logarithmic time.
//!
//! ```
//! use ordered_avl::OrderedMap;
//!
//! let mut map = OrderedMap::new();
//! for (key, value) in [(3, "c"), (1, "a"), (2, "b")] {
//!     map.insert(key, value);
//! }
//! assert!(map.contains_key(&2));
//! assert_eq!(map.keys().copied().collect::<Vec<_>>(), [1, 2, 3]);
//! assert_eq!(map.to_string(), "{(1, a), (2, b), (3, c)}");
//! ```

mod display;
mod error;
pub mod iter;
mod map;

pub use error::{Error, Result};
pub use map::OrderedMap;
