//! An ordered map implemented with an AVL tree.

use std::borrow::Borrow;
use std::cmp::{self, Ordering};
use std::mem;

use log::trace;

use crate::error::{Error, Result};
use crate::iter::{Iter, Keys, Values};

/// An ordered map implemented with an AVL tree.
///
/// ```
/// use ordered_avl::OrderedMap;
/// let mut map = OrderedMap::new();
/// map.insert(0, "zero");
/// map.insert(1, "one");
/// map.insert(2, "two");
/// assert_eq!(map.get(&1), Some(&"one"));
/// map.remove(&1);
/// assert!(map.get(&1).is_none());
/// ```
pub struct OrderedMap<K, V> {
    root: Link<K, V>,
    num_nodes: usize,
}

pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: Link<K, V>,
    pub(crate) right: Link<K, V>,
    height: usize,
    balance: i8,
}

pub(crate) type Link<K, V> = Option<Box<Node<K, V>>>;

impl<K, V> OrderedMap<K, V> {
    /// Creates an empty map.
    /// No memory is allocated until the first item is inserted.
    pub fn new() -> Self {
        Self {
            root: None,
            num_nodes: 0,
        }
    }

    /// Returns true if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of elements in the map.
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    /// Returns the height of the tree.
    /// An empty map has height 0, a map with a single element has height 1.
    pub fn height(&self) -> usize {
        height(&self.root)
    }

    /// Clears the map, deallocating all memory.
    pub fn clear(&mut self) {
        // Children are detached and destroyed before their parent,
        // without recursion, so the depth of the tree does not matter here.
        let mut pending: Vec<Box<Node<K, V>>> = self.root.take().into_iter().collect();
        while let Some(mut node_ptr) = pending.pop() {
            if node_ptr.left.is_none() && node_ptr.right.is_none() {
                continue;
            }
            let left = node_ptr.left.take();
            let right = node_ptr.right.take();
            pending.push(node_ptr);
            pending.extend(left);
            pending.extend(right);
        }
        if self.num_nodes > 0 {
            trace!("cleared {} nodes", self.num_nodes);
        }
        self.num_nodes = 0;
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self.root.as_deref(), self.num_nodes)
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// Gets an iterator over the values of the map, in order by key.
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    /// Returns the first key-value pair in the map.
    /// The key in this pair is the minimum key in the map.
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let mut node_ptr = self.root.as_deref()?;
        while let Some(left_ptr) = node_ptr.left.as_deref() {
            node_ptr = left_ptr;
        }
        Some((&node_ptr.key, &node_ptr.value))
    }

    /// Returns the last key-value pair in the map.
    /// The key in this pair is the maximum key in the map.
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let mut node_ptr = self.root.as_deref()?;
        while let Some(right_ptr) = node_ptr.right.as_deref() {
            node_ptr = right_ptr;
        }
        Some((&node_ptr.key, &node_ptr.value))
    }

    pub(crate) fn root(&self) -> Option<&Node<K, V>> {
        self.root.as_deref()
    }
}

impl<K: Ord, V> OrderedMap<K, V> {
    /// Returns a reference to the value corresponding to the key.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).map(|node_ptr| &node_ptr.value)
    }

    /// Returns references to the key-value pair corresponding to the key.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key)
            .map(|node_ptr| (&node_ptr.key, &node_ptr.value))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_mut(key).map(|node_ptr| &mut node_ptr.value)
    }

    /// Returns a reference to the value corresponding to the key,
    /// or [`Error::KeyNotFound`] if the key is not in the map.
    pub fn value<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).ok_or(Error::KeyNotFound)
    }

    /// Returns a mutable reference to the value corresponding to the key,
    /// or [`Error::KeyNotFound`] if the key is not in the map.
    ///
    /// ```
    /// use ordered_avl::{Error, OrderedMap};
    /// let mut map = OrderedMap::new();
    /// map.insert("a", 1);
    /// *map.value_mut("a")? += 1;
    /// assert_eq!(map.value("a"), Ok(&2));
    /// assert_eq!(map.value_mut("b"), Err(Error::KeyNotFound));
    /// # Ok::<(), Error>(())
    /// ```
    pub fn value_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get_mut(key).ok_or(Error::KeyNotFound)
    }

    /// Returns true if the map contains a value for the key.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Inserts a key-value pair into the map.
    /// If the key is already present, its value is overwritten in place.
    /// Returns true once the pair is stored, which is always the case;
    /// use [`replace`](Self::replace) to tell new keys from overwritten ones.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        self.replace(key, value);
        true
    }

    /// Inserts a key-value pair into the map.
    /// Returns the previous value if the key was already present.
    pub fn replace(&mut self, key: K, value: V) -> Option<V> {
        let old_value = Self::insert_at(&mut self.root, key, value);
        match old_value {
            None => {
                self.num_nodes += 1;
                trace!("inserted new node, {} nodes", self.num_nodes);
            }
            Some(_) => trace!("overwrote value of existing node"),
        }
        old_value
    }

    /// Removes a key from the map.
    /// Returns whether the key was previously in the map.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.remove_entry(key).is_some()
    }

    /// Removes a key from the map.
    /// Returns the stored key and value if the key was previously in the map.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let entry = Self::remove_at(&mut self.root, key)?;
        debug_assert!(self.num_nodes >= 1);
        self.num_nodes -= 1;
        trace!("removed node, {} nodes", self.num_nodes);
        Some(entry)
    }

    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        fn check_node<K: Ord, V>(link: &Link<K, V>) -> usize {
            let node_ptr = match link {
                None => return 0,
                Some(node_ptr) => node_ptr,
            };

            // Check links to child nodes
            if let Some(left_ptr) = node_ptr.left.as_deref() {
                assert!(left_ptr.key < node_ptr.key);
            }
            if let Some(right_ptr) = node_ptr.right.as_deref() {
                assert!(right_ptr.key > node_ptr.key);
            }
            let left_height = check_node(&node_ptr.left);
            let right_height = check_node(&node_ptr.right);

            // Check cached height and balance factor
            assert_eq!(node_ptr.height, cmp::max(left_height, right_height) + 1);
            assert_eq!(
                node_ptr.balance as isize,
                right_height as isize - left_height as isize
            );

            // Check AVL condition (nearly balance)
            assert!((-1..=1).contains(&node_ptr.balance));

            node_ptr.height
        }

        check_node(&self.root);

        // Check search order over the whole tree
        let keys: Vec<&K> = self.keys().collect();
        assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));

        // Check number of nodes
        assert_eq!(keys.len(), self.num_nodes);
    }

    fn find<Q>(&self, key: &Q) -> Option<&Node<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root.as_deref();
        while let Some(node_ptr) = current {
            current = match key.cmp(node_ptr.key.borrow()) {
                Ordering::Equal => return Some(node_ptr),
                Ordering::Less => node_ptr.left.as_deref(),
                Ordering::Greater => node_ptr.right.as_deref(),
            };
        }
        None
    }

    fn find_mut<Q>(&mut self, key: &Q) -> Option<&mut Node<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root.as_deref_mut();
        while let Some(node_ptr) = current {
            current = match key.cmp(node_ptr.key.borrow()) {
                Ordering::Equal => return Some(node_ptr),
                Ordering::Less => node_ptr.left.as_deref_mut(),
                Ordering::Greater => node_ptr.right.as_deref_mut(),
            };
        }
        None
    }

    // Inserts below the given link and rebalances the path on the way back up.
    // Returns the overwritten value, if any. Overwrites leave the shape untouched.
    fn insert_at(link: &mut Link<K, V>, key: K, value: V) -> Option<V> {
        let node_ptr = match link {
            None => {
                *link = Some(Node::create(key, value));
                return None;
            }
            Some(node_ptr) => node_ptr,
        };
        let old_value = match key.cmp(&node_ptr.key) {
            Ordering::Equal => return Some(mem::replace(&mut node_ptr.value, value)),
            Ordering::Less => Self::insert_at(&mut node_ptr.left, key, value),
            Ordering::Greater => Self::insert_at(&mut node_ptr.right, key, value),
        };
        if old_value.is_none() {
            Self::rebalance(link);
        }
        old_value
    }

    // Removes the matching node below the given link and rebalances the path
    // on the way back up.
    fn remove_at<Q>(link: &mut Link<K, V>, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let node_ptr = link.as_mut()?;
        let entry = match key.cmp(node_ptr.key.borrow()) {
            Ordering::Less => Self::remove_at(&mut node_ptr.left, key)?,
            Ordering::Greater => Self::remove_at(&mut node_ptr.right, key)?,
            Ordering::Equal => Self::unlink_node(link)?,
        };
        Self::rebalance(link);
        Some(entry)
    }

    // Unlinks the node in the given link from the tree and returns its contents.
    fn unlink_node(link: &mut Link<K, V>) -> Option<(K, V)> {
        let node_ptr = link.as_mut()?;
        if node_ptr.left.is_some() && node_ptr.right.is_some() {
            // Smallest node in right sub tree takes over key and value,
            // then is unlinked in place of the node to-unlink.
            let mut min_child_ptr = Self::unlink_min(&mut node_ptr.right)?;
            mem::swap(&mut node_ptr.key, &mut min_child_ptr.key);
            mem::swap(&mut node_ptr.value, &mut min_child_ptr.value);
            let Node { key, value, .. } = *min_child_ptr;
            Some((key, value))
        } else {
            // Node to-unlink is stem or leaf, splice its child into the link.
            let Node {
                key,
                value,
                left,
                right,
                ..
            } = *link.take()?;
            *link = left.or(right);
            Some((key, value))
        }
    }

    // Unlinks the smallest node below the given link.
    fn unlink_min(link: &mut Link<K, V>) -> Option<Box<Node<K, V>>> {
        let node_ptr = link.as_mut()?;
        if node_ptr.left.is_some() {
            let min_ptr = Self::unlink_min(&mut node_ptr.left);
            Self::rebalance(link);
            min_ptr
        } else {
            debug_assert!(node_ptr.left.is_none());
            let mut min_ptr = link.take()?;
            *link = min_ptr.right.take();
            Some(min_ptr)
        }
    }

    /// Restores the AVL condition at the given link if necessary and refreshes
    /// height and balance factor of the node in it.
    /// Both sub trees must already be balanced, with a height difference
    /// not exceeding 2, which always holds after a single update.
    fn rebalance(link: &mut Link<K, V>) {
        let mut node_ptr = match link.take() {
            None => return,
            Some(node_ptr) => node_ptr,
        };
        node_ptr.update();
        node_ptr = match node_ptr.balance {
            2 => {
                // Right-left case needs the right child turned first
                if balance(&node_ptr.right) < 0 {
                    node_ptr.right = node_ptr.right.take().map(Node::rotate_right);
                }
                Node::rotate_left(node_ptr)
            }
            -2 => {
                // Left-right case needs the left child turned first
                if balance(&node_ptr.left) > 0 {
                    node_ptr.left = node_ptr.left.take().map(Node::rotate_left);
                }
                Node::rotate_right(node_ptr)
            }
            _ => node_ptr,
        };
        *link = Some(node_ptr);
    }
}

impl<K, V> Drop for OrderedMap<K, V> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord + Clone, V: Clone> Clone for OrderedMap<K, V> {
    /// Inserts every entry into a fresh map in pre-order.
    /// The copy holds the same entries but may differ in shape.
    fn clone(&self) -> Self {
        let mut copy = Self::new();
        let mut pending: Vec<&Node<K, V>> = self.root.as_deref().into_iter().collect();
        while let Some(node_ptr) = pending.pop() {
            copy.insert(node_ptr.key.clone(), node_ptr.value.clone());
            pending.extend(node_ptr.right.as_deref());
            pending.extend(node_ptr.left.as_deref());
        }
        copy
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for OrderedMap<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq> Eq for OrderedMap<K, V> {}

impl<K: Ord, V> FromIterator<(K, V)> for OrderedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for OrderedMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn height<K, V>(link: &Link<K, V>) -> usize {
    link.as_ref().map_or(0, |node_ptr| node_ptr.height)
}

fn balance<K, V>(link: &Link<K, V>) -> i8 {
    link.as_ref().map_or(0, |node_ptr| node_ptr.balance)
}

impl<K, V> Node<K, V> {
    fn create(key: K, value: V) -> Box<Self> {
        Box::new(Node {
            key,
            value,
            left: None,
            right: None,
            height: 1,
            balance: 0,
        })
    }

    /// Right sub tree height minus left sub tree height.
    pub(crate) fn balance(&self) -> i8 {
        self.balance
    }

    fn update(&mut self) {
        let left_height = height(&self.left);
        let right_height = height(&self.right);
        let balance = right_height as isize - left_height as isize;
        debug_assert!((-2..=2).contains(&balance));
        self.height = cmp::max(left_height, right_height) + 1;
        self.balance = balance as i8;
    }

    // Promotes the right child to sub tree root.
    fn rotate_left(mut node_ptr: Box<Self>) -> Box<Self> {
        match node_ptr.right.take() {
            None => node_ptr,
            Some(mut right_ptr) => {
                trace!("rotating left");
                node_ptr.right = right_ptr.left.take();
                node_ptr.update();
                right_ptr.left = Some(node_ptr);
                right_ptr.update();
                right_ptr
            }
        }
    }

    // Promotes the left child to sub tree root.
    fn rotate_right(mut node_ptr: Box<Self>) -> Box<Self> {
        match node_ptr.left.take() {
            None => node_ptr,
            Some(mut left_ptr) => {
                trace!("rotating right");
                node_ptr.left = left_ptr.right.take();
                node_ptr.update();
                left_ptr.right = Some(node_ptr);
                left_ptr.update();
                left_ptr
            }
        }
    }
}
