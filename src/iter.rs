//! In-order iterators over an [`OrderedMap`](crate::OrderedMap).

use std::iter::FusedIterator;

use crate::map::Node;

/// An iterator over the entries of a map, sorted by key.
pub struct Iter<'a, K, V> {
    // Nodes whose left sub tree has been visited, deepest on top
    stack: Vec<&'a Node<K, V>>,
    remaining: usize,
}

/// An iterator over the keys of a map, in sorted order.
pub struct Keys<'a, K, V> {
    iter: Iter<'a, K, V>,
}

/// An iterator over the values of a map, in order by key.
pub struct Values<'a, K, V> {
    iter: Iter<'a, K, V>,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(root: Option<&'a Node<K, V>>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        iter.descend_left(root);
        iter
    }

    fn descend_left(&mut self, mut current: Option<&'a Node<K, V>>) {
        while let Some(node_ptr) = current {
            self.stack.push(node_ptr);
            current = node_ptr.left.as_deref();
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node_ptr = self.stack.pop()?;
        self.descend_left(node_ptr.right.as_deref());
        self.remaining -= 1;
        Some((&node_ptr.key, &node_ptr.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Keys<'a, K, V> {
    pub(crate) fn new(iter: Iter<'a, K, V>) -> Self {
        Self { iter }
    }
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

impl<'a, K, V> Values<'a, K, V> {
    pub(crate) fn new(iter: Iter<'a, K, V>) -> Self {
        Self { iter }
    }
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}
