//! Diagnostic output for an [`OrderedMap`].
//!
//! Nothing here writes to a global stream: every function takes the sink
//! it renders into.

use std::fmt::{self, Write};

use crate::map::{Node, OrderedMap};

/// Columns of indentation per tree level in [`OrderedMap::write_sketch`].
const SKETCH_INDENT: usize = 8;

impl<K: fmt::Display, V: fmt::Display> OrderedMap<K, V> {
    /// Writes all entries as `(key, value)` pairs in ascending key order.
    pub fn write_pairs<W: Write>(&self, out: &mut W) -> fmt::Result {
        for (key, value) in self {
            write!(out, "({}, {})", key, value)?;
        }
        Ok(())
    }
}

impl<K: fmt::Display, V> OrderedMap<K, V> {
    /// Writes the tree rotated by 90 degrees: the right sub tree above its
    /// parent, the left sub tree below it, every level indented further.
    /// Each node is written as its key followed by its balance factor.
    ///
    /// ```
    /// use ordered_avl::OrderedMap;
    /// let map: OrderedMap<_, _> = (1..=3).map(|key| (key, ())).collect();
    /// let mut sketch = String::new();
    /// map.write_sketch(&mut sketch).unwrap();
    /// assert_eq!(sketch, "        3 0\n2 0\n        1 0\n");
    /// ```
    pub fn write_sketch<W: Write>(&self, out: &mut W) -> fmt::Result {
        if let Some(root_ptr) = self.root() {
            write_subtree(out, root_ptr, 0)?;
        }
        Ok(())
    }
}

fn write_subtree<K: fmt::Display, V, W: Write>(
    out: &mut W,
    node_ptr: &Node<K, V>,
    indent: usize,
) -> fmt::Result {
    if let Some(right_ptr) = node_ptr.right.as_deref() {
        write_subtree(out, right_ptr, indent + SKETCH_INDENT)?;
    }
    writeln!(
        out,
        "{:indent$}{} {}",
        "",
        node_ptr.key,
        node_ptr.balance(),
        indent = indent
    )?;
    if let Some(left_ptr) = node_ptr.left.as_deref() {
        write_subtree(out, left_ptr, indent + SKETCH_INDENT)?;
    }
    Ok(())
}

impl<K: fmt::Display, V: fmt::Display> fmt::Display for OrderedMap<K, V> {
    /// Formats the entries as `{(key, value), ...}` in ascending key order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('{')?;
        for (index, (key, value)) in self.iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            write!(f, "({}, {})", key, value)?;
        }
        f.write_char('}')
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OrderedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::OrderedMap;

    #[test]
    fn test_display() {
        let mut map = OrderedMap::new();
        assert_eq!(map.to_string(), "{}");
        map.insert(2, "two");
        map.insert(1, "one");
        map.insert(3, "three");
        assert_eq!(map.to_string(), "{(1, one), (2, two), (3, three)}");
        assert_eq!(format!("{:?}", map), r#"{1: "one", 2: "two", 3: "three"}"#);
    }

    #[test]
    fn test_write_pairs() {
        let mut map = OrderedMap::<&str, i32>::new();
        let mut out = String::new();
        map.write_pairs(&mut out).unwrap();
        assert!(out.is_empty());

        map.insert("b", 2);
        map.insert("a", 1);
        map.write_pairs(&mut out).unwrap();
        assert_eq!(out, "(a, 1)(b, 2)");
    }

    #[test]
    fn test_write_sketch() {
        //   2             4
        //  / \           / \
        // 1   4    ->   2   5
        //    / \       / \   \
        //   3   5     1   3   6
        //        \
        //         6
        let mut map = OrderedMap::new();
        for key in 1..=6 {
            map.insert(key, ());
        }
        let mut sketch = String::new();
        map.write_sketch(&mut sketch).unwrap();
        let expected = [
            "                6 0",
            "        5 1",
            "4 0",
            "                3 0",
            "        2 0",
            "                1 0",
        ];
        assert_eq!(sketch.lines().collect::<Vec<_>>(), expected);

        let mut empty = String::new();
        OrderedMap::<i32, ()>::new().write_sketch(&mut empty).unwrap();
        assert!(empty.is_empty());
    }
}
