//! Insert and remove scenarios checked through the public interface only.

use ordered_avl::{Error, OrderedMap};

const INSERTED: [i32; 20] = [
    6, 7, 8, 4, 3, 5, 9, 8, 10, 11, 12, 44, 17, 62, 78, 50, 32, 48, 54, 88,
];
const REMOVED: [i32; 7] = [3, 4, 5, 9, 48, 44, 50];

/// Balance factors as written by the tree sketch, one per node.
fn balance_factors<V>(map: &OrderedMap<i32, V>) -> Vec<i32> {
    let mut sketch = String::new();
    map.write_sketch(&mut sketch).unwrap();
    sketch
        .lines()
        .map(|line| {
            let mut fields = line.split_whitespace();
            let _key = fields.next().unwrap();
            fields.next().unwrap().parse().unwrap()
        })
        .collect()
}

fn assert_balanced<V>(map: &OrderedMap<i32, V>) {
    let factors = balance_factors(map);
    assert_eq!(factors.len(), map.len());
    assert!(factors.iter().all(|factor| (-1..=1).contains(factor)));
}

fn keys<V>(map: &OrderedMap<i32, V>) -> Vec<i32> {
    map.keys().copied().collect()
}

fn scenario_map() -> OrderedMap<i32, String> {
    let mut map = OrderedMap::new();
    for key in INSERTED {
        assert!(map.insert(key, format!("value {}", key)));
        assert_balanced(&map);
    }
    map
}

#[test]
fn insert_yields_sorted_distinct_keys() {
    let map = scenario_map();
    assert_eq!(
        keys(&map),
        [3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 17, 32, 44, 48, 50, 54, 62, 78, 88]
    );
    assert_eq!(map.len(), 19);
    assert_balanced(&map);
}

#[test]
fn remove_drops_exactly_the_removed_keys() {
    let mut map = scenario_map();
    for key in REMOVED {
        assert!(map.remove(&key));
        assert!(!map.contains_key(&key));
        assert_balanced(&map);
    }
    assert_eq!(keys(&map), [6, 7, 8, 10, 11, 12, 17, 32, 54, 62, 78, 88]);
    assert_eq!(map.len(), 12);
}

#[test]
fn lookups_after_removal() {
    let mut map = scenario_map();
    for key in REMOVED {
        map.remove(&key);
    }

    assert!(!map.contains_key(&3));
    assert!(!map.contains_key(&1000));
    assert!(map.contains_key(&17));
    assert_eq!(map.value(&48), Err(Error::KeyNotFound));

    *map.value_mut(&17).unwrap() = String::from("updated");
    assert_eq!(map.value(&17).map(String::as_str), Ok("updated"));
}

#[test]
fn overwrite_keeps_key_set() {
    let mut map = scenario_map();
    let before = keys(&map);
    assert!(map.insert(8, String::from("again")));
    assert_eq!(keys(&map), before);
    assert_eq!(map.get(&8).map(String::as_str), Some("again"));
}

#[test]
fn clone_is_independent() {
    let map = scenario_map();
    let mut copy = map.clone();
    assert!(copy.iter().eq(map.iter()));
    assert_balanced(&copy);

    copy.insert(1, String::from("one"));
    copy.remove(&6);
    assert!(!map.contains_key(&1));
    assert!(map.contains_key(&6));
    assert_eq!(map.len(), 19);
}

#[test]
fn clear_is_idempotent() {
    let mut map = scenario_map();
    map.clear();
    assert!(map.is_empty());
    assert_eq!(map.to_string(), "{}");
    map.clear();
    assert!(map.is_empty());
    assert!(balance_factors(&map).is_empty());

    map.insert(1, String::from("one"));
    assert_eq!(map.to_string(), "{(1, one)}");
}
