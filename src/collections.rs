//! Conversions between flag-maps (`HashMap<K, bool>` used as a set) and key
//! sequences, plus order-preserving set difference.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Keys whose flag is `true`. Order follows map iteration and is unspecified.
pub fn true_keys<K: Clone>(flags: &HashMap<K, bool>) -> Vec<K> {
    flags
        .iter()
        .filter(|(_, on)| **on)
        .map(|(k, _)| k.clone())
        .collect()
}

/// Every key regardless of value. Order is unspecified.
pub fn keys<K: Clone, V>(map: &HashMap<K, V>) -> Vec<K> {
    map.keys().cloned().collect()
}

/// Mark every item present. Duplicates collapse into one entry.
pub fn to_flag_map<K, I>(items: I) -> HashMap<K, bool>
where
    K: Eq + Hash,
    I: IntoIterator<Item = K>,
{
    items.into_iter().map(|k| (k, true)).collect()
}

/// Keys in ascending order.
pub fn sorted_keys<K: Ord + Clone, V>(map: &HashMap<K, V>) -> Vec<K> {
    let mut out = keys(map);
    // keys are unique, stability is irrelevant
    out.sort_unstable();
    out
}

pub fn contains<T: PartialEq>(items: &[T], needle: &T) -> bool {
    items.iter().any(|item| item == needle)
}

/// Elements of `a` that do not appear in `b`, in `a`'s order.
///
/// Runs in O(|a| + |b|): `b` is loaded into a [`HashSet`] once.
pub fn difference<T: Eq + Hash + Clone>(a: &[T], b: &[T]) -> Vec<T> {
    let exclude: HashSet<&T> = b.iter().collect();
    a.iter().filter(|x| !exclude.contains(x)).cloned().collect()
}

/// [`difference`] over derived keys, for when `a` and `b` hold different
/// types that share an identity (e.g. backend records vs. backend ids).
pub fn difference_by<T, U, K, FA, FB>(a: &[T], b: &[U], key_a: FA, key_b: FB) -> Vec<T>
where
    T: Clone,
    K: Eq + Hash,
    FA: Fn(&T) -> K,
    FB: Fn(&U) -> K,
{
    let exclude: HashSet<K> = b.iter().map(key_b).collect();
    a.iter().filter(|x| !exclude.contains(&key_a(x))).cloned().collect()
}
