use std::{
	collections::{HashMap, HashSet},
	hash::Hash,
};

/// Drops repeated ids, keeping the first occurrence.
pub fn dedup_in_order<K>(ids: impl IntoIterator<Item = K>) -> Vec<K>
where
	K: Eq + Hash + Clone,
{
	let mut seen = HashSet::new();

	ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

/// Keeps the ids present in `allowed`. The set only answers membership; output order is the
/// order of `ordered`.
pub fn retain_allowed<K>(ordered: &[K], allowed: &HashSet<K>) -> Vec<K>
where
	K: Eq + Hash + Clone,
{
	ordered.iter().filter(|id| allowed.contains(*id)).cloned().collect()
}

/// Re-emits `records` in the order of `ids`.
///
/// Ids without a record are skipped. Records whose id is not listed are discarded.
pub fn order_by_ids<K, T, F>(ids: &[K], records: Vec<T>, key: F) -> Vec<T>
where
	K: Eq + Hash,
	F: Fn(&T) -> K,
{
	let mut by_id: HashMap<K, T> =
		records.into_iter().map(|record| (key(&record), record)).collect();

	ids.iter().filter_map(|id| by_id.remove(id)).collect()
}
