use core::hash::Hash;
use im::{HashMap, Vector};

/// Lookup that falls back to `V::default()` for ledger entries that were never written,
/// such as the revision of a purchase nobody has paid against yet.
pub trait OrDefault<K, V> {
    fn get_or_default(&self, key: &K) -> V;
}

impl<K, V> OrDefault<K, V> for HashMap<K, V>
where
    K: Eq + Hash + Clone,
    V: Default + Clone,
{
    fn get_or_default(&self, key: &K) -> V {
        self.get(key).cloned().unwrap_or_default()
    }
}

/// Appends without mutating the receiver, for use inside folds over persistent vectors.
pub trait PushImmut<T> {
    fn push(&self, item: T) -> Vector<T>;
}

impl<T: Clone> PushImmut<T> for Vector<T> {
    fn push(&self, item: T) -> Vector<T> {
        let mut result = self.clone();
        result.push_back(item);
        result
    }
}
