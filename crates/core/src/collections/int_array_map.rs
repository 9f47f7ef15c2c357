//! Open-addressing map from variable-length `i32` arrays to values.
//!
//! Keys are hashed by content with xxh3 over their little-endian bytes, so two
//! arrays with equal elements in the same order land in the same bucket no
//! matter how they were built. Collisions are resolved by linear probing and
//! full key comparison; removal uses backward-shift deletion, so there are no
//! tombstones to sweep.

use xxhash_rust::xxh3::xxh3_64;

struct Entry<V> {
    hash: u64,
    key: Box<[i32]>,
    value: V,
}

pub struct IntArrayKeyMap<V> {
    slots: Vec<Option<Entry<V>>>,
    len: usize,
    load_factor: f32,
    threshold: usize,
    hasher: fn(&[i32]) -> u64,
}

fn hash_key(key: &[i32]) -> u64 {
    let mut bytes = Vec::with_capacity(key.len() * 4);
    for value in key {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    xxh3_64(&bytes)
}

/// Entries allowed before growing. At least one slot always stays empty so
/// probing for an absent key terminates.
fn threshold_for(capacity: usize, load_factor: f32) -> usize {
    (((capacity as f64) * (load_factor as f64)) as usize).min(capacity - 1)
}

impl<V: Copy> IntArrayKeyMap<V> {
    /// # Panics
    ///
    /// If `load_factor` is not in `(0, 1]`.
    pub fn new(initial_capacity: usize, load_factor: f32) -> Self {
        Self::with_hasher(initial_capacity, load_factor, hash_key)
    }

    fn with_hasher(initial_capacity: usize, load_factor: f32, hasher: fn(&[i32]) -> u64) -> Self {
        assert!(
            load_factor > 0.0 && load_factor <= 1.0,
            "load factor must be in (0, 1], got {load_factor}"
        );
        let capacity = initial_capacity.max(2).next_power_of_two();
        Self {
            slots: Self::empty_slots(capacity),
            len: 0,
            load_factor,
            threshold: threshold_for(capacity, load_factor),
            hasher,
        }
    }

    fn empty_slots(capacity: usize) -> Vec<Option<Entry<V>>> {
        std::iter::repeat_with(|| None).take(capacity).collect()
    }

    fn mask(&self) -> usize {
        self.slots.len() - 1
    }

    fn find(&self, key: &[i32], hash: u64) -> Option<usize> {
        let mask = self.mask();
        let mut index = hash as usize & mask;
        for _ in 0..self.slots.len() {
            match &self.slots[index] {
                None => return None,
                Some(entry) if entry.hash == hash && *entry.key == *key => return Some(index),
                Some(_) => index = (index + 1) & mask,
            }
        }
        None
    }

    pub fn get(&self, key: &[i32], default: V) -> V {
        match self.find(key, (self.hasher)(key)) {
            Some(index) => self.slots[index].as_ref().map_or(default, |e| e.value),
            None => default,
        }
    }

    pub fn contains_key(&self, key: &[i32]) -> bool {
        self.find(key, (self.hasher)(key)).is_some()
    }

    /// Inserts or overwrites the value stored under a structurally equal key.
    pub fn put(&mut self, key: &[i32], value: V) {
        let hash = (self.hasher)(key);
        if let Some(index) = self.find(key, hash) {
            if let Some(entry) = self.slots[index].as_mut() {
                entry.value = value;
            }
            return;
        }
        if self.len + 1 > self.threshold {
            self.grow();
        }
        self.insert_new(Entry {
            hash,
            key: key.into(),
            value,
        });
        self.len += 1;
    }

    fn insert_new(&mut self, entry: Entry<V>) {
        let mask = self.mask();
        let mut index = entry.hash as usize & mask;
        while self.slots[index].is_some() {
            index = (index + 1) & mask;
        }
        self.slots[index] = Some(entry);
    }

    fn grow(&mut self) {
        let capacity = self.slots.len() * 2;
        let old = std::mem::replace(&mut self.slots, Self::empty_slots(capacity));
        self.threshold = threshold_for(capacity, self.load_factor);
        for entry in old.into_iter().flatten() {
            self.insert_new(entry);
        }
    }

    /// Removes `key`, returning its value or `default` if it was absent.
    pub fn remove(&mut self, key: &[i32], default: V) -> V {
        let Some(mut hole) = self.find(key, (self.hasher)(key)) else {
            return default;
        };
        let removed = self.slots[hole].take().map_or(default, |e| e.value);
        self.len -= 1;

        let mask = self.mask();
        let mut index = (hole + 1) & mask;
        while let Some(entry) = &self.slots[index] {
            let ideal = entry.hash as usize & mask;
            // Shift back unless the entry already sits between its ideal slot and the hole.
            if (index.wrapping_sub(ideal) & mask) >= (index.wrapping_sub(hole) & mask) {
                self.slots[hole] = self.slots[index].take();
                hole = index;
            }
            index = (index + 1) & mask;
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.len = 0;
    }
}

impl<V: Copy> Default for IntArrayKeyMap<V> {
    fn default() -> Self {
        Self::new(
            crate::config::DEFAULT_TABLE_CAPACITY,
            crate::config::DEFAULT_LOAD_FACTOR,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_overwrite() {
        let mut map = IntArrayKeyMap::new(4, 0.75);
        map.put(&[1, 2, 3], 10);
        map.put(&[3, 2, 1], 20);
        assert_eq!(map.get(&[1, 2, 3], -1), 10);
        assert_eq!(map.get(&[3, 2, 1], -1), 20);

        map.put(&[1, 2, 3], 11);
        assert_eq!(map.get(&[1, 2, 3], -1), 11);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_length_is_part_of_key() {
        let mut map = IntArrayKeyMap::new(4, 0.75);
        map.put(&[], 0);
        map.put(&[0], 1);
        map.put(&[0, 0], 2);
        assert_eq!(map.get(&[], -1), 0);
        assert_eq!(map.get(&[0], -1), 1);
        assert_eq!(map.get(&[0, 0], -1), 2);
        assert_eq!(map.get(&[0, 0, 0], -1), -1);
    }

    #[test]
    fn test_many_shifted_keys() {
        let mut map = IntArrayKeyMap::new(16, 0.75);
        for i in 0..1000 {
            map.put(&[i << 5, i << 3], i);
        }
        assert_eq!(map.len(), 1000);
        assert!(map.capacity() >= 1000);
        for i in 0..1000 {
            assert_eq!(map.get(&[i << 5, i << 3], -1), i);
        }
    }

    #[test]
    fn test_remove_absent_returns_default() {
        let mut map = IntArrayKeyMap::new(16, 0.75);
        map.put(&[1, 2], 5);
        assert_eq!(map.remove(&[2, 1], -7), -7);
        assert_eq!(map.len(), 1);
        assert_eq!(map.remove(&[1, 2], -7), 5);
        assert!(map.is_empty());
        assert_eq!(map.get(&[1, 2], -1), -1);
    }

    #[test]
    fn test_remove_keeps_probe_chains_intact() {
        // A full load factor forces long probe chains.
        let mut map = IntArrayKeyMap::new(64, 1.0);
        for i in 0..64 {
            map.put(&[i, i * 7], i);
        }
        for i in (0..64).step_by(2) {
            assert_eq!(map.remove(&[i, i * 7], -1), i);
        }
        assert_eq!(map.len(), 32);
        for i in 0..64 {
            let expected = if i % 2 == 0 { -1 } else { i };
            assert_eq!(map.get(&[i, i * 7], -1), expected);
        }
    }

    #[test]
    fn test_clear() {
        let mut map = IntArrayKeyMap::new(8, 0.5);
        map.put(&[1], 1);
        map.put(&[2], 2);
        map.clear();
        assert!(map.is_empty());
        assert!(!map.contains_key(&[1]));
        map.put(&[1], 3);
        assert_eq!(map.get(&[1], -1), 3);
    }

    #[test]
    fn test_full_load_factor_absent_lookup_terminates() {
        let mut map = IntArrayKeyMap::new(4, 1.0);
        for i in 0..4 {
            map.put(&[i], i);
        }
        assert_eq!(map.get(&[99], -1), -1);
        assert!(!map.contains_key(&[99]));
        assert!(map.len() < map.capacity());

        let mut tiny = IntArrayKeyMap::new(2, 1.0);
        for i in 0..10 {
            tiny.put(&[i, i], i);
        }
        for i in 0..10 {
            assert_eq!(tiny.get(&[i, i], -1), i);
        }
    }

    #[test]
    fn test_equal_hashes_chain_instead_of_overwriting() {
        let mut map = IntArrayKeyMap::with_hasher(8, 0.75, |_| 7);
        for i in 0..100 {
            map.put(&[i, -i], i);
        }
        assert_eq!(map.len(), 100);
        for i in 0..100 {
            assert_eq!(map.get(&[i, -i], -1), i);
        }
        assert_eq!(map.get(&[1000], -1), -1);

        for i in (0..100).step_by(3) {
            assert_eq!(map.remove(&[i, -i], -1), i);
        }
        for i in 0..100 {
            let expected = if i % 3 == 0 { -1 } else { i };
            assert_eq!(map.get(&[i, -i], -1), expected);
        }
    }

    #[test]
    #[should_panic(expected = "load factor")]
    fn test_zero_load_factor_panics() {
        let _ = IntArrayKeyMap::<i32>::new(8, 0.0);
    }
}
