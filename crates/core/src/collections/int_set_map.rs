//! Open-addressing map from a non-negative `i32` key to a set of `i32` values.

struct Entry {
    key: i32,
    /// Sorted, without duplicates.
    values: Vec<i32>,
}

pub struct IntToIntSetMap {
    slots: Vec<Option<Entry>>,
    len: usize,
    load_factor: f32,
    threshold: usize,
}

/// Keys allowed before growing. At least one slot always stays empty so
/// probing for an absent key terminates.
fn threshold_for(capacity: usize, load_factor: f32) -> usize {
    (((capacity as f64) * (load_factor as f64)) as usize).min(capacity - 1)
}

fn slot_for(key: i32, mask: usize) -> usize {
    // Fibonacci hashing spreads dense small keys across the table.
    ((key as u32).wrapping_mul(0x9E37_79B9) as usize) & mask
}

impl IntToIntSetMap {
    /// # Panics
    ///
    /// If `load_factor` is not in `(0, 1]`.
    pub fn new(initial_capacity: usize, load_factor: f32) -> Self {
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
        }
    }

    fn empty_slots(capacity: usize) -> Vec<Option<Entry>> {
        std::iter::repeat_with(|| None).take(capacity).collect()
    }

    fn find(&self, key: i32) -> Result<usize, usize> {
        let mask = self.slots.len() - 1;
        let mut index = slot_for(key, mask);
        for _ in 0..self.slots.len() {
            match &self.slots[index] {
                None => return Err(index),
                Some(entry) if entry.key == key => return Ok(index),
                Some(_) => index = (index + 1) & mask,
            }
        }
        unreachable!("IntToIntSetMap has no empty slot")
    }

    /// Adds `value` to the set under `key`. Adding a present value is a no-op.
    ///
    /// # Panics
    ///
    /// If `key` is negative.
    pub fn add(&mut self, key: i32, value: i32) {
        assert!(key >= 0, "IntToIntSetMap keys must be non-negative, got {key}");
        let index = match self.find(key) {
            Ok(index) => index,
            Err(_) => {
                if self.len + 1 > self.threshold {
                    self.grow();
                }
                // Slot positions moved if we grew.
                let Err(index) = self.find(key) else {
                    unreachable!("key {key} appeared during growth")
                };
                self.slots[index] = Some(Entry {
                    key,
                    values: Vec::new(),
                });
                self.len += 1;
                index
            }
        };
        if let Some(entry) = self.slots[index].as_mut() {
            if let Err(pos) = entry.values.binary_search(&value) {
                entry.values.insert(pos, value);
            }
        }
    }

    /// Values under `key`, empty if the key is absent.
    ///
    /// # Panics
    ///
    /// If `key` is negative.
    pub fn get(&self, key: i32) -> &[i32] {
        assert!(key >= 0, "IntToIntSetMap keys must be non-negative, got {key}");
        match self.find(key) {
            Ok(index) => self.slots[index]
                .as_ref()
                .map_or(&[][..], |e| e.values.as_slice()),
            Err(_) => &[],
        }
    }

    /// Removes `value` from the set under `key`; the key goes away with its
    /// last value. Returns whether the value was present.
    ///
    /// # Panics
    ///
    /// If `key` is negative.
    pub fn remove(&mut self, key: i32, value: i32) -> bool {
        assert!(key >= 0, "IntToIntSetMap keys must be non-negative, got {key}");
        let Ok(index) = self.find(key) else {
            return false;
        };
        let Some(entry) = self.slots[index].as_mut() else {
            return false;
        };
        let Ok(pos) = entry.values.binary_search(&value) else {
            return false;
        };
        entry.values.remove(pos);
        if entry.values.is_empty() {
            self.remove_slot(index);
        }
        true
    }

    /// Empties `hole` and shifts later entries of its probe chain back.
    fn remove_slot(&mut self, mut hole: usize) {
        self.slots[hole] = None;
        self.len -= 1;

        let mask = self.slots.len() - 1;
        let mut index = (hole + 1) & mask;
        while let Some(entry) = &self.slots[index] {
            let ideal = slot_for(entry.key, mask);
            if (index.wrapping_sub(ideal) & mask) >= (index.wrapping_sub(hole) & mask) {
                self.slots[hole] = self.slots[index].take();
                hole = index;
            }
            index = (index + 1) & mask;
        }
    }

    fn grow(&mut self) {
        let capacity = self.slots.len() * 2;
        let old = std::mem::replace(&mut self.slots, Self::empty_slots(capacity));
        self.threshold = threshold_for(capacity, self.load_factor);
        let mask = capacity - 1;
        for entry in old.into_iter().flatten() {
            let mut index = slot_for(entry.key, mask);
            while self.slots[index].is_some() {
                index = (index + 1) & mask;
            }
            self.slots[index] = Some(entry);
        }
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.len = 0;
    }
}

impl Default for IntToIntSetMap {
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
    fn test_add_duplicate_is_noop() {
        let mut map = IntToIntSetMap::new(4, 0.75);
        map.add(1, 10);
        map.add(1, 10);
        map.add(1, 20);
        assert_eq!(map.get(1), &[10, 20]);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_absent_key_is_empty() {
        let map = IntToIntSetMap::new(4, 0.75);
        assert!(map.get(42).is_empty());
    }

    #[test]
    #[should_panic(expected = "non-negative")]
    fn test_negative_get_fails_fast() {
        let map = IntToIntSetMap::new(4, 0.75);
        let _ = map.get(-1);
    }

    #[test]
    fn test_full_load_factor_absent_lookup_terminates() {
        let mut map = IntToIntSetMap::new(4, 1.0);
        for key in 0..4 {
            map.add(key, key);
        }
        assert!(map.get(99).is_empty());
        for key in 0..4 {
            assert_eq!(map.get(key), &[key]);
        }
    }

    #[test]
    fn test_remove_values_and_keys() {
        let mut map = IntToIntSetMap::new(2, 1.0);
        for key in 0..200 {
            map.add(key, 1);
            map.add(key, 2);
        }
        assert!(map.remove(5, 1));
        assert!(!map.remove(5, 1));
        assert!(!map.remove(1000, 1));
        assert_eq!(map.get(5), &[2]);
        assert_eq!(map.len(), 200);

        for key in (0..200).step_by(2) {
            map.remove(key, 1);
            map.remove(key, 2);
        }
        assert_eq!(map.len(), 100);
        for key in 0..200 {
            if key % 2 == 0 {
                assert!(map.get(key).is_empty());
            } else if key != 5 {
                assert_eq!(map.get(key), &[1, 2]);
            }
        }
    }

    #[test]
    fn test_growth_keeps_all_sets() {
        let mut map = IntToIntSetMap::new(2, 0.75);
        for key in 0..500 {
            map.add(key, key * 2);
            map.add(key, key * 2 + 1);
        }
        assert_eq!(map.len(), 500);
        for key in 0..500 {
            assert_eq!(map.get(key), &[key * 2, key * 2 + 1]);
        }
    }

    #[test]
    fn test_clear() {
        let mut map = IntToIntSetMap::new(4, 0.75);
        map.add(3, 1);
        map.clear();
        assert!(map.is_empty());
        assert!(map.get(3).is_empty());
    }

    #[test]
    #[should_panic(expected = "non-negative")]
    fn test_negative_key_fails_fast() {
        let mut map = IntToIntSetMap::new(4, 0.75);
        map.add(-1, 0);
    }
}
