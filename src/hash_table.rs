//! The open-addressing engine shared by [`HashMap`](crate::HashMap) and
//! [`HashSet`](crate::HashSet).
//!
//! [`HashTable<V>`] stores values in a flat slot array and resolves
//! collisions by linear probing. It does not hash anything itself: every
//! operation takes a precomputed 64-bit digest and an equality predicate,
//! which is what lets the map and set variants share one engine.
//!
//! Probes are bounded by the worst probe distance currently present in the
//! table (`max_dist`). Removal simply empties a slot; because lookups scan
//! the whole `max_dist` window rather than stopping at the first hole, no
//! backward shifting and no tombstones are needed.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::marker::PhantomData;
use core::mem;

/// Load factor used by [`HashTable::with_capacity`] and the container types
/// built on it when none is given explicitly.
pub const DEFAULT_LOAD_FACTOR: f64 = 0.75;

struct Slot<V> {
    /// Digest cached at insertion; reused for comparisons and for resize so
    /// the value is never rehashed.
    hash: u64,
    value: V,
}

/// Re-places a slot into `slots` by its cached digest and returns the probe
/// distance used. Callers guarantee at least one empty slot exists.
fn place<V>(slots: &mut [Option<Slot<V>>], slot: Slot<V>) -> usize {
    let capacity = slots.len();
    let mut index = (slot.hash % capacity as u64) as usize;
    let mut dist = 0;
    while slots[index].is_some() {
        dist += 1;
        index = (index + 1) % capacity;
    }
    slots[index] = Some(slot);
    dist
}

/// Physical slot count for a requested capacity: `floor(c / f) + 1`, so `c`
/// live entries never exceed `capacity * f`.
fn derive_capacity(requested: usize, load_factor: f64) -> usize {
    (requested as f64 / load_factor) as usize + 1
}

enum Probe {
    Occupied(usize),
    Vacant { index: usize, dist: usize },
}

/// A low-level hash table using bounded linear probing.
///
/// `HashTable<V>` stores values of type `V` and provides insertion, lookup,
/// and removal. Unlike standard hash maps, this implementation requires you
/// to provide both the hash value and an equality predicate for each
/// operation.
///
/// The slot array is allocated lazily on the first [`entry`](Self::entry)
/// call, grows to `floor(capacity / load_factor) + 1` slots whenever an
/// insert would push the live count past `capacity * load_factor`, and never
/// shrinks.
///
/// # Example
///
/// ```rust
/// use core::hash::BuildHasher;
///
/// use probe_hash::hash::DefaultHashBuilder;
/// use probe_hash::hash_table::Entry;
/// use probe_hash::hash_table::HashTable;
///
/// let hasher = DefaultHashBuilder::default();
/// let mut table: HashTable<(u32, &str)> = HashTable::with_capacity(8);
///
/// let hash = hasher.hash_one(1u32);
/// match table.entry(hash, |(k, _)| *k == 1) {
///     Entry::Vacant(entry) => {
///         entry.insert((1, "one"));
///     }
///     Entry::Occupied(_) => unreachable!(),
/// }
///
/// assert_eq!(table.find(hash, |(k, _)| *k == 1), Some(&(1, "one")));
/// ```
pub struct HashTable<V> {
    /// Empty until the first insert; `capacity` entries once allocated.
    slots: Vec<Option<Slot<V>>>,
    len: usize,
    capacity: usize,
    /// Worst probe distance of any live entry. Probe termination bound for
    /// find/remove; recomputed (and possibly lowered) on resize.
    max_dist: usize,
    load_factor: f64,
    /// Capacity derived at construction, restored by [`clear`](Self::clear).
    initial_capacity: usize,
}

impl<V> Debug for HashTable<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashTable")
            .field("len", &self.len)
            .field("capacity", &self.capacity)
            .field("max_dist", &self.max_dist)
            .field("load_factor", &self.load_factor)
            .finish()
    }
}

impl<V> HashTable<V> {
    /// Creates a table that can hold `capacity` values before resizing, with
    /// the default load factor of 0.75.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<u64> = HashTable::with_capacity(100);
    /// assert!(table.capacity() > 100);
    /// assert!(table.is_empty());
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_load_factor(capacity, DEFAULT_LOAD_FACTOR)
    }

    /// Creates a table that can hold `capacity` values before resizing.
    ///
    /// The physical slot count is `floor(capacity / load_factor) + 1`. A
    /// load factor near 1 favors memory density; near 0, shorter probe
    /// chains.
    ///
    /// # Panics
    ///
    /// Panics unless `load_factor` lies in the open interval (0, 1).
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use probe_hash::hash_table::HashTable;
    /// #
    /// let table: HashTable<u64> = HashTable::with_capacity_and_load_factor(2, 0.75);
    /// assert_eq!(table.capacity(), 3);
    /// ```
    pub fn with_capacity_and_load_factor(capacity: usize, load_factor: f64) -> Self {
        assert!(
            load_factor > 0.0 && load_factor < 1.0,
            "load factor must lie in the open interval (0, 1), got {load_factor}"
        );
        let physical = derive_capacity(capacity, load_factor);
        HashTable {
            slots: Vec::new(),
            len: 0,
            capacity: physical,
            max_dist: 0,
            load_factor,
            initial_capacity: physical,
        }
    }

    /// Returns the number of values in the table.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the table contains no values.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the physical slot count.
    ///
    /// This is the slot array length, not the number of values the table can
    /// hold before resizing; that is `capacity() * load_factor()`.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the configured load factor.
    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// Returns the worst-case probe distance currently present.
    ///
    /// Every lookup and removal examines at most `max_probe_distance() + 1`
    /// slots. Grows as collisions accumulate; only a resize can lower it.
    pub fn max_probe_distance(&self) -> usize {
        self.max_dist
    }

    /// Gets the entry for a value matching `eq` under the given digest, for
    /// in-place manipulation.
    ///
    /// Allocates the slot array on first use, and resizes first whenever one
    /// more value would push the table past its load factor, so a vacant
    /// entry can always be inserted into.
    ///
    /// `hash` must be the digest of whatever `eq` matches; it is cached in
    /// the slot on insert and reused for comparisons and resize.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use core::hash::BuildHasher;
    /// #
    /// # use probe_hash::hash::DefaultHashBuilder;
    /// # use probe_hash::hash_table::Entry;
    /// # use probe_hash::hash_table::HashTable;
    /// #
    /// let hasher = DefaultHashBuilder::default();
    /// let mut table: HashTable<u32> = HashTable::with_capacity(0);
    ///
    /// let hash = hasher.hash_one(7u32);
    /// if let Entry::Vacant(entry) = table.entry(hash, |v| *v == 7) {
    ///     entry.insert(7);
    /// }
    /// assert!(matches!(table.entry(hash, |v| *v == 7), Entry::Occupied(_)));
    /// ```
    pub fn entry(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Entry<'_, V> {
        if self.slots.is_empty() {
            self.slots.resize_with(self.capacity, || None);
        }
        if (self.len + 1) as f64 > self.capacity as f64 * self.load_factor {
            self.resize();
        }
        match self.probe_insert(hash, &eq) {
            Probe::Occupied(index) => Entry::Occupied(OccupiedEntry { table: self, index }),
            Probe::Vacant { index, dist } => Entry::Vacant(VacantEntry {
                table: self,
                hash,
                index,
                dist,
            }),
        }
    }

    /// Returns a reference to the value matching `eq` under the given
    /// digest, if any.
    ///
    /// Probes at most `max_probe_distance() + 1` slots; holes left by
    /// removals are skipped, not treated as scan terminators.
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        let index = self.probe_find(hash, &eq)?;
        self.slots[index].as_ref().map(|slot| &slot.value)
    }

    /// Returns a mutable reference to the value matching `eq` under the
    /// given digest, if any.
    ///
    /// The parts of the value that `eq` and the cached digest depend on must
    /// not be mutated through the returned reference.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        let index = self.probe_find(hash, &eq)?;
        self.slots[index].as_mut().map(|slot| &mut slot.value)
    }

    /// Removes and returns the value matching `eq` under the given digest,
    /// if any.
    ///
    /// The slot is simply emptied: no backward shift, no tombstone. Later
    /// probes stay correct because they are bounded by the table-wide
    /// [`max_probe_distance`](Self::max_probe_distance) rather than stopping
    /// at the first empty slot.
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<V> {
        let index = self.probe_find(hash, &eq)?;
        let slot = self.slots[index].take()?;
        self.len -= 1;
        Some(slot.value)
    }

    /// Drops every value, releases the slot array, and restores the
    /// construction-time capacity. The table remains usable.
    pub fn clear(&mut self) {
        self.slots = Vec::new();
        self.len = 0;
        self.max_dist = 0;
        self.capacity = self.initial_capacity;
    }

    /// Returns an iterator over the values in arbitrary order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            inner: self.slots.iter(),
        }
    }

    /// Returns an iterator over mutable references to the values in
    /// arbitrary order.
    ///
    /// The same caveat as [`find_mut`](Self::find_mut) applies.
    pub fn iter_mut(&mut self) -> IterMut<'_, V> {
        IterMut {
            inner: self.slots.iter_mut(),
        }
    }

    /// Removes and yields every value, leaving the table cleared.
    pub fn drain(&mut self) -> Drain<'_, V> {
        self.len = 0;
        self.max_dist = 0;
        self.capacity = self.initial_capacity;
        Drain {
            inner: mem::take(&mut self.slots).into_iter(),
            _table: PhantomData,
        }
    }

    /// Grows the slot array to `floor(capacity / load_factor) + 1` and
    /// re-places every live slot by its cached digest.
    ///
    /// This is the one point where `max_dist` is recomputed from scratch, so
    /// it can shrink here and nowhere else.
    fn resize(&mut self) {
        let new_capacity = derive_capacity(self.capacity, self.load_factor);
        let mut slots: Vec<Option<Slot<V>>> = Vec::new();
        slots.resize_with(new_capacity, || None);

        let mut max_dist = 0;
        for slot in mem::replace(&mut self.slots, slots).into_iter().flatten() {
            let dist = place(&mut self.slots, slot);
            max_dist = max_dist.max(dist);
        }
        self.capacity = new_capacity;
        self.max_dist = max_dist;
    }

    /// Bounded match scan for find/remove: at most `max_dist + 1` probes
    /// from the digest's home slot.
    fn probe_find(&self, hash: u64, eq: &impl Fn(&V) -> bool) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let mut index = (hash % self.capacity as u64) as usize;
        for _ in 0..=self.max_dist {
            if let Some(slot) = &self.slots[index] {
                if slot.hash == hash && eq(&slot.value) {
                    return Some(index);
                }
            }
            index = (index + 1) % self.capacity;
        }
        None
    }

    /// Insert-position scan. Examines the full `max_dist` window for a
    /// duplicate before committing to a hole, so a remove-then-reinsert
    /// interleaving can never leave two live slots matching one key.
    fn probe_insert(&self, hash: u64, eq: &impl Fn(&V) -> bool) -> Probe {
        let capacity = self.capacity;
        let mut index = (hash % capacity as u64) as usize;
        let mut dist = 0;
        let mut hole = None;
        loop {
            match &self.slots[index] {
                Some(slot) => {
                    if slot.hash == hash && eq(&slot.value) {
                        return Probe::Occupied(index);
                    }
                }
                None => {
                    if hole.is_none() {
                        hole = Some((index, dist));
                    }
                }
            }
            if dist == self.max_dist {
                break;
            }
            dist += 1;
            index = (index + 1) % capacity;
        }
        if let Some((index, dist)) = hole {
            return Probe::Vacant { index, dist };
        }
        // No match and no hole inside the bounded window; take the first
        // empty slot past it. The load-factor invariant guarantees one.
        loop {
            dist += 1;
            index = (index + 1) % capacity;
            if self.slots[index].is_none() {
                return Probe::Vacant { index, dist };
            }
        }
    }
}

impl<V> Clone for HashTable<V>
where
    V: Clone,
{
    /// Produces an independent table with the same logical contents.
    ///
    /// The copy is sized for `len()` values rather than duplicating the
    /// source's physical layout, so its capacity and probe distances may
    /// differ.
    fn clone(&self) -> Self {
        let mut copy = Self::with_capacity_and_load_factor(self.len, self.load_factor);
        if self.len == 0 {
            return copy;
        }
        copy.slots.resize_with(copy.capacity, || None);
        let mut max_dist = 0;
        for slot in self.slots.iter().flatten() {
            let dist = place(
                &mut copy.slots,
                Slot {
                    hash: slot.hash,
                    value: slot.value.clone(),
                },
            );
            max_dist = max_dist.max(dist);
        }
        copy.len = self.len;
        copy.max_dist = max_dist;
        copy
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<V> IntoIterator for HashTable<V> {
    type IntoIter = IntoIter<V>;
    type Item = V;

    fn into_iter(self) -> IntoIter<V> {
        IntoIter {
            inner: self.slots.into_iter(),
        }
    }
}

/// A view into a single slot of a [`HashTable`], which is either occupied or
/// vacant.
pub enum Entry<'a, V> {
    /// The probed window contains no matching value; inserting is possible
    /// without further probing.
    Vacant(VacantEntry<'a, V>),
    /// A value with a matching digest and equality predicate is present.
    Occupied(OccupiedEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value either way.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the value either way.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }

    /// Applies `f` to the value if the entry is occupied.
    pub fn and_modify(self, f: impl FnOnce(&mut V)) -> Self {
        match self {
            Entry::Occupied(mut entry) => {
                f(entry.get_mut());
                Entry::Occupied(entry)
            }
            Entry::Vacant(entry) => Entry::Vacant(entry),
        }
    }
}

/// A view into a vacant slot in a [`HashTable`].
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    hash: u64,
    index: usize,
    dist: usize,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Inserts `value` into the slot and returns a mutable reference to it.
    ///
    /// The digest passed to [`HashTable::entry`] is cached alongside the
    /// value; the probe distance of this slot raises the table's
    /// [`max_probe_distance`](HashTable::max_probe_distance) if it exceeds
    /// it.
    pub fn insert(self, value: V) -> &'a mut V {
        let VacantEntry {
            table,
            hash,
            index,
            dist,
        } = self;
        table.len += 1;
        if dist > table.max_dist {
            table.max_dist = dist;
        }
        &mut table.slots[index].insert(Slot { hash, value }).value
    }
}

/// A view into an occupied slot in a [`HashTable`].
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    index: usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    fn slot(&self) -> &Slot<V> {
        match &self.table.slots[self.index] {
            Some(slot) => slot,
            None => unreachable!("occupied entry targets a live slot"),
        }
    }

    fn slot_mut(&mut self) -> &mut Slot<V> {
        match &mut self.table.slots[self.index] {
            Some(slot) => slot,
            None => unreachable!("occupied entry targets a live slot"),
        }
    }

    /// Gets a reference to the value.
    pub fn get(&self) -> &V {
        &self.slot().value
    }

    /// Gets a mutable reference to the value.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.slot_mut().value
    }

    /// Converts the entry into a mutable reference to the value.
    pub fn into_mut(self) -> &'a mut V {
        match &mut self.table.slots[self.index] {
            Some(slot) => &mut slot.value,
            None => unreachable!("occupied entry targets a live slot"),
        }
    }

    /// Replaces the value and returns the old one.
    ///
    /// The cached digest is kept: the replacement must be equal under the
    /// digest and predicate used to locate this entry.
    pub fn insert(&mut self, value: V) -> V {
        mem::replace(&mut self.slot_mut().value, value)
    }

    /// Removes the value from the table and returns it, leaving an empty
    /// slot behind.
    pub fn remove(self) -> V {
        let removed = self.table.slots[self.index].take();
        self.table.len -= 1;
        match removed {
            Some(slot) => slot.value,
            None => unreachable!("occupied entry targets a live slot"),
        }
    }
}

/// An iterator over the values of a [`HashTable`].
pub struct Iter<'a, V> {
    inner: core::slice::Iter<'a, Option<Slot<V>>>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .find_map(|slot| slot.as_ref().map(|slot| &slot.value))
    }
}

/// A mutable iterator over the values of a [`HashTable`].
pub struct IterMut<'a, V> {
    inner: core::slice::IterMut<'a, Option<Slot<V>>>,
}

impl<'a, V> Iterator for IterMut<'a, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .find_map(|slot| slot.as_mut().map(|slot| &mut slot.value))
    }
}

/// A draining iterator over the values of a [`HashTable`].
///
/// The table is empty (and its slot array released) as soon as this is
/// created; dropping the iterator drops any values not yet yielded.
pub struct Drain<'a, V> {
    inner: alloc::vec::IntoIter<Option<Slot<V>>>,
    _table: PhantomData<&'a mut HashTable<V>>,
}

impl<V> Iterator for Drain<'_, V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find_map(|slot| slot.map(|slot| slot.value))
    }
}

/// An owning iterator over the values of a [`HashTable`].
pub struct IntoIter<V> {
    inner: alloc::vec::IntoIter<Option<Slot<V>>>,
}

impl<V> Iterator for IntoIter<V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.find_map(|slot| slot.map(|slot| slot.value))
    }
}
