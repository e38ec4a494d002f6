use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

use crate::hash::DefaultHashBuilder;
use crate::hash_table::DEFAULT_LOAD_FACTOR;
use crate::hash_table::Entry as TableEntry;
use crate::hash_table::HashTable;

/// A hash set implemented on the bounded-linear-probing [`HashTable`].
///
/// `HashSet<T, S>` stores one physical copy of each distinct value. Inserting
/// a value that is already present keeps the stored copy and reports the
/// attempt through the returned `bool`; [`replace`](Self::replace) swaps the
/// stored copy out instead, handing the old one back.
///
/// Iteration order is arbitrary.
///
/// # Examples
///
/// ```rust
/// use probe_hash::HashSet;
///
/// let mut set: HashSet<_> = HashSet::new();
/// assert!(set.insert("a"));
/// assert!(!set.insert("a"));
///
/// assert!(set.contains(&"a"));
/// assert!(set.remove(&"a"));
/// assert!(set.is_empty());
/// ```
#[derive(Clone)]
pub struct HashSet<T, S = DefaultHashBuilder> {
    table: HashTable<T>,
    hash_builder: S,
}

impl<T, S> Debug for HashSet<T, S>
where
    T: Debug + Hash + Eq,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut set = f.debug_set();
        for value in self.iter() {
            set.entry(value);
        }
        set.finish()
    }
}

impl<T, S> HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Creates a new hash set with the given hasher builder.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_capacity_and_hasher(0, hash_builder)
    }

    /// Creates a new hash set holding `capacity` values before its first
    /// resize, with the given hasher builder.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self::with_load_factor_and_hasher(capacity, DEFAULT_LOAD_FACTOR, hash_builder)
    }

    /// Creates a new hash set with an explicit load factor and hasher
    /// builder.
    ///
    /// # Panics
    ///
    /// Panics unless `load_factor` lies in the open interval (0, 1).
    pub fn with_load_factor_and_hasher(capacity: usize, load_factor: f64, hash_builder: S) -> Self {
        Self {
            table: HashTable::with_capacity_and_load_factor(capacity, load_factor),
            hash_builder,
        }
    }

    /// Returns the number of values in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no values.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the physical slot count of the underlying table.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Returns the configured load factor.
    pub fn load_factor(&self) -> f64 {
        self.table.load_factor()
    }

    /// Removes every value and releases the set's storage, keeping the
    /// construction-time capacity. The set remains usable.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Adds a value to the set.
    ///
    /// Returns `true` if the value was not already present. If it was, the
    /// stored copy is kept, the argument is dropped, and `false` is
    /// returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashSet;
    ///
    /// let mut set: HashSet<_> = HashSet::new();
    /// assert!(set.insert(2));
    /// assert!(!set.insert(2));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, value: T) -> bool {
        let hash = self.hash_builder.hash_one(&value);
        match self.table.entry(hash, |stored| stored == &value) {
            TableEntry::Occupied(_) => false,
            TableEntry::Vacant(entry) => {
                entry.insert(value);
                true
            }
        }
    }

    /// Adds a value to the set, replacing an equal stored value if one is
    /// present and returning it.
    ///
    /// Useful when values carry data their `Eq` implementation ignores.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashSet;
    ///
    /// let mut set: HashSet<_> = HashSet::new();
    /// set.insert("a");
    /// assert_eq!(set.replace("a"), Some("a"));
    /// assert_eq!(set.replace("b"), None);
    /// ```
    pub fn replace(&mut self, value: T) -> Option<T> {
        let hash = self.hash_builder.hash_one(&value);
        match self.table.entry(hash, |stored| stored == &value) {
            TableEntry::Occupied(mut entry) => Some(entry.insert(value)),
            TableEntry::Vacant(entry) => {
                entry.insert(value);
                None
            }
        }
    }

    /// Returns `true` if the set contains the value.
    pub fn contains(&self, value: &T) -> bool {
        self.get(value).is_some()
    }

    /// Returns a reference to the stored value equal to the given value, if
    /// any.
    pub fn get(&self, value: &T) -> Option<&T> {
        let hash = self.hash_builder.hash_one(value);
        self.table.find(hash, |stored| stored == value)
    }

    /// Removes a value from the set. Returns `true` if it was present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::HashSet;
    ///
    /// let mut set: HashSet<_> = HashSet::new();
    /// set.insert(2);
    /// assert!(set.remove(&2));
    /// assert!(!set.remove(&2));
    /// ```
    pub fn remove(&mut self, value: &T) -> bool {
        self.take(value).is_some()
    }

    /// Removes and returns the stored value equal to the given value, if
    /// any.
    pub fn take(&mut self, value: &T) -> Option<T> {
        let hash = self.hash_builder.hash_one(value);
        self.table.remove(hash, |stored| stored == value)
    }

    /// Returns an iterator over the values of the set, in arbitrary order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator that removes and yields all values, leaving the
    /// set cleared.
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain {
            inner: self.table.drain(),
        }
    }
}

impl<T, S> HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates a new hash set using the default FNV-1a hasher builder.
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates a new hash set holding `capacity` values before its first
    /// resize.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, S::default())
    }

    /// Creates a new hash set with an explicit load factor.
    ///
    /// # Panics
    ///
    /// Panics unless `load_factor` lies in the open interval (0, 1).
    pub fn with_load_factor(capacity: usize, load_factor: f64) -> Self {
        Self::with_load_factor_and_hasher(capacity, load_factor, S::default())
    }
}

impl<T, S> Default for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S> PartialEq for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|value| other.contains(value))
    }
}

impl<T, S> Eq for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
}

impl<T, S> Extend<T> for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T, S> FromIterator<T> for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

/// An iterator over the values of a `HashSet`.
pub struct Iter<'a, T> {
    inner: crate::hash_table::Iter<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// A draining iterator over the values of a `HashSet`.
pub struct Drain<'a, T> {
    inner: crate::hash_table::Drain<'a, T>,
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// An owning iterator over the values of a `HashSet`.
pub struct IntoIter<T> {
    inner: crate::hash_table::IntoIter<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

impl<T, S> IntoIterator for HashSet<T, S> {
    type IntoIter = IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> IntoIter<T> {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, T, S> IntoIterator for &'a HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}
