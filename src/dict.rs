use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::hash::DefaultHashBuilder;
use crate::hash_table::DEFAULT_LOAD_FACTOR;

struct Node<K, V> {
    key: K,
    hash: u64,
    value: V,
    next: Option<Box<Node<K, V>>>,
}

/// A hash map using separate chaining instead of open addressing.
///
/// Each bucket holds its first entry embedded directly in the bucket array;
/// colliding entries hang off the head in a singly-linked chain of boxed
/// nodes. Removing a chain's head promotes the first overflow node into the
/// embedded slot. Every node caches its 64-bit digest so resizing never
/// rehashes keys.
///
/// Compared to [`HashMap`](crate::HashMap), lookups in a `Dict` are bounded
/// only by the length of one bucket's chain, which is O(len) under
/// pathological hashing but short in practice at the configured load
/// factor.
///
/// Iteration order is arbitrary.
///
/// # Examples
///
/// ```rust
/// use probe_hash::Dict;
///
/// let mut dict: Dict<_, _> = Dict::new();
/// dict.insert("a", 1);
/// dict.insert("b", 2);
///
/// assert_eq!(dict.get(&"a"), Some(&1));
/// assert_eq!(dict.remove(&"b"), Some(2));
/// assert_eq!(dict.len(), 1);
/// ```
pub struct Dict<K, V, S = DefaultHashBuilder> {
    buckets: Vec<Option<Node<K, V>>>,
    len: usize,
    capacity: usize,
    load_factor: f64,
    initial_capacity: usize,
    hash_builder: S,
}

impl<K, V, S> Dict<K, V, S> {
    /// Returns the number of entries in the dictionary.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the dictionary contains no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the current bucket count.
    ///
    /// Unlike the open-addressing containers, the bucket count is the
    /// requested capacity as-is; entries beyond it chain rather than probe.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the configured load factor.
    pub fn load_factor(&self) -> f64 {
        self.load_factor
    }

    /// Removes every entry and releases the bucket array, keeping the
    /// construction-time capacity. The dictionary remains usable.
    pub fn clear(&mut self) {
        // Flatten each chain before dropping it so a long chain cannot
        // overflow the stack through recursive box drops.
        for bucket in &mut self.buckets {
            let mut next = bucket.take().and_then(|head| head.next);
            while let Some(node) = next {
                next = node.next;
            }
        }
        self.buckets = Vec::new();
        self.len = 0;
        self.capacity = self.initial_capacity;
    }

    /// Returns an iterator over the key-value pairs, in arbitrary order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            buckets: self.buckets.iter(),
            node: None,
        }
    }

    // Hangs a detached node into the bucket it belongs to, either as the
    // embedded head or spliced in directly behind it. The caller is
    // responsible for `len` and for the node's `next` being empty.
    fn relink(&mut self, node: Node<K, V>) {
        let index = (node.hash % self.capacity as u64) as usize;
        match &mut self.buckets[index] {
            bucket @ None => *bucket = Some(node),
            Some(head) => {
                let next = head.next.take();
                head.next = Some(Box::new(Node { next, ..node }));
            }
        }
    }
}

impl<K, V, S> Dict<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Creates a new dictionary with the given hasher builder.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_capacity_and_hasher(0, hash_builder)
    }

    /// Creates a new dictionary with `capacity` buckets and the given hasher
    /// builder.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Self {
        Self::with_load_factor_and_hasher(capacity, DEFAULT_LOAD_FACTOR, hash_builder)
    }

    /// Creates a new dictionary with an explicit load factor and hasher
    /// builder.
    ///
    /// # Panics
    ///
    /// Panics unless `load_factor` lies in the open interval (0, 1).
    pub fn with_load_factor_and_hasher(capacity: usize, load_factor: f64, hash_builder: S) -> Self {
        assert!(
            load_factor > 0.0 && load_factor < 1.0,
            "load factor must lie in the open interval (0, 1), got {load_factor}"
        );

        Self {
            buckets: Vec::new(),
            len: 0,
            capacity,
            load_factor,
            initial_capacity: capacity,
            hash_builder,
        }
    }

    /// Inserts a key-value pair into the dictionary.
    ///
    /// If the dictionary did not have this key present, `None` is returned.
    /// If it did, the value is replaced and the old value is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::Dict;
    ///
    /// let mut dict: Dict<_, _> = Dict::new();
    /// assert_eq!(dict.insert(37, "a"), None);
    /// assert_eq!(dict.insert(37, "b"), Some("a"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.hash_builder.hash_one(&key);

        while (self.len + 1) as f64 > self.capacity as f64 * self.load_factor {
            self.resize();
        }
        if self.buckets.is_empty() {
            self.buckets.resize_with(self.capacity, || None);
        }

        let index = (hash % self.capacity as u64) as usize;

        {
            let mut node = self.buckets[index].as_mut();
            while let Some(n) = node {
                if n.hash == hash && n.key == key {
                    return Some(core::mem::replace(&mut n.value, value));
                }
                node = n.next.as_deref_mut();
            }
        }

        self.len += 1;
        match &mut self.buckets[index] {
            bucket @ None => {
                *bucket = Some(Node {
                    key,
                    hash,
                    value,
                    next: None,
                });
            }
            Some(head) => {
                let next = head.next.take();
                head.next = Some(Box::new(Node {
                    key,
                    hash,
                    value,
                    next,
                }));
            }
        }
        None
    }

    /// Returns a reference to the value corresponding to the key.
    pub fn get(&self, key: &K) -> Option<&V> {
        if self.len == 0 {
            return None;
        }

        let hash = self.hash_builder.hash_one(key);
        let index = (hash % self.capacity as u64) as usize;

        let mut node = self.buckets[index].as_ref();
        while let Some(n) = node {
            if n.hash == hash && n.key == *key {
                return Some(&n.value);
            }
            node = n.next.as_deref();
        }
        None
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        if self.len == 0 {
            return None;
        }

        let hash = self.hash_builder.hash_one(key);
        let index = (hash % self.capacity as u64) as usize;

        let mut node = self.buckets[index].as_mut();
        while let Some(n) = node {
            if n.hash == hash && n.key == *key {
                return Some(&mut n.value);
            }
            node = n.next.as_deref_mut();
        }
        None
    }

    /// Returns `true` if the dictionary contains the key.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Removes a key from the dictionary, returning its value if it was
    /// present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_hash::Dict;
    ///
    /// let mut dict: Dict<_, _> = Dict::new();
    /// dict.insert(1, "a");
    /// assert_eq!(dict.remove(&1), Some("a"));
    /// assert_eq!(dict.remove(&1), None);
    /// ```
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, v)| v)
    }

    /// Removes a key from the dictionary, returning the stored key and
    /// value if the key was present.
    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        if self.len == 0 {
            return None;
        }

        let hash = self.hash_builder.hash_one(key);
        let index = (hash % self.capacity as u64) as usize;
        let bucket = &mut self.buckets[index];

        // Removing the head promotes the first overflow node into the
        // embedded slot.
        match bucket.take() {
            None => return None,
            Some(head) if head.hash == hash && head.key == *key => {
                let Node {
                    key, value, next, ..
                } = head;
                *bucket = next.map(|boxed| *boxed);
                self.len -= 1;
                return Some((key, value));
            }
            Some(head) => *bucket = Some(head),
        }

        let mut cur = match bucket {
            Some(head) => &mut head.next,
            None => return None,
        };
        loop {
            match cur.take_if(|node| node.hash == hash && node.key == *key) {
                Some(node) => {
                    *cur = node.next;
                    self.len -= 1;
                    return Some((node.key, node.value));
                }
                None => match cur {
                    Some(node) => cur = &mut node.next,
                    None => return None,
                },
            }
        }
    }

    fn resize(&mut self) {
        self.capacity = (self.capacity as f64 / self.load_factor) as usize + 1;

        let old = core::mem::take(&mut self.buckets);
        self.buckets.resize_with(self.capacity, || None);

        // Re-bucket by cached digest; entries swap between embedded-head
        // and boxed-overflow roles as their new bucket dictates.
        for head in old.into_iter().flatten() {
            let mut node = head;
            loop {
                let next = node.next.take();
                self.relink(node);
                match next {
                    Some(boxed) => node = *boxed,
                    None => break,
                }
            }
        }
    }
}

impl<K, V, S> Dict<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates a new dictionary using the default FNV-1a hasher builder.
    pub fn new() -> Self {
        Self::with_hasher(S::default())
    }

    /// Creates a new dictionary with `capacity` buckets.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, S::default())
    }

    /// Creates a new dictionary with an explicit load factor.
    ///
    /// # Panics
    ///
    /// Panics unless `load_factor` lies in the open interval (0, 1).
    pub fn with_load_factor(capacity: usize, load_factor: f64) -> Self {
        Self::with_load_factor_and_hasher(capacity, load_factor, S::default())
    }
}

impl<K, V, S> Drop for Dict<K, V, S> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K, V, S> Clone for Dict<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        let mut copy = Self {
            buckets: Vec::new(),
            len: self.len,
            capacity: self.capacity,
            load_factor: self.load_factor,
            initial_capacity: self.initial_capacity,
            hash_builder: self.hash_builder.clone(),
        };

        if self.len > 0 {
            copy.buckets.resize_with(copy.capacity, || None);
            for bucket in self.buckets.iter().flatten() {
                let mut node = Some(bucket);
                while let Some(n) = node {
                    copy.relink(Node {
                        key: n.key.clone(),
                        hash: n.hash,
                        value: n.value.clone(),
                        next: None,
                    });
                    node = n.next.as_deref();
                }
            }
        }

        copy
    }
}

impl<K, V, S> Debug for Dict<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.iter() {
            map.entry(k, v);
        }
        map.finish()
    }
}

impl<K, V, S> Default for Dict<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> Extend<(K, V)> for Dict<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for Dict<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = Self::new();
        dict.extend(iter);
        dict
    }
}

/// An iterator over the key-value pairs of a `Dict`.
pub struct Iter<'a, K, V> {
    buckets: core::slice::Iter<'a, Option<Node<K, V>>>,
    node: Option<&'a Node<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(node) = self.node {
                self.node = node.next.as_deref();
                return Some((&node.key, &node.value));
            }
            self.node = self.buckets.next()?.as_ref();
        }
    }
}

impl<'a, K, V, S> IntoIterator for &'a Dict<K, V, S> {
    type IntoIter = Iter<'a, K, V>;
    type Item = (&'a K, &'a V);

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}
