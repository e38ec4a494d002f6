//! 64-bit digest functions for the containers in this crate.
//!
//! Three classic non-cryptographic string hashes are provided, each exposed
//! two ways: as a streaming [`core::hash::Hasher`] so it plugs into any
//! container generic over [`BuildHasher`](core::hash::BuildHasher), and as a
//! one-shot free function over a byte slice. None of them are keyed or
//! collision-resistant against adversarial input; they are deterministic and
//! cheap, which is all the containers require.
//!
//! [`Fnv1a`] is the crate-wide default (see [`DefaultHashBuilder`]).

use core::hash::BuildHasherDefault;
use core::hash::Hasher;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Hashes `bytes` with FNV-1a in one shot.
///
/// # Examples
///
/// ```rust
/// assert_eq!(probe_hash::hash::fnv1a(b""), 0xcbf29ce484222325);
/// assert_ne!(probe_hash::hash::fnv1a(b"a"), probe_hash::hash::fnv1a(b"b"));
/// ```
pub fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Hashes `bytes` with DJB2 (Daniel J. Bernstein's `hash * 33 + c`) in one
/// shot.
pub fn djb2(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 5381;
    for byte in bytes {
        hash = (hash << 5)
            .wrapping_add(hash)
            .wrapping_add(u64::from(*byte));
    }
    hash
}

/// Hashes `bytes` with the sdbm database library's hash function in one shot.
pub fn sdbm(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0;
    for byte in bytes {
        hash = u64::from(*byte)
            .wrapping_add(hash << 6)
            .wrapping_add(hash << 16)
            .wrapping_sub(hash);
    }
    hash
}

/// Streaming Fowler-Noll-Vo (FNV-1a) hasher.
///
/// # Examples
///
/// ```rust
/// use core::hash::Hasher;
///
/// use probe_hash::hash::Fnv1a;
///
/// let mut hasher = Fnv1a::default();
/// hasher.write(b"hello");
/// assert_eq!(hasher.finish(), probe_hash::hash::fnv1a(b"hello"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Fnv1a(u64);

impl Default for Fnv1a {
    fn default() -> Self {
        Fnv1a(FNV_OFFSET_BASIS)
    }
}

impl Hasher for Fnv1a {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.0 ^= u64::from(*byte);
            self.0 = self.0.wrapping_mul(FNV_PRIME);
        }
    }
}

/// Streaming DJB2 hasher.
#[derive(Debug, Clone, Copy)]
pub struct Djb2(u64);

impl Default for Djb2 {
    fn default() -> Self {
        Djb2(5381)
    }
}

impl Hasher for Djb2 {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.0 = (self.0 << 5)
                .wrapping_add(self.0)
                .wrapping_add(u64::from(*byte));
        }
    }
}

/// Streaming SDBM hasher.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sdbm(u64);

impl Hasher for Sdbm {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.0 = u64::from(*byte)
                .wrapping_add(self.0 << 6)
                .wrapping_add(self.0 << 16)
                .wrapping_sub(self.0);
        }
    }
}

/// [`BuildHasher`](core::hash::BuildHasher) producing [`Fnv1a`] hashers.
pub type Fnv1aBuildHasher = BuildHasherDefault<Fnv1a>;

/// [`BuildHasher`](core::hash::BuildHasher) producing [`Djb2`] hashers.
pub type Djb2BuildHasher = BuildHasherDefault<Djb2>;

/// [`BuildHasher`](core::hash::BuildHasher) producing [`Sdbm`] hashers.
pub type SdbmBuildHasher = BuildHasherDefault<Sdbm>;

/// The hasher builder the containers use unless told otherwise.
pub type DefaultHashBuilder = Fnv1aBuildHasher;
