//! Bucketed hash map.
//!
//! Pairs are grouped by the 64-bit hash of their key. Buckets live in an
//! [`IndexMap`] keyed by that hash, so every bucket has a dense index and a
//! position is simply `(bucket, slot)`. Empty buckets are removed
//! immediately; the last bucket takes the removed one's index, which is
//! why positions are only stable until the next structural mutation.

use std::mem;

use ax_core::{
    Any, AxError, BoxInstanceId, Boxed, Capability, Direction, Duplicate, Iter, Map, One, Stuff,
    Traverse, TypeInfo,
};
use ax_scope::{Handle, Runtime, ScopeId};
use indexmap::IndexMap;
use smallvec::{smallvec, SmallVec};
use tracing::trace;

static HMAP: TypeInfo = TypeInfo::new(
    "one.any.box.map.hmap",
    &[
        Capability::One,
        Capability::Any,
        Capability::Box,
        Capability::Map,
        Capability::Hmap,
    ],
);

type Bucket<K, V> = SmallVec<[(K, V); 1]>;

/// Position of a pair: bucket index and slot within the bucket. `None` is
/// the sentinel shared by `end` and `rend`.
pub type Slot = Option<(usize, usize)>;

/// A hash map whose key semantics come from a [`Stuff`] descriptor.
pub struct Hmap<K, V> {
    id: BoxInstanceId,
    key_tr: Stuff<K>,
    val_tr: Stuff<V>,
    buckets: IndexMap<u64, Bucket<K, V>>,
    len: usize,
}

impl<K: 'static, V: 'static> Hmap<K, V> {
    /// Create an empty map.
    pub fn new(key_tr: Stuff<K>, val_tr: Stuff<V>) -> Self {
        Self {
            id: BoxInstanceId::next(),
            key_tr,
            val_tr,
            buckets: IndexMap::new(),
            len: 0,
        }
    }

    /// Create an empty map owned by `scope`.
    pub fn create(
        rt: &mut Runtime,
        scope: ScopeId,
        key_tr: Stuff<K>,
        val_tr: Stuff<V>,
    ) -> Handle<Self> {
        rt.create(scope, Self::new(key_tr, val_tr))
    }

    /// Number of distinct key hashes in use.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Iterate over `(key, value)` pairs in traversal order.
    pub fn pairs(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.buckets
            .values()
            .flat_map(|bucket| bucket.iter().map(|(k, v)| (k, v)))
    }

    fn locate(&self, key: &K) -> Slot {
        let hash = self.key_tr.hash_of(key);
        let (b, _, bucket) = self.buckets.get_full(&hash)?;
        let s = bucket
            .iter()
            .position(|(k, _)| self.key_tr.equals(k, key))?;
        Some((b, s))
    }

    fn pair(&self, pos: Slot) -> Option<&(K, V)> {
        let (b, s) = pos?;
        self.buckets.get_index(b)?.1.get(s)
    }

    fn at(&self, pos: Slot, dir: Direction) -> Iter<Slot> {
        Iter::new(self.id, pos, dir)
    }
}

impl<K, V> Hmap<K, V> {
    fn release_all(&mut self) {
        let (key_tr, val_tr) = (self.key_tr, self.val_tr);
        for (_, bucket) in self.buckets.drain(..) {
            for (k, v) in bucket {
                key_tr.release(k);
                val_tr.release(v);
            }
        }
        self.len = 0;
    }
}

impl<K: 'static, V: 'static> One for Hmap<K, V> {
    fn type_info(&self) -> &'static TypeInfo {
        &HMAP
    }
}

impl<K: 'static, V: 'static> Duplicate for Hmap<K, V> {
    fn duplicate(&self) -> Result<Self, AxError> {
        let mut copy = Self::new(self.key_tr, self.val_tr);
        copy.buckets
            .try_reserve(self.buckets.len())
            .map_err(|_| AxError::AllocFailed {
                requested: self.buckets.len(),
            })?;
        for (hash, bucket) in &self.buckets {
            let dup: Bucket<K, V> = bucket
                .iter()
                .map(|(k, v)| (self.key_tr.dup(k), self.val_tr.dup(v)))
                .collect();
            copy.buckets.insert(*hash, dup);
        }
        copy.len = self.len;
        Ok(copy)
    }
}

impl<K: 'static, V: 'static> Any for Hmap<K, V> {
    fn copy(&self) -> Result<Box<dyn Any>, AxError> {
        Ok(Box::new(self.duplicate()?))
    }

    fn take(&mut self) -> Result<Box<dyn Any>, AxError> {
        let mut moved = Self::new(self.key_tr, self.val_tr);
        moved.buckets = mem::take(&mut self.buckets);
        moved.len = mem::take(&mut self.len);
        Ok(Box::new(moved))
    }

    fn as_boxed(&self) -> Option<&dyn Boxed> {
        Some(self)
    }

    fn as_boxed_mut(&mut self) -> Option<&mut dyn Boxed> {
        Some(self)
    }
}

impl<K: 'static, V: 'static> Boxed for Hmap<K, V> {
    fn size(&self) -> usize {
        self.len
    }

    fn maxsize(&self) -> usize {
        isize::MAX as usize / mem::size_of::<(K, V)>().max(1)
    }

    fn clear(&mut self) {
        self.release_all();
    }

    fn elem_name(&self) -> &'static str {
        self.val_tr.name
    }
}

impl<K: 'static, V: 'static> Traverse for Hmap<K, V> {
    type Elem = V;
    type Pos = Slot;

    fn begin(&self) -> Iter<Slot> {
        let pos = (!self.buckets.is_empty()).then_some((0, 0));
        self.at(pos, Direction::Forward)
    }

    fn end(&self) -> Iter<Slot> {
        self.at(None, Direction::Forward)
    }

    fn rbegin(&self) -> Iter<Slot> {
        let pos = self
            .buckets
            .last()
            .map(|(_, bucket)| (self.buckets.len() - 1, bucket.len() - 1));
        self.at(pos, Direction::Backward)
    }

    fn rend(&self) -> Iter<Slot> {
        self.at(None, Direction::Backward)
    }

    fn advance(&self, it: &mut Iter<Slot>) {
        let Some((b, s)) = it.pos() else {
            panic!("advance past the end of a map");
        };
        let next = if it.is_forward() {
            let in_bucket = self.buckets.get_index(b).map_or(0, |(_, bucket)| bucket.len());
            if s + 1 < in_bucket {
                Some((b, s + 1))
            } else if b + 1 < self.buckets.len() {
                Some((b + 1, 0))
            } else {
                None
            }
        } else if s > 0 {
            Some((b, s - 1))
        } else if b > 0 {
            self.buckets
                .get_index(b - 1)
                .map(|(_, bucket)| (b - 1, bucket.len() - 1))
        } else {
            None
        };
        it.set_pos(next);
    }

    fn get(&self, it: &Iter<Slot>) -> Option<&V> {
        self.pair(it.pos()).map(|(_, v)| v)
    }

    fn get_mut(&mut self, it: &Iter<Slot>) -> Option<&mut V> {
        let (b, s) = it.pos()?;
        let (_, bucket) = self.buckets.get_index_mut(b)?;
        bucket.get_mut(s).map(|(_, v)| v)
    }

    fn elem_tr(&self) -> &Stuff<V> {
        &self.val_tr
    }
}

impl<K: 'static, V: 'static> Map for Hmap<K, V> {
    type Key = K;

    fn key_tr(&self) -> &Stuff<K> {
        &self.key_tr
    }

    fn put(&mut self, key: K, value: V) -> Result<Iter<Slot>, AxError> {
        let hash = self.key_tr.hash_of(&key);
        let key_tr = self.key_tr;
        if let Some((b, _, bucket)) = self.buckets.get_full_mut(&hash) {
            if let Some(s) = bucket.iter().position(|(k, _)| key_tr.equals(k, &key)) {
                let old = mem::replace(&mut bucket[s].1, value);
                self.val_tr.release(old);
                key_tr.release(key);
                return Ok(self.at(Some((b, s)), Direction::Forward));
            }
            bucket.try_reserve(1).map_err(|_| AxError::AllocFailed {
                requested: bucket.len() + 1,
            })?;
            bucket.push((key, value));
            let s = bucket.len() - 1;
            trace!(hash, depth = s + 1, "hmap bucket collision");
            self.len += 1;
            return Ok(self.at(Some((b, s)), Direction::Forward));
        }
        let capacity = self.buckets.capacity();
        if self.buckets.len() == capacity {
            self.buckets
                .try_reserve(1)
                .map_err(|_| AxError::AllocFailed {
                    requested: capacity + 1,
                })?;
            trace!(from = capacity, to = self.buckets.capacity(), "hmap grow");
        }
        let (b, _) = self.buckets.insert_full(hash, smallvec![(key, value)]);
        self.len += 1;
        Ok(self.at(Some((b, 0)), Direction::Forward))
    }

    fn find(&self, key: &K) -> Iter<Slot> {
        self.at(self.locate(key), Direction::Forward)
    }

    fn remove(&mut self, key: &K) -> Result<V, AxError> {
        let (b, s) = self.locate(key).ok_or(AxError::Missing)?;
        let Some((_, bucket)) = self.buckets.get_index_mut(b) else {
            return Err(AxError::Missing);
        };
        let (stored, value) = bucket.remove(s);
        if bucket.is_empty() {
            self.buckets.swap_remove_index(b);
        }
        self.key_tr.release(stored);
        self.len -= 1;
        Ok(value)
    }

    fn iter_key(&self, it: &Iter<Slot>) -> Option<&K> {
        self.pair(it.pos()).map(|(k, _)| k)
    }
}

impl<K, V> Drop for Hmap<K, V> {
    fn drop(&mut self) {
        self.release_all();
    }
}

impl<K: std::fmt::Debug + 'static, V: std::fmt::Debug + 'static> std::fmt::Debug for Hmap<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.pairs()).finish()
    }
}
