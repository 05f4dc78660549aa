//! Doubly-linked sequence.
//!
//! Nodes live in a slab (`Vec`) and link to each other by index. Node 0 is
//! a sentinel that closes the ring: its `next` is the head and its `prev`
//! the tail, and it serves as both `end` and `rend`. Vacated nodes go on a
//! free list and are reused before the slab grows.

use std::mem;

use ax_core::{
    Any, AxError, BoxInstanceId, Boxed, Capability, Direction, Duplicate, Iter, One, Seq, Stuff,
    Traverse, TypeInfo,
};
use ax_scope::{Handle, Runtime, ScopeId};
use tracing::trace;

use crate::init::{init, FromItem, Item};

static LIST: TypeInfo = TypeInfo::new(
    "one.any.box.seq.list",
    &[
        Capability::One,
        Capability::Any,
        Capability::Box,
        Capability::Seq,
        Capability::List,
    ],
);

const SENTINEL: usize = 0;

struct Node<T> {
    value: Option<T>,
    prev: usize,
    next: usize,
}

impl<T> Node<T> {
    fn sentinel() -> Self {
        Self {
            value: None,
            prev: SENTINEL,
            next: SENTINEL,
        }
    }
}

/// A doubly-linked sequence with O(1) insert and erase at any iterator.
pub struct List<T> {
    id: BoxInstanceId,
    tr: Stuff<T>,
    nodes: Vec<Node<T>>,
    free: Vec<usize>,
    len: usize,
}

impl<T: 'static> List<T> {
    /// Create an empty list.
    pub fn new(tr: Stuff<T>) -> Self {
        Self {
            id: BoxInstanceId::next(),
            tr,
            nodes: vec![Node::sentinel()],
            free: Vec::new(),
            len: 0,
        }
    }

    /// Create an empty list owned by `scope`.
    pub fn create(rt: &mut Runtime, scope: ScopeId, tr: Stuff<T>) -> Handle<Self> {
        rt.create(scope, Self::new(tr))
    }

    /// Create a list holding `items`, owned by `scope`.
    ///
    /// # Panics
    ///
    /// If an item's type does not match the element type.
    pub fn init(
        rt: &mut Runtime,
        scope: ScopeId,
        tr: Stuff<T>,
        items: impl IntoIterator<Item = Item>,
    ) -> Result<Handle<Self>, AxError>
    where
        T: FromItem,
    {
        let mut list = Self::new(tr);
        init(&mut list, items)?;
        Ok(rt.create(scope, list))
    }

    fn is_node(&self, pos: usize) -> bool {
        self.nodes.get(pos).is_some_and(|n| n.value.is_some())
    }

    /// Store `value` in a fresh or recycled node, unlinked.
    fn alloc(&mut self, value: T) -> Result<usize, AxError> {
        if let Some(index) = self.free.pop() {
            self.nodes[index].value = Some(value);
            return Ok(index);
        }
        if self.nodes.len() == self.nodes.capacity() {
            let requested = self.nodes.len() + 1;
            self.nodes
                .try_reserve(1)
                .map_err(|_| AxError::AllocFailed { requested })?;
            trace!(slab = self.nodes.capacity(), "list grow");
        }
        self.nodes.push(Node {
            value: Some(value),
            prev: SENTINEL,
            next: SENTINEL,
        });
        Ok(self.nodes.len() - 1)
    }

    /// Link node `index` between `prev` and `prev.next`.
    fn link_after(&mut self, prev: usize, index: usize) {
        let next = self.nodes[prev].next;
        self.nodes[index].prev = prev;
        self.nodes[index].next = next;
        self.nodes[prev].next = index;
        self.nodes[next].prev = index;
        self.len += 1;
    }

    /// Unlink node `index` and recycle it, returning its value.
    fn unlink(&mut self, index: usize) -> Option<T> {
        let value = self.nodes[index].value.take()?;
        let Node { prev, next, .. } = self.nodes[index];
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
        self.free.push(index);
        self.len -= 1;
        Some(value)
    }

    /// Node at logical `index`, walking from whichever end is nearer.
    fn node_at(&self, index: usize) -> usize {
        if index < self.len / 2 {
            let mut cur = self.nodes[SENTINEL].next;
            for _ in 0..index {
                cur = self.nodes[cur].next;
            }
            cur
        } else {
            let mut cur = self.nodes[SENTINEL].prev;
            for _ in index + 1..self.len {
                cur = self.nodes[cur].prev;
            }
            cur
        }
    }
}

impl<T> List<T> {
    fn release_all(&mut self) {
        let tr = self.tr;
        let mut cur = self.nodes[SENTINEL].next;
        while cur != SENTINEL {
            let next = self.nodes[cur].next;
            if let Some(value) = self.nodes[cur].value.take() {
                tr.release(value);
            }
            cur = next;
        }
        self.nodes.truncate(1);
        self.nodes[SENTINEL] = Node::sentinel();
        self.free.clear();
        self.len = 0;
    }
}

impl<T: 'static> One for List<T> {
    fn type_info(&self) -> &'static TypeInfo {
        &LIST
    }
}

impl<T: 'static> Duplicate for List<T> {
    fn duplicate(&self) -> Result<Self, AxError> {
        let mut copy = Self::new(self.tr);
        copy.nodes
            .try_reserve_exact(self.len)
            .map_err(|_| AxError::AllocFailed {
                requested: self.len + 1,
            })?;
        for value in self.iter() {
            copy.push(self.tr.dup(value))?;
        }
        Ok(copy)
    }
}

impl<T: 'static> Any for List<T> {
    fn copy(&self) -> Result<Box<dyn Any>, AxError> {
        Ok(Box::new(self.duplicate()?))
    }

    fn take(&mut self) -> Result<Box<dyn Any>, AxError> {
        let mut moved = Self::new(self.tr);
        mem::swap(&mut moved.nodes, &mut self.nodes);
        mem::swap(&mut moved.free, &mut self.free);
        mem::swap(&mut moved.len, &mut self.len);
        Ok(Box::new(moved))
    }

    fn as_boxed(&self) -> Option<&dyn Boxed> {
        Some(self)
    }

    fn as_boxed_mut(&mut self) -> Option<&mut dyn Boxed> {
        Some(self)
    }
}

impl<T: 'static> Boxed for List<T> {
    fn size(&self) -> usize {
        self.len
    }

    fn maxsize(&self) -> usize {
        isize::MAX as usize / mem::size_of::<Node<T>>()
    }

    fn clear(&mut self) {
        self.release_all();
    }

    fn elem_name(&self) -> &'static str {
        self.tr.name
    }
}

impl<T: 'static> Traverse for List<T> {
    type Elem = T;
    type Pos = usize;

    fn begin(&self) -> Iter<usize> {
        Iter::new(self.id, self.nodes[SENTINEL].next, Direction::Forward)
    }

    fn end(&self) -> Iter<usize> {
        Iter::new(self.id, SENTINEL, Direction::Forward)
    }

    fn rbegin(&self) -> Iter<usize> {
        Iter::new(self.id, self.nodes[SENTINEL].prev, Direction::Backward)
    }

    fn rend(&self) -> Iter<usize> {
        Iter::new(self.id, SENTINEL, Direction::Backward)
    }

    fn advance(&self, it: &mut Iter<usize>) {
        let pos = it.pos();
        assert!(self.is_node(pos), "advance past the end of a list");
        let node = &self.nodes[pos];
        it.set_pos(if it.is_forward() { node.next } else { node.prev });
    }

    fn get(&self, it: &Iter<usize>) -> Option<&T> {
        self.nodes.get(it.pos())?.value.as_ref()
    }

    fn get_mut(&mut self, it: &Iter<usize>) -> Option<&mut T> {
        self.nodes.get_mut(it.pos())?.value.as_mut()
    }

    fn elem_tr(&self) -> &Stuff<T> {
        &self.tr
    }
}

impl<T: 'static> Seq for List<T> {
    fn construct(tr: Stuff<T>) -> Self {
        Self::new(tr)
    }

    fn push(&mut self, value: T) -> Result<(), AxError> {
        let index = self.alloc(value)?;
        let tail = self.nodes[SENTINEL].prev;
        self.link_after(tail, index);
        Ok(())
    }

    fn pop(&mut self) -> Result<T, AxError> {
        let tail = self.nodes[SENTINEL].prev;
        self.unlink(tail).ok_or(AxError::Empty)
    }

    fn invert(&mut self) {
        let mut cur = SENTINEL;
        loop {
            let node = &mut self.nodes[cur];
            mem::swap(&mut node.prev, &mut node.next);
            // After the swap `prev` holds the old forward link.
            cur = node.prev;
            if cur == SENTINEL {
                break;
            }
        }
    }

    fn trunc(&mut self, size: usize) -> Result<(), AxError> {
        if size <= self.len {
            let tr = self.tr;
            while self.len > size {
                let tail = self.nodes[SENTINEL].prev;
                if let Some(value) = self.unlink(tail) {
                    tr.release(value);
                }
            }
            return Ok(());
        }
        if size > self.maxsize() {
            return Err(AxError::CapacityExceeded {
                requested: size,
                max: self.maxsize(),
            });
        }
        let fresh = (size - self.len).saturating_sub(self.free.len());
        self.nodes
            .try_reserve_exact(fresh)
            .map_err(|_| AxError::AllocFailed { requested: size })?;
        while self.len < size {
            let value = self.tr.make();
            self.push(value)?;
        }
        Ok(())
    }

    fn at(&self, index: usize) -> Option<Iter<usize>> {
        match index {
            i if i > self.len => None,
            i if i == self.len => Some(self.end()),
            i => Some(Iter::new(self.id, self.node_at(i), Direction::Forward)),
        }
    }

    fn insert(&mut self, it: &mut Iter<usize>, value: T) -> Result<(), AxError> {
        let pos = it.pos();
        if pos != SENTINEL && !self.is_node(pos) {
            return Err(AxError::OutOfRange {
                index: pos,
                size: self.len,
            });
        }
        let index = self.alloc(value)?;
        let prev = if it.is_forward() {
            self.nodes[pos].prev
        } else {
            pos
        };
        self.link_after(prev, index);
        it.set_pos(index);
        Ok(())
    }

    fn erase(&mut self, it: &mut Iter<usize>) -> Result<T, AxError> {
        let pos = it.pos();
        if !self.is_node(pos) {
            return Err(AxError::OutOfRange {
                index: pos,
                size: self.len,
            });
        }
        let Node { prev, next, .. } = self.nodes[pos];
        let value = self.unlink(pos).ok_or(AxError::OutOfRange {
            index: pos,
            size: self.len,
        })?;
        it.set_pos(if it.is_forward() { next } else { prev });
        Ok(value)
    }
}

impl<T> Drop for List<T> {
    fn drop(&mut self) {
        self.release_all();
    }
}

impl<T: std::fmt::Debug + 'static> std::fmt::Debug for List<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("List")
            .field("elem", &self.tr.name)
            .field("items", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conformance;
    use ax_core::stuff::I32;
    use ax_test_utils::tracked::{self, TRACKED_U32};

    fn list_of(values: &[i32]) -> List<i32> {
        let mut l = List::new(I32);
        for v in values {
            l.push(*v).unwrap();
        }
        l
    }

    #[test]
    fn conformance() {
        conformance::run_full_conformance(|| List::new(I32));
    }

    #[test]
    fn end_and_rend_share_the_sentinel() {
        let l = list_of(&[1, 2]);
        assert_eq!(l.end(), l.rend());
        assert_ne!(l.begin(), l.rbegin());
    }

    #[test]
    fn erased_nodes_are_recycled() {
        let mut l = list_of(&[1, 2, 3]);
        let slab = l.nodes.len();
        let mut it = l.at(1).unwrap();
        assert_eq!(l.erase(&mut it), Ok(2));
        l.push(4).unwrap();
        assert_eq!(l.nodes.len(), slab);
        assert_eq!(l.iter().copied().collect::<Vec<_>>(), vec![1, 3, 4]);
    }

    #[test]
    fn at_walks_from_both_ends() {
        let l = list_of(&[10, 20, 30, 40, 50]);
        for (i, expected) in [10, 20, 30, 40, 50].iter().enumerate() {
            assert_eq!(l.get_at(i), Some(expected));
        }
        assert_eq!(l.at(5), Some(l.end()));
        assert_eq!(l.at(6), None);
    }

    #[test]
    fn invert_twice_restores_links() {
        let mut l = list_of(&[1, 2, 3, 4]);
        l.invert();
        assert_eq!(l.iter().copied().collect::<Vec<_>>(), vec![4, 3, 2, 1]);
        assert_eq!(l.iter_rev().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        l.invert();
        assert_eq!(l.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn clear_frees_in_order_and_resets() {
        tracked::reset();
        let mut l = List::new(TRACKED_U32);
        for v in [5, 6, 7] {
            l.push(v).unwrap();
        }
        l.clear();
        assert_eq!(tracked::freed(), vec![5, 6, 7]);
        assert!(l.is_empty());
        assert_eq!(l.begin(), l.end());
        l.push(8).unwrap();
        assert_eq!(l.front(), Some(&8));
    }

    #[test]
    fn trunc_reuses_free_nodes() {
        let mut l = list_of(&[1, 2, 3, 4]);
        l.trunc(1).unwrap();
        let slab = l.nodes.len();
        l.trunc(4).unwrap();
        assert_eq!(l.nodes.len(), slab);
        assert_eq!(l.iter().copied().collect::<Vec<_>>(), vec![1, 0, 0, 0]);
    }

    #[test]
    fn take_leaves_source_empty() {
        let mut l = list_of(&[1, 2]);
        let moved = l.take().unwrap();
        assert!(l.is_empty());
        assert_eq!(l.begin(), l.end());
        let moved = moved.downcast_ref::<List<i32>>().unwrap();
        assert_eq!(moved.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    #[should_panic(expected = "advance past the end")]
    fn advance_past_rend_panics() {
        let l = list_of(&[1]);
        let mut it = l.rend();
        l.advance(&mut it);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Clone, Debug)]
        enum Op {
            Push(i32),
            Pop,
            Insert(usize, i32),
            Erase(usize),
        }

        fn arb_op() -> impl Strategy<Value = Op> {
            prop_oneof![
                any::<i32>().prop_map(Op::Push),
                Just(Op::Pop),
                (any::<usize>(), any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
                any::<usize>().prop_map(Op::Erase),
            ]
        }

        proptest! {
            #[test]
            fn matches_vec_model(ops in prop::collection::vec(arb_op(), 0..64)) {
                let mut l = List::new(I32);
                let mut model: Vec<i32> = Vec::new();
                for op in ops {
                    match op {
                        Op::Push(v) => {
                            l.push(v).unwrap();
                            model.push(v);
                        }
                        Op::Pop => {
                            prop_assert_eq!(l.pop().ok(), model.pop());
                        }
                        Op::Insert(i, v) => {
                            let i = i % (model.len() + 1);
                            let mut it = l.at(i).unwrap();
                            l.insert(&mut it, v).unwrap();
                            prop_assert_eq!(l.get(&it), Some(&v));
                            model.insert(i, v);
                        }
                        Op::Erase(i) if !model.is_empty() => {
                            let i = i % model.len();
                            let mut it = l.at(i).unwrap();
                            prop_assert_eq!(l.erase(&mut it), Ok(model.remove(i)));
                            prop_assert_eq!(l.get(&it), model.get(i));
                        }
                        Op::Erase(_) => {}
                    }
                    prop_assert_eq!(l.size(), model.len());
                }
                prop_assert_eq!(l.iter().copied().collect::<Vec<_>>(), model);
            }
        }
    }
}
