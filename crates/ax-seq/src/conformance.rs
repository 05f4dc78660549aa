//! Sequence contract checks.
//!
//! Every [`Seq`] implementation must pass these unmodified; only the cost
//! of the operations may differ between them. Each check takes a factory
//! producing an empty `i32` sequence.

use ax_core::{AxError, Direction, Seq};

fn filled<S: Seq<Elem = i32>>(make: &impl Fn() -> S, values: &[i32]) -> S {
    let mut s = make();
    for v in values {
        s.push(*v).unwrap();
    }
    s
}

fn forward<S: Seq<Elem = i32>>(s: &S) -> Vec<i32> {
    s.iter().copied().collect()
}

fn backward<S: Seq<Elem = i32>>(s: &S) -> Vec<i32> {
    s.iter_rev().copied().collect()
}

/// Empty sequences have coinciding sentinels and nothing to pop.
pub fn assert_empty_state<S: Seq<Elem = i32>>(make: &impl Fn() -> S) {
    let mut s = make();
    assert_eq!(s.size(), 0);
    assert!(s.is_empty());
    assert_eq!(s.begin(), s.end(), "begin != end on empty sequence");
    assert_eq!(s.rbegin(), s.rend(), "rbegin != rend on empty sequence");
    assert_eq!(s.front(), None);
    assert_eq!(s.back(), None);
    assert_eq!(s.pop(), Err(AxError::Empty));
    assert_eq!(s.size(), 0);
}

/// Forward iteration yields insertion order, reverse the opposite.
pub fn assert_iteration_order<S: Seq<Elem = i32>>(make: &impl Fn() -> S) {
    let s = filled(make, &[1, 2, 3]);
    assert_eq!(forward(&s), vec![1, 2, 3]);
    assert_eq!(backward(&s), vec![3, 2, 1]);
    assert_eq!(s.front(), Some(&1));
    assert_eq!(s.back(), Some(&3));
    let mut it = s.rbegin();
    assert_eq!(it.direction(), Direction::Backward);
    s.advance(&mut it);
    assert_eq!(s.get(&it), Some(&2));
}

/// `pop` returns the last pushed element.
pub fn assert_push_pop_lifo<S: Seq<Elem = i32>>(make: &impl Fn() -> S) {
    let mut s = filled(make, &[4, 5, 6]);
    assert_eq!(s.pop(), Ok(6));
    assert_eq!(s.pop(), Ok(5));
    s.push(7).unwrap();
    assert_eq!(forward(&s), vec![4, 7]);
}

/// `at` is valid up to and including `size`.
pub fn assert_positional_access<S: Seq<Elem = i32>>(make: &impl Fn() -> S) {
    let s = filled(make, &[10, 20, 30]);
    assert_eq!(s.get_at(0), Some(&10));
    assert_eq!(s.get_at(2), Some(&30));
    assert_eq!(s.at(3), Some(s.end()));
    assert_eq!(s.get_at(3), None);
    assert_eq!(s.at(4), None);
}

/// Forward insert lands before the iterator; backward insert lands before
/// it in reverse order. Either way the iterator designates the new value.
pub fn assert_insert_semantics<S: Seq<Elem = i32>>(make: &impl Fn() -> S) {
    let mut s = filled(make, &[1, 3]);
    let mut it = s.at(1).unwrap();
    s.insert(&mut it, 2).unwrap();
    assert_eq!(s.get(&it), Some(&2));
    assert_eq!(forward(&s), vec![1, 2, 3]);

    let mut end = s.end();
    s.insert(&mut end, 4).unwrap();
    assert_eq!(s.get(&end), Some(&4));
    assert_eq!(forward(&s), vec![1, 2, 3, 4]);

    let mut rb = s.rbegin();
    s.insert(&mut rb, 5).unwrap();
    assert_eq!(s.get(&rb), Some(&5));
    assert_eq!(forward(&s), vec![1, 2, 3, 4, 5]);

    let mut rend = s.rend();
    s.insert(&mut rend, 0).unwrap();
    assert_eq!(s.get(&rend), Some(&0));
    assert_eq!(forward(&s), vec![0, 1, 2, 3, 4, 5]);
}

/// Erase hands the value back and moves on in the iterator's direction.
pub fn assert_erase_semantics<S: Seq<Elem = i32>>(make: &impl Fn() -> S) {
    let mut s = filled(make, &[1, 2, 3, 4]);
    let mut it = s.at(1).unwrap();
    assert_eq!(s.erase(&mut it), Ok(2));
    assert_eq!(s.get(&it), Some(&3));

    let mut rit = s.rbegin();
    assert_eq!(s.erase(&mut rit), Ok(4));
    assert_eq!(s.get(&rit), Some(&3));
    assert_eq!(forward(&s), vec![1, 3]);

    let mut end = s.end();
    assert!(matches!(
        s.erase(&mut end),
        Err(AxError::OutOfRange { .. })
    ));
    let mut rend = s.rend();
    assert!(matches!(
        s.erase(&mut rend),
        Err(AxError::OutOfRange { .. })
    ));
    assert_eq!(s.size(), 2);
}

/// `trunc` shrinks from the tail and grows with default values.
pub fn assert_trunc<S: Seq<Elem = i32>>(make: &impl Fn() -> S) {
    let mut s = filled(make, &[1, 2, 3]);
    s.trunc(1).unwrap();
    assert_eq!(forward(&s), vec![1]);
    s.trunc(3).unwrap();
    assert_eq!(forward(&s), vec![1, 0, 0]);
    s.trunc(0).unwrap();
    assert!(s.is_empty());
}

/// `invert` reverses the order; inverting twice is the identity.
pub fn assert_invert<S: Seq<Elem = i32>>(make: &impl Fn() -> S) {
    let mut s = filled(make, &[1, 2, 3]);
    s.invert();
    assert_eq!(forward(&s), vec![3, 2, 1]);
    assert_eq!(backward(&s), vec![1, 2, 3]);
    s.invert();
    assert_eq!(forward(&s), vec![1, 2, 3]);
    let mut e = make();
    e.invert();
    assert!(e.is_empty());
}

/// `clear` empties the sequence and leaves it usable.
pub fn assert_clear<S: Seq<Elem = i32>>(make: &impl Fn() -> S) {
    let mut s = filled(make, &[1, 2]);
    s.clear();
    assert!(s.is_empty());
    assert_eq!(s.begin(), s.end());
    s.push(9).unwrap();
    assert_eq!(forward(&s), vec![9]);
}

/// `construct` builds an empty sequence with the given descriptor.
pub fn assert_construct<S: Seq<Elem = i32>>(make: &impl Fn() -> S) {
    let s = make();
    let fresh = S::construct(*s.elem_tr());
    assert!(fresh.is_empty());
    assert_eq!(fresh.elem_name(), s.elem_name());
    assert_ne!(fresh.begin(), s.begin(), "instances must not share identity");
}

/// Run every check against the sequences produced by `make`.
pub fn run_full_conformance<S: Seq<Elem = i32>>(make: impl Fn() -> S) {
    assert_empty_state(&make);
    assert_iteration_order(&make);
    assert_push_pop_lifo(&make);
    assert_positional_access(&make);
    assert_insert_semantics(&make);
    assert_erase_semantics(&make);
    assert_trunc(&make);
    assert_invert(&make);
    assert_clear(&make);
    assert_construct(&make);
}
