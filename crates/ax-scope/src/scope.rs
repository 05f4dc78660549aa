//! Scope nodes and their entry lists.

use crate::handle::{ObjectId, ScopeId};

/// Something owned by a scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Attachment {
    /// An object.
    Object(ObjectId),
    /// A child scope.
    Scope(ScopeId),
}

/// One node of the ownership tree.
///
/// Entries keep attachment order. Detaching leaves a tombstone so that the
/// slots of the remaining entries stay put until the next compaction.
#[derive(Debug)]
pub(crate) struct ScopeNode {
    pub(crate) parent: Option<ScopeId>,
    pub(crate) slot_in_parent: u32,
    entries: Vec<Option<Attachment>>,
    live: usize,
}

impl ScopeNode {
    pub(crate) fn root() -> Self {
        Self {
            parent: None,
            slot_in_parent: 0,
            entries: Vec::new(),
            live: 0,
        }
    }

    pub(crate) fn child(parent: ScopeId) -> Self {
        Self {
            parent: Some(parent),
            ..Self::root()
        }
    }

    /// Append an attachment and return its slot.
    pub(crate) fn push(&mut self, attachment: Attachment) -> u32 {
        let slot = slot_index(self.entries.len(), "scope entry");
        self.entries.push(Some(attachment));
        self.live += 1;
        slot
    }

    /// Tombstone `slot`. Trailing tombstones are dropped right away.
    pub(crate) fn vacate(&mut self, slot: u32) -> Option<Attachment> {
        let attachment = self.entries.get_mut(slot as usize)?.take()?;
        self.live -= 1;
        while matches!(self.entries.last(), Some(None)) {
            self.entries.pop();
        }
        Some(attachment)
    }

    /// Remove and return the most recent live attachment.
    pub(crate) fn pop_last(&mut self) -> Option<Attachment> {
        while let Some(entry) = self.entries.pop() {
            if let Some(attachment) = entry {
                self.live -= 1;
                return Some(attachment);
            }
        }
        None
    }

    pub(crate) fn len(&self) -> usize {
        self.live
    }

    pub(crate) fn tombstones(&self) -> usize {
        self.entries.len() - self.live
    }

    pub(crate) fn needs_compaction(&self, threshold: usize) -> bool {
        let dead = self.tombstones();
        dead > self.live && dead >= threshold
    }

    /// Drop all tombstones. Returns every live attachment with its new slot.
    pub(crate) fn compact(&mut self) -> Vec<(Attachment, u32)> {
        self.entries.retain(Option::is_some);
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(slot, entry)| entry.map(|a| (a, slot as u32)))
            .collect()
    }

    /// Live attachments in attachment order.
    pub(crate) fn attachments(&self) -> impl Iterator<Item = Attachment> + '_ {
        self.entries.iter().flatten().copied()
    }
}

pub(crate) fn slot_index(len: usize, what: &str) -> u32 {
    match u32::try_from(len) {
        Ok(index) => index,
        Err(_) => panic!("{what} slots exhausted"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj(i: u32) -> Attachment {
        Attachment::Object(ObjectId::new(i, 0))
    }

    #[test]
    fn vacate_keeps_other_slots() {
        let mut node = ScopeNode::root();
        let a = node.push(obj(0));
        let b = node.push(obj(1));
        let c = node.push(obj(2));
        assert_eq!((a, b, c), (0, 1, 2));
        assert_eq!(node.vacate(b), Some(obj(1)));
        assert_eq!(node.len(), 2);
        assert_eq!(node.tombstones(), 1);
        assert_eq!(node.vacate(b), None);
        assert_eq!(node.attachments().collect::<Vec<_>>(), vec![obj(0), obj(2)]);
    }

    #[test]
    fn trailing_tombstones_are_trimmed() {
        let mut node = ScopeNode::root();
        node.push(obj(0));
        node.push(obj(1));
        node.push(obj(2));
        node.vacate(1);
        node.vacate(2);
        assert_eq!(node.tombstones(), 0);
        assert_eq!(node.push(obj(3)), 1);
    }

    #[test]
    fn pop_last_skips_tombstones() {
        let mut node = ScopeNode::root();
        node.push(obj(0));
        node.push(obj(1));
        node.push(obj(2));
        node.vacate(1);
        assert_eq!(node.pop_last(), Some(obj(2)));
        assert_eq!(node.pop_last(), Some(obj(0)));
        assert_eq!(node.pop_last(), None);
        assert_eq!(node.len(), 0);
    }

    #[test]
    fn compact_renumbers_in_order() {
        let mut node = ScopeNode::root();
        for i in 0..6 {
            node.push(obj(i));
        }
        for slot in [0, 1, 3, 4] {
            node.vacate(slot);
        }
        assert!(node.needs_compaction(2));
        assert!(!node.needs_compaction(5));
        let moved = node.compact();
        assert_eq!(moved, vec![(obj(2), 0), (obj(5), 1)]);
        assert_eq!(node.tombstones(), 0);
    }
}
