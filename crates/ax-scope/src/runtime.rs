//! The object arena and scope tree.
//!
//! A [`Runtime`] owns every object and every scope node. Objects live in a
//! slot vector addressed by [`ObjectId`]; scopes live in a second slot
//! vector addressed by [`ScopeId`]. Both vectors recycle vacated slots
//! through a free list and bump the slot generation on every vacate, so an
//! id that outlives its target simply stops resolving.
//!
//! Ownership is expressed only through the tree: an object attached to a
//! scope is freed when that scope is cleared or torn down, children in the
//! reverse of their attachment order. A detached ("floating") object is
//! owned by nobody but the runtime itself, which frees it on drop.

use ax_core::{Any, Boxed, One};
use tracing::debug;

use crate::config::RuntimeConfig;
use crate::error::{ConfigError, ScopeError};
use crate::handle::{Handle, Linkage, ObjectId, ScopeId};
use crate::scope::{slot_index, Attachment, ScopeNode};

struct ObjectEntry {
    object: Box<dyn Any>,
    linkage: Option<Linkage>,
}

struct ObjectSlot {
    generation: u32,
    entry: Option<ObjectEntry>,
}

struct ScopeSlot {
    generation: u32,
    node: Option<ScopeNode>,
}

/// An object viewed at every level of its capability chain.
#[derive(Clone, Copy)]
pub struct Role<'a> {
    /// Base level.
    pub one: &'a dyn One,
    /// Value-semantics level.
    pub any: &'a dyn Any,
    /// Collection level, for objects that are collections.
    pub boxed: Option<&'a dyn Boxed>,
}

impl Role<'_> {
    /// Most specific type name.
    pub fn name(&self) -> &'static str {
        self.one.name()
    }
}

impl std::fmt::Debug for Role<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Role")
            .field("type", &self.one.type_info().chain())
            .field("boxed", &self.boxed.is_some())
            .finish()
    }
}

/// Owner of all objects and scopes.
pub struct Runtime {
    config: RuntimeConfig,
    objects: Vec<ObjectSlot>,
    free_objects: Vec<u32>,
    scopes: Vec<ScopeSlot>,
    free_scopes: Vec<u32>,
    root: ScopeId,
    frames: Vec<ScopeId>,
    live_objects: usize,
    live_scopes: usize,
}

impl Runtime {
    /// Create a runtime with the default configuration.
    pub fn new() -> Self {
        Self::build(RuntimeConfig::default())
    }

    /// Create a runtime with an explicit configuration.
    pub fn with_config(config: RuntimeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: RuntimeConfig) -> Self {
        let mut scopes = Vec::with_capacity(config.scope_capacity.max(1));
        scopes.push(ScopeSlot {
            generation: 0,
            node: Some(ScopeNode::root()),
        });
        Self {
            objects: Vec::with_capacity(config.object_capacity),
            free_objects: Vec::new(),
            scopes,
            free_scopes: Vec::new(),
            root: ScopeId::new(0, 0),
            frames: Vec::new(),
            live_objects: 0,
            live_scopes: 1,
            config,
        }
    }

    /// The configuration this runtime was built with.
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// The root scope. It lives as long as the runtime.
    pub fn root(&self) -> ScopeId {
        self.root
    }

    /// The innermost scope opened with [`enter`](Self::enter), or the root.
    pub fn active(&self) -> ScopeId {
        self.frames.last().copied().unwrap_or(self.root)
    }

    /// Number of live objects, attached or floating.
    pub fn object_count(&self) -> usize {
        self.live_objects
    }

    /// Number of live scopes, root included.
    pub fn scope_count(&self) -> usize {
        self.live_scopes
    }

    // ── scopes ──────────────────────────────────────────────────

    /// Whether `scope` still exists.
    pub fn contains_scope(&self, scope: ScopeId) -> bool {
        self.node(scope).is_some()
    }

    /// Parent of `scope`; `None` for the root or a stale id.
    pub fn parent(&self, scope: ScopeId) -> Option<ScopeId> {
        self.node(scope).and_then(|n| n.parent)
    }

    /// Live attachments of `scope` in attachment order.
    ///
    /// # Panics
    ///
    /// If `scope` is stale.
    pub fn attachments(&self, scope: ScopeId) -> Vec<Attachment> {
        self.live_node(scope, "attachments").attachments().collect()
    }

    /// Number of live attachments of `scope`, 0 for a stale id.
    pub fn scope_len(&self, scope: ScopeId) -> usize {
        self.node(scope).map_or(0, ScopeNode::len)
    }

    /// Create an empty scope as the newest child of `parent`.
    ///
    /// # Panics
    ///
    /// If `parent` is stale.
    pub fn new_scope(&mut self, parent: ScopeId) -> ScopeId {
        self.live_node(parent, "new_scope");
        let scope = self.alloc_scope(ScopeNode::child(parent));
        let slot = self
            .live_node_mut(parent, "new_scope")
            .push(Attachment::Scope(scope));
        if let Some(node) = self.node_mut(scope) {
            node.slot_in_parent = slot;
        }
        debug!(%scope, %parent, "new scope");
        scope
    }

    /// Free every attachment of `scope`, newest first. The scope itself
    /// stays usable.
    ///
    /// # Panics
    ///
    /// If `scope` is stale.
    pub fn clear(&mut self, scope: ScopeId) {
        let len = self.live_node(scope, "clear").len();
        debug!(%scope, len, "clear");
        while let Some(next) = self.node_mut(scope).and_then(|n| n.pop_last()) {
            match next {
                Attachment::Object(id) => {
                    if let Some(entry) = self.entry_mut(id) {
                        entry.linkage = None;
                    }
                    self.destroy(id);
                }
                Attachment::Scope(child) => self.release_scope(child),
            }
        }
    }

    /// Clear `scope`, detach it from its parent and release it.
    ///
    /// # Panics
    ///
    /// If `scope` is the root, is stale, or is an open frame; frames are
    /// closed with [`leave`](Self::leave).
    pub fn teardown(&mut self, scope: ScopeId) {
        assert!(scope != self.root, "cannot tear down the root scope");
        assert!(
            !self.frames.contains(&scope),
            "scope {scope} is an open frame; close it with leave"
        );
        self.close(scope);
    }

    /// Open a new scope under the active one and make it active.
    pub fn enter(&mut self) -> ScopeId {
        let scope = self.new_scope(self.active());
        self.frames.push(scope);
        scope
    }

    /// Tear down the active scope and restore its parent as active.
    ///
    /// # Panics
    ///
    /// If no frame is open.
    pub fn leave(&mut self) {
        let Some(scope) = self.frames.pop() else {
            panic!("leave without a matching enter");
        };
        self.close(scope);
    }

    fn close(&mut self, scope: ScopeId) {
        let node = self.live_node(scope, "teardown");
        if let Some(parent) = node.parent {
            let linkage = Linkage {
                scope: parent,
                slot: node.slot_in_parent,
            };
            self.unlink(linkage);
        }
        self.release_scope(scope);
    }

    /// Clear a scope that is already unlinked from its parent and recycle
    /// its slot.
    fn release_scope(&mut self, scope: ScopeId) {
        self.clear(scope);
        self.frames.retain(|frame| *frame != scope);
        if let Some(slot) = self.scopes.get_mut(scope.index as usize) {
            slot.node = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free_scopes.push(scope.index);
            self.live_scopes -= 1;
        }
        debug!(%scope, "teardown");
    }

    fn alloc_scope(&mut self, node: ScopeNode) -> ScopeId {
        self.live_scopes += 1;
        if let Some(index) = self.free_scopes.pop() {
            let slot = &mut self.scopes[index as usize];
            slot.node = Some(node);
            return ScopeId::new(index, slot.generation);
        }
        let index = slot_index(self.scopes.len(), "scope");
        self.scopes.push(ScopeSlot {
            generation: 0,
            node: Some(node),
        });
        ScopeId::new(index, 0)
    }

    fn node(&self, scope: ScopeId) -> Option<&ScopeNode> {
        self.scopes
            .get(scope.index as usize)
            .filter(|slot| slot.generation == scope.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, scope: ScopeId) -> Option<&mut ScopeNode> {
        self.scopes
            .get_mut(scope.index as usize)
            .filter(|slot| slot.generation == scope.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    fn live_node(&self, scope: ScopeId, op: &str) -> &ScopeNode {
        match self.node(scope) {
            Some(node) => node,
            None => panic!("{op} on stale scope {scope}"),
        }
    }

    fn live_node_mut(&mut self, scope: ScopeId, op: &str) -> &mut ScopeNode {
        match self.node_mut(scope) {
            Some(node) => node,
            None => panic!("{op} on stale scope {scope}"),
        }
    }

    /// Tombstone the entry at `linkage` and compact the owning scope if it
    /// has accumulated enough tombstones.
    fn unlink(&mut self, linkage: Linkage) {
        let threshold = self.config.compact_threshold;
        let node = self.live_node_mut(linkage.scope, "detach");
        node.vacate(linkage.slot);
        if !node.needs_compaction(threshold) {
            return;
        }
        let moved = node.compact();
        debug!(scope = %linkage.scope, live = moved.len(), "compact");
        for (attachment, slot) in moved {
            match attachment {
                Attachment::Object(id) => {
                    if let Some(entry) = self.entry_mut(id) {
                        entry.linkage = Some(Linkage {
                            scope: linkage.scope,
                            slot,
                        });
                    }
                }
                Attachment::Scope(child) => {
                    if let Some(node) = self.node_mut(child) {
                        node.slot_in_parent = slot;
                    }
                }
            }
        }
    }

    // ── objects ─────────────────────────────────────────────────

    /// Box `value` and attach it to `scope`.
    ///
    /// # Panics
    ///
    /// If `scope` is stale.
    pub fn create<C: Any>(&mut self, scope: ScopeId, value: C) -> Handle<C> {
        Handle::new(self.adopt(scope, Box::new(value)))
    }

    /// Attach an already boxed object to `scope`.
    ///
    /// # Panics
    ///
    /// If `scope` is stale.
    pub fn adopt(&mut self, scope: ScopeId, object: Box<dyn Any>) -> ObjectId {
        self.live_node(scope, "attach");
        let id = self.store(object);
        self.attach(scope, id);
        id
    }

    /// Hand an object to the runtime without attaching it anywhere.
    ///
    /// The object stays alive until freed explicitly or the runtime drops.
    pub fn insert_floating(&mut self, object: Box<dyn Any>) -> ObjectId {
        let id = self.store(object);
        debug!(object = %id, "insert floating");
        id
    }

    /// Whether `id` still refers to a live object.
    pub fn contains(&self, id: ObjectId) -> bool {
        self.entry(id).is_some()
    }

    /// Attach a floating object to `scope`.
    ///
    /// # Panics
    ///
    /// If `id` or `scope` is stale, or the object is already attached.
    pub fn attach(&mut self, scope: ScopeId, id: ObjectId) {
        match self.entry(id) {
            None => panic!("attach of stale object {id}"),
            Some(ObjectEntry {
                linkage: Some(linkage),
                ..
            }) => panic!("object {id} is already attached to {}", linkage.scope),
            Some(_) => {}
        }
        let slot = self
            .live_node_mut(scope, "attach")
            .push(Attachment::Object(id));
        if let Some(entry) = self.entry_mut(id) {
            entry.linkage = Some(Linkage { scope, slot });
        }
        debug!(%scope, object = %id, slot, "attach");
    }

    /// Detach an object from its scope, leaving it floating.
    ///
    /// A floating object is not freed when its former scope is.
    ///
    /// # Panics
    ///
    /// If `id` is stale or the object is not attached.
    pub fn detach(&mut self, id: ObjectId) {
        let linkage = match self.entry_mut(id) {
            None => panic!("detach of stale object {id}"),
            Some(entry) => match entry.linkage.take() {
                Some(linkage) => linkage,
                None => panic!("object {id} is not attached"),
            },
        };
        self.unlink(linkage);
        debug!(scope = %linkage.scope, object = %id, "detach");
    }

    /// Where `id` is attached; `None` for floating or stale objects.
    pub fn linkage(&self, id: ObjectId) -> Option<Linkage> {
        self.entry(id).and_then(|e| e.linkage)
    }

    /// Detach and destroy an object.
    ///
    /// Returns `false` and does nothing if `id` is stale.
    pub fn free(&mut self, id: ObjectId) -> bool {
        let Some(linkage) = self.entry(id).map(|e| e.linkage) else {
            return false;
        };
        if let Some(linkage) = linkage {
            self.unlink(linkage);
        }
        self.destroy(id);
        true
    }

    /// The object behind `id`.
    pub fn object(&self, id: ObjectId) -> Option<&dyn Any> {
        self.entry(id).map(|e| e.object.as_ref())
    }

    /// The object behind `id`, mutably.
    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut dyn Any> {
        self.entry_mut(id).map(|e| e.object.as_mut())
    }

    /// Typed access through a handle.
    pub fn get<C: Any>(&self, handle: Handle<C>) -> Option<&C> {
        self.object(handle.id())?.downcast_ref::<C>()
    }

    /// Typed mutable access through a handle.
    pub fn get_mut<C: Any>(&mut self, handle: Handle<C>) -> Option<&mut C> {
        self.object_mut(handle.id())?.downcast_mut::<C>()
    }

    /// View an object at each level of its capability chain.
    pub fn role(&self, id: ObjectId) -> Option<Role<'_>> {
        let any = self.object(id)?;
        Some(Role {
            one: any.as_one(),
            any,
            boxed: any.as_boxed(),
        })
    }

    /// Copy an object into the active scope.
    ///
    /// # Panics
    ///
    /// If the object's type does not support copy.
    pub fn copy(&mut self, id: ObjectId) -> Result<ObjectId, ScopeError> {
        let dup = self.object(id).ok_or(ScopeError::StaleObject { id })?.copy()?;
        let scope = self.active();
        let copy = self.adopt(scope, dup);
        debug!(source = %id, object = %copy, %scope, "copy");
        Ok(copy)
    }

    /// Move an object's payload into a new object attached to the source's
    /// scope (the active scope for a floating source). The source stays
    /// alive, emptied.
    ///
    /// # Panics
    ///
    /// If the object's type does not support move.
    pub fn move_out(&mut self, id: ObjectId) -> Result<ObjectId, ScopeError> {
        let (moved, linkage) = self.take_payload(id)?;
        let scope = linkage.map_or_else(|| self.active(), |l| l.scope);
        let target = self.adopt(scope, moved);
        debug!(source = %id, object = %target, %scope, "move");
        Ok(target)
    }

    /// Typed [`copy`](Self::copy).
    pub fn copy_of<C: Any>(&mut self, handle: Handle<C>) -> Result<Handle<C>, ScopeError> {
        let id = handle.id();
        let dup = self.object(id).ok_or(ScopeError::StaleObject { id })?.copy()?;
        let scope = self.active();
        let copy = self.adopt_as::<C>(scope, dup)?;
        debug!(source = %id, object = %copy.id(), %scope, "copy");
        Ok(copy)
    }

    /// Typed [`move_out`](Self::move_out).
    pub fn move_of<C: Any>(&mut self, handle: Handle<C>) -> Result<Handle<C>, ScopeError> {
        let id = handle.id();
        let (moved, linkage) = self.take_payload(id)?;
        let scope = linkage.map_or_else(|| self.active(), |l| l.scope);
        let target = self.adopt_as::<C>(scope, moved)?;
        debug!(source = %id, object = %target.id(), %scope, "move");
        Ok(target)
    }

    fn take_payload(
        &mut self,
        id: ObjectId,
    ) -> Result<(Box<dyn Any>, Option<Linkage>), ScopeError> {
        let entry = self.entry_mut(id).ok_or(ScopeError::StaleObject { id })?;
        let linkage = entry.linkage;
        let moved = entry.object.take()?;
        Ok((moved, linkage))
    }

    fn adopt_as<C: Any>(
        &mut self,
        scope: ScopeId,
        object: Box<dyn Any>,
    ) -> Result<Handle<C>, ScopeError> {
        if !object.is_type::<C>() {
            let found = object.name();
            object.free();
            return Err(ScopeError::TypeMismatch {
                expected: std::any::type_name::<C>(),
                found,
            });
        }
        Ok(Handle::new(self.adopt(scope, object)))
    }

    fn store(&mut self, object: Box<dyn Any>) -> ObjectId {
        self.live_objects += 1;
        let entry = ObjectEntry {
            object,
            linkage: None,
        };
        if let Some(index) = self.free_objects.pop() {
            let slot = &mut self.objects[index as usize];
            slot.entry = Some(entry);
            return ObjectId::new(index, slot.generation);
        }
        let index = slot_index(self.objects.len(), "object");
        self.objects.push(ObjectSlot {
            generation: 0,
            entry: Some(entry),
        });
        ObjectId::new(index, 0)
    }

    /// Destroy an object whose linkage has already been removed.
    fn destroy(&mut self, id: ObjectId) {
        let Some(slot) = self
            .objects
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
        else {
            return;
        };
        let Some(entry) = slot.entry.take() else {
            return;
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.free_objects.push(id.index);
        self.live_objects -= 1;
        debug!(object = %id, name = entry.object.name(), "free");
        entry.object.free();
    }

    fn entry(&self, id: ObjectId) -> Option<&ObjectEntry> {
        self.objects
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_ref())
    }

    fn entry_mut(&mut self, id: ObjectId) -> Option<&mut ObjectEntry> {
        self.objects
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.entry.as_mut())
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("objects", &self.live_objects)
            .field("scopes", &self.live_scopes)
            .field("active", &self.active())
            .finish()
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        self.frames.clear();
        self.clear(self.root);
        let floating: Vec<ObjectId> = self
            .objects
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.entry.is_some())
            .map(|(index, slot)| ObjectId::new(index as u32, slot.generation))
            .collect();
        for id in floating {
            self.destroy(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ax_core::AxError;
    use ax_test_utils::DropLog;

    #[test]
    fn create_attaches_to_scope() {
        let mut rt = Runtime::new();
        let log = DropLog::new();
        let root = rt.root();
        let h = rt.create(root, log.probe(1));
        let linkage = rt.linkage(h.id()).unwrap();
        assert_eq!(linkage.scope, root);
        assert_eq!(rt.get(h).unwrap().tag(), 1);
        assert_eq!(rt.attachments(root), vec![Attachment::Object(h.id())]);
        assert_eq!(rt.object_count(), 1);
    }

    #[test]
    fn teardown_frees_in_reverse_attachment_order() {
        let mut rt = Runtime::new();
        let log = DropLog::new();
        let scope = rt.new_scope(rt.root());
        for tag in 1..=3 {
            rt.create(scope, log.probe(tag));
        }
        rt.teardown(scope);
        assert_eq!(log.order(), vec![3, 2, 1]);
        assert!(!rt.contains_scope(scope));
        assert_eq!(rt.scope_len(rt.root()), 0);
        assert_eq!(rt.object_count(), 0);
    }

    #[test]
    fn teardown_cascades_through_child_scopes() {
        let mut rt = Runtime::new();
        let log = DropLog::new();
        let outer = rt.new_scope(rt.root());
        rt.create(outer, log.probe(1));
        let inner = rt.new_scope(outer);
        rt.create(inner, log.probe(2));
        rt.create(inner, log.probe(3));
        rt.create(outer, log.probe(4));
        rt.teardown(outer);
        assert_eq!(log.order(), vec![4, 3, 2, 1]);
        assert!(!rt.contains_scope(inner));
        assert_eq!(rt.scope_count(), 1);
    }

    #[test]
    fn detached_object_survives_teardown() {
        let mut rt = Runtime::new();
        let log = DropLog::new();
        let scope = rt.new_scope(rt.root());
        let keep = rt.create(scope, log.probe(1));
        rt.create(scope, log.probe(2));
        rt.detach(keep.id());
        assert_eq!(rt.linkage(keep.id()), None);
        rt.teardown(scope);
        assert_eq!(log.order(), vec![2]);
        assert!(rt.contains(keep.id()));
        rt.attach(rt.root(), keep.id());
        assert_eq!(rt.linkage(keep.id()).unwrap().scope, rt.root());
    }

    #[test]
    fn free_is_idempotent_on_stale_ids() {
        let mut rt = Runtime::new();
        let log = DropLog::new();
        let h = rt.create(rt.root(), log.probe(9));
        assert!(rt.free(h.id()));
        assert!(!rt.free(h.id()));
        assert_eq!(log.order(), vec![9]);
        assert!(rt.get(h).is_none());
    }

    #[test]
    fn recycled_slot_does_not_alias_stale_id() {
        let mut rt = Runtime::new();
        let log = DropLog::new();
        let old = rt.create(rt.root(), log.probe(1));
        rt.free(old.id());
        let new = rt.create(rt.root(), log.probe(2));
        assert_eq!(old.id().index(), new.id().index());
        assert_ne!(old, new);
        assert!(rt.get(old).is_none());
        assert_eq!(rt.get(new).unwrap().tag(), 2);
    }

    #[test]
    fn enter_and_leave_restore_active_scope() {
        let mut rt = Runtime::new();
        let log = DropLog::new();
        assert_eq!(rt.active(), rt.root());
        let frame = rt.enter();
        assert_eq!(rt.active(), frame);
        assert_eq!(rt.parent(frame), Some(rt.root()));
        rt.create(frame, log.probe(5));
        rt.leave();
        assert_eq!(rt.active(), rt.root());
        assert_eq!(log.order(), vec![5]);
    }

    #[test]
    fn copy_lands_in_active_scope() {
        let mut rt = Runtime::new();
        let log = DropLog::new();
        let src = rt.create(rt.root(), log.probe(7));
        let frame = rt.enter();
        let dup = rt.copy_of(src).unwrap();
        assert_eq!(rt.linkage(dup.id()).unwrap().scope, frame);
        assert_eq!(rt.get(dup).unwrap().tag(), 7);
        rt.leave();
        assert_eq!(log.order(), vec![7]);
        assert!(rt.contains(src.id()));
    }

    #[test]
    fn move_lands_in_source_scope() {
        let mut rt = Runtime::new();
        let log = DropLog::new();
        let scope = rt.new_scope(rt.root());
        let src = rt.create(scope, log.probe(3));
        rt.enter();
        let moved = rt.move_of(src).unwrap();
        assert_eq!(rt.linkage(moved.id()).unwrap().scope, scope);
        assert_eq!(rt.get(moved).unwrap().tag(), 3);
        assert_eq!(rt.get(src).unwrap().tag(), 0);
    }

    #[test]
    fn copy_of_stale_object_fails() {
        let mut rt = Runtime::new();
        let log = DropLog::new();
        let h = rt.create(rt.root(), log.probe(1));
        rt.free(h.id());
        assert_eq!(
            rt.copy(h.id()),
            Err(ScopeError::StaleObject { id: h.id() })
        );
    }

    #[test]
    fn refused_copy_propagates_object_error() {
        let mut rt = Runtime::new();
        let log = DropLog::new();
        let h = rt.create(rt.root(), log.refusing_probe(1));
        assert_eq!(
            rt.copy(h.id()),
            Err(ScopeError::Object(AxError::AllocFailed { requested: 1 }))
        );
        assert_eq!(rt.scope_len(rt.root()), 1);
    }

    #[test]
    fn role_exposes_base_levels() {
        let mut rt = Runtime::new();
        let log = DropLog::new();
        let h = rt.create(rt.root(), log.probe(1));
        let role = rt.role(h.id()).unwrap();
        assert_eq!(role.name(), "probe");
        assert!(role.one.is(ax_core::Capability::Any));
        assert!(role.boxed.is_none());
    }

    #[test]
    fn drop_frees_attached_then_floating() {
        let log = DropLog::new();
        {
            let mut rt = Runtime::new();
            let floating = rt.insert_floating(Box::new(log.probe(1)));
            rt.create(rt.root(), log.probe(2));
            rt.create(rt.root(), log.probe(3));
            assert!(rt.linkage(floating).is_none());
        }
        assert_eq!(log.order(), vec![3, 2, 1]);
    }

    #[test]
    fn compaction_keeps_linkage_consistent() {
        let config = RuntimeConfig {
            compact_threshold: 2,
            ..RuntimeConfig::new()
        };
        let mut rt = Runtime::with_config(config).unwrap();
        let log = DropLog::new();
        let root = rt.root();
        let handles: Vec<_> = (0..6).map(|t| rt.create(root, log.probe(t))).collect();
        for h in &handles[..4] {
            rt.free(h.id());
        }
        for h in &handles[4..] {
            let linkage = rt.linkage(h.id()).unwrap();
            assert!(linkage.slot < 2);
        }
        rt.detach(handles[4].id());
        assert_eq!(rt.attachments(root), vec![Attachment::Object(handles[5].id())]);
    }

    #[test]
    fn zero_compact_threshold_rejected() {
        let config = RuntimeConfig {
            compact_threshold: 0,
            ..RuntimeConfig::new()
        };
        assert!(Runtime::with_config(config).is_err());
    }

    #[test]
    #[should_panic(expected = "cannot tear down the root scope")]
    fn teardown_root_panics() {
        let mut rt = Runtime::new();
        let root = rt.root();
        rt.teardown(root);
    }

    #[test]
    #[should_panic(expected = "is already attached")]
    fn double_attach_panics() {
        let mut rt = Runtime::new();
        let log = DropLog::new();
        let h = rt.create(rt.root(), log.probe(1));
        rt.attach(rt.root(), h.id());
    }

    #[test]
    #[should_panic(expected = "is not attached")]
    fn detach_floating_panics() {
        let mut rt = Runtime::new();
        let log = DropLog::new();
        let id = rt.insert_floating(Box::new(log.probe(1)));
        rt.detach(id);
    }

    #[test]
    #[should_panic(expected = "leave without a matching enter")]
    fn unbalanced_leave_panics() {
        Runtime::new().leave();
    }

    #[test]
    #[should_panic(expected = "on stale scope")]
    fn teardown_stale_scope_panics() {
        let mut rt = Runtime::new();
        let scope = rt.new_scope(rt.root());
        rt.teardown(scope);
        rt.teardown(scope);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Clone, Debug)]
        enum Op {
            Create,
            Free(usize),
            Detach(usize),
        }

        fn arb_op() -> impl Strategy<Value = Op> {
            prop_oneof![
                3 => Just(Op::Create),
                1 => any::<usize>().prop_map(Op::Free),
                1 => any::<usize>().prop_map(Op::Detach),
            ]
        }

        proptest! {
            #[test]
            fn every_object_is_freed_exactly_once(
                ops in prop::collection::vec(arb_op(), 0..64),
                threshold in 1usize..8,
            ) {
                let log = DropLog::new();
                let mut created = 0u32;
                {
                    let config = RuntimeConfig { compact_threshold: threshold, ..RuntimeConfig::new() };
                    let mut rt = Runtime::with_config(config).unwrap();
                    let scope = rt.new_scope(rt.root());
                    let mut ids: Vec<ObjectId> = Vec::new();
                    for op in ops {
                        match op {
                            Op::Create => {
                                ids.push(rt.create(scope, log.probe(created)).id());
                                created += 1;
                            }
                            Op::Free(i) if !ids.is_empty() => {
                                let id = ids.swap_remove(i % ids.len());
                                prop_assert!(rt.free(id));
                            }
                            Op::Detach(i) if !ids.is_empty() => {
                                let id = ids[i % ids.len()];
                                if rt.linkage(id).is_some() {
                                    rt.detach(id);
                                }
                            }
                            _ => {}
                        }
                        for id in &ids {
                            if let Some(linkage) = rt.linkage(*id) {
                                let listed = rt.attachments(linkage.scope);
                                prop_assert!(listed.contains(&Attachment::Object(*id)));
                            }
                        }
                    }
                    rt.teardown(scope);
                }
                let mut order = log.order();
                order.sort_unstable();
                prop_assert_eq!(order, (0..created).collect::<Vec<_>>());
            }
        }
    }
}
