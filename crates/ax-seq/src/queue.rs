//! FIFO adapter over any sequence.

use std::mem;

use ax_core::{Any, AxError, Capability, Duplicate, One, Seq, Stuff, Tube, TypeInfo};
use ax_scope::{Handle, Runtime, ScopeId};

static QUEUE: TypeInfo = TypeInfo::new(
    "one.any.tube.queue",
    &[
        Capability::One,
        Capability::Any,
        Capability::Tube,
        Capability::Queue,
    ],
);

/// A queue backed by the sequence `S`.
///
/// Elements enter at the back and leave from `begin()`, so the FIFO
/// contract holds whatever the backing sequence is.
pub struct Queue<S> {
    seq: S,
}

impl<S: Seq> Queue<S> {
    /// Create an empty queue with fresh backing storage.
    pub fn new(tr: Stuff<S::Elem>) -> Self {
        Self {
            seq: S::construct(tr),
        }
    }

    /// Wrap an existing sequence; its front becomes the queue's head.
    pub fn from_seq(seq: S) -> Self {
        Self { seq }
    }

    /// Create an empty queue owned by `scope`.
    pub fn create(rt: &mut Runtime, scope: ScopeId, tr: Stuff<S::Elem>) -> Handle<Self>
    where
        S: Duplicate,
    {
        rt.create(scope, Self::new(tr))
    }

    /// The backing sequence.
    pub fn as_seq(&self) -> &S {
        &self.seq
    }

    /// Unwrap into the backing sequence.
    pub fn into_inner(self) -> S {
        self.seq
    }
}

impl<S: Seq> One for Queue<S> {
    fn type_info(&self) -> &'static TypeInfo {
        &QUEUE
    }
}

impl<S: Seq + Duplicate> Duplicate for Queue<S> {
    fn duplicate(&self) -> Result<Self, AxError> {
        Ok(Self {
            seq: self.seq.duplicate()?,
        })
    }
}

impl<S: Seq + Duplicate> Any for Queue<S> {
    fn copy(&self) -> Result<Box<dyn Any>, AxError> {
        Ok(Box::new(self.duplicate()?))
    }

    fn take(&mut self) -> Result<Box<dyn Any>, AxError> {
        let empty = S::construct(*self.seq.elem_tr());
        Ok(Box::new(Self {
            seq: mem::replace(&mut self.seq, empty),
        }))
    }
}

impl<S: Seq + Duplicate> Tube for Queue<S> {
    type Elem = S::Elem;

    fn push(&mut self, value: S::Elem) -> Result<(), AxError> {
        self.seq.push(value)
    }

    fn pop(&mut self) -> Result<S::Elem, AxError> {
        if self.seq.is_empty() {
            return Err(AxError::Empty);
        }
        let mut head = self.seq.begin();
        self.seq.erase(&mut head)
    }

    fn prime(&self) -> Option<&S::Elem> {
        self.seq.front()
    }

    fn size(&self) -> usize {
        self.seq.size()
    }
}

impl<S: Seq + std::fmt::Debug> std::fmt::Debug for Queue<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Queue").field(&self.seq).finish()
    }
}
