//! Objects that report their own destruction.

use std::cell::RefCell;
use std::rc::Rc;

use ax_core::{Any, AxError, Capability, One, TypeInfo};

static PROBE: TypeInfo = TypeInfo::new("one.any.probe", &[Capability::One, Capability::Any]);

/// Shared, append-only record of destroyed probe tags.
#[derive(Clone, Default)]
pub struct DropLog {
    order: Rc<RefCell<Vec<u32>>>,
}

impl DropLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A probe that copies and moves normally.
    pub fn probe(&self, tag: u32) -> DropProbe {
        DropProbe {
            tag,
            log: self.clone(),
            refuse_copy: false,
        }
    }

    /// A probe whose copy fails with [`AxError::AllocFailed`].
    pub fn refusing_probe(&self, tag: u32) -> DropProbe {
        DropProbe {
            tag,
            log: self.clone(),
            refuse_copy: true,
        }
    }

    /// Tags in destruction order.
    pub fn order(&self) -> Vec<u32> {
        self.order.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.order.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.borrow().is_empty()
    }
}

/// Runtime object that appends its tag to a [`DropLog`] on drop.
///
/// A moved-out probe keeps the tag; the emptied source is left with tag 0.
pub struct DropProbe {
    tag: u32,
    log: DropLog,
    refuse_copy: bool,
}

impl DropProbe {
    pub fn tag(&self) -> u32 {
        self.tag
    }
}

impl One for DropProbe {
    fn type_info(&self) -> &'static TypeInfo {
        &PROBE
    }
}

impl Any for DropProbe {
    fn copy(&self) -> Result<Box<dyn Any>, AxError> {
        if self.refuse_copy {
            return Err(AxError::AllocFailed { requested: 1 });
        }
        Ok(Box::new(self.log.probe(self.tag)))
    }

    fn take(&mut self) -> Result<Box<dyn Any>, AxError> {
        let tag = std::mem::take(&mut self.tag);
        Ok(Box::new(self.log.probe(tag)))
    }
}

impl Drop for DropProbe {
    fn drop(&mut self) {
        self.log.order.borrow_mut().push(self.tag);
    }
}
