//! The base object capability.

use crate::capability::{Capability, TypeInfo};

/// Base capability shared by every runtime object.
///
/// An object's [`TypeInfo`] is fixed at construction and never changes.
/// Use `downcast_ref` on `dyn One` to recover the concrete type.
pub trait One: std::any::Any {
    /// The static type table of this object's concrete type.
    fn type_info(&self) -> &'static TypeInfo;

    /// Most specific name of the concrete type.
    fn name(&self) -> &'static str {
        self.type_info().name()
    }

    /// Whether the object implements `cap`.
    fn is(&self, cap: Capability) -> bool {
        self.type_info().is(cap)
    }

    /// Whether the object implements the capability called `name`.
    fn is_named(&self, name: &str) -> bool {
        self.type_info().is_named(name)
    }
}

impl dyn One {
    /// Attempt to downcast to a concrete object type.
    pub fn downcast_ref<T: One>(&self) -> Option<&T> {
        (self as &dyn std::any::Any).downcast_ref::<T>()
    }

    /// Attempt to downcast to a concrete object type, mutably.
    pub fn downcast_mut<T: One>(&mut self) -> Option<&mut T> {
        (self as &mut dyn std::any::Any).downcast_mut::<T>()
    }
}

/// Abort on an operation the receiver's type does not provide.
///
/// Optional capabilities (copy, move, ...) default to calling this. An
/// unsupported operation is a defect in the caller, never a runtime
/// failure, so it panics instead of returning an error.
#[cold]
#[track_caller]
pub fn unsupported(name: &str, op: &str) -> ! {
    panic!("operation {op} for {name} is not supported")
}

#[cfg(test)]
mod tests {
    use super::*;

    static PLAIN: TypeInfo = TypeInfo::new("one", &[Capability::One]);

    struct Plain;

    impl One for Plain {
        fn type_info(&self) -> &'static TypeInfo {
            &PLAIN
        }
    }

    #[test]
    fn defaults_read_type_info() {
        let p = Plain;
        assert_eq!(p.name(), "one");
        assert!(p.is(Capability::One));
        assert!(!p.is(Capability::Any));
        assert!(p.is_named("one"));
    }

    #[test]
    fn downcast_through_dyn_one() {
        let p: Box<dyn One> = Box::new(Plain);
        assert!(p.downcast_ref::<Plain>().is_some());
    }

    #[test]
    #[should_panic(expected = "operation copy for one is not supported")]
    fn unsupported_panics() {
        unsupported("one", "copy");
    }
}
