//! Element descriptors with an observable free hook.
//!
//! The log is thread-local, so each test (one thread per test under the
//! default harness) sees only its own releases.

use std::cell::RefCell;

use ax_core::stuff::{Stuff, U32};

thread_local! {
    static FREED: RefCell<Vec<u32>> = const { RefCell::new(Vec::new()) };
}

fn record(value: u32) {
    FREED.with(|f| f.borrow_mut().push(value));
}

/// `u32` descriptor whose free hook records the released value.
pub const TRACKED_U32: Stuff<u32> = Stuff {
    name: "tracked-u32",
    free: record,
    ..U32
};

/// Values released through [`TRACKED_U32`] on this thread, in order.
pub fn freed() -> Vec<u32> {
    FREED.with(|f| f.borrow().clone())
}

/// Forget everything recorded on this thread.
pub fn reset() {
    FREED.with(|f| f.borrow_mut().clear());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hook_records_release() {
        reset();
        TRACKED_U32.release(5);
        TRACKED_U32.release(1);
        assert_eq!(freed(), vec![5, 1]);
        reset();
        assert!(freed().is_empty());
    }
}
