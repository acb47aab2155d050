//! Process-wide count of live menu instances.
//!
//! Starts at zero on first use and is only touched through [`InstanceGuard`].
//! A host that loads the menu engine as a module checks [`can_unload`] before
//! tearing it down.

use std::sync::atomic::{AtomicUsize, Ordering};

static LIVE_INSTANCES: AtomicUsize = AtomicUsize::new(0);

/// Counts as one live instance until dropped.
#[derive(Debug)]
pub struct InstanceGuard(());

impl InstanceGuard {
    pub fn acquire() -> Self {
        let live = LIVE_INSTANCES.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::trace!(live, "Menu instance acquired");
        InstanceGuard(())
    }
}

impl Drop for InstanceGuard {
    fn drop(&mut self) {
        let live = LIVE_INSTANCES.fetch_sub(1, Ordering::AcqRel) - 1;
        tracing::trace!(live, "Menu instance released");
    }
}

pub fn live_instances() -> usize {
    LIVE_INSTANCES.load(Ordering::Acquire)
}

pub fn can_unload() -> bool {
    live_instances() == 0
}
