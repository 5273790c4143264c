//! Planner metrics sink boundary.
//!
//! Planning logic MUST NOT touch obs::metrics directly.
//! All instrumentation flows through PlanEvent and PlanSink.
use crate::{error::ErrorClass, obs::metrics};
use std::cell::RefCell;

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<*const dyn PlanSink>> = RefCell::new(None);
}

///
/// PlanOutcome
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlanOutcome {
    /// Every partition-key column was pinned; `keys` filters were resolved.
    Targeted { keys: u64 },
    /// No complete key could be formed; every split is scanned.
    Unrestricted,
}

///
/// PlanEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlanEvent {
    FiltersPushed { pushed: u64, unsupported: u64 },
    PlanBuilt { outcome: PlanOutcome },
    PlanFailed { class: ErrorClass },
    CardinalityRejected { requested: u128, limit: u64 },
    CardinalityDegraded { requested: u128, limit: u64 },
}

///
/// PlanSink
///

pub trait PlanSink {
    fn record(&self, event: PlanEvent);
}

/// GlobalPlanSink
/// Default sink that writes into the thread-local counters.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalPlanSink;

impl PlanSink for GlobalPlanSink {
    fn record(&self, event: PlanEvent) {
        metrics::with_state_mut(|m| match event {
            PlanEvent::FiltersPushed {
                pushed,
                unsupported,
            } => {
                m.push_calls = m.push_calls.saturating_add(1);
                m.filters_pushed = m.filters_pushed.saturating_add(pushed);
                m.filters_unsupported = m.filters_unsupported.saturating_add(unsupported);
            }
            PlanEvent::PlanBuilt {
                outcome: PlanOutcome::Targeted { keys },
            } => {
                m.plans_targeted = m.plans_targeted.saturating_add(1);
                m.partition_keys_resolved = m.partition_keys_resolved.saturating_add(keys);
                m.max_partition_keys = m.max_partition_keys.max(keys);
            }
            PlanEvent::PlanBuilt {
                outcome: PlanOutcome::Unrestricted,
            } => {
                m.plans_unrestricted = m.plans_unrestricted.saturating_add(1);
            }
            PlanEvent::PlanFailed { .. } => {
                m.plans_failed = m.plans_failed.saturating_add(1);
            }
            PlanEvent::CardinalityRejected { .. } => {
                m.cardinality_rejections = m.cardinality_rejections.saturating_add(1);
            }
            PlanEvent::CardinalityDegraded { .. } => {
                m.cardinality_degradations = m.cardinality_degradations.saturating_add(1);
            }
        });
    }
}

pub(crate) const GLOBAL_PLAN_SINK: GlobalPlanSink = GlobalPlanSink;

pub(crate) fn record(event: PlanEvent) {
    let override_ptr = SINK_OVERRIDE.with(|cell| *cell.borrow());
    if let Some(ptr) = override_ptr {
        // SAFETY:
        // - `ptr` was produced from a valid `&dyn PlanSink` in `with_plan_sink`.
        // - `with_plan_sink` restores the previous pointer on every exit,
        //   including unwind, via `Guard::drop`.
        // - `record` is synchronous and never stores `ptr` beyond this call.
        unsafe { (&*ptr).record(event) };
    } else {
        GLOBAL_PLAN_SINK.record(event);
    }
}

/// Snapshot the current planner counters.
#[must_use]
pub fn metrics_report() -> metrics::PlanCounters {
    metrics::report()
}

/// Reset all planner counters.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary sink override.
pub fn with_plan_sink<T>(sink: &dyn PlanSink, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<*const dyn PlanSink>);

    impl Drop for Guard {
        fn drop(&mut self) {
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = self.0;
            });
        }
    }

    // SAFETY:
    // - `sink_ptr` is installed only for this dynamic scope.
    // - `Guard` restores the previous slot on all exits, including panic.
    // - `record` only dereferences synchronously and never persists `sink_ptr`.
    let sink_ptr = unsafe { std::mem::transmute::<&dyn PlanSink, *const dyn PlanSink>(sink) };
    let prev = SINK_OVERRIDE.with(|cell| {
        let mut slot = cell.borrow_mut();
        slot.replace(sink_ptr)
    });
    let _guard = Guard(prev);

    f()
}

///
/// TESTS
///
