use serde::{Deserialize, Serialize};
use std::cell::RefCell;

///
/// PlanCounters
/// Ephemeral, in-memory planner counters.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct PlanCounters {
    // Pushdown negotiation
    pub push_calls: u64,
    pub filters_pushed: u64,
    pub filters_unsupported: u64,

    // Plan outcomes
    pub plans_targeted: u64,
    pub plans_unrestricted: u64,
    pub plans_failed: u64,
    pub partition_keys_resolved: u64,
    pub max_partition_keys: u64,

    // Cardinality guard
    pub cardinality_rejections: u64,
    pub cardinality_degradations: u64,
}

thread_local! {
    static PLAN_COUNTERS: RefCell<PlanCounters> = RefCell::new(PlanCounters::default());
}

/// Borrow counters immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&PlanCounters) -> R) -> R {
    PLAN_COUNTERS.with(|m| f(&m.borrow()))
}

/// Borrow counters mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut PlanCounters) -> R) -> R {
    PLAN_COUNTERS.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = PlanCounters::default());
}

/// Point-in-time copy of the counters.
pub(crate) fn report() -> PlanCounters {
    with_state(Clone::clone)
}
