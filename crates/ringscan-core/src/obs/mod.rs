//! Observability: planner counters and the sink abstraction that feeds them.
//!
//! Structured logs go through `tracing` at the call sites; counters only
//! ever flow through `sink::record`.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::PlanCounters;
pub use sink::{
    PlanEvent, PlanOutcome, PlanSink, metrics_report, metrics_reset_all, with_plan_sink,
};
