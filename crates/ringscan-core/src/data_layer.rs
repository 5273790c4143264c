//! Data-source boundary consumed by the scan planner.

use crate::{
    filter::Filter,
    schema::CqlTable,
    token::{Partitioner, TokenResolver},
};
use serde::{Deserialize, Serialize};

///
/// DataLayer
///
/// Everything the planner needs to know about the table being scanned.
/// Implementations are shared between the planner and the row scanner and
/// must answer consistently for the lifetime of one logical scan.
///

pub trait DataLayer {
    fn table(&self) -> &CqlTable;

    fn partitioner(&self) -> Partitioner;

    fn resolver(&self) -> &dyn TokenResolver;

    /// Number of input partitions (token splits) the scan is divided into.
    fn partition_count(&self) -> usize;

    /// Whether the row scanner can evaluate `filter` itself. Partition-key
    /// equality and IN filters are always accepted by the planner; this hook
    /// only widens pushdown to other filters.
    fn supports_filter(&self, _filter: &Filter) -> bool {
        false
    }

    fn output_partitioning(&self) -> OutputPartitioning {
        OutputPartitioning::new(self.partition_count())
    }
}

///
/// OutputPartitioning
/// Partitioning descriptor reported to the host engine as-is.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct OutputPartitioning {
    pub num_partitions: usize,
}

impl OutputPartitioning {
    #[must_use]
    pub const fn new(num_partitions: usize) -> Self {
        Self { num_partitions }
    }
}
