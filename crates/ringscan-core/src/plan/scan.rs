use crate::{
    data_layer::OutputPartitioning,
    filter::Filter,
    token::{InputPartition, PartitionKeyFilter, Partitioner},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

///
/// ScanPlan
///
/// Immutable description of one logical scan, handed from the planner to
/// the (externally parallel) row scanners. Cheap to clone; the partition
/// key filters are shared.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ScanPlan {
    pub(super) keyspace: String,
    pub(super) table: String,
    pub(super) columns: Vec<String>,
    pub(super) pushed_filters: Vec<Filter>,
    pub(super) residual_filters: Vec<Filter>,
    pub(super) partition_key_filters: Arc<[PartitionKeyFilter]>,
    pub(super) partitioner: Partitioner,
    pub(super) input_partitions: Vec<InputPartition>,
    pub(super) partitioning: OutputPartitioning,
}

impl ScanPlan {
    #[must_use]
    pub fn keyspace(&self) -> &str {
        &self.keyspace
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Projected columns, in the order rows must be produced.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn pushed_filters(&self) -> &[Filter] {
        &self.pushed_filters
    }

    /// Pushed filters the row scanner must still evaluate per row because
    /// the partition-key filters do not already guarantee them.
    #[must_use]
    pub fn residual_filters(&self) -> &[Filter] {
        &self.residual_filters
    }

    #[must_use]
    pub fn partition_key_filters(&self) -> &Arc<[PartitionKeyFilter]> {
        &self.partition_key_filters
    }

    #[must_use]
    pub const fn partitioner(&self) -> Partitioner {
        self.partitioner
    }

    #[must_use]
    pub const fn output_partitioning(&self) -> OutputPartitioning {
        self.partitioning
    }

    /// All token splits, whether or not they hold targeted partitions.
    #[must_use]
    pub fn input_partitions(&self) -> &[InputPartition] {
        &self.input_partitions
    }

    /// Whether partition-key filters narrow the scan.
    #[must_use]
    pub fn is_restricted(&self) -> bool {
        !self.partition_key_filters.is_empty()
    }

    /// Splits that may hold rows: every split when unrestricted, otherwise
    /// only those whose range holds at least one filter token.
    #[must_use]
    pub fn partitions_to_visit(&self) -> Vec<&InputPartition> {
        self.input_partitions
            .iter()
            .filter(|partition| {
                !self.is_restricted()
                    || self
                        .partition_key_filters
                        .iter()
                        .any(|filter| filter.overlaps(&partition.range))
            })
            .collect()
    }

    /// Filters a row scanner assigned to `partition` applies.
    #[must_use]
    pub fn filters_for(&self, partition: &InputPartition) -> Vec<&PartitionKeyFilter> {
        self.partition_key_filters
            .iter()
            .filter(|filter| filter.overlaps(&partition.range))
            .collect()
    }
}
