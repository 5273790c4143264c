use crate::{
    config::{CardinalityPolicy, PlannerConfig},
    data_layer::{DataLayer, OutputPartitioning},
    filter::Filter,
    obs::sink::{PlanEvent, PlanOutcome, record},
    plan::{PlanError, ScanPlan, cartesian_product, combination_count, extract_partition_key_values},
    schema::CqlField,
    token::{PartitionKeyFilter, TokenPartitioner},
};
use std::{collections::BTreeSet, sync::Arc};

///
/// PlannerState
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlannerState {
    Initialized,
    SchemaFixed,
    FiltersFixed,
    Planned,
}

///
/// ScanPlanner
///
/// Per-scan state holder. The host engine prunes columns and pushes filters
/// during planning, then asks for the plan; one instance serves exactly one
/// logical scan and is not shared across threads while planning.
///

pub struct ScanPlanner<'a> {
    data_layer: &'a dyn DataLayer,
    config: PlannerConfig,
    state: PlannerState,
    required_columns: Option<Vec<String>>,
    pushed_filters: Vec<Filter>,
    plan: Option<Arc<[PartitionKeyFilter]>>,
}

impl<'a> ScanPlanner<'a> {
    #[must_use]
    pub fn new(data_layer: &'a dyn DataLayer) -> Self {
        Self::with_config(data_layer, PlannerConfig::default())
    }

    #[must_use]
    pub const fn with_config(data_layer: &'a dyn DataLayer, config: PlannerConfig) -> Self {
        Self {
            data_layer,
            config,
            state: PlannerState::Initialized,
            required_columns: None,
            pushed_filters: Vec::new(),
            plan: None,
        }
    }

    #[must_use]
    pub const fn state(&self) -> PlannerState {
        self.state
    }

    #[must_use]
    pub const fn config(&self) -> &PlannerConfig {
        &self.config
    }

    ///
    /// COLUMN PRUNING
    ///

    /// Restrict the columns the scan produces. The last call wins.
    pub fn prune_columns<I, S>(&mut self, columns: I) -> Result<(), PlanError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let table = self.data_layer.table();
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        if let Some(unknown) = columns.iter().find(|column| !table.has_column(column)) {
            return Err(PlanError::UnknownColumn {
                keyspace: table.keyspace().to_string(),
                table: table.table().to_string(),
                column: unknown.clone(),
            });
        }

        self.required_columns = Some(columns);
        if self.state == PlannerState::Initialized {
            self.state = PlannerState::SchemaFixed;
        }

        Ok(())
    }

    /// Columns the scan produces: the pruned projection, or every column in
    /// `SELECT *` order when the engine never pruned.
    #[must_use]
    pub fn read_schema(&self) -> Vec<&CqlField> {
        let table = self.data_layer.table();
        match &self.required_columns {
            Some(columns) => columns
                .iter()
                .filter_map(|column| table.column(column))
                .collect(),
            None => table.columns().iter().collect(),
        }
    }

    ///
    /// FILTER PUSHDOWN
    ///

    /// Split `filters` into those this source enforces and those the engine
    /// must keep evaluating. Stores the former, replacing any earlier push,
    /// and returns the latter in input order.
    pub fn push_filters(&mut self, filters: &[Filter]) -> Vec<Filter> {
        let (pushed, unsupported): (Vec<Filter>, Vec<Filter>) = filters
            .iter()
            .cloned()
            .partition(|filter| self.is_supported(filter));

        record(PlanEvent::FiltersPushed {
            pushed: pushed.len() as u64,
            unsupported: unsupported.len() as u64,
        });
        tracing::debug!(
            table = self.data_layer.table().table(),
            pushed = pushed.len(),
            unsupported = unsupported.len(),
            "filters pushed"
        );

        if pushed != self.pushed_filters {
            self.plan = None;
        }
        self.pushed_filters = pushed;
        self.state = PlannerState::FiltersFixed;

        unsupported
    }

    #[must_use]
    pub fn pushed_filters(&self) -> &[Filter] {
        &self.pushed_filters
    }

    fn is_supported(&self, filter: &Filter) -> bool {
        let table = self.data_layer.table();
        let pins_partition_key = filter
            .shape()
            .pinned_column()
            .is_some_and(|column| table.is_partition_key(column));

        pins_partition_key || self.data_layer.supports_filter(filter)
    }

    ///
    /// PLANNING
    ///

    /// Resolve the pushed filters into partition-key filters.
    ///
    /// An empty result means no narrowing: every split is scanned. Any
    /// resolution failure fails the whole plan; no partial plan is returned.
    pub fn build_plan(&mut self) -> Result<Arc<[PartitionKeyFilter]>, PlanError> {
        if let Some(plan) = &self.plan {
            let plan = Arc::clone(plan);
            self.state = PlannerState::Planned;
            return Ok(plan);
        }

        let plan: Arc<[PartitionKeyFilter]> = match self.resolve_partition_key_filters() {
            Ok(filters) => filters.into(),
            Err(err) => {
                record(PlanEvent::PlanFailed { class: err.class() });
                tracing::debug!(
                    table = self.data_layer.table().table(),
                    error = %err,
                    "plan build failed"
                );
                return Err(err);
            }
        };

        let outcome = if plan.is_empty() {
            PlanOutcome::Unrestricted
        } else {
            PlanOutcome::Targeted {
                keys: plan.len() as u64,
            }
        };
        record(PlanEvent::PlanBuilt { outcome });
        tracing::debug!(
            table = self.data_layer.table().table(),
            partition_keys = plan.len(),
            "plan built"
        );

        self.plan = Some(Arc::clone(&plan));
        self.state = PlannerState::Planned;

        Ok(plan)
    }

    fn resolve_partition_key_filters(&self) -> Result<Vec<PartitionKeyFilter>, PlanError> {
        let table = self.data_layer.table();
        let key_columns = table.partition_key_names();
        let key_set: BTreeSet<&str> = key_columns.iter().copied().collect();

        let values = extract_partition_key_values(&self.pushed_filters, &key_set);
        let Some(requested) = combination_count(&values, &key_columns) else {
            // partial pin: a token needs every key column
            return Ok(Vec::new());
        };

        let limit = self.config.max_partition_key_combinations;
        if requested > u128::from(limit) {
            match self.config.on_cardinality_exceeded {
                CardinalityPolicy::Reject => {
                    record(PlanEvent::CardinalityRejected { requested, limit });
                    return Err(PlanError::CardinalityExceeded { requested, limit });
                }
                CardinalityPolicy::FullScan => {
                    record(PlanEvent::CardinalityDegraded { requested, limit });
                    tracing::warn!(
                        table = table.table(),
                        requested = %requested,
                        limit,
                        "partition key combinations over limit, scanning all splits"
                    );
                    return Ok(Vec::new());
                }
            }
        }

        let resolver = self.data_layer.resolver();
        let partitioner = self.data_layer.partitioner();
        let mut filters = cartesian_product(&values, &key_columns)
            .into_iter()
            .map(|tuple| {
                resolver
                    .resolve(table, partitioner, &tuple)
                    .map(PartitionKeyFilter::from)
                    .map_err(PlanError::from)
            })
            .collect::<Result<Vec<_>, _>>()?;

        // ring order; distinct literals may encode to the same key ("1", "01")
        filters.sort_by(|left, right| {
            (left.token(), left.key()).cmp(&(right.token(), right.key()))
        });
        filters.dedup();

        Ok(filters)
    }

    /// Number of input partitions, as reported by the data layer.
    #[must_use]
    pub fn partition_count(&self) -> usize {
        self.data_layer.partition_count()
    }

    #[must_use]
    pub fn output_partitioning(&self) -> OutputPartitioning {
        self.data_layer.output_partitioning()
    }

    /// Build the plan and bundle it with everything a row scanner needs.
    pub fn scan(&mut self) -> Result<ScanPlan, PlanError> {
        let partition_key_filters = self.build_plan()?;
        let table = self.data_layer.table();
        let partitioner = self.data_layer.partitioner();

        let residual_filters = if partition_key_filters.is_empty() {
            self.pushed_filters.clone()
        } else {
            self.pushed_filters
                .iter()
                .filter(|filter| {
                    !filter
                        .shape()
                        .pinned_column()
                        .is_some_and(|column| table.is_partition_key(column))
                })
                .cloned()
                .collect()
        };

        Ok(ScanPlan {
            keyspace: table.keyspace().to_string(),
            table: table.table().to_string(),
            columns: self
                .read_schema()
                .into_iter()
                .map(|field| field.name.clone())
                .collect(),
            pushed_filters: self.pushed_filters.clone(),
            residual_filters,
            partition_key_filters,
            partitioner,
            input_partitions: TokenPartitioner::new(partitioner, self.partition_count()).splits(),
            partitioning: self.output_partitioning(),
        })
    }
}
