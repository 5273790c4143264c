use crate::{
    encode::{compose_key, encode_literal},
    partitioner::token_for,
};
use ringscan_core::{
    data_layer::DataLayer,
    filter::Filter,
    schema::{CqlField, CqlTable},
    token::{Partitioner, ResolveError, ResolvedKey, TokenResolver},
};

///
/// CqlBridge
///
/// Token resolver backed by Cassandra's own serialization rules: literals
/// are encoded per column type, combined into the partition key, and hashed
/// by the requested partitioner.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct CqlBridge;

impl CqlBridge {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Serialize one complete partition-key tuple without hashing it.
    pub fn encode_key(&self, table: &CqlTable, key: &[String]) -> Result<Vec<u8>, ResolveError> {
        let columns: Vec<&CqlField> = table.partition_keys().collect();
        if columns.len() != key.len() {
            return Err(ResolveError::Arity {
                expected: columns.len(),
                found: key.len(),
            });
        }

        let mut components = Vec::with_capacity(columns.len());
        for (field, value) in columns.into_iter().zip(key) {
            let bytes = encode_literal(field, value)?;
            components.push((field, value.as_str(), bytes));
        }

        compose_key(&components).map_err(ResolveError::from)
    }
}

impl TokenResolver for CqlBridge {
    fn resolve(
        &self,
        table: &CqlTable,
        partitioner: Partitioner,
        key: &[String],
    ) -> Result<ResolvedKey, ResolveError> {
        let bytes = self.encode_key(table, key)?;
        let token = token_for(partitioner, &bytes);

        tracing::trace!(
            keyspace = table.keyspace(),
            table = table.table(),
            partitioner = %partitioner,
            token = %token,
            "partition key resolved"
        );

        Ok(ResolvedKey::new(bytes, token))
    }
}

///
/// CqlDataLayer
///
/// Ready-made data layer for a table whose partition keys resolve through
/// [`CqlBridge`]. Pushdown beyond partition-key pins is opt-in per column.
///

#[derive(Clone, Debug)]
pub struct CqlDataLayer {
    table: CqlTable,
    partitioner: Partitioner,
    partitions: usize,
    filterable_columns: Vec<String>,
    bridge: CqlBridge,
}

impl CqlDataLayer {
    #[must_use]
    pub const fn new(table: CqlTable, partitioner: Partitioner, partitions: usize) -> Self {
        Self {
            table,
            partitioner,
            partitions,
            filterable_columns: Vec::new(),
            bridge: CqlBridge::new(),
        }
    }

    /// Columns the row scanner evaluates filters on by itself.
    #[must_use]
    pub fn with_filterable_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filterable_columns = columns.into_iter().map(Into::into).collect();
        self
    }
}

impl DataLayer for CqlDataLayer {
    fn table(&self) -> &CqlTable {
        &self.table
    }

    fn partitioner(&self) -> Partitioner {
        self.partitioner
    }

    fn resolver(&self) -> &dyn TokenResolver {
        &self.bridge
    }

    fn partition_count(&self) -> usize {
        self.partitions
    }

    fn supports_filter(&self, filter: &Filter) -> bool {
        let references = filter.references();
        !references.is_empty()
            && references
                .iter()
                .all(|column| self.filterable_columns.iter().any(|known| known == column))
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use ringscan_core::{
        schema::CqlType,
        token::{KeyEncodingReason, Token},
    };

    fn table(fields: Vec<CqlField>) -> CqlTable {
        CqlTable::new("ks", "tbl", fields).expect("valid table")
    }

    fn key(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn single_int_key_resolves_to_cassandra_token() {
        let table = table(vec![CqlField::partition_key("id", 0, CqlType::Int)]);
        let resolved = CqlBridge::new()
            .resolve(&table, Partitioner::Murmur3, &key(&["1"]))
            .expect("resolve");

        assert_eq!(resolved.key, vec![0, 0, 0, 1]);
        assert_eq!(resolved.token, Token::from(-4_069_959_284_402_364_209_i64));
    }

    #[test]
    fn composite_key_follows_declared_key_order() {
        // declared out of order; position decides
        let table = table(vec![
            CqlField::partition_key("b", 1, CqlType::Int),
            CqlField::partition_key("a", 0, CqlType::Text),
        ]);
        let bytes = CqlBridge::new()
            .encode_key(&table, &key(&["x", "1"]))
            .expect("encode");

        assert_eq!(bytes, vec![0, 1, b'x', 0, 0, 4, 0, 0, 0, 1, 0]);
    }

    #[test]
    fn arity_mismatch_is_reported() {
        let table = table(vec![
            CqlField::partition_key("a", 0, CqlType::Text),
            CqlField::partition_key("b", 1, CqlType::Text),
        ]);
        let err = CqlBridge::new()
            .resolve(&table, Partitioner::Murmur3, &key(&["x"]))
            .expect_err("arity");

        assert!(matches!(
            err,
            ResolveError::Arity {
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn encoding_failure_names_column_and_value() {
        let table = table(vec![
            CqlField::partition_key("name", 0, CqlType::Text),
            CqlField::partition_key("year", 1, CqlType::SmallInt),
        ]);
        let err = CqlBridge::new()
            .resolve(&table, Partitioner::Random, &key(&["x", "99999"]))
            .expect_err("out of range");

        let inner = match err {
            ResolveError::Encoding(inner) => inner,
            other => panic!("expected encoding error, got {other:?}"),
        };
        assert_eq!(inner.column, "year");
        assert_eq!(inner.value, "99999");
        assert_eq!(
            inner.reason,
            KeyEncodingReason::OutOfRange {
                cql_type: "smallint".to_string(),
            }
        );
    }

    #[test]
    fn data_layer_supports_only_configured_columns() {
        let layer = CqlDataLayer::new(
            table(vec![
                CqlField::partition_key("id", 0, CqlType::Int),
                CqlField::value("v", 0, CqlType::Int),
                CqlField::value("w", 1, CqlType::Int),
            ]),
            Partitioner::Murmur3,
            4,
        )
        .with_filterable_columns(["v"]);

        assert!(layer.supports_filter(&Filter::gt("v", 1)));
        assert!(!layer.supports_filter(&Filter::gt("w", 1)));
        assert!(!layer.supports_filter(&Filter::and(
            Filter::gt("v", 1),
            Filter::gt("w", 1)
        )));
        assert_eq!(layer.output_partitioning().num_partitions, 4);
    }
}
