use crate::filter::{Filter, FilterShape};
use std::collections::{BTreeMap, BTreeSet};

/// Per-column literal values pinned by equality / IN filters.
pub type ColumnValues = BTreeMap<String, BTreeSet<String>>;

/// Collect the values pinned on partition-key columns.
///
/// Only top-level `=` and `IN` filters on members of `partition_key_columns`
/// contribute; everything else is ignored here and left to pushdown
/// negotiation. Filters are conjunctive, so a column pinned more than once
/// keeps only the values every pin allows.
#[must_use]
pub fn extract_partition_key_values<'a, I>(
    filters: I,
    partition_key_columns: &BTreeSet<&str>,
) -> ColumnValues
where
    I: IntoIterator<Item = &'a Filter>,
{
    let mut out = ColumnValues::new();

    for filter in filters {
        let (column, values) = match filter.shape() {
            FilterShape::Equals { column, value } => {
                (column, BTreeSet::from([value.to_string()]))
            }
            FilterShape::In { column, values } => (
                column,
                values.iter().map(ToString::to_string).collect::<BTreeSet<_>>(),
            ),
            FilterShape::Other => continue,
        };
        if !partition_key_columns.contains(column) {
            continue;
        }

        match out.get_mut(column) {
            Some(existing) => existing.retain(|value| values.contains(value)),
            None => {
                out.insert(column.to_string(), values);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Literal;

    fn keys(names: &[&'static str]) -> BTreeSet<&'static str> {
        names.iter().copied().collect()
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn equality_yields_singleton_and_in_yields_full_set() {
        let filters = [Filter::eq("pk1", "a"), Filter::in_("pk2", ["x", "y", "x"])];

        let values = extract_partition_key_values(&filters, &keys(&["pk1", "pk2"]));

        assert_eq!(values.len(), 2);
        assert_eq!(values["pk1"], set(&["a"]));
        assert_eq!(values["pk2"], set(&["x", "y"]));
    }

    #[test]
    fn ignores_non_key_columns_and_other_shapes() {
        let filters = [
            Filter::eq("ck", 1),
            Filter::gt("pk1", 3),
            Filter::is_null("pk1"),
            Filter::or(Filter::eq("pk1", 1), Filter::eq("pk1", 2)),
            Filter::eq("pk1", Literal::Null),
        ];

        let values = extract_partition_key_values(&filters, &keys(&["pk1"]));

        assert!(values.is_empty());
    }

    #[test]
    fn repeated_pins_intersect() {
        let filters = [
            Filter::in_("pk", [1, 2, 3]),
            Filter::in_("pk", [2, 3, 4]),
            Filter::eq("pk", 3),
        ];

        let values = extract_partition_key_values(&filters, &keys(&["pk"]));

        assert_eq!(values["pk"], set(&["3"]));
    }

    #[test]
    fn contradictory_pins_leave_an_empty_set() {
        let filters = [Filter::eq("pk", "a"), Filter::eq("pk", "b")];

        let values = extract_partition_key_values(&filters, &keys(&["pk"]));

        assert_eq!(values.get("pk"), Some(&BTreeSet::new()));
    }

    #[test]
    fn literals_are_rendered_as_text() {
        let filters = [Filter::in_(
            "pk",
            [Literal::Int(7), Literal::Bool(false), Literal::Bytes(vec![0xca, 0xfe])],
        )];

        let values = extract_partition_key_values(&filters, &keys(&["pk"]));

        assert_eq!(values["pk"], set(&["7", "false", "0xcafe"]));
    }
}
