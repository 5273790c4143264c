use crate::plan::extract::ColumnValues;

/// Number of tuples [`cartesian_product`] would produce, or `None` when some
/// column in `ordered_columns` is not pinned. Saturates at `u128::MAX`.
#[must_use]
pub fn combination_count<S: AsRef<str>>(
    column_values: &ColumnValues,
    ordered_columns: &[S],
) -> Option<u128> {
    ordered_columns.iter().try_fold(1_u128, |acc, column| {
        let values = column_values.get(column.as_ref())?;
        let len = u128::try_from(values.len()).unwrap_or(u128::MAX);

        Some(acc.saturating_mul(len))
    })
}

/// Every complete key tuple over the pinned values, one value per column in
/// `ordered_columns` order; the first column varies slowest.
///
/// Returns nothing when any column is unpinned, since a partial key cannot
/// be hashed to a token. No size guard is applied here: callers bound the
/// expansion with [`combination_count`] first.
#[must_use]
pub fn cartesian_product<S: AsRef<str>>(
    column_values: &ColumnValues,
    ordered_columns: &[S],
) -> Vec<Vec<String>> {
    let mut sets = Vec::with_capacity(ordered_columns.len());
    for column in ordered_columns {
        let Some(values) = column_values.get(column.as_ref()) else {
            return Vec::new();
        };
        sets.push(values);
    }
    if sets.is_empty() {
        return Vec::new();
    }

    let mut tuples: Vec<Vec<String>> = vec![Vec::with_capacity(sets.len())];
    for values in sets {
        let mut next = Vec::with_capacity(tuples.len().saturating_mul(values.len()));
        for prefix in &tuples {
            for value in values {
                let mut tuple = prefix.clone();
                tuple.push(value.clone());
                next.push(tuple);
            }
        }
        tuples = next;
    }

    tuples
}

///
/// TESTS
///
