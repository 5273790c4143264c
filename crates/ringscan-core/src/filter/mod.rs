//! Host-engine filter model.
//!
//! The host engine hands the data source a flat list of conjunctive filters,
//! each of which may itself be a tree. The planner never evaluates filters;
//! it only recognizes the shapes that pin partition-key columns.

mod literal;

pub use literal::Literal;

use serde::{Deserialize, Serialize};

///
/// Filter
///
/// Tagged rendition of the host engine's filter hierarchy.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum Filter {
    EqualTo { column: String, value: Literal },
    EqualNullSafe { column: String, value: Literal },
    GreaterThan { column: String, value: Literal },
    GreaterThanOrEqual { column: String, value: Literal },
    LessThan { column: String, value: Literal },
    LessThanOrEqual { column: String, value: Literal },
    In { column: String, values: Vec<Literal> },
    IsNull { column: String },
    IsNotNull { column: String },
    StringStartsWith { column: String, value: String },
    StringEndsWith { column: String, value: String },
    StringContains { column: String, value: String },
    And(Box<Self>, Box<Self>),
    Or(Box<Self>, Box<Self>),
    Not(Box<Self>),
}

impl Filter {
    #[must_use]
    pub fn eq(column: impl Into<String>, value: impl Into<Literal>) -> Self {
        Self::EqualTo {
            column: column.into(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn in_<I, V>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Literal>,
    {
        Self::In {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn gt(column: impl Into<String>, value: impl Into<Literal>) -> Self {
        Self::GreaterThan {
            column: column.into(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn lt(column: impl Into<String>, value: impl Into<Literal>) -> Self {
        Self::LessThan {
            column: column.into(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn is_null(column: impl Into<String>) -> Self {
        Self::IsNull {
            column: column.into(),
        }
    }

    #[must_use]
    pub fn and(left: Self, right: Self) -> Self {
        Self::And(Box::new(left), Box::new(right))
    }

    #[must_use]
    pub fn or(left: Self, right: Self) -> Self {
        Self::Or(Box::new(left), Box::new(right))
    }

    #[expect(clippy::should_implement_trait)]
    #[must_use]
    pub fn not(filter: Self) -> Self {
        Self::Not(Box::new(filter))
    }

    /// Recognize the filter by shape.
    ///
    /// Null literals never pin a column: `col = NULL` matches nothing and an
    /// IN list carrying NULL is left to the engine.
    #[must_use]
    pub fn shape(&self) -> FilterShape<'_> {
        match self {
            Self::EqualTo { column, value } if !value.is_null() => FilterShape::Equals {
                column: column.as_str(),
                value,
            },
            Self::In { column, values } if !values.iter().any(Literal::is_null) => {
                FilterShape::In {
                    column: column.as_str(),
                    values: values.as_slice(),
                }
            }
            _ => FilterShape::Other,
        }
    }

    /// Columns referenced anywhere in the filter tree.
    #[must_use]
    pub fn references(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out.sort_unstable();
        out.dedup();

        out
    }

    fn collect_references<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::EqualTo { column, .. }
            | Self::EqualNullSafe { column, .. }
            | Self::GreaterThan { column, .. }
            | Self::GreaterThanOrEqual { column, .. }
            | Self::LessThan { column, .. }
            | Self::LessThanOrEqual { column, .. }
            | Self::In { column, .. }
            | Self::IsNull { column }
            | Self::IsNotNull { column }
            | Self::StringStartsWith { column, .. }
            | Self::StringEndsWith { column, .. }
            | Self::StringContains { column, .. } => out.push(column.as_str()),
            Self::And(left, right) | Self::Or(left, right) => {
                left.collect_references(out);
                right.collect_references(out);
            }
            Self::Not(inner) => inner.collect_references(out),
        }
    }
}

///
/// FilterShape
///
/// Borrowed view of a filter as seen by partition-key extraction.
///

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FilterShape<'a> {
    Equals { column: &'a str, value: &'a Literal },
    In { column: &'a str, values: &'a [Literal] },
    Other,
}

impl<'a> FilterShape<'a> {
    /// Column pinned by this shape, if any.
    #[must_use]
    pub const fn pinned_column(&self) -> Option<&'a str> {
        match self {
            Self::Equals { column, .. } | Self::In { column, .. } => Some(*column),
            Self::Other => None,
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_and_in_are_recognized() {
        let eq = Filter::eq("pk", "a");
        let in_ = Filter::in_("pk", ["x", "y"]);

        assert_eq!(
            eq.shape(),
            FilterShape::Equals {
                column: "pk",
                value: &Literal::Text("a".into()),
            }
        );
        assert_eq!(in_.shape().pinned_column(), Some("pk"));
    }

    #[test]
    fn other_shapes_pin_nothing() {
        let cases = [
            Filter::gt("pk", 1),
            Filter::is_null("pk"),
            Filter::eq("pk", Literal::Null),
            Filter::in_("pk", [Literal::Int(1), Literal::Null]),
            Filter::or(Filter::eq("pk", 1), Filter::eq("pk", 2)),
            Filter::and(Filter::eq("pk", 1), Filter::eq("ck", 2)),
            Filter::not(Filter::eq("pk", 1)),
        ];

        for filter in cases {
            assert_eq!(filter.shape(), FilterShape::Other, "{filter:?}");
        }
    }

    #[test]
    fn references_walk_nested_trees() {
        let filter = Filter::or(
            Filter::and(Filter::eq("b", 1), Filter::is_null("a")),
            Filter::not(Filter::lt("b", 3)),
        );

        assert_eq!(filter.references(), vec!["a", "b"]);
    }
}
