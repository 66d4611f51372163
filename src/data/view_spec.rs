//! The caller-facing request model for view derivation.
//!
//! A [`ViewSpec`] carries three optional facets: a column projection, a
//! set of range filters and a list of sort directives. All of them name
//! columns by zero-based position in the source table.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::data::datatable::DataValue;
use crate::data::value_compare::compare_values;

/// An inclusive range condition on one column.
///
/// At least one bound must be present for the filter to be well formed;
/// null cells never satisfy a bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeFilter {
    pub column: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<DataValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<DataValue>,
}

impl RangeFilter {
    pub fn new(column: usize) -> Self {
        Self {
            column,
            min_value: None,
            max_value: None,
        }
    }

    pub fn with_min(mut self, value: DataValue) -> Self {
        self.min_value = Some(value);
        self
    }

    pub fn with_max(mut self, value: DataValue) -> Self {
        self.max_value = Some(value);
        self
    }

    /// Whether a cell passes this filter. Missing and null cells fail.
    pub fn matches(&self, value: Option<&DataValue>) -> bool {
        let Some(value) = value else {
            return false;
        };
        if value.is_null() {
            return false;
        }
        if let Some(min) = &self.min_value {
            if compare_values(value, min) == Ordering::Less {
                return false;
            }
        }
        if let Some(max) = &self.max_value {
            if compare_values(value, max) == Ordering::Greater {
                return false;
            }
        }
        true
    }
}

/// One key of a multi-key sort. Ties fall through to the next directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortDirective {
    pub column: usize,
    #[serde(default)]
    pub desc: bool,
}

impl SortDirective {
    pub fn ascending(column: usize) -> Self {
        Self { column, desc: false }
    }

    pub fn descending(column: usize) -> Self {
        Self { column, desc: true }
    }
}

/// Direction for label-ordered column listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// The full view request. Empty facets mean "leave that aspect alone".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewSpec {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<usize>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filter: Vec<RangeFilter>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<SortDirective>,
}

impl ViewSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_columns(mut self, columns: Vec<usize>) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_filter(mut self, filter: RangeFilter) -> Self {
        self.filter.push(filter);
        self
    }

    pub fn with_sort(mut self, sort: SortDirective) -> Self {
        self.sort.push(sort);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.filter.is_empty() && self.sort.is_empty()
    }
}
