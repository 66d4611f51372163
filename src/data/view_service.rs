//! Derivation of view descriptors from a table and a view request.
//!
//! [`derive_view`] never touches the table's cells beyond reading them:
//! the result is a plan made of index lists, which [`crate::data::data_view`]
//! can materialize later. The plan has two stages. Stage one carries the
//! column projection and the filtered row set in original table order;
//! stage two carries the sorted row order as positions into stage one.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use thiserror::Error;
use tracing::debug;

use crate::data::datatable::DataTable;
use crate::data::value_compare::{compare_optional_values, compare_values};
use crate::data::view_spec::{RangeFilter, SortOrder, ViewSpec};

/// What is wrong with a single range filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FilterIssue {
    #[error("references column {index} but the table has {column_count} columns")]
    ColumnOutOfRange { index: usize, column_count: usize },
    #[error("has neither minValue nor maxValue")]
    MissingBounds,
    #[error("has minValue greater than maxValue")]
    InvertedRange,
}

/// A rejected view request, tagged with the facet that failed.
///
/// Facets are checked in a fixed order: columns, then filter, then sort.
/// The first failure wins, so callers can attribute the error to exactly
/// one part of the request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewError {
    #[error("columns[{position}] references column {index} but the table has {column_count} columns")]
    Columns {
        position: usize,
        index: usize,
        column_count: usize,
    },
    #[error("filter[{position}] {issue}")]
    Filter { position: usize, issue: FilterIssue },
    #[error("sort[{position}] references column {index} but the table has {column_count} columns")]
    Sort {
        position: usize,
        index: usize,
        column_count: usize,
    },
}

impl ViewError {
    /// The request facet this error belongs to.
    pub fn property(&self) -> &'static str {
        match self {
            ViewError::Columns { .. } => "columns",
            ViewError::Filter { .. } => "filter",
            ViewError::Sort { .. } => "sort",
        }
    }

    /// Wire form: `{"error": {"property": ..., "message": ...}}`.
    pub fn to_json(&self) -> JsonValue {
        json!({
            "error": {
                "property": self.property(),
                "message": self.to_string(),
            }
        })
    }
}

/// One transformation stage of a view plan.
///
/// `rows` in the first stage are original table indices; in every later
/// stage they are positions into the previous stage's row sequence. The
/// same chaining applies to `columns`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewStage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<usize>>,
}

impl ViewStage {
    pub fn empty() -> Self {
        Self {
            columns: None,
            rows: None,
        }
    }
}

/// An ordered list of stages; serializes as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewDescriptor {
    pub stages: Vec<ViewStage>,
}

impl ViewDescriptor {
    pub fn new(stages: Vec<ViewStage>) -> Self {
        Self { stages }
    }

    /// The column projection, taken from the first stage that sets one.
    pub fn projected_columns(&self) -> Option<&[usize]> {
        self.stages
            .iter()
            .find_map(|stage| stage.columns.as_deref())
    }
}

/// Plan a view of `table` according to `spec`.
///
/// Every facet is validated before any row is visited. The returned
/// descriptor always has two stages: filtering plus projection first,
/// then the sort order. With no sort directives the second stage is the
/// identity permutation over the surviving rows.
pub fn derive_view(table: &DataTable, spec: &ViewSpec) -> Result<ViewDescriptor, ViewError> {
    let column_count = table.column_count();

    for (position, &index) in spec.columns.iter().enumerate() {
        if index >= column_count {
            return Err(ViewError::Columns {
                position,
                index,
                column_count,
            });
        }
    }
    for (position, filter) in spec.filter.iter().enumerate() {
        if let Some(issue) = validate_filter(filter, column_count) {
            return Err(ViewError::Filter { position, issue });
        }
    }
    for (position, directive) in spec.sort.iter().enumerate() {
        if directive.column >= column_count {
            return Err(ViewError::Sort {
                position,
                index: directive.column,
                column_count,
            });
        }
    }

    let survivors: Vec<usize> = (0..table.row_count())
        .filter(|&row| {
            spec.filter
                .iter()
                .all(|filter| filter.matches(table.value(row, filter.column)))
        })
        .collect();
    debug!(
        target: "dataview",
        "{} of {} rows pass {} filter(s) on table '{}'",
        survivors.len(),
        table.row_count(),
        spec.filter.len(),
        table.name
    );

    let columns = if spec.columns.is_empty() {
        (0..column_count).collect()
    } else {
        spec.columns.clone()
    };

    // Positions into `survivors`, reordered by the sort keys. sort_by is
    // stable, so ties keep their filtered order.
    let mut order: Vec<usize> = (0..survivors.len()).collect();
    if !spec.sort.is_empty() {
        order.sort_by(|&a, &b| {
            for directive in &spec.sort {
                let left = table.value(survivors[a], directive.column);
                let right = table.value(survivors[b], directive.column);
                let mut verdict = compare_optional_values(left, right);
                if directive.desc {
                    verdict = verdict.reverse();
                }
                if verdict != Ordering::Equal {
                    return verdict;
                }
            }
            Ordering::Equal
        });
    }

    Ok(ViewDescriptor::new(vec![
        ViewStage {
            columns: Some(columns),
            rows: Some(survivors),
        },
        ViewStage {
            columns: None,
            rows: Some(order),
        },
    ]))
}

fn validate_filter(filter: &RangeFilter, column_count: usize) -> Option<FilterIssue> {
    if filter.column >= column_count {
        return Some(FilterIssue::ColumnOutOfRange {
            index: filter.column,
            column_count,
        });
    }
    match (&filter.min_value, &filter.max_value) {
        (None, None) => Some(FilterIssue::MissingBounds),
        (Some(min), Some(max)) if compare_values(min, max) == Ordering::Greater => {
            Some(FilterIssue::InvertedRange)
        }
        _ => None,
    }
}

/// Column positions ordered by label.
///
/// The first `skip` columns keep their original positions; the rest are
/// ordered by label text, with position as the tiebreak. Useful for
/// pickers that pin a leading key column while listing the remainder
/// alphabetically.
pub fn sorted_columns_by_label(table: &DataTable, skip: usize, order: SortOrder) -> Vec<usize> {
    let column_count = table.column_count();
    let skip = skip.min(column_count);

    let mut result: Vec<usize> = (0..skip).collect();
    let mut rest: Vec<usize> = (skip..column_count).collect();
    rest.sort_by(|&a, &b| {
        let verdict = table.columns[a].label.cmp(&table.columns[b].label);
        let verdict = match order {
            SortOrder::Ascending => verdict,
            SortOrder::Descending => verdict.reverse(),
        };
        verdict.then(a.cmp(&b))
    });
    result.extend(rest);
    result
}
