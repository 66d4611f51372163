use std::cmp::Ordering;

use crate::data::datatable::DataValue;

/// Compare two cell values with a total order, so filter bounds and sort
/// directives behave deterministically even over untidy columns.
///
/// Same-type values compare naturally and integers compare numerically
/// against floats. Across other type pairs the order is fixed:
/// Null < Boolean < numbers < String < DateTime < TimeOfDay.
pub fn compare_values(a: &DataValue, b: &DataValue) -> Ordering {
    match (a, b) {
        (DataValue::Null, DataValue::Null) => Ordering::Equal,
        (DataValue::Null, _) => Ordering::Less,
        (_, DataValue::Null) => Ordering::Greater,

        (DataValue::Boolean(a), DataValue::Boolean(b)) => a.cmp(b),

        (DataValue::Integer(a), DataValue::Integer(b)) => a.cmp(b),
        (DataValue::Float(a), DataValue::Float(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
        (DataValue::Integer(a), DataValue::Float(b)) => {
            (*a as f64).partial_cmp(b).unwrap_or(Ordering::Equal)
        }
        (DataValue::Float(a), DataValue::Integer(b)) => {
            a.partial_cmp(&(*b as f64)).unwrap_or(Ordering::Equal)
        }

        (DataValue::String(a), DataValue::String(b)) => a.cmp(b),
        (DataValue::DateTime(a), DataValue::DateTime(b)) => a.cmp(b),
        (DataValue::TimeOfDay(a), DataValue::TimeOfDay(b)) => a.cmp(b),

        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Compare possibly-missing cells; a missing cell sorts below everything.
pub fn compare_optional_values(a: Option<&DataValue>, b: Option<&DataValue>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => compare_values(a, b),
    }
}

fn type_rank(value: &DataValue) -> u8 {
    match value {
        DataValue::Null => 0,
        DataValue::Boolean(_) => 1,
        DataValue::Integer(_) | DataValue::Float(_) => 2,
        DataValue::String(_) => 3,
        DataValue::DateTime(_) => 4,
        DataValue::TimeOfDay(_) => 5,
    }
}
