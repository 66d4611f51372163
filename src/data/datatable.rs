use std::collections::HashMap;
use std::fmt;

use anyhow::{anyhow, bail, Context, Result};
use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use tracing::{debug, warn};

use crate::data::type_inference;

/// How many leading rows to inspect when typing an untyped column.
const INFER_SAMPLE_ROWS: usize = 100;

/// Declared type of a column, using the chart-wire vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Number,
    Boolean,
    Date,
    DateTime,
    TimeOfDay,
}

/// Column identity and type.
///
/// `id` is the stable key used for lookups and record export; `label` is
/// the human-facing header text and defaults to the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataColumn {
    pub id: String,
    pub label: String,
    pub column_type: ColumnType,
}

impl DataColumn {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            column_type: ColumnType::String,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_type(mut self, column_type: ColumnType) -> Self {
        self.column_type = column_type;
        self
    }
}

/// A single cell value.
///
/// Serialized untagged, so values travel as plain JSON scalars: integers
/// and floats as numbers, datetimes as ISO strings. Variant order matters
/// for deserialization; temporal variants sit before `String` so ISO
/// strings parse into their typed form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    DateTime(NaiveDateTime),
    TimeOfDay(NaiveTime),
    String(String),
}

impl DataValue {
    /// Convert a JSON scalar guided by the declared column type.
    ///
    /// Temporal columns parse their strings into chrono values; a string
    /// that fails to parse is kept verbatim rather than dropped.
    pub fn from_json(value: &JsonValue, column_type: ColumnType) -> Self {
        match value {
            JsonValue::Null => DataValue::Null,
            JsonValue::Bool(b) => DataValue::Boolean(*b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    DataValue::Integer(i)
                } else if let Some(f) = n.as_f64() {
                    DataValue::Float(f)
                } else {
                    DataValue::String(n.to_string())
                }
            }
            JsonValue::String(s) => match column_type {
                ColumnType::Date | ColumnType::DateTime => type_inference::parse_datetime(s)
                    .map(DataValue::DateTime)
                    .unwrap_or_else(|| DataValue::String(s.clone())),
                ColumnType::TimeOfDay => type_inference::parse_time(s)
                    .map(DataValue::TimeOfDay)
                    .unwrap_or_else(|| DataValue::String(s.clone())),
                ColumnType::Boolean => {
                    if s.eq_ignore_ascii_case("true") {
                        DataValue::Boolean(true)
                    } else if s.eq_ignore_ascii_case("false") {
                        DataValue::Boolean(false)
                    } else {
                        DataValue::String(s.clone())
                    }
                }
                _ => DataValue::String(s.clone()),
            },
            // Nested structures are kept as their JSON text.
            JsonValue::Array(_) | JsonValue::Object(_) => DataValue::String(value.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, DataValue::Null)
    }

    /// Plain JSON form, as used in chart cells and record export.
    pub fn to_json(&self) -> JsonValue {
        match self {
            DataValue::Null => JsonValue::Null,
            DataValue::Boolean(b) => json!(b),
            DataValue::Integer(i) => json!(i),
            DataValue::Float(f) => json!(f),
            DataValue::DateTime(dt) => json!(dt.format("%Y/%m/%d %H:%M:%S").to_string()),
            DataValue::TimeOfDay(t) => json!(t.format("%H:%M:%S").to_string()),
            DataValue::String(s) => json!(s),
        }
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Null => write!(f, ""),
            DataValue::Boolean(b) => write!(f, "{}", b),
            DataValue::Integer(i) => write!(f, "{}", i),
            DataValue::Float(fl) => write!(f, "{}", fl),
            DataValue::DateTime(dt) => write!(f, "{}", dt.format("%Y/%m/%d %H:%M:%S")),
            DataValue::TimeOfDay(t) => write!(f, "{}", t.format("%H:%M:%S")),
            DataValue::String(s) => write!(f, "{}", s),
        }
    }
}

/// A row of cell values, one per table column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRow {
    pub values: Vec<DataValue>,
}

impl DataRow {
    pub fn new(values: Vec<DataValue>) -> Self {
        Self { values }
    }

    pub fn get(&self, index: usize) -> Option<&DataValue> {
        self.values.get(index)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// An in-memory table: ordered columns plus rows of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataTable {
    pub name: String,
    pub columns: Vec<DataColumn>,
    pub rows: Vec<DataRow>,
    pub metadata: HashMap<String, String>,
}

impl DataTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            rows: Vec::new(),
            metadata: HashMap::new(),
        }
    }

    pub fn add_column(&mut self, column: DataColumn) -> &mut Self {
        self.columns.push(column);
        self
    }

    pub fn add_row(&mut self, row: DataRow) -> Result<()> {
        if row.len() != self.columns.len() {
            bail!(
                "row has {} values but table '{}' has {} columns",
                row.len(),
                self.name,
                self.columns.len()
            );
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of the column with the given id.
    pub fn column_index(&self, id: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.id == id)
    }

    pub fn column_ids(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.id.clone()).collect()
    }

    pub fn column_labels(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.label.clone()).collect()
    }

    /// Cell at the given row and column position.
    pub fn value(&self, row: usize, column: usize) -> Option<&DataValue> {
        self.rows.get(row)?.get(column)
    }

    /// Parse a chart-formatted table: `{cols: [...], rows: [{c: [...]}]}`.
    ///
    /// Column labels default to the id and missing types default to
    /// string. Cells may be objects with a `v` key or null; short rows
    /// are padded with nulls and extra cells are dropped with a warning.
    pub fn from_chart_json(json: &JsonValue, name: &str) -> Result<Self> {
        let wire: WireTable = serde_json::from_value(json.clone())
            .context("chart table JSON does not match the {cols, rows} shape")?;

        let mut table = DataTable::new(name);
        for (index, col) in wire.cols.into_iter().enumerate() {
            let id = if col.id.is_empty() {
                format!("col{}", index)
            } else {
                col.id
            };
            let label = col.label.unwrap_or_else(|| id.clone());
            let column_type = col.column_type.unwrap_or(ColumnType::String);
            table.add_column(DataColumn::new(id).with_label(label).with_type(column_type));
        }

        let column_count = table.columns.len();
        for wire_row in wire.rows {
            if wire_row.c.len() > column_count {
                warn!(
                    target: "datatable",
                    "row has {} cells but table '{}' has {} columns, extra cells dropped",
                    wire_row.c.len(),
                    table.name,
                    column_count
                );
            }
            let values: Vec<DataValue> = (0..column_count)
                .map(|i| match wire_row.c.get(i) {
                    Some(Some(cell)) => DataValue::from_json(&cell.v, table.columns[i].column_type),
                    _ => DataValue::Null,
                })
                .collect();
            table.add_row(DataRow::new(values))?;
        }

        table
            .metadata
            .insert("source_type".to_string(), "chart".to_string());
        debug!(
            target: "datatable",
            "parsed chart table '{}' with {} columns and {} rows",
            table.name,
            table.column_count(),
            table.row_count()
        );
        Ok(table)
    }

    /// Emit the chart-formatted JSON form of this table.
    pub fn to_chart_json(&self) -> JsonValue {
        let cols: Vec<JsonValue> = self
            .columns
            .iter()
            .map(|c| json!({"id": c.id, "label": c.label, "type": c.column_type}))
            .collect();
        let rows: Vec<JsonValue> = self
            .rows
            .iter()
            .map(|row| {
                let cells: Vec<JsonValue> =
                    row.values.iter().map(|v| json!({"v": v.to_json()})).collect();
                json!({"c": cells})
            })
            .collect();
        json!({"cols": cols, "rows": rows})
    }

    /// Build a table from an array of JSON record objects.
    ///
    /// Columns come from the first record's keys; types are inferred from
    /// a sample of the leading rows. Keys absent from a record become
    /// null cells.
    pub fn from_records(records: &[JsonValue], name: &str) -> Result<Self> {
        let mut table = DataTable::new(name);
        table
            .metadata
            .insert("source_type".to_string(), "records".to_string());

        let Some(first) = records.first() else {
            return Ok(table);
        };
        let first = first
            .as_object()
            .ok_or_else(|| anyhow!("record rows must be JSON objects"))?;
        for key in first.keys() {
            table.add_column(DataColumn::new(key.clone()));
        }

        for column in &mut table.columns {
            let mut verdict: Option<ColumnType> = None;
            for record in records.iter().take(INFER_SAMPLE_ROWS) {
                // Absent keys count the same as null cells: no opinion.
                let Some(cell) = record.get(column.id.as_str()) else {
                    continue;
                };
                if let Some(observed) = type_inference::classify_value(cell) {
                    verdict = Some(type_inference::merge_types(verdict, observed));
                    if verdict == Some(ColumnType::String) {
                        break;
                    }
                }
            }
            column.column_type = verdict.unwrap_or(ColumnType::String);
        }

        for record in records {
            let obj = record
                .as_object()
                .ok_or_else(|| anyhow!("record rows must be JSON objects"))?;
            let values: Vec<DataValue> = table
                .columns
                .iter()
                .map(|c| {
                    obj.get(c.id.as_str())
                        .map(|v| DataValue::from_json(v, c.column_type))
                        .unwrap_or(DataValue::Null)
                })
                .collect();
            table.add_row(DataRow::new(values))?;
        }

        debug!(
            target: "datatable",
            "built table '{}' from {} records with {} columns",
            table.name,
            table.row_count(),
            table.column_count()
        );
        Ok(table)
    }

    /// Summary statistics for the table.
    pub fn get_stats(&self) -> DataTableStats {
        DataTableStats {
            row_count: self.row_count(),
            column_count: self.column_count(),
            memory_size: self.estimate_memory_size(),
            null_count: self
                .rows
                .iter()
                .flat_map(|row| &row.values)
                .filter(|value| value.is_null())
                .count(),
        }
    }

    /// Rough in-memory footprint in bytes.
    pub fn estimate_memory_size(&self) -> usize {
        let mut size = std::mem::size_of::<Self>();

        size += self.columns.len() * std::mem::size_of::<DataColumn>();
        for column in &self.columns {
            size += column.id.len() + column.label.len();
        }

        size += self.rows.len() * std::mem::size_of::<DataRow>();
        for row in &self.rows {
            for value in &row.values {
                size += std::mem::size_of::<DataValue>();
                // Only strings carry heap content; every other variant is inline.
                if let DataValue::String(s) = value {
                    size += s.len();
                }
            }
        }

        size
    }
}

/// Statistics about a table.
#[derive(Debug, Clone)]
pub struct DataTableStats {
    pub row_count: usize,
    pub column_count: usize,
    pub memory_size: usize,
    pub null_count: usize,
}

#[derive(Debug, Deserialize)]
struct WireTable {
    #[serde(default)]
    cols: Vec<WireColumn>,
    #[serde(default)]
    rows: Vec<WireRow>,
}

#[derive(Debug, Deserialize)]
struct WireColumn {
    #[serde(default)]
    id: String,
    label: Option<String>,
    #[serde(rename = "type")]
    column_type: Option<ColumnType>,
}

#[derive(Debug, Deserialize)]
struct WireRow {
    #[serde(default)]
    c: Vec<Option<WireCell>>,
}

// Cells may carry a formatted `f` alongside `v`; unknown keys are ignored.
#[derive(Debug, Deserialize)]
struct WireCell {
    #[serde(default)]
    v: JsonValue,
}
