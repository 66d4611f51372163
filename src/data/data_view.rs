use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use csv::WriterBuilder;
use serde_json::Value as JsonValue;

use crate::data::datatable::{DataRow, DataTable, DataValue};
use crate::data::view_service::ViewDescriptor;

/// A materialized view over a [`DataTable`].
///
/// The table itself is never modified; the view is just the list of row
/// and column indices that remain visible, in display order.
#[derive(Debug, Clone)]
pub struct DataView {
    source: Arc<DataTable>,

    /// Original row indices in display order.
    visible_rows: Vec<usize>,

    /// Original column indices in display order.
    visible_columns: Vec<usize>,
}

impl DataView {
    /// A view showing the whole table unchanged.
    pub fn new(source: Arc<DataTable>) -> Self {
        let visible_rows = (0..source.row_count()).collect();
        let visible_columns = (0..source.column_count()).collect();
        Self {
            source,
            visible_rows,
            visible_columns,
        }
    }

    /// Resolve a staged view plan against the table.
    ///
    /// Stage one indices refer to the table; each later stage's indices
    /// are positions into the sequence left by the stage before it. A
    /// stage without rows or columns leaves that aspect untouched. Fails
    /// on any index outside its stage's range.
    pub fn from_descriptor(source: Arc<DataTable>, descriptor: &ViewDescriptor) -> Result<Self> {
        let mut rows: Option<Vec<usize>> = None;
        let mut columns: Option<Vec<usize>> = None;

        for (stage, view_stage) in descriptor.stages.iter().enumerate() {
            if let Some(stage_rows) = &view_stage.rows {
                let resolved = match &rows {
                    None => {
                        for &row in stage_rows {
                            if row >= source.row_count() {
                                return Err(anyhow!(
                                    "stage {} references row {} but the table has {} rows",
                                    stage,
                                    row,
                                    source.row_count()
                                ));
                            }
                        }
                        stage_rows.clone()
                    }
                    Some(prior) => stage_rows
                        .iter()
                        .map(|&position| {
                            prior.get(position).copied().ok_or_else(|| {
                                anyhow!(
                                    "stage {} references position {} but the prior stage has {} rows",
                                    stage,
                                    position,
                                    prior.len()
                                )
                            })
                        })
                        .collect::<Result<Vec<usize>>>()?,
                };
                rows = Some(resolved);
            }

            if let Some(stage_columns) = &view_stage.columns {
                let resolved = match &columns {
                    None => {
                        for &column in stage_columns {
                            if column >= source.column_count() {
                                return Err(anyhow!(
                                    "stage {} references column {} but the table has {} columns",
                                    stage,
                                    column,
                                    source.column_count()
                                ));
                            }
                        }
                        stage_columns.clone()
                    }
                    Some(prior) => stage_columns
                        .iter()
                        .map(|&position| {
                            prior.get(position).copied().ok_or_else(|| {
                                anyhow!(
                                    "stage {} references column position {} but the prior stage has {} columns",
                                    stage,
                                    position,
                                    prior.len()
                                )
                            })
                        })
                        .collect::<Result<Vec<usize>>>()?,
                };
                columns = Some(resolved);
            }
        }

        let visible_rows = rows.unwrap_or_else(|| (0..source.row_count()).collect());
        let visible_columns = columns.unwrap_or_else(|| (0..source.column_count()).collect());
        Ok(Self {
            source,
            visible_rows,
            visible_columns,
        })
    }

    pub fn row_count(&self) -> usize {
        self.visible_rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.visible_columns.len()
    }

    /// Header labels for the visible columns, in display order.
    pub fn column_labels(&self) -> Vec<String> {
        self.visible_columns
            .iter()
            .filter_map(|&idx| self.source.columns.get(idx))
            .map(|c| c.label.clone())
            .collect()
    }

    /// Stable ids for the visible columns, in display order.
    pub fn column_ids(&self) -> Vec<String> {
        self.visible_columns
            .iter()
            .filter_map(|&idx| self.source.columns.get(idx))
            .map(|c| c.id.clone())
            .collect()
    }

    /// Build the row at a display position, projected to visible columns.
    pub fn get_row(&self, index: usize) -> Option<DataRow> {
        let row_idx = *self.visible_rows.get(index)?;
        let values = self
            .visible_columns
            .iter()
            .map(|&col_idx| {
                self.source
                    .value(row_idx, col_idx)
                    .cloned()
                    .unwrap_or(DataValue::Null)
            })
            .collect();
        Some(DataRow::new(values))
    }

    pub fn get_rows(&self) -> Vec<DataRow> {
        (0..self.row_count()).filter_map(|i| self.get_row(i)).collect()
    }

    pub fn source(&self) -> &DataTable {
        &self.source
    }

    pub fn visible_row_indices(&self) -> &[usize] {
        &self.visible_rows
    }

    pub fn visible_column_indices(&self) -> &[usize] {
        &self.visible_columns
    }

    /// Render the view as CSV text with labels as the header row.
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = WriterBuilder::new().from_writer(vec![]);
        writer
            .write_record(self.column_labels())
            .context("writing csv header")?;
        for row in self.get_rows() {
            let record: Vec<String> = row.values.iter().map(|v| v.to_string()).collect();
            writer.write_record(&record).context("writing csv row")?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow!("finalizing csv export: {}", e))?;
        String::from_utf8(bytes).context("csv export is not valid utf-8")
    }

    /// Emit the view as an array of `{id: value}` record objects.
    pub fn to_records_json(&self) -> JsonValue {
        let ids = self.column_ids();
        let records: Vec<JsonValue> = self
            .get_rows()
            .into_iter()
            .map(|row| {
                let mut object = serde_json::Map::new();
                for (id, value) in ids.iter().zip(row.values.iter()) {
                    object.insert(id.clone(), value.to_json());
                }
                JsonValue::Object(object)
            })
            .collect();
        JsonValue::Array(records)
    }
}
