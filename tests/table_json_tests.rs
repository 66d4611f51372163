#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use explorer_dataview::data::data_view::DataView;
    use explorer_dataview::data::datatable::{ColumnType, DataTable, DataValue};
    use explorer_dataview::data::view_service::derive_view;
    use explorer_dataview::data::view_spec::{SortDirective, ViewSpec};
    use serde_json::json;

    #[test]
    fn test_chart_json_emission_shape() {
        let chart = json!({
            "cols": [
                {"id": "name", "label": "Name", "type": "string"},
                {"id": "score", "label": "Score", "type": "number"}
            ],
            "rows": [
                {"c": [{"v": "alpha"}, {"v": 12}]},
                {"c": [{"v": "beta"}, {"v": null}]}
            ]
        });

        let table = DataTable::from_chart_json(&chart, "t").unwrap();
        assert_eq!(
            table.to_chart_json(),
            json!({
                "cols": [
                    {"id": "name", "label": "Name", "type": "string"},
                    {"id": "score", "label": "Score", "type": "number"}
                ],
                "rows": [
                    {"c": [{"v": "alpha"}, {"v": 12}]},
                    {"c": [{"v": "beta"}, {"v": null}]}
                ]
            })
        );
    }

    #[test]
    fn test_chart_json_tolerates_sparse_input() {
        // Formatted values, missing labels, missing types, short rows and
        // null cells all come up in real chart payloads.
        let chart = json!({
            "cols": [
                {"id": "when", "type": "datetime"},
                {"id": "value"}
            ],
            "rows": [
                {"c": [{"v": "2013/03/03 00:48:04", "f": "March 3"}, {"v": "ok"}]},
                {"c": [null]},
                {"c": []}
            ]
        });

        let table = DataTable::from_chart_json(&chart, "sparse").unwrap();
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.columns[0].label, "when");
        assert_eq!(table.columns[1].column_type, ColumnType::String);

        assert!(matches!(table.value(0, 0), Some(DataValue::DateTime(_))));
        assert_eq!(table.value(1, 0), Some(&DataValue::Null));
        assert_eq!(table.value(1, 1), Some(&DataValue::Null));
        assert_eq!(table.value(2, 0), Some(&DataValue::Null));
    }

    #[test]
    fn test_chart_json_rejects_wrong_shape() {
        let err = DataTable::from_chart_json(&json!({"cols": 5}), "bad").unwrap_err();
        assert!(err.to_string().contains("cols"));

        let err = DataTable::from_chart_json(&json!([1, 2, 3]), "bad").unwrap_err();
        assert!(err.to_string().contains("{cols, rows}"));
    }

    #[test]
    fn test_records_pipeline_end_to_end() {
        let records = vec![
            json!({"host": "web-1", "latency": 41.5, "seen": "2024-02-01 10:00:00"}),
            json!({"host": "web-2", "latency": 12.0, "seen": "2024-02-01 10:05:00"}),
            json!({"host": "web-3", "latency": 29.25, "seen": "2024-02-01 10:10:00"}),
        ];
        let table = Arc::new(DataTable::from_records(&records, "latency").unwrap());
        assert_eq!(table.column_ids(), vec!["host", "latency", "seen"]);
        assert_eq!(table.columns[1].column_type, ColumnType::Number);
        assert_eq!(table.columns[2].column_type, ColumnType::DateTime);

        let spec = ViewSpec::new()
            .with_columns(vec![0, 1])
            .with_sort(SortDirective::ascending(1));
        let descriptor = derive_view(&table, &spec).unwrap();
        assert_eq!(descriptor.stages[1].rows, Some(vec![1, 2, 0]));

        let view = DataView::from_descriptor(table, &descriptor).unwrap();
        assert_eq!(
            view.to_records_json(),
            json!([
                {"host": "web-2", "latency": 12.0},
                {"host": "web-3", "latency": 29.25},
                {"host": "web-1", "latency": 41.5}
            ])
        );
    }

    #[test]
    fn test_table_survives_chart_round_trip_under_derivation() {
        let records = vec![
            json!({"a": 1, "b": "x"}),
            json!({"a": 2, "b": "y"}),
        ];
        let table = DataTable::from_records(&records, "t").unwrap();
        let reparsed = DataTable::from_chart_json(&table.to_chart_json(), "t").unwrap();

        assert_eq!(table.column_ids(), reparsed.column_ids());
        assert_eq!(table.rows, reparsed.rows);

        let spec = ViewSpec::new().with_sort(SortDirective::descending(0));
        assert_eq!(
            derive_view(&table, &spec).unwrap(),
            derive_view(&reparsed, &spec).unwrap()
        );
    }
}
