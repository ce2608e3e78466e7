use indexmap::{IndexMap, IndexSet};
use serde_json::{Value, json};

use crate::json_export::types::OrderedTableData;
use crate::table::TableResult;

// Typed JSON value of one cell: empty cells become null, plain numbers and booleans
// become JSON numbers and booleans, everything else stays a string
pub fn process_cell_value(value: &str) -> Value {
    if value.is_empty() {
        return Value::Null;
    }

    match value {
        "TRUE" => return json!(true),
        "FALSE" => return json!(false),
        _ => {}
    }

    // Codes such as `007` keep their leading zeros
    let leading_zero = value.len() > 1 && value.starts_with('0') && !value.starts_with("0.");
    if leading_zero || !value.bytes().all(|b| b.is_ascii_digit() || b == b'.' || b == b'-') {
        return json!(value);
    }

    match value.parse::<f64>() {
        Ok(num) if num.is_finite() => {
            if num.fract() == 0.0 && num.abs() < 1e15 {
                json!(num.trunc() as i64)
            } else {
                json!(num)
            }
        }
        _ => json!(value),
    }
}

// One key per column: the first occurrence of a label keeps it, later ones get `_2`, `_3`...
pub fn record_keys(header: &[String]) -> Vec<String> {
    let taken: IndexSet<&str> = header.iter().map(String::as_str).collect();
    let mut used: IndexSet<String> = IndexSet::with_capacity(header.len());

    header
        .iter()
        .map(|label| {
            let mut key = label.clone();
            let mut n = 2;
            while used.contains(&key) || (key != *label && taken.contains(key.as_str())) {
                key = format!("{}_{}", label, n);
                n += 1;
            }
            used.insert(key.clone());
            key
        })
        .collect()
}

// Data rows of `table` as objects keyed by header label
pub fn table_to_records(table: &TableResult) -> OrderedTableData {
    let keys = record_keys(&table.header);
    table
        .rows
        .iter()
        .map(|row| {
            let mut record = IndexMap::with_capacity(keys.len());
            for (key, value) in keys.iter().zip(row) {
                record.insert(key.clone(), process_cell_value(value));
            }
            record
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_get_json_types() {
        assert_eq!(process_cell_value(""), Value::Null);
        assert_eq!(process_cell_value("42"), json!(42));
        assert_eq!(process_cell_value("-3"), json!(-3));
        assert_eq!(process_cell_value("9.99"), json!(9.99));
        assert_eq!(process_cell_value("0.5"), json!(0.5));
        assert_eq!(process_cell_value("TRUE"), json!(true));
        assert_eq!(process_cell_value("007"), json!("007"));
        assert_eq!(process_cell_value("1,20"), json!("1,20"));
        assert_eq!(process_cell_value("2024-01-31"), json!("2024-01-31"));
        assert_eq!(process_cell_value("Widget"), json!("Widget"));
    }

    #[test]
    fn records_follow_header_order() {
        let table = TableResult::new(
            vec!["Code".into(), "Name".into(), "Price".into()],
            vec![vec!["A1".into(), "Widget".into(), "9.99".into()]],
        );
        let records = table_to_records(&table);
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].keys().collect::<Vec<_>>(),
            vec!["Code", "Name", "Price"]
        );
        assert_eq!(records[0]["Price"], json!(9.99));
    }

    #[test]
    fn repeated_labels_keep_every_value() {
        let table = TableResult::new(
            vec!["Code".into(), "Price".into(), "Price".into()],
            vec![vec!["A1".into(), "9.99".into(), "12.50".into()]],
        );
        let records = table_to_records(&table);
        assert_eq!(
            records[0].keys().collect::<Vec<_>>(),
            vec!["Code", "Price", "Price_2"]
        );
        assert_eq!(records[0]["Price"], json!(9.99));
        assert_eq!(records[0]["Price_2"], json!(12.5));
    }

    #[test]
    fn suffixes_skip_labels_already_in_the_header() {
        let header: Vec<String> = ["Price", "Price_2", "Price"].map(String::from).to_vec();
        assert_eq!(record_keys(&header), vec!["Price", "Price_2", "Price_3"]);
    }
}
