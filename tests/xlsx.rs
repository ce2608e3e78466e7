use pretty_assertions::assert_eq;
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};
use sheet_tables::excel::open_workbook;
use sheet_tables::json_export::{OutputShape, export_tables_json};
use sheet_tables::{ExtractConfig, extract_workbook};

fn write_price_list(path: &std::path::Path) {
    let mut workbook = XlsxWorkbook::new();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Prices").unwrap();
    sheet
        .merge_range(0, 0, 0, 2, "Acme Corp Price List", &Format::new())
        .unwrap();
    for (col, label) in ["Code", "Name", "Price"].iter().enumerate() {
        sheet.write_string(2, col as u16, *label).unwrap();
    }
    let items = [("A1", "Widget", 9.99), ("A2", "Gadget", 14.5), ("A3", "Gizmo", 3.0)];
    for (i, (code, name, price)) in items.iter().enumerate() {
        let row = 3 + i as u32;
        sheet.write_string(row, 0, *code).unwrap();
        sheet.write_string(row, 1, *name).unwrap();
        sheet.write_number(row, 2, *price).unwrap();
    }

    let notes = workbook.add_worksheet();
    notes.set_name("Notes").unwrap();
    notes.write_string(0, 0, "Prices valid until further notice").unwrap();

    workbook.save(path).unwrap();
}

#[test]
fn reads_merged_banner_and_extracts_the_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prices.xlsx");
    write_price_list(&path);

    let workbook = open_workbook(&path).unwrap();
    assert_eq!(workbook.get_sheet_names(), vec!["Prices", "Notes"]);

    let prices = workbook.sheet("Prices").unwrap();
    assert_eq!(prices.merges.len(), 1);
    assert_eq!(prices.rows[4], vec!["A2", "Gadget", "14.5"]);

    let config = ExtractConfig {
        attach_category: true,
        ..ExtractConfig::default()
    };
    let tables = extract_workbook(&workbook, &config, None);
    assert_eq!(tables["Prices"].len(), 1);
    assert!(tables["Notes"].is_empty());

    let table = &tables["Prices"][0];
    assert_eq!(table.header, vec!["Code", "Name", "Price", "category"]);
    assert_eq!(
        table.rows,
        vec![
            vec!["A1", "Widget", "9.99", "Acme Corp Price List"],
            vec!["A2", "Gadget", "14.5", "Acme Corp Price List"],
            vec!["A3", "Gizmo", "3", "Acme Corp Price List"],
        ]
    );

    let json = export_tables_json(&tables, OutputShape::Records, true).unwrap();
    assert!(json.starts_with(r#"{"Prices":[[{"Code":"A1","Name":"Widget","Price":9.99,"#));
}
