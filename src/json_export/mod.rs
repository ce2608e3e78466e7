mod converters;
mod exporters;
mod types;

pub use converters::{process_cell_value, record_keys, table_to_records};
pub use exporters::{
    export_tables_json, generate_records_json, serialize_to_json, write_json_to_file,
};
pub use types::{OrderedTableData, OutputShape};
