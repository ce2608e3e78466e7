pub mod helpers;

pub use helpers::{cell_reference, col_name_to_index, index_to_col_name, parse_cell_reference};
