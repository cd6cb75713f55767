//! Spreadsheet export of the cap table.

mod csv_export;

pub use csv_export::{export_cap_table_csv, write_cap_table_csv};
