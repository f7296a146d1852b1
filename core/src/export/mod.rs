pub mod csv;

pub use csv::{csv_row, export_csv, CSV_HEADER};
