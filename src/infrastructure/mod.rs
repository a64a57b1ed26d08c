pub mod csv_dataset;
pub mod result_export;

pub use csv_dataset::{load_csv, read_csv};
pub use result_export::{export_results, write_csv, write_json, write_results};
