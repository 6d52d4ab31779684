//! CSV reading utilities.

mod reader;

pub use reader::{
    MAX_CSV_FILE_SIZE, SCHEMA_INFERENCE_ROWS, check_file_size, check_file_size_with_limit,
    read_csv_table, validate_encoding,
};
