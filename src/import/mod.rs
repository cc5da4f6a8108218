mod csv_import;
mod detect;
mod discover;

pub(crate) use csv_import::CsvImporter;
pub(crate) use discover::{clean_stale_files, discover_input_files};
