pub mod csv;

pub use csv::{
    comparison_frame, history_frame, result_file_stem, CsvExporter, ExportOutcome, ResultExporter,
};
