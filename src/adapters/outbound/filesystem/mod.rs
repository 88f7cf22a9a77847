/// Filesystem adapters for the dataset and report output
mod csv_dataset_store;
mod report_directory_writer;

pub use csv_dataset_store::CsvDatasetStore;
pub use report_directory_writer::ReportDirectoryWriter;
