//! Row-sink capability and the bundled CSV backend

mod csv_sink;
mod row;

pub use csv_sink::CsvSink;
pub use row::NewsRow;

use thiserror::Error;

/// Errors that can occur during sink operations
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to write rows: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sink operations
pub type SinkResult<T> = std::result::Result<T, SinkError>;

/// Capability contract for the downstream row store
///
/// The controller hands over one batch per results page; `with_header` is
/// true only for the first batch of an item.
pub trait RowSink {
    fn append_rows(&mut self, rows: &[NewsRow], with_header: bool) -> SinkResult<()>;
}
