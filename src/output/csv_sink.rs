//! CSV row sink

use crate::output::{NewsRow, RowSink, SinkResult};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Column order of the emitted schema
const HEADER: [&str; 7] = [
    "title",
    "url",
    "description",
    "date",
    "image",
    "amount_of_money",
    "count_search_phrase",
];

/// Appends batches of rows to one CSV file
pub struct CsvSink {
    writer: BufWriter<File>,
}

impl CsvSink {
    /// Creates (or truncates) the CSV file at `path`
    pub fn create(path: &Path) -> SinkResult<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl RowSink for CsvSink {
    fn append_rows(&mut self, rows: &[NewsRow], with_header: bool) -> SinkResult<()> {
        if with_header {
            writeln!(self.writer, "{}", HEADER.join(","))?;
        }

        for row in rows {
            let fields = [
                escape(&row.title),
                escape(&row.url),
                escape(&row.description),
                escape(&row.date),
                escape(&row.image),
                row.amount_of_money.to_string(),
                row.count_search_phrase.to_string(),
            ];
            writeln!(self.writer, "{}", fields.join(","))?;
        }

        self.writer.flush()?;
        Ok(())
    }
}

/// Quotes a field when it contains a delimiter, quote, or line break
fn escape(field: &str) -> String {
    if field.contains(['"', ',', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
