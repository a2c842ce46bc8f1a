use anyhow::{Context, Result};
use csv::ReaderBuilder;

/// Parsed analyzer output. The first row is always the header, whatever its
/// content; the remaining rows are data. Column counts are not validated
/// against a schema.
#[derive(Debug, Clone, Default)]
pub struct ReportTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    pub fn is_empty(&self) -> bool {
        self.header.is_empty() && self.rows.is_empty()
    }
}

/// Parse the pipe-delimited table the analyzer prints on stdout.
pub fn parse(raw: &str) -> Result<ReportTable> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'|')
        .has_headers(false)
        .flexible(true)
        .from_reader(raw.as_bytes());

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record.context("failed to parse analyzer output as pipe-delimited rows")?;
        records.push(record.iter().map(str::to_string).collect::<Vec<String>>());
    }

    let mut records = records.into_iter();
    let header = records.next().unwrap_or_default();
    Ok(ReportTable {
        header,
        rows: records.collect(),
    })
}
