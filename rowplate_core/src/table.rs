use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::RowplateError;
use crate::RowplateResult;

/// Options controlling how a csv source is parsed into a [`Table`].
///
/// These double as the `[csv]` section of `rowplate.toml`.
#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CsvOptions {
	/// Field delimiter. Must be a single ascii character.
	#[serde(default = "default_delimiter")]
	pub delimiter: char,
	/// Trim leading and trailing whitespace from headers and cells.
	#[serde(default)]
	pub trim: bool,
}

fn default_delimiter() -> char {
	','
}

impl Default for CsvOptions {
	fn default() -> Self {
		Self {
			delimiter: default_delimiter(),
			trim: false,
		}
	}
}

impl CsvOptions {
	/// Reject delimiters the csv reader cannot represent as a single byte.
	pub fn validate(&self) -> RowplateResult<()> {
		if self.delimiter.is_ascii() {
			Ok(())
		} else {
			Err(RowplateError::ConfigParse(format!(
				"csv delimiter must be a single ascii character, got `{}`",
				self.delimiter
			)))
		}
	}

	fn reader_builder(&self) -> RowplateResult<csv::ReaderBuilder> {
		self.validate()?;

		let mut builder = csv::ReaderBuilder::new();
		builder
			.has_headers(false)
			// Rows with the wrong cell count are reported per row by the
			// pipeline, so the reader must not reject them.
			.flexible(true)
			.delimiter(self.delimiter as u8)
			.trim(if self.trim {
				csv::Trim::All
			} else {
				csv::Trim::None
			});
		Ok(builder)
	}
}

/// A header row plus the data rows below it.
///
/// Rows are kept exactly as read. A row whose cell count differs from the
/// header count is still stored here and only rejected when the row is
/// materialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
	headers: Vec<String>,
	rows: Vec<Vec<String>>,
}

impl Table {
	pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
		Self { headers, rows }
	}

	/// Read a table from a csv file. The first record is the header row.
	///
	/// Fails with [`RowplateError::TooFewRecords`] when the file does not
	/// contain a header row and at least one data row, and with
	/// [`RowplateError::ConfigParse`] when `options` are invalid.
	pub fn from_path(path: &Path, options: &CsvOptions) -> RowplateResult<Self> {
		let reader = options
			.reader_builder()?
			.from_path(path)
			.map_err(|e| csv_read_error(path.display(), &e))?;

		let table = collect_records(reader, &path.display().to_string())?;
		tracing::debug!(
			path = %path.display(),
			headers = table.headers.len(),
			rows = table.rows.len(),
			"loaded csv table"
		);

		Ok(table)
	}

	/// Read a table from any csv source, e.g. an in-memory buffer.
	pub fn from_reader<R: Read>(reader: R, options: &CsvOptions) -> RowplateResult<Self> {
		collect_records(options.reader_builder()?.from_reader(reader), "<input>")
	}

	pub fn headers(&self) -> &[String] {
		&self.headers
	}

	pub fn rows(&self) -> &[Vec<String>] {
		&self.rows
	}

	/// Number of data rows, excluding the header row.
	pub fn len(&self) -> usize {
		self.rows.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.is_empty()
	}

	/// Header names that appear more than once, in order of their second
	/// appearance.
	pub fn duplicate_headers(&self) -> Vec<&str> {
		let mut seen = HashSet::new();
		let mut duplicates = Vec::new();

		for header in &self.headers {
			if !seen.insert(header.as_str()) && !duplicates.contains(&header.as_str()) {
				duplicates.push(header.as_str());
			}
		}

		duplicates
	}

	pub fn into_parts(self) -> (Vec<String>, Vec<Vec<String>>) {
		(self.headers, self.rows)
	}
}

fn collect_records<R: Read>(mut reader: csv::Reader<R>, source: &str) -> RowplateResult<Table> {
	let mut records = Vec::new();

	for result in reader.records() {
		let record = result.map_err(|e| csv_read_error(source, &e))?;
		records.push(record.iter().map(str::to_string).collect::<Vec<_>>());
	}

	if records.len() < 2 {
		return Err(RowplateError::TooFewRecords {
			records: records.len(),
		});
	}

	let rows = records.split_off(1);
	let headers = records.remove(0);
	let table = Table::new(headers, rows);

	for duplicate in table.duplicate_headers() {
		tracing::warn!(
			header = duplicate,
			"duplicate header name, the right-most column wins"
		);
	}

	Ok(table)
}

fn csv_read_error(source: impl std::fmt::Display, error: &csv::Error) -> RowplateError {
	RowplateError::CsvRead {
		path: source.to_string(),
		reason: error.to_string(),
	}
}
