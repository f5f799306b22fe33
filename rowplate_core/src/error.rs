use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum RowplateError {
	#[error(transparent)]
	#[diagnostic(code(rowplate::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to read csv file `{path}`: {reason}")]
	#[diagnostic(code(rowplate::csv_read))]
	CsvRead { path: String, reason: String },

	#[error("csv input has {records} record(s), expected a header row and at least one data row")]
	#[diagnostic(
		code(rowplate::too_few_records),
		help("add at least one data row below the header row")
	)]
	TooFewRecords { records: usize },

	#[error("failed to read template file `{path}`")]
	#[diagnostic(code(rowplate::template_read))]
	TemplateRead {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid template syntax: {0}")]
	#[diagnostic(
		code(rowplate::template_syntax),
		help("placeholders use minijinja syntax, e.g. `{{{{ name }}}}` or `{{{{.name}}}}`")
	)]
	TemplateSyntax(String),

	#[error("failed to create output directory `{path}`")]
	#[diagnostic(code(rowplate::output_dir))]
	OutputDir {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to read config file `{path}`")]
	#[diagnostic(code(rowplate::config_read))]
	ConfigRead {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(rowplate::config_parse),
		help("check that rowplate.toml is valid TOML with [csv] and/or [run] sections")
	)]
	ConfigParse(String),

	#[error("row {ordinal} has {actual} cell(s), expected {expected}")]
	#[diagnostic(code(rowplate::malformed_row))]
	MalformedRow {
		ordinal: usize,
		expected: usize,
		actual: usize,
	},

	#[error("row {ordinal} failed to render: {message}")]
	#[diagnostic(
		code(rowplate::render),
		help("every placeholder must name a column from the csv header row")
	)]
	Render { ordinal: usize, message: String },

	#[error("row {ordinal} could not be written to `{}`: {source}", .path.display())]
	#[diagnostic(code(rowplate::write))]
	Write {
		ordinal: usize,
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("row {ordinal} task did not complete: {reason}")]
	#[diagnostic(code(rowplate::task_failed))]
	TaskFailed { ordinal: usize, reason: String },
}

impl RowplateError {
	/// The row ordinal this error belongs to, or `None` for setup errors that
	/// abort the whole run.
	pub fn row_ordinal(&self) -> Option<usize> {
		match self {
			Self::MalformedRow { ordinal, .. }
			| Self::Render { ordinal, .. }
			| Self::Write { ordinal, .. }
			| Self::TaskFailed { ordinal, .. } => Some(*ordinal),
			_ => None,
		}
	}
}

pub type RowplateResult<T> = Result<T, RowplateError>;
pub type AnyEmptyResult = Result<(), Box<dyn std::error::Error>>;
