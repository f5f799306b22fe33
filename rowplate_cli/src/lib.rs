use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::Parser;
use clap::ValueEnum;
use rowplate_core::CsvOptions;
use rowplate_core::PipelineOptions;
use rowplate_core::RowplateConfig;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Render one file per csv row from a single template.",
	long_about = "rowplate reads a csv file whose first row names the columns, renders a template \
	              once for every data row and writes each result to `<output>/<row><ext>`, where \
	              `<ext>` is the extension of the template file.\n\nPlaceholders use minijinja \
	              syntax, `{{ name }}`, and the `{{.name}}` shorthand is accepted as \
	              well.\n\nExample:\n  rowplate --csv people.csv --template letter.txt --output \
	              letters"
)]
#[allow(clippy::struct_excessive_bools)]
pub struct RowplateCli {
	/// Path to the csv file. The first record is the header row.
	#[arg(long, value_name = "PATH")]
	pub csv: PathBuf,

	/// Path to the template file. Its extension is reused for every output
	/// file.
	#[arg(long, value_name = "PATH")]
	pub template: PathBuf,

	/// Directory the rendered files are written to. Created if missing.
	#[arg(long, value_name = "DIR")]
	pub output: PathBuf,

	/// Maximum number of rows rendered at the same time. Every row is
	/// scheduled at once when omitted.
	#[arg(long, short)]
	pub jobs: Option<NonZeroUsize>,

	/// Csv field delimiter.
	#[arg(long)]
	pub delimiter: Option<char>,

	/// Trim whitespace around csv headers and cells.
	#[arg(long, default_value_t = false)]
	pub trim: bool,

	/// Exit with a non-zero status when any row fails.
	#[arg(long, default_value_t = false)]
	pub strict: bool,

	/// Output format for progress and the final summary. Use `text` for
	/// one line per row or `json` for a single report once all rows are
	/// done.
	#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
	pub format: OutputFormat,

	/// Path to a config file. Defaults to the first of `rowplate.toml`,
	/// `.rowplate.toml` or `.config/rowplate.toml` in the current directory.
	#[arg(long, value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output, one line per row.
	Text,
	/// JSON output for programmatic consumption, printed once all rows are
	/// done.
	Json,
}

/// Effective settings after applying command line flags on top of the
/// config file.
#[derive(Debug, Clone)]
pub struct RunSettings {
	pub csv: CsvOptions,
	pub pipeline: PipelineOptions,
	pub strict: bool,
}

impl RowplateCli {
	/// Merge the flags with `config`. Flags win whenever they are given.
	pub fn settings(&self, config: RowplateConfig) -> RunSettings {
		let RowplateConfig { mut csv, run } = config;

		if let Some(delimiter) = self.delimiter {
			csv.delimiter = delimiter;
		}
		csv.trim |= self.trim;

		RunSettings {
			csv,
			pipeline: PipelineOptions {
				jobs: self.jobs.or(run.jobs),
			},
			strict: self.strict || run.strict,
		}
	}
}
