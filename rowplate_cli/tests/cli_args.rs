use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::Parser;
use rowplate_cli::OutputFormat;
use rowplate_cli::RowplateCli;
use rowplate_core::CsvOptions;
use rowplate_core::RowplateConfig;
use rowplate_core::RunConfig;
use rstest::rstest;

const REQUIRED: [&str; 7] = [
	"rowplate",
	"--csv",
	"people.csv",
	"--template",
	"letter.txt",
	"--output",
	"out",
];

fn parse(extra: &[&str]) -> RowplateCli {
	RowplateCli::parse_from(REQUIRED.iter().chain(extra))
}

#[test]
fn cli_parses_required_inputs() {
	let cli = parse(&[]);

	assert_eq!(cli.csv, PathBuf::from("people.csv"));
	assert_eq!(cli.template, PathBuf::from("letter.txt"));
	assert_eq!(cli.output, PathBuf::from("out"));
	assert!(cli.jobs.is_none());
	assert!(cli.delimiter.is_none());
	assert!(!cli.strict);
	assert!(matches!(cli.format, OutputFormat::Text));
}

#[test]
fn cli_rejects_missing_inputs() {
	assert!(RowplateCli::try_parse_from(["rowplate", "--csv", "people.csv"]).is_err());
	assert!(RowplateCli::try_parse_from(["rowplate"]).is_err());
}

#[test]
fn cli_rejects_zero_jobs() {
	let args = REQUIRED.iter().chain(&["--jobs", "0"]);

	assert!(RowplateCli::try_parse_from(args).is_err());
}

#[rstest]
#[case::text("text", false)]
#[case::json("json", true)]
fn cli_parses_output_format(#[case] format: &str, #[case] is_json: bool) {
	let cli = parse(&["--format", format]);

	assert_eq!(matches!(cli.format, OutputFormat::Json), is_json);
}

#[test]
fn cli_rejects_unknown_format() {
	let args = REQUIRED.iter().chain(&["--format", "yaml"]);

	assert!(RowplateCli::try_parse_from(args).is_err());
}

#[test]
fn settings_default_without_flags_or_config() {
	let settings = parse(&[]).settings(RowplateConfig::default());

	assert_eq!(settings.csv, CsvOptions::default());
	assert!(settings.pipeline.jobs.is_none());
	assert!(!settings.strict);
}

#[test]
fn settings_use_config_when_flags_are_absent() {
	let config = RowplateConfig {
		csv: CsvOptions {
			delimiter: ';',
			trim: true,
		},
		run: RunConfig {
			jobs: NonZeroUsize::new(4),
			strict: true,
		},
	};

	let settings = parse(&[]).settings(config);

	assert_eq!(settings.csv.delimiter, ';');
	assert!(settings.csv.trim);
	assert_eq!(settings.pipeline.jobs, NonZeroUsize::new(4));
	assert!(settings.strict);
}

#[test]
fn settings_prefer_flags_over_config() {
	let config = RowplateConfig {
		csv: CsvOptions {
			delimiter: ';',
			trim: false,
		},
		run: RunConfig {
			jobs: NonZeroUsize::new(4),
			strict: false,
		},
	};

	let settings = parse(&["--delimiter", "\t", "--jobs", "2", "--trim", "--strict"]).settings(config);

	assert_eq!(settings.csv.delimiter, '\t');
	assert!(settings.csv.trim);
	assert_eq!(settings.pipeline.jobs, NonZeroUsize::new(2));
	assert!(settings.strict);
}
