use std::path::Path;
use std::process;
use std::sync::Arc;

use clap::Parser;
use owo_colors::OwoColorize;
use rowplate_cli::OutputFormat;
use rowplate_cli::RowplateCli;
use rowplate_core::CompiledTemplate;
use rowplate_core::OutputTarget;
use rowplate_core::RowOutcome;
use rowplate_core::RowplateConfig;
use rowplate_core::RowplateError;
use rowplate_core::RowplateResult;
use rowplate_core::RunReport;
use rowplate_core::Table;
use rowplate_core::run_pipeline;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = RowplateCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	match run(&args) {
		Ok(true) => {}
		Ok(false) => process::exit(1),
		Err(e) => {
			let report: miette::Report = e.into();
			eprintln!("{report:?}");
			process::exit(2);
		}
	}
}

/// Warnings and errors are logged to stderr by default. `--verbose` adds the
/// core's debug events and `RUST_LOG` replaces the filter entirely.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_filter = if verbose {
		"warn,rowplate_core=debug"
	} else {
		"warn"
	};
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.init();
}

/// Set up every input, run the pipeline and print the results. Returns
/// whether the run counts as successful for the exit status.
fn run(args: &RowplateCli) -> RowplateResult<bool> {
	let config = match &args.config {
		Some(path) => RowplateConfig::load_from(path)?,
		None => RowplateConfig::load(&std::env::current_dir()?)?.unwrap_or_default(),
	};
	let settings = args.settings(config);
	settings.csv.validate()?;

	let table = Table::from_path(&args.csv, &settings.csv)?;
	for header in table.duplicate_headers() {
		eprintln!(
			"{} header `{header}` appears more than once, the right-most column wins",
			colored!("warning:", yellow)
		);
	}

	let source = std::fs::read_to_string(&args.template).map_err(|source| {
		RowplateError::TemplateRead {
			path: args.template.display().to_string(),
			source,
		}
	})?;
	let template = CompiledTemplate::parse(&source)?;
	for name in template.missing_placeholders(table.headers()) {
		eprintln!(
			"{} placeholder `{name}` has no matching csv column",
			colored!("warning:", yellow)
		);
	}

	let target = OutputTarget::from_template_path(&args.output, &args.template);
	target.prepare()?;

	if args.verbose {
		eprintln!(
			"Rendering {} row(s) from {} into {}",
			table.len(),
			args.csv.display(),
			target.dir().display()
		);
	}

	let format = args.format;
	let rt = tokio::runtime::Runtime::new()?;
	let report = rt.block_on(run_pipeline(
		table,
		Arc::new(template),
		Arc::new(target),
		&settings.pipeline,
		|outcome| print_outcome(outcome, format),
	));

	match format {
		OutputFormat::Text => print_summary(&report),
		OutputFormat::Json => print_json_report(&report, &args.output),
	}

	Ok(report.is_ok() || !settings.strict)
}

/// Print the completion notice for one row as soon as it finishes. Row
/// failures always go to stderr, success lines only in text mode.
fn print_outcome(outcome: &RowOutcome, format: OutputFormat) {
	match &outcome.result {
		Ok(path) if matches!(format, OutputFormat::Text) => {
			println!(
				"{} row {}, output: {}",
				colored!("Processed", green),
				outcome.ordinal,
				path.display()
			);
		}
		Ok(_) => {}
		Err(e) => {
			eprintln!("{} {e}", colored!("error:", red));
		}
	}
}

fn print_summary(report: &RunReport) {
	let summary = format!(
		"Processing complete: {} succeeded, {} failed",
		report.succeeded(),
		report.failed()
	);
	println!("{}", colored!(summary, bold));
}

fn print_json_report(report: &RunReport, output_dir: &Path) {
	let rows: Vec<serde_json::Value> = report
		.outcomes
		.iter()
		.map(|outcome| {
			match &outcome.result {
				Ok(path) => {
					serde_json::json!({
						"ordinal": outcome.ordinal,
						"status": "written",
						"path": path.display().to_string(),
					})
				}
				Err(e) => {
					serde_json::json!({
						"ordinal": outcome.ordinal,
						"status": "failed",
						"error": e.to_string(),
					})
				}
			}
		})
		.collect();

	let output = serde_json::json!({
		"output_dir": output_dir.display().to_string(),
		"total": report.total(),
		"succeeded": report.succeeded(),
		"failed": report.failed(),
		"rows": rows,
	});
	println!(
		"{}",
		serde_json::to_string_pretty(&output).unwrap_or_default()
	);
}
