//! `rowplate_core` turns a csv table into one rendered document per data row.
//!
//! ## Processing Pipeline
//!
//! ```text
//! csv file
//!   → Table (header row + data rows)
//!   → RowRecord (one header → value map per row)
//!   → CompiledTemplate::render (minijinja, shared by every row)
//!   → OutputTarget::write (`<dir>/<ordinal><ext>`)
//! ```
//!
//! Every row runs as an independent task. A row that fails to materialize,
//! render or write is recorded in the [`RunReport`] and the remaining rows
//! carry on.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use rowplate_core::CompiledTemplate;
//! use rowplate_core::CsvOptions;
//! use rowplate_core::OutputTarget;
//! use rowplate_core::PipelineOptions;
//! use rowplate_core::Table;
//! use rowplate_core::run_pipeline;
//!
//! # async fn example() -> rowplate_core::RowplateResult<()> {
//! let table = Table::from_path(Path::new("people.csv"), &CsvOptions::default())?;
//! let template = CompiledTemplate::parse("Hi {{ name }}, age {{ age }}")?;
//! let target = OutputTarget::from_template_path("out", Path::new("greeting.txt"));
//! target.prepare()?;
//!
//! let report = run_pipeline(
//! 	table,
//! 	Arc::new(template),
//! 	Arc::new(target),
//! 	&PipelineOptions::default(),
//! 	|_| {},
//! )
//! .await;
//! println!("{} written, {} failed", report.succeeded(), report.failed());
//! # Ok(())
//! # }
//! ```

pub use config::*;
pub use error::*;
pub use pipeline::*;
pub use record::*;
pub use table::*;
pub use template::*;
pub use writer::*;

pub mod config;
#[allow(unused_assignments)]
mod error;
mod pipeline;
mod record;
mod table;
mod template;
mod writer;

#[cfg(test)]
mod __fixtures;
