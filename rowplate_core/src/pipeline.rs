use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::Id;
use tokio::task::JoinError;
use tokio::task::JoinSet;
use tracing::Instrument;

use crate::CompiledTemplate;
use crate::OutputTarget;
use crate::RowRecord;
use crate::RowplateError;
use crate::RowplateResult;
use crate::Table;

/// Scheduling options for [`run_pipeline`].
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
	/// Maximum number of rows processed at the same time. `None` schedules
	/// every row immediately.
	pub jobs: Option<NonZeroUsize>,
}

/// What happened to a single row.
#[derive(Debug)]
pub struct RowOutcome {
	/// 1-based position of the row below the header row.
	pub ordinal: usize,
	/// The written file, or the reason the row was skipped.
	pub result: RowplateResult<PathBuf>,
}

impl RowOutcome {
	pub fn is_ok(&self) -> bool {
		self.result.is_ok()
	}

	pub fn path(&self) -> Option<&Path> {
		self.result.as_ref().ok().map(PathBuf::as_path)
	}

	pub fn error(&self) -> Option<&RowplateError> {
		self.result.as_ref().err()
	}
}

/// Result of running every row of a table through the pipeline.
#[derive(Debug, Default)]
pub struct RunReport {
	/// One outcome per data row, ordered by ordinal regardless of the order
	/// in which rows finished.
	pub outcomes: Vec<RowOutcome>,
}

impl RunReport {
	/// Returns true if every row was written.
	pub fn is_ok(&self) -> bool {
		self.outcomes.iter().all(RowOutcome::is_ok)
	}

	pub fn total(&self) -> usize {
		self.outcomes.len()
	}

	pub fn succeeded(&self) -> usize {
		self.outcomes.iter().filter(|outcome| outcome.is_ok()).count()
	}

	pub fn failed(&self) -> usize {
		self.total() - self.succeeded()
	}

	/// Outcomes of the rows that were not written.
	pub fn failures(&self) -> impl Iterator<Item = &RowOutcome> {
		self.outcomes.iter().filter(|outcome| !outcome.is_ok())
	}
}

/// Render every row of `table` with `template` and write one file per row
/// into `target`.
///
/// Each row runs as its own task and a failing row never affects the others.
/// The function returns once every row has either been written or failed.
/// `on_outcome` is called once per row as rows finish, in completion order,
/// and never concurrently with itself.
pub async fn run_pipeline<F>(
	table: Table,
	template: Arc<CompiledTemplate>,
	target: Arc<OutputTarget>,
	options: &PipelineOptions,
	mut on_outcome: F,
) -> RunReport
where
	F: FnMut(&RowOutcome),
{
	let (headers, rows) = table.into_parts();
	let headers: Arc<[String]> = headers.into();
	let limit = options.jobs.map(|jobs| Arc::new(Semaphore::new(jobs.get())));
	let total = rows.len();

	tracing::debug!(
		rows = total,
		jobs = options.jobs.map(NonZeroUsize::get),
		"starting row pipeline"
	);

	let mut tasks = JoinSet::new();
	let mut ordinals = HashMap::with_capacity(total);
	for (index, row) in rows.into_iter().enumerate() {
		let ordinal = index + 1;
		let headers = Arc::clone(&headers);
		let template = Arc::clone(&template);
		let target = Arc::clone(&target);
		let limit = limit.clone();

		let row_task = async move {
			let _permit = match limit {
				Some(semaphore) => semaphore.acquire_owned().await.ok(),
				None => None,
			};

			let result = process_row(ordinal, row, headers, template, target).await;
			RowOutcome { ordinal, result }
		};

		let handle = tasks.spawn(row_task.in_current_span());
		ordinals.insert(handle.id(), ordinal);
	}

	let mut outcomes = Vec::with_capacity(total);
	while let Some(joined) = tasks.join_next_with_id().await {
		let Some(outcome) = joined_outcome(&ordinals, joined) else {
			continue;
		};

		if let Err(error) = &outcome.result {
			tracing::error!(ordinal = outcome.ordinal, %error, "row failed");
		}

		on_outcome(&outcome);
		outcomes.push(outcome);
	}

	outcomes.sort_by_key(|outcome| outcome.ordinal);
	let report = RunReport { outcomes };

	tracing::debug!(
		succeeded = report.succeeded(),
		failed = report.failed(),
		"row pipeline finished"
	);

	report
}

/// Turn a joined row task into its outcome. A task that panicked or was
/// cancelled is reported as [`RowplateError::TaskFailed`] against the row it
/// was spawned for.
pub(crate) fn joined_outcome(
	ordinals: &HashMap<Id, usize>,
	joined: Result<(Id, RowOutcome), JoinError>,
) -> Option<RowOutcome> {
	let error = match joined {
		Ok((_, outcome)) => return Some(outcome),
		Err(error) => error,
	};

	let Some(&ordinal) = ordinals.get(&error.id()) else {
		tracing::error!(%error, "joined a task that is not a row");
		return None;
	};

	Some(RowOutcome {
		ordinal,
		result: Err(RowplateError::TaskFailed {
			ordinal,
			reason: error.to_string(),
		}),
	})
}

/// Materialize, render and write a single row.
#[tracing::instrument(level = "debug", skip(row, headers, template, target))]
async fn process_row(
	ordinal: usize,
	row: Vec<String>,
	headers: Arc<[String]>,
	template: Arc<CompiledTemplate>,
	target: Arc<OutputTarget>,
) -> RowplateResult<PathBuf> {
	let record = RowRecord::materialize(ordinal, &row, &headers)?;
	let rendered = template.render(ordinal, &record)?;

	target.write(ordinal, &rendered).await
}
