use std::path::Path;
use std::path::PathBuf;

use crate::RowplateError;
use crate::RowplateResult;

/// Where rendered rows are written and how their files are named.
///
/// Row `n` is written to `<dir>/<n><extension>`. The extension is taken
/// verbatim from the template file, including its leading dot.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct OutputTarget {
	dir: PathBuf,
	extension: String,
}

impl OutputTarget {
	pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
		Self {
			dir: dir.into(),
			extension: extension.into(),
		}
	}

	/// Use the extension of `template_path` for every output file.
	///
	/// The extension is everything from the last `.` of the file name, so a
	/// dotfile such as `.tmpl` keeps `.tmpl` and `letter.` keeps `.`. A
	/// template without a `.` produces files named by ordinal only.
	pub fn from_template_path(dir: impl Into<PathBuf>, template_path: &Path) -> Self {
		let extension = template_path
			.file_name()
			.map(|name| name.to_string_lossy())
			.and_then(|name| name.rfind('.').map(|index| name[index..].to_string()))
			.unwrap_or_default();

		Self::new(dir, extension)
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}

	pub fn extension(&self) -> &str {
		&self.extension
	}

	/// Create the output directory and any missing parents.
	pub fn prepare(&self) -> RowplateResult<()> {
		std::fs::create_dir_all(&self.dir).map_err(|source| {
			RowplateError::OutputDir {
				path: self.dir.display().to_string(),
				source,
			}
		})
	}

	/// The file a row with the given 1-based ordinal is written to.
	pub fn path_for(&self, ordinal: usize) -> PathBuf {
		self.dir.join(format!("{ordinal}{}", self.extension))
	}

	/// Write `content` for the row, replacing any previous file at the same
	/// path. Returns the path that was written.
	pub async fn write(&self, ordinal: usize, content: &str) -> RowplateResult<PathBuf> {
		let path = self.path_for(ordinal);

		match tokio::fs::write(&path, content).await {
			Ok(()) => {
				tracing::info!(ordinal, path = %path.display(), "wrote row");
				Ok(path)
			}
			Err(source) => {
				Err(RowplateError::Write {
					ordinal,
					path,
					source,
				})
			}
		}
	}
}
