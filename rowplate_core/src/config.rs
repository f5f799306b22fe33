use std::num::NonZeroUsize;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::CsvOptions;
use crate::RowplateError;
use crate::RowplateResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["rowplate.toml", ".rowplate.toml", ".config/rowplate.toml"];

/// Configuration loaded from a `rowplate.toml` file.
///
/// ```toml
/// [csv]
/// delimiter = ";"
/// trim = true
///
/// [run]
/// jobs = 8
/// strict = true
/// ```
///
/// Every section is optional. Values given on the command line take
/// precedence over the file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RowplateConfig {
	/// How the csv source is parsed.
	#[serde(default)]
	pub csv: CsvOptions,
	/// How rows are scheduled and how row failures affect the exit status.
	#[serde(default)]
	pub run: RunConfig,
}

/// The `[run]` section.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
	/// Maximum number of rows processed at the same time. When absent every
	/// row is scheduled immediately.
	#[serde(default)]
	pub jobs: Option<NonZeroUsize>,
	/// Treat any failed row as a failed run.
	#[serde(default)]
	pub strict: bool,
}

impl RowplateConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no candidate exists.
	pub fn load(root: &Path) -> RowplateResult<Option<RowplateConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		Self::load_from(&config_path).map(Some)
	}

	/// Load the config from an explicit path.
	pub fn load_from(path: &Path) -> RowplateResult<RowplateConfig> {
		let content = std::fs::read_to_string(path).map_err(|source| {
			RowplateError::ConfigRead {
				path: path.display().to_string(),
				source,
			}
		})?;
		let config: RowplateConfig =
			toml::from_str(&content).map_err(|e| RowplateError::ConfigParse(e.to_string()))?;

		config.csv.validate()?;

		tracing::debug!(path = %path.display(), "loaded config");

		Ok(config)
	}
}
