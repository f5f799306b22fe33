use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

/// A `rowplate` command with colors disabled, run from `dir` so that no
/// config file outside the test directory is picked up.
pub fn rowplate_cmd(dir: &Path) -> Command {
	let mut cmd = Command::new(get_cargo_bin("rowplate"));
	cmd.env("NO_COLOR", "1").env_remove("RUST_LOG").current_dir(dir);
	cmd
}

/// Write `people.csv` and a template named `template_name` into `dir`.
pub fn write_inputs(dir: &Path, csv: &str, template_name: &str, template: &str) {
	std::fs::write(dir.join("people.csv"), csv).unwrap_or_else(|e| panic!("write csv: {e}"));
	std::fs::write(dir.join(template_name), template)
		.unwrap_or_else(|e| panic!("write template: {e}"));
}
