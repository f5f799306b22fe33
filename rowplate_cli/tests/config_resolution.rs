mod common;

use rowplate_core::AnyEmptyResult;
use similar_asserts::assert_eq;

const SEMICOLON_CSV: &str = "name;age\nAna;30\nBo\n";

fn render_args() -> [&'static str; 6] {
	[
		"--csv",
		"people.csv",
		"--template",
		"greeting.txt",
		"--output",
		"out",
	]
}

#[test]
fn config_in_current_dir_is_applied() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_inputs(tmp.path(), SEMICOLON_CSV, "greeting.txt", "{{ name }}={{ age }}");
	std::fs::write(
		tmp.path().join("rowplate.toml"),
		"[csv]\ndelimiter = \";\"\n\n[run]\nstrict = true\n",
	)?;

	common::rowplate_cmd(tmp.path())
		.args(render_args())
		.assert()
		.code(1)
		.stderr(predicates::str::contains(
			"error: row 2 has 1 cell(s), expected 2",
		));

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("out/1.txt"))?,
		"Ana=30"
	);

	Ok(())
}

#[test]
fn config_resolves_dot_config_rowplate_toml() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_inputs(tmp.path(), SEMICOLON_CSV, "greeting.txt", "{{ name }}={{ age }}");
	std::fs::create_dir_all(tmp.path().join(".config"))?;
	std::fs::write(
		tmp.path().join(".config/rowplate.toml"),
		"[csv]\ndelimiter = \";\"\n",
	)?;

	common::rowplate_cmd(tmp.path())
		.args(render_args())
		.assert()
		.success();

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("out/1.txt"))?,
		"Ana=30"
	);

	Ok(())
}

#[test]
fn config_flag_points_at_explicit_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_inputs(tmp.path(), SEMICOLON_CSV, "greeting.txt", "{{ name }}={{ age }}");
	std::fs::create_dir(tmp.path().join("settings"))?;
	std::fs::write(
		tmp.path().join("settings/custom.toml"),
		"[csv]\ndelimiter = \";\"\n",
	)?;

	common::rowplate_cmd(tmp.path())
		.args(render_args())
		.args(["--config", "settings/custom.toml"])
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"Processing complete: 1 succeeded, 1 failed",
		));

	Ok(())
}

#[test]
fn flags_override_config_values() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_inputs(
		tmp.path(),
		"name|age\nAna|30\n",
		"greeting.txt",
		"{{ name }}={{ age }}",
	);
	std::fs::write(tmp.path().join("rowplate.toml"), "[csv]\ndelimiter = \";\"\n")?;

	common::rowplate_cmd(tmp.path())
		.args(render_args())
		.args(["--delimiter", "|"])
		.assert()
		.success();

	assert_eq!(
		std::fs::read_to_string(tmp.path().join("out/1.txt"))?,
		"Ana=30"
	);

	Ok(())
}

#[test]
fn invalid_config_is_fatal() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_inputs(tmp.path(), "name,age\nAna,30\n", "greeting.txt", "{{ name }}");
	std::fs::write(tmp.path().join("rowplate.toml"), "[run]\nthreads = 4\n")?;

	common::rowplate_cmd(tmp.path())
		.args(render_args())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("failed to parse config file"));

	assert!(!tmp.path().join("out").exists());

	Ok(())
}

#[test]
fn missing_config_flag_file_is_fatal() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_inputs(tmp.path(), "name,age\nAna,30\n", "greeting.txt", "{{ name }}");

	common::rowplate_cmd(tmp.path())
		.args(render_args())
		.args(["--config", "nowhere.toml"])
		.assert()
		.code(2)
		.stderr(predicates::str::contains(
			"failed to read config file `nowhere.toml`",
		));

	assert!(!tmp.path().join("out").exists());

	Ok(())
}
