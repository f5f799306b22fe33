use crate::Table;

pub const PEOPLE_CSV: &str = "name,age\nAna,30\nBo,41\n";

pub const GREETING_TEMPLATE: &str = "Hi {{.name}}, age {{.age}}";

pub fn strings(values: &[&str]) -> Vec<String> {
	values.iter().map(ToString::to_string).collect()
}

pub fn people_table() -> Table {
	Table::new(
		strings(&["name", "age"]),
		vec![strings(&["Ana", "30"]), strings(&["Bo", "41"])],
	)
}

/// Three rows where the middle one is missing its `age` cell.
pub fn table_with_short_row() -> Table {
	Table::new(
		strings(&["name", "age"]),
		vec![
			strings(&["Ana", "30"]),
			strings(&["Bo"]),
			strings(&["Cy", "52"]),
		],
	)
}
