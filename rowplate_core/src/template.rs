use std::borrow::Cow;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use minijinja::AutoEscape;
use minijinja::Environment;
use minijinja::UndefinedBehavior;
use regex::Regex;

use crate::RowRecord;
use crate::RowplateError;
use crate::RowplateResult;

const TEMPLATE_NAME: &str = "row";

/// Scans template source one syntax element at a time. Alternatives are tried
/// in order: `{% raw %}` regions, `{# #}` comments and `{% %}` tags are
/// matched whole so nothing inside them is touched. An expression that opens
/// with a leading-dot field, e.g. `{{.name}}`, `{{ .name }}` or
/// `{{- .name -}}`, captures `trim`, `field` and `rest`. Any other expression
/// is matched whole.
static SYNTAX_ELEMENT: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(concat!(
		r"(?s)\{%-?\s*raw\s*-?%\}.*?\{%-?\s*endraw\s*-?%\}",
		r"|\{#.*?#\}",
		r"|\{%.*?%\}",
		r"|\{\{(?P<trim>-?)\s*\.(?P<field>[A-Za-z_][A-Za-z0-9_]*)(?P<rest>.*?\}\})",
		r"|\{\{.*?\}\}",
	))
	.expect("syntax element pattern is valid")
});

/// Rewrite `{{.name}}` style field references into plain minijinja variable
/// lookups. Raw blocks, comments, tags and the inside of expressions are left
/// untouched.
fn normalize_dot_fields(source: &str) -> Cow<'_, str> {
	SYNTAX_ELEMENT.replace_all(source, |caps: &regex::Captures<'_>| {
		match (caps.name("field"), caps.name("rest")) {
			(Some(field), Some(rest)) => {
				let trim = caps.name("trim").map_or("", |trim| trim.as_str());
				format!("{{{{{trim} {}{}", field.as_str(), rest.as_str())
			}
			_ => caps[0].to_string(),
		}
	})
}

/// A parsed template, ready to be rendered against any number of rows.
///
/// The template is parsed once and never mutated afterwards, so a single
/// instance can be shared behind an `Arc` by every row task.
#[derive(Debug)]
pub struct CompiledTemplate {
	env: Environment<'static>,
}

impl CompiledTemplate {
	/// Parse `source` with minijinja syntax.
	///
	/// Rendering is strict: referencing a placeholder that the row does not
	/// provide is an error rather than an empty string. Output is never
	/// escaped and a trailing newline in `source` is kept.
	pub fn parse(source: &str) -> RowplateResult<Self> {
		let mut env = Environment::new();
		env.set_keep_trailing_newline(true);
		env.set_undefined_behavior(UndefinedBehavior::Strict);
		env.set_auto_escape_callback(|_| AutoEscape::None);
		env.add_template_owned(TEMPLATE_NAME, normalize_dot_fields(source).into_owned())
			.map_err(|e| RowplateError::TemplateSyntax(e.to_string()))?;

		Ok(Self { env })
	}

	/// Render the template with the values of one row.
	///
	/// `ordinal` identifies the row in the returned
	/// [`RowplateError::Render`].
	pub fn render(&self, ordinal: usize, record: &RowRecord) -> RowplateResult<String> {
		let render_error = |e: minijinja::Error| {
			RowplateError::Render {
				ordinal,
				message: e.to_string(),
			}
		};

		let template = self.env.get_template(TEMPLATE_NAME).map_err(render_error)?;
		template
			.render(minijinja::Value::from_serialize(record))
			.map_err(render_error)
	}

	/// Top-level variable names the template reads from its context.
	pub fn placeholders(&self) -> BTreeSet<String> {
		let Ok(template) = self.env.get_template(TEMPLATE_NAME) else {
			return BTreeSet::new();
		};

		template.undeclared_variables(false).into_iter().collect()
	}

	/// Placeholders that none of `headers` provides, sorted by name.
	///
	/// Every row rendered with such a template fails, so callers can warn
	/// about them once before the run starts.
	pub fn missing_placeholders<H: AsRef<str>>(&self, headers: &[H]) -> Vec<String> {
		self.placeholders()
			.into_iter()
			.filter(|name| !headers.iter().any(|header| header.as_ref() == name))
			.filter(|name| !is_builtin_variable(name))
			.collect()
	}
}

/// Check whether a variable name is a minijinja builtin that is never
/// expected to come from a row.
fn is_builtin_variable(name: &str) -> bool {
	matches!(
		name,
		"loop" | "self" | "super" | "true" | "false" | "none" | "namespace" | "range" | "dict"
	)
}
