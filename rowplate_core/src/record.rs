use std::collections::BTreeMap;

use derive_more::Deref;
use serde::Serialize;

use crate::RowplateError;
use crate::RowplateResult;

/// The values of one data row keyed by header name.
///
/// When the header row contains the same name more than once, the right-most
/// column wins.
#[derive(Debug, Clone, Default, Deref, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RowRecord(BTreeMap<String, String>);

impl RowRecord {
	/// Pair each cell of `row` with the header at the same position.
	///
	/// `ordinal` is the 1-based position of the row and is only used to
	/// describe a [`RowplateError::MalformedRow`] when the cell count does not
	/// match the header count.
	pub fn materialize<C: AsRef<str>, H: AsRef<str>>(
		ordinal: usize,
		row: &[C],
		headers: &[H],
	) -> RowplateResult<Self> {
		if row.len() != headers.len() {
			return Err(RowplateError::MalformedRow {
				ordinal,
				expected: headers.len(),
				actual: row.len(),
			});
		}

		let values = headers
			.iter()
			.zip(row)
			.map(|(header, cell)| (header.as_ref().to_string(), cell.as_ref().to_string()))
			.collect();

		Ok(Self(values))
	}
}

impl<K, V> FromIterator<(K, V)> for RowRecord
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
		Self(
			iter.into_iter()
				.map(|(key, value)| (key.into(), value.into()))
				.collect(),
		)
	}
}
