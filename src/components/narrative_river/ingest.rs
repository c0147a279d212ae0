//! Typed ingestion of theme records from a JSON response body.
//!
//! Each array element is decoded on its own so one malformed entry is dropped
//! with a warning instead of failing the whole batch.

use log::warn;
use serde::Deserialize;
use serde_json::{Map, Number, Value};

use super::types::{ThemeKind, ThemeRecord};

/// Records without a rank sort after all ranked ones.
pub const UNRANKED: i32 = i32::MAX;

/// Failure to read a response body as a batch of records.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum IngestError {
	/// The body is not JSON at all.
	#[error("response body is not valid JSON: {0}")]
	Json(String),
	/// The body is JSON but not an array.
	#[error("expected a JSON array of theme records, found {found}")]
	NotAnArray {
		/// Kind of JSON value found instead.
		found: &'static str,
	},
}

/// Why a single array element was rejected.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum RecordError {
	/// The element is not a JSON object.
	#[error("record is not an object")]
	NotAnObject,
	/// Neither `year` nor `Year` is present.
	#[error("record has no year")]
	MissingYear,
	/// A known field has the wrong JSON type.
	#[error("record has a malformed field: {0}")]
	Malformed(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
	Text(String),
	Number(Number),
}

// Node fields and spreadsheet columns may both be present; node fields win.
#[derive(Deserialize)]
struct RawRecord {
	#[serde(default)]
	id: Option<RawId>,
	#[serde(default)]
	year: Option<i32>,
	#[serde(default, rename = "Year")]
	year_column: Option<i32>,
	#[serde(default)]
	name: Option<String>,
	#[serde(default, rename = "Theme")]
	theme_column: Option<String>,
	#[serde(default)]
	rank: Option<i32>,
	#[serde(default, rename = "Rank")]
	rank_column: Option<i32>,
	#[serde(default, rename = "type")]
	kind: Option<String>,
	#[serde(flatten)]
	details: Map<String, Value>,
}

fn kind_of(raw: Option<&str>) -> ThemeKind {
	match raw {
		Some("base") => ThemeKind::Base,
		_ => ThemeKind::Theme,
	}
}

/// Converts one decoded JSON element into a record.
pub fn record_from_value(index: usize, value: Value) -> Result<ThemeRecord, RecordError> {
	if !value.is_object() {
		return Err(RecordError::NotAnObject);
	}
	let raw: RawRecord = serde_json::from_value(value).map_err(|e| RecordError::Malformed(e.to_string()))?;
	let year = raw.year.or(raw.year_column).ok_or(RecordError::MissingYear)?;
	let id = match raw.id {
		Some(RawId::Text(s)) => s,
		Some(RawId::Number(n)) => n.to_string(),
		None => format!("record-{index}"),
	};

	Ok(ThemeRecord {
		id,
		year,
		name: raw.name.or(raw.theme_column).unwrap_or_default(),
		rank: raw.rank.or(raw.rank_column).unwrap_or(UNRANKED),
		kind: kind_of(raw.kind.as_deref()),
		details: raw.details,
	})
}

fn json_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "a boolean",
		Value::Number(_) => "a number",
		Value::String(_) => "a string",
		Value::Array(_) => "an array",
		Value::Object(_) => "an object",
	}
}

/// Decodes every element of a JSON array, skipping the ones that fail.
pub fn records_from_value(value: Value) -> Result<Vec<ThemeRecord>, IngestError> {
	let items = match value {
		Value::Array(items) => items,
		other => {
			return Err(IngestError::NotAnArray {
				found: json_kind(&other),
			});
		}
	};

	let total = items.len();
	let records: Vec<ThemeRecord> = items
		.into_iter()
		.enumerate()
		.filter_map(|(i, item)| match record_from_value(i, item) {
			Ok(record) => Some(record),
			Err(e) => {
				warn!("skipping record {i}: {e}");
				None
			}
		})
		.collect();

	if records.len() < total {
		warn!("ingested {} of {} records", records.len(), total);
	}
	Ok(records)
}

/// Parses a response body into records.
pub fn parse_records(body: &str) -> Result<Vec<ThemeRecord>, IngestError> {
	let value: Value = serde_json::from_str(body).map_err(|e| IngestError::Json(e.to_string()))?;
	records_from_value(value)
}
