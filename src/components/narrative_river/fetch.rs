use js_sys::Error as JsError;
use log::{info, warn};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use super::ingest::{IngestError, parse_records};
use super::types::ThemeRecord;

/// Why records could not be loaded.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum FetchError {
	/// Not running in a browser window.
	#[error("no browser window available")]
	NoWindow,
	/// The request itself failed.
	#[error("request failed: {0}")]
	Network(String),
	/// Non-2xx response.
	#[error("server responded with status {0}")]
	Status(u16),
	/// The body could not be read as text.
	#[error("response body is not text")]
	NotText,
	/// The body is not a record batch.
	#[error(transparent)]
	Ingest(#[from] IngestError),
}

fn describe(value: JsValue) -> String {
	if let Some(err) = value.dyn_ref::<JsError>() {
		return String::from(err.message());
	}
	value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

/// Loads theme records from `url`. Failures are reported once, never retried.
pub async fn fetch_records(url: &str) -> Result<Vec<ThemeRecord>, FetchError> {
	let result = fetch_inner(url).await;
	match &result {
		Ok(records) => info!("fetched {} records from {url}", records.len()),
		Err(e) => warn!("fetching {url} failed: {e}"),
	}
	result
}

async fn fetch_inner(url: &str) -> Result<Vec<ThemeRecord>, FetchError> {
	let window = web_sys::window().ok_or(FetchError::NoWindow)?;
	let response: Response = JsFuture::from(window.fetch_with_str(url))
		.await
		.map_err(describe)
		.map_err(FetchError::Network)?
		.dyn_into()
		.map_err(|_| FetchError::Network("unexpected fetch result".into()))?;

	if !response.ok() {
		return Err(FetchError::Status(response.status()));
	}

	let text = response.text().map_err(|e| FetchError::Network(describe(e)))?;
	let body = JsFuture::from(text)
		.await
		.map_err(|e| FetchError::Network(describe(e)))?
		.as_string()
		.ok_or(FetchError::NotText)?;

	Ok(parse_records(&body)?)
}
