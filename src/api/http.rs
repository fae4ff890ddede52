//! Fetch calls against the backend.

use js_sys::{Reflect, Uint8Array};
use log::{debug, info};
use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
	AbortController, File, FormData, ReadableStreamDefaultReader, Request, RequestInit, RequestMode,
	Response,
};

use super::upload::UploadResult;
use crate::components::force_graph::GraphData;
use crate::discovery::ChunkSource;
use crate::error::{Error, Result};

#[derive(Serialize)]
struct DiscoverRequest<'a> {
	question: &'a str,
}

/// Aborts an in-flight request from outside the task reading it.
#[derive(Clone, Debug)]
pub struct AbortHandle(AbortController);

impl AbortHandle {
	/// A fresh controller, not yet attached to any request.
	pub fn new() -> Result<Self> {
		Ok(Self(AbortController::new()?))
	}

	/// Cancels the request this handle was passed to, at whatever stage it is in.
	pub fn abort(&self) {
		self.0.abort();
	}
}

/// Response body of `/api/discover-stream`, read chunk by chunk.
pub struct FetchChunkSource {
	reader: ReadableStreamDefaultReader,
	abort: AbortHandle,
}

impl ChunkSource for FetchChunkSource {
	async fn next_chunk(&mut self) -> Result<Option<Vec<u8>>> {
		let step = JsFuture::from(self.reader.read()).await?;
		let done = Reflect::get(&step, &JsValue::from_str("done"))?
			.as_bool()
			.unwrap_or(true);
		if done {
			return Ok(None);
		}
		let value = Reflect::get(&step, &JsValue::from_str("value"))?;
		if !value.is_instance_of::<Uint8Array>() {
			return Err(Error::Transport("response body yielded a non-byte chunk".into()));
		}
		Ok(Some(Uint8Array::new(&value).to_vec()))
	}

	fn cancel(&mut self) {
		let _ = self.reader.cancel();
		self.abort.abort();
	}
}

async fn send(url: &str, opts: &RequestInit, content_type: Option<&str>) -> Result<Response> {
	let window = web_sys::window().ok_or_else(|| Error::Transport("no window object".into()))?;
	let request = Request::new_with_str_and_init(url, opts)?;
	if let Some(content_type) = content_type {
		request.headers().set("Content-Type", content_type)?;
	}

	let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
	let response: Response = resp_value.dyn_into()?;
	if !response.ok() {
		return Err(Error::HttpStatus {
			status: response.status(),
			status_text: response.status_text(),
		});
	}
	Ok(response)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
	let text = JsFuture::from(response.text()?)
		.await?
		.as_string()
		.ok_or_else(|| Error::Decode("response is not text".into()))?;
	Ok(serde_json::from_str(&text)?)
}

/// `GET /api/graph-data`.
pub async fn fetch_graph(url: &str) -> Result<GraphData> {
	let opts = RequestInit::new();
	opts.set_method("GET");
	opts.set_mode(RequestMode::Cors);

	let data: GraphData = read_json(send(url, &opts, None).await?).await?;
	info!(
		"graph snapshot loaded: {} nodes, {} links",
		data.nodes.len(),
		data.links.len()
	);
	Ok(data)
}

/// `POST /api/discover-stream`. Resolves once headers arrive; the body is read through the
/// returned source.
///
/// `abort` cancels the request both before and after the headers arrive.
pub async fn open_discovery_stream(
	url: &str,
	question: &str,
	abort: &AbortHandle,
) -> Result<FetchChunkSource> {
	let body = serde_json::to_string(&DiscoverRequest { question })?;

	let opts = RequestInit::new();
	opts.set_method("POST");
	opts.set_mode(RequestMode::Cors);
	opts.set_body(&JsValue::from_str(&body));
	opts.set_signal(Some(&abort.0.signal()));

	let response = send(url, &opts, Some("application/json")).await?;
	let stream = response
		.body()
		.ok_or_else(|| Error::Transport("response has no body".into()))?;
	let reader: ReadableStreamDefaultReader = stream.get_reader().unchecked_into();
	debug!("discovery stream opened");
	Ok(FetchChunkSource {
		reader,
		abort: abort.clone(),
	})
}

/// `POST /api/upload-publication` as multipart form data.
pub async fn upload_publication(url: &str, file: &File) -> Result<UploadResult> {
	let form = FormData::new()?;
	form.append_with_blob_and_filename("file", file, &file.name())?;

	let opts = RequestInit::new();
	opts.set_method("POST");
	opts.set_mode(RequestMode::Cors);
	opts.set_body(&form);

	let result: UploadResult = read_json(send(url, &opts, None).await?).await?;
	info!(
		"publication {} uploaded: success={}",
		result.filename, result.success
	);
	Ok(result)
}
