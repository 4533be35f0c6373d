//! Browser `fetch` transport for the dataset files.

use futures::future::LocalBoxFuture;
use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::engine::error::{DataError, Result};
use crate::engine::store::DataSource;

/// Fetches a same-origin or CORS-enabled URL with a plain GET.
#[derive(Clone, Debug)]
pub struct HttpSource {
	url: String,
}

impl HttpSource {
	pub fn new(url: impl Into<String>) -> Self {
		Self { url: url.into() }
	}
}

impl DataSource for HttpSource {
	fn location(&self) -> &str {
		&self.url
	}

	fn fetch_text(&self) -> LocalBoxFuture<'static, Result<String>> {
		let url = self.url.clone();
		Box::pin(async move {
			let result = get_text(&url).await;
			result.map_err(|err| DataError::Transport {
				reason: describe(&err),
				url,
			})
		})
	}
}

async fn get_text(url: &str) -> std::result::Result<String, JsValue> {
	let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window object"))?;

	let opts = RequestInit::new();
	opts.set_method("GET");
	opts.set_mode(RequestMode::Cors);
	let request = Request::new_with_str_and_init(url, &opts)?;

	let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
	let response: Response = resp_value.dyn_into()?;
	if !response.ok() {
		return Err(JsValue::from_str(&format!(
			"HTTP {} {}",
			response.status(),
			response.status_text()
		)));
	}

	let text = JsFuture::from(response.text()?).await?;
	text.as_string()
		.ok_or_else(|| JsValue::from_str("response body is not text"))
}

fn describe(err: &JsValue) -> String {
	err.as_string().unwrap_or_else(|| format!("{err:?}"))
}
