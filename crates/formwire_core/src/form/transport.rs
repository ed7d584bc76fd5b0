use url::Url;

use crate::form::FormData;

/// POST request carrying a serialized form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
	/// Always `POST`.
	pub method: &'static str,
	/// Target URL.
	pub url: Url,
	/// `Content-Type` header value, boundary included.
	pub content_type: String,
	/// Multipart body.
	pub body: Vec<u8>,
}

/// Response handed back by a [`Transport`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response headers in arrival order.
	pub headers: Vec<(String, String)>,
	/// Response body.
	pub body: Vec<u8>,
}

/// Sends prepared requests; timeouts, retries and cancellation belong here.
pub trait Transport {
	/// Transport-specific failure.
	type Error;

	/// Submit `request` and wait for its response.
	fn post(&self, request: &HttpRequest) -> Result<HttpResponse, Self::Error>;
}

impl FormData {
	/// Build a POST request for `url` from the current parts.
	pub fn to_request(&self, url: Url) -> HttpRequest {
		HttpRequest {
			method: "POST",
			url,
			content_type: self.content_type_for_http_request(),
			body: self.body_for_http_request(),
		}
	}

	/// Serialize the form and submit it through `transport`.
	pub fn submit<T: Transport>(&self, transport: &T, url: Url) -> Result<HttpResponse, T::Error> {
		transport.post(&self.to_request(url))
	}
}
