//! The HTTP client facade.
//!
//! # Design
//! `HttpFacade` owns one `Transport` (by default a pooled `ureq` agent) and
//! carries no mutable state between calls, so a single value can be shared
//! across threads. Each operation is split into a pure `build_*` method that
//! produces an `HttpRequest` and a call to `execute`, which performs the
//! round-trip and fully reads the body before the response handle drops.
//!
//! Status codes are reported but never interpreted: a 500 with a body is a
//! successful call. Failures are returned as-is, with no retry.

use url::form_urlencoded;
use url::Url;

use crate::config::PoolConfig;
use crate::error::{FacadeError, Result};
use crate::http::{
    Headers, HttpMethod, HttpRequest, HttpResponse, Params, CONTENT_TYPE, FORM_CONTENT_TYPE,
    JSON_CONTENT_TYPE,
};
use crate::transport::{Transport, TransportResponse, UreqTransport};

/// Blocking GET/POST helpers over a pooled connection manager.
#[derive(Debug, Clone)]
pub struct HttpFacade<T = UreqTransport> {
    transport: T,
}

impl HttpFacade<UreqTransport> {
    /// Validate `config` and build a facade backed by a pooled `ureq` agent.
    pub fn new(config: PoolConfig) -> Result<Self> {
        config.validate()?;
        tracing::debug!(
            max_total = config.max_total_connections,
            max_per_route = config.max_connections_per_route,
            "building pooled http client"
        );
        Ok(Self::with_transport(UreqTransport::new(&config)))
    }
}

impl<T: Transport> HttpFacade<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GET `url` and return the response body.
    pub fn get(&self, url: &str) -> Result<String> {
        self.get_with_headers(url, &Params::new(), &Headers::new())
    }

    /// GET `url` with `params` appended as query parameters.
    pub fn get_with_params(&self, url: &str, params: &Params) -> Result<String> {
        self.get_with_headers(url, params, &Headers::new())
    }

    /// GET `url` with `params` appended as query parameters and `headers` set
    /// on the request.
    pub fn get_with_headers(&self, url: &str, params: &Params, headers: &Headers) -> Result<String> {
        let request = self.build_get(url, params, headers)?;
        self.execute(&request).map(|response| response.body)
    }

    /// POST `form` as an `application/x-www-form-urlencoded` body.
    pub fn post(&self, url: &str, form: &Params) -> Result<String> {
        let request = self.build_post_form(url, form)?;
        self.execute(&request).map(|response| response.body)
    }

    /// POST `json` verbatim with a JSON content type. The text is not parsed.
    pub fn post_json(&self, url: &str, json: &str) -> Result<String> {
        self.post_json_with_headers(url, json, &Headers::new())
    }

    /// POST `json` verbatim with `headers`. The JSON content type always
    /// replaces a caller-supplied `Content-Type`.
    pub fn post_json_with_headers(&self, url: &str, json: &str, headers: &Headers) -> Result<String> {
        let request = self.build_post_json(url, json, headers)?;
        self.execute(&request).map(|response| response.body)
    }

    pub fn build_get(&self, url: &str, params: &Params, headers: &Headers) -> Result<HttpRequest> {
        let mut parsed = parse_url(url)?;
        if !params.is_empty() {
            let mut query = parsed.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
        }
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: parsed.into(),
            headers: header_pairs(headers),
            body: None,
        })
    }

    pub fn build_post_form(&self, url: &str, form: &Params) -> Result<HttpRequest> {
        let parsed = parse_url(url)?;
        let mut body = form_urlencoded::Serializer::new(String::new());
        for (key, value) in form {
            body.append_pair(key, value);
        }
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: parsed.into(),
            headers: vec![(CONTENT_TYPE.to_string(), FORM_CONTENT_TYPE.to_string())],
            body: Some(body.finish()),
        })
    }

    pub fn build_post_json(&self, url: &str, json: &str, headers: &Headers) -> Result<HttpRequest> {
        let parsed = parse_url(url)?;
        let mut merged: Vec<(String, String)> = headers
            .iter()
            .filter(|(name, _)| !name.eq_ignore_ascii_case(CONTENT_TYPE))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        merged.push((CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string()));
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: parsed.into(),
            headers: merged,
            body: Some(json.to_string()),
        })
    }

    /// Send `request`, read the whole body, and release the response.
    pub fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        tracing::debug!(method = request.method.as_str(), url = %request.url, "sending request");
        let result = self.round_trip(request);
        if let Err(err) = &result {
            tracing::debug!(method = request.method.as_str(), url = %request.url, error = %err, "request failed");
        }
        result
    }

    fn round_trip(&self, request: &HttpRequest) -> Result<HttpResponse> {
        // The handle drops at the end of this scope, whether or not the read
        // succeeded.
        let mut response = self.transport.send(request)?;
        let status = response.status();
        let headers = response.headers();
        let body = response.read_body()?;
        tracing::trace!(status, bytes = body.len(), "response body read");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn parse_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|source| FacadeError::InvalidUrl {
        url: url.to_string(),
        source,
    })
}

fn header_pairs(headers: &Headers) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}
