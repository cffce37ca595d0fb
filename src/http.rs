// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Services for communicating with APIs using HTTP.

use reqwest::{Client, ClientBuilder, Response, header};
use thiserror::Error;

/// An appropriate user agent to use when making HTTP requests.
///
/// Used whenever a more specific user agent has not been configured.
pub fn default_user_agent() -> String {
    format!("{} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

/// Creates HTTP clients that identify themselves with a fixed user agent.
///
/// Reddit throttles or outright blocks requests that use a generic user
/// agent, so every client used to talk to the API should come from here.
#[derive(Debug)]
pub struct HTTPClientFactory {
    user_agent: String,
}

impl HTTPClientFactory {
    /// Creates a factory whose clients identify themselves as version
    /// `version` of the program `name`.
    pub fn new(name: &str, version: &str) -> Self {
        let user_agent = format!("{name} v{version}");
        Self { user_agent }
    }

    /// Replaces the user agent and returns the new factory.
    pub fn with_user_agent(self, user_agent: impl Into<String>) -> Self {
        let user_agent = user_agent.into();
        Self { user_agent }
    }

    /// The user agent sent by clients created by this factory.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Creates a new HTTP client.
    ///
    /// According to the reqwest docs, this only fails if a TLS backend or
    /// the DNS resolver cannot be initialized.
    pub fn create(&self) -> HTTPResult<Client> {
        let client = ClientBuilder::new()
            .user_agent(&self.user_agent)
            .build()
            .map_err(HTTPError::Client)?;
        Ok(client)
    }
}

impl Default for HTTPClientFactory {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }
}

/// The result of an HTTP request.
pub type HTTPResult<T> = Result<T, HTTPError>;

/// Indicates an error has occurred when making an HTTP call.
#[derive(Debug, Error)]
pub enum HTTPError {
    /// The HTTP client itself could not be created.
    #[error("Could not create HTTP client: {0}")]
    Client(reqwest::Error),

    /// An error that occurred while making an HTTP request.
    #[error("Error while making HTTP request: {0}")]
    Request(#[from] reqwest::Error),

    /// An error retrieving the body of a response.
    #[error("Error retrieving body of HTTP response: {0}")]
    Body(reqwest::Error),

    /// An unsuccessful HTTP status code in an HTTP response.
    #[error("Request returned HTTP {0}")]
    Http(reqwest::StatusCode),

    /// A missing Content-Type header in a response.
    #[error("Missing Content-Type header")]
    MissingContentType,

    /// An invalid Content-Type header.
    #[error("Invalid Content-Type header value: {0}")]
    InvalidContentType(#[from] header::ToStrError),

    /// A Content-Type that is not understood by the service.
    #[error("Unexpected content type: {0}")]
    UnexpectedContentType(String),
}

/// Returns the raw body of a successful JSON response.
///
/// Returns an error if the response has an unsuccessful status code or if
/// it is not JSON.
pub async fn json_body(resp: Response) -> HTTPResult<String> {
    if !resp.status().is_success() {
        return Err(HTTPError::Http(resp.status()));
    }

    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .ok_or(HTTPError::MissingContentType)?
        .to_str()?;
    if !content_type.starts_with("application/json") {
        Err(HTTPError::UnexpectedContentType(content_type.to_string()))
    } else {
        resp.text().await.map_err(HTTPError::Body)
    }
}
