// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! HTTPS connector for the Reddit API.
//!
//! Service structures in this module provide a low-level way to interact
//! with the Reddit API over HTTPS, essentially a specialized HTTPS client
//! specifically for Reddit.

use crate::http::{self, HTTPClientFactory, HTTPResult};
use crate::reddit::auth::{AccessToken, Credentials};
use log::debug;
use reqwest::Client;

/// Reddit's OAuth token endpoint.
pub const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";

/// Base URI for authenticated API requests.
pub const API_BASE: &str = "https://oauth.reddit.com";

/// A service for retrieving data from the Reddit API.
///
/// Using this trait, clients can implement different ways of connecting
/// to the Reddit API, such as an actual connector for production code,
/// and a mocked connector for testing purposes.
pub trait Service {
    /// Exchanges `credentials` for an access token and returns the raw
    /// response from the token endpoint.
    fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = HTTPResult<String>> + Send;

    /// Performs an authenticated GET request for the API resource at `path`
    /// with the given query parameters and returns the raw JSON response.
    fn get_resource(
        &self,
        token: &AccessToken,
        path: &str,
        query: &[(&str, &str)],
    ) -> impl Future<Output = HTTPResult<String>> + Send;
}

/// A service that contacts the Reddit API directly to retrieve information.
#[derive(Debug)]
pub struct RedditService {
    client: Client,
}

impl RedditService {
    /// Creates a new Reddit service that identifies itself with the
    /// user agent from `credentials`.
    pub fn new(credentials: &Credentials) -> HTTPResult<Self> {
        let factory = HTTPClientFactory::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
            .with_user_agent(credentials.user_agent());
        let client = factory.create()?;
        Ok(Self { client })
    }

    fn uri(&self, path: &str) -> String {
        format!("{API_BASE}{path}")
    }
}

impl Service for RedditService {
    async fn authenticate(&self, credentials: &Credentials) -> HTTPResult<String> {
        debug!("POST {TOKEN_URL} as {}", credentials.username());
        let form = [
            ("grant_type", "password"),
            ("username", credentials.username()),
            ("password", credentials.password()),
        ];
        let resp = self
            .client
            .post(TOKEN_URL)
            .basic_auth(credentials.client_id(), Some(credentials.client_secret()))
            .form(&form)
            .send()
            .await?;
        http::json_body(resp).await
    }

    async fn get_resource(
        &self,
        token: &AccessToken,
        path: &str,
        query: &[(&str, &str)],
    ) -> HTTPResult<String> {
        let uri = self.uri(path);
        debug!("GET {uri} {query:?}");
        let resp = self
            .client
            .get(&uri)
            .bearer_auth(token.bearer())
            .query(query)
            .send()
            .await?;
        http::json_body(resp).await
    }
}
