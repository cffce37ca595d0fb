// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Authentication for the Reddit API.
//!
//! Reddit "script" applications authenticate with the password grant: the
//! application's client ID and secret are sent as HTTP basic auth along
//! with the username and password of the account that owns the
//! application, and Reddit answers with a bearer token that is valid for
//! about a day.

use crate::http;
use serde::Deserialize;
use std::{env, fmt};
use thiserror::Error;

/// Environment variable holding the application's client ID.
pub const CLIENT_ID_VAR: &str = "REDDIT_CLIENT_ID";

/// Environment variable holding the application's client secret.
pub const CLIENT_SECRET_VAR: &str = "REDDIT_CLIENT_SECRET";

/// Environment variable holding the username of the account that owns the
/// application.
pub const USERNAME_VAR: &str = "REDDIT_USERNAME";

/// Environment variable holding the password of the account that owns the
/// application.
pub const PASSWORD_VAR: &str = "REDDIT_PASSWORD";

/// Environment variable holding an optional custom user agent.
pub const USER_AGENT_VAR: &str = "REDDIT_USER_AGENT";

/// Everything needed to establish an authenticated session with Reddit.
#[derive(Clone)]
pub struct Credentials {
    client_id: String,
    client_secret: String,
    user_agent: String,
    username: String,
    password: String,
}

impl Credentials {
    /// Creates a new set of credentials using the default user agent.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            user_agent: http::default_user_agent(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Sets the user agent and returns the new credentials.
    pub fn with_user_agent(self, user_agent: impl Into<String>) -> Self {
        let user_agent = user_agent.into();
        Self { user_agent, ..self }
    }

    /// Reads credentials from the environment.
    ///
    /// `$REDDIT_CLIENT_ID`, `$REDDIT_CLIENT_SECRET`, `$REDDIT_USERNAME`, and
    /// `$REDDIT_PASSWORD` must all be set. `$REDDIT_USER_AGENT` is optional;
    /// if it is unset or empty, the [default user agent] is used.
    ///
    /// Returns an error if a required variable is missing or if any
    /// variable is not valid Unicode.
    ///
    /// [default user agent]: crate::http::default_user_agent
    pub fn from_env() -> AuthResult<Self> {
        let credentials = Self::new(
            var(CLIENT_ID_VAR)?,
            var(CLIENT_SECRET_VAR)?,
            var(USERNAME_VAR)?,
            var(PASSWORD_VAR)?,
        );

        match env::var(USER_AGENT_VAR) {
            Ok(user_agent) if !user_agent.is_empty() => Ok(credentials.with_user_agent(user_agent)),
            Ok(_) | Err(env::VarError::NotPresent) => Ok(credentials),
            Err(source) => Err(AuthError::EnvError {
                name: USER_AGENT_VAR,
                source,
            }),
        }
    }

    /// The application's client ID.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The application's client secret.
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// The user agent sent with every request.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// The username of the account that owns the application.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The password of the account that owns the application.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("user_agent", &self.user_agent)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn var(name: &'static str) -> AuthResult<String> {
    env::var(name).map_err(|source| AuthError::EnvError { name, source })
}

/// A bearer token granted by Reddit.
#[derive(Clone, Deserialize)]
pub struct AccessToken {
    access_token: String,

    #[serde(default)]
    token_type: String,

    #[serde(default)]
    expires_in: u64,

    #[serde(default)]
    scope: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TokenResponse {
    Granted(AccessToken),
    Denied { error: String },
}

impl AccessToken {
    /// Creates a token from a raw bearer value.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: String::from("bearer"),
            expires_in: 0,
            scope: String::from("*"),
        }
    }

    /// Parses the body of a response from Reddit's token endpoint.
    ///
    /// Reddit reports a bad username or password with a successful status
    /// code and a body like `{"error": "invalid_grant"}`, so a response
    /// that made it past the status check can still be a rejection.
    pub fn parse(body: &str) -> AuthResult<Self> {
        match serde_json::from_str(body)? {
            TokenResponse::Granted(token) => Ok(token),
            TokenResponse::Denied { error } => Err(AuthError::Rejected(error)),
        }
    }

    /// The value sent in the `Authorization: Bearer` header.
    pub fn bearer(&self) -> &str {
        &self.access_token
    }

    /// Number of seconds for which the token is valid.
    pub fn expires_in(&self) -> u64 {
        self.expires_in
    }

    /// The scopes granted to the token.
    pub fn scope(&self) -> &str {
        &self.scope
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .finish()
    }
}

/// Standard result type for authentication.
pub type AuthResult<T> = Result<T, AuthError>;

/// Indicates an error when building credentials or authenticating.
#[derive(Debug, Error)]
pub enum AuthError {
    /// An error occurred while retrieving a credential from the environment.
    #[error("Environment error: ${name}: {source}")]
    EnvError {
        name: &'static str,
        source: env::VarError,
    },

    /// Reddit refused the credentials.
    #[error("Reddit rejected the credentials: {0}")]
    Rejected(String),

    /// The token endpoint returned something that is not a token.
    #[error("Could not parse access token: {0}")]
    Parse(#[from] serde_json::Error),
}
