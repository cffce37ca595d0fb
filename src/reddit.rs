// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Reddit API clients and services for communicating with Reddit over HTTP.

pub mod auth;
pub mod client;
pub mod forest;
pub mod service;
pub mod subreddit;
pub mod thing;

pub use auth::Credentials;
pub use client::Reddit;
pub use subreddit::Subreddit;
