// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Subreddits and their listings.

use crate::reddit::client::{Error, Reddit};
use crate::reddit::service::Service;
use crate::reddit::thing::Submission;
use log::debug;
use regex::Regex;
use std::collections::VecDeque;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// Largest page Reddit will return for a listing.
pub const PAGE_SIZE: usize = 100;

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_]{1,20}$").expect("subreddit name pattern is invalid")
});

/// The name of a subreddit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subreddit {
    name: String,
}

impl Subreddit {
    /// Creates a new subreddit handle.
    ///
    /// A leading `r/` or `/r/` is ignored, so `r/rust` and `rust` name the
    /// same subreddit.
    ///
    /// # Examples
    ///
    /// ```
    /// use redleads::reddit::Subreddit;
    /// let subreddit = Subreddit::new("r/onlineeslteaching").unwrap();
    /// assert_eq!(subreddit.name(), "onlineeslteaching");
    /// assert!(Subreddit::new("not a subreddit").is_err());
    /// ```
    pub fn new(name: &str) -> Result<Self, InvalidSubreddit> {
        let trimmed = name.trim();
        let trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);
        let trimmed = trimmed.strip_prefix("r/").unwrap_or(trimmed);
        if NAME_RE.is_match(trimmed) {
            let name = trimmed.to_string();
            Ok(Self { name })
        } else {
            Err(InvalidSubreddit(name.to_string()))
        }
    }

    /// The subreddit's name, without the `r/` prefix.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Subreddit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r/{}", self.name)
    }
}

/// Indicates that a string is not a valid subreddit name.
#[derive(Debug, Error, PartialEq)]
#[error("invalid subreddit name: {0:?}")]
pub struct InvalidSubreddit(String);

/// The all-time top submissions of a subreddit, fetched a page at a time.
///
/// Pages are requested only when the submissions already fetched run out.
#[derive(Debug)]
pub struct TopSubmissions<'a, S: Service> {
    reddit: &'a Reddit<S>,
    path: String,
    limit: usize,
    yielded: usize,
    after: Option<String>,
    buffer: VecDeque<Submission>,
    exhausted: bool,
}

impl<'a, S: Service> TopSubmissions<'a, S> {
    pub(crate) fn new(reddit: &'a Reddit<S>, subreddit: &Subreddit, limit: usize) -> Self {
        Self {
            reddit,
            path: format!("/r/{}/top", subreddit.name()),
            limit,
            yielded: 0,
            after: None,
            buffer: VecDeque::new(),
            exhausted: false,
        }
    }

    /// Returns the next submission, or `None` once the listing or the
    /// limit has been reached.
    pub async fn next(&mut self) -> Result<Option<Submission>, Error> {
        if self.yielded >= self.limit {
            return Ok(None);
        }
        if self.buffer.is_empty() && !self.exhausted {
            self.fetch_page().await?;
        }
        let submission = self.buffer.pop_front();
        if submission.is_some() {
            self.yielded += 1;
        }
        Ok(submission)
    }

    /// Number of submissions returned so far.
    pub fn yielded(&self) -> usize {
        self.yielded
    }

    async fn fetch_page(&mut self) -> Result<(), Error> {
        let page_size = (self.limit - self.yielded).min(PAGE_SIZE).to_string();
        let body = {
            let mut query = vec![
                ("t", "all"),
                ("limit", page_size.as_str()),
                ("raw_json", "1"),
            ];
            if let Some(after) = &self.after {
                query.push(("after", after.as_str()));
            }
            self.reddit.get(&self.path, &query).await?
        };

        let (items, after) = Submission::parse_listing(&body)?.into_parts();
        debug!(
            "Fetched {} submissions from {}, next page: {after:?}",
            items.len(),
            self.path
        );
        self.exhausted = after.is_none() || items.is_empty();
        self.after = after;
        self.buffer.extend(items);
        Ok(())
    }
}
