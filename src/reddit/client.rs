// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Clients for reading data from the Reddit API.

use crate::http;
use crate::reddit::auth::{AccessToken, AuthError, Credentials};
use crate::reddit::forest::CommentForest;
use crate::reddit::service::{RedditService, Service};
use crate::reddit::subreddit::{Subreddit, TopSubmissions};
use crate::reddit::thing::{self, CommentNode, MoreComments, Submission};
use log::{debug, info};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use thiserror::Error;

/// Maximum number of comment IDs `/api/morechildren` resolves per request.
pub const MORE_CHILDREN_BATCH: usize = 100;

/// Maximum number of comments Reddit returns per request for a thread.
const THREAD_LIMIT: &str = "500";

/// An authenticated session with the Reddit API.
#[derive(Debug)]
pub struct Reddit<S: Service = RedditService> {
    service: S,
    token: AccessToken,
}

impl Reddit {
    /// Authenticates with Reddit over HTTPS.
    ///
    /// Returns an [`enum@Error`] if the HTTP client cannot be created, if
    /// Reddit cannot be reached, or if Reddit rejects the credentials.
    pub async fn login(credentials: &Credentials) -> Result<Self, Error> {
        let service = RedditService::new(credentials)?;
        Self::login_with_service(credentials, service).await
    }
}

impl<S: Service> Reddit<S> {
    /// Authenticates using `service` to talk to Reddit.
    pub(crate) async fn login_with_service(
        credentials: &Credentials,
        service: S,
    ) -> Result<Self, Error> {
        let body = service.authenticate(credentials).await?;
        let token = AccessToken::parse(&body)?;
        info!("Logged in to Reddit as {}", credentials.username());
        debug!("Token expires in {}s", token.expires_in());
        Ok(Self { service, token })
    }

    pub(crate) async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<String, Error> {
        let body = self.service.get_resource(&self.token, path, query).await?;
        Ok(body)
    }

    /// Name of the account the session belongs to.
    pub async fn me(&self) -> Result<String, Error> {
        let body = self.get("/api/v1/me", &[]).await?;
        Ok(thing::parse_account_name(&body)?)
    }

    /// Iterates over the all-time top submissions of `subreddit`, stopping
    /// after `limit` submissions.
    pub fn top<'a>(&'a self, subreddit: &Subreddit, limit: usize) -> TopSubmissions<'a, S> {
        TopSubmissions::new(self, subreddit, limit)
    }

    /// Retrieves the comments on `submission`.
    ///
    /// The forest will usually contain placeholders for comments Reddit
    /// did not include; see [`Reddit::expand()`].
    pub async fn comments(&self, submission: &Submission) -> Result<CommentForest, Error> {
        let path = format!("/comments/{}", submission.id());
        let query = [("limit", THREAD_LIMIT), ("raw_json", "1")];
        let body = self.get(&path, &query).await?;
        let nodes = CommentNode::parse_thread(&body)?;
        Ok(CommentForest::new(submission.fullname(), nodes))
    }

    /// Replaces placeholders in `forest` with the comments they stand for,
    /// making at most `budget` requests.
    ///
    /// Placeholders hiding the most comments are resolved first. A single
    /// request resolves up to [`MORE_CHILDREN_BATCH`] comments, so a large
    /// placeholder may take several requests. Any placeholders left when
    /// the budget runs out stay in the forest, as do "continue this thread"
    /// placeholders that hang directly off the submission.
    pub async fn expand(
        &self,
        forest: &mut CommentForest,
        budget: usize,
    ) -> Result<ExpansionReport, Error> {
        let mut queue: BinaryHeap<ByCount> =
            forest.take_placeholders().into_iter().map(ByCount).collect();
        let mut skipped = vec![];
        let mut expanded = 0;

        while expanded < budget {
            let Some(ByCount(mut more)) = queue.pop() else {
                break;
            };

            // A thread can only be continued from a comment.
            if more.is_continue_thread() && more.parent_id() == forest.link_id() {
                debug!("Skipping {} with no parent comment", more.fullname());
                skipped.push(more);
                continue;
            }
            expanded += 1;

            let nodes = if more.is_continue_thread() {
                self.continue_thread(forest.link_id(), &more).await?
            } else {
                let batch = more.take_batch(MORE_CHILDREN_BATCH);
                if !more.children().is_empty() {
                    queue.push(ByCount(more));
                }
                self.more_children(forest.link_id(), &batch).await?
            };

            let mut fetched = CommentForest::new(forest.link_id(), nodes);
            queue.extend(fetched.take_placeholders().into_iter().map(ByCount));
            forest.insert(fetched.into_nodes());
        }

        skipped.extend(queue.into_iter().map(|ByCount(more)| more));
        let remaining = skipped.len();
        forest.insert(skipped.into_iter().map(CommentNode::More));
        Ok(ExpansionReport {
            expanded,
            remaining,
        })
    }

    async fn more_children(
        &self,
        link_id: &str,
        children: &[String],
    ) -> Result<Vec<CommentNode>, Error> {
        let children = children.join(",");
        let query = [
            ("api_type", "json"),
            ("link_id", link_id),
            ("children", children.as_str()),
            ("limit_children", "false"),
            ("raw_json", "1"),
        ];
        let body = self.get("/api/morechildren", &query).await?;
        Ok(CommentNode::parse_more_children(&body)?)
    }

    // Reddit returns the parent comment itself along with its replies, but
    // only the replies are new.
    async fn continue_thread(
        &self,
        link_id: &str,
        more: &MoreComments,
    ) -> Result<Vec<CommentNode>, Error> {
        let path = format!("/comments/{}", short_id(link_id));
        let parent = short_id(more.parent_id());
        let query = [
            ("comment", parent),
            ("limit", THREAD_LIMIT),
            ("raw_json", "1"),
        ];
        let body = self.get(&path, &query).await?;
        let mut thread = CommentForest::new(link_id, CommentNode::parse_thread(&body)?);
        Ok(thread.take_replies(more.parent_id()))
    }

    #[cfg(test)]
    pub(crate) fn service(&self) -> &S {
        &self.service
    }
}

/// Strips the kind prefix (such as `t3_`) from a fullname.
fn short_id(fullname: &str) -> &str {
    fullname
        .split_once('_')
        .map(|(_, id)| id)
        .unwrap_or(fullname)
}

/// Summary of a call to [`Reddit::expand()`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ExpansionReport {
    /// Number of requests made to resolve placeholders.
    pub expanded: usize,

    /// Number of placeholders left in the forest unresolved.
    pub remaining: usize,
}

// Orders placeholders by the number of comments they hide.
#[derive(Debug)]
struct ByCount(MoreComments);

impl PartialEq for ByCount {
    fn eq(&self, other: &Self) -> bool {
        self.0.count() == other.0.count()
    }
}

impl Eq for ByCount {}

impl PartialOrd for ByCount {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ByCount {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.count().cmp(&other.0.count())
    }
}

/// A client error.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the underlying HTTP service.
    #[error("Service error: {0}")]
    Service(#[from] http::HTTPError),

    /// Reddit refused to authenticate.
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// An error parsing data.
    #[error("Parse error: {0}")]
    Parse(#[from] thing::Error),
}
