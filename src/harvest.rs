// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Collects the usernames of everyone active in a subreddit.

use crate::conf;
use crate::reddit::client::Error;
use crate::reddit::forest::CommentForest;
use crate::reddit::service::Service;
use crate::reddit::thing::Submission;
use crate::reddit::{Reddit, Subreddit};
use itertools::Itertools;
use log::{info, warn};

/// Accumulates the usernames of submitters and commenters.
#[derive(Debug, Default)]
pub struct UsernameCollector {
    usernames: Vec<String>,
}

impl UsernameCollector {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the author of `submission`, if it has one.
    pub fn record_submission(&mut self, submission: &Submission) {
        if let Some(author) = submission.author() {
            self.usernames.push(author.to_string());
        }
    }

    /// Records the author of every comment in `forest`.
    ///
    /// Comments by deleted accounts and unexpanded placeholders are
    /// skipped.
    pub fn record_forest(&mut self, forest: &CommentForest) {
        self.usernames.extend(
            forest
                .iter()
                .filter_map(|node| node.author())
                .map(String::from),
        );
    }

    /// Number of usernames recorded so far, duplicates included.
    pub fn len(&self) -> usize {
        self.usernames.len()
    }

    /// True if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.usernames.is_empty()
    }

    /// Returns each recorded username once, sorted case-insensitively.
    pub fn into_unique(self) -> Vec<String> {
        self.usernames
            .into_iter()
            .unique()
            .sorted_by_cached_key(|name| (name.to_lowercase(), name.clone()))
            .collect()
    }
}

/// Options controlling how much of a subreddit is walked.
#[derive(Clone, Debug, PartialEq)]
pub struct HarvestOptions {
    limit: usize,
    expansion_budget: usize,
}

impl HarvestOptions {
    /// Sets the maximum number of top submissions to walk.
    pub fn limit(self, limit: usize) -> Self {
        Self { limit, ..self }
    }

    /// Sets the maximum number of placeholder expansions per submission.
    pub fn expansion_budget(self, expansion_budget: usize) -> Self {
        Self {
            expansion_budget,
            ..self
        }
    }
}

impl Default for HarvestOptions {
    fn default() -> Self {
        Self {
            limit: conf::DEFAULT_LIMIT,
            expansion_budget: conf::DEFAULT_EXPANSION_BUDGET,
        }
    }
}

/// Walks a subreddit's top submissions and their comments.
#[derive(Debug)]
pub struct Harvester<'a, S: Service> {
    reddit: &'a Reddit<S>,
    options: HarvestOptions,
}

impl<'a, S: Service> Harvester<'a, S> {
    /// Creates a new harvester that uses the `reddit` session.
    pub fn new(reddit: &'a Reddit<S>, options: HarvestOptions) -> Self {
        Self { reddit, options }
    }

    /// Collects the unique usernames of everyone who submitted or commented
    /// on the top submissions of `subreddit`.
    ///
    /// Any failure aborts the whole harvest; nothing collected up to that
    /// point is returned.
    pub async fn harvest(&self, subreddit: &Subreddit) -> Result<Vec<String>, Error> {
        let mut collector = UsernameCollector::new();
        let mut top = self.reddit.top(subreddit, self.options.limit);

        while let Some(submission) = top.next().await? {
            collector.record_submission(&submission);

            let mut forest = self.reddit.comments(&submission).await?;
            let report = self
                .reddit
                .expand(&mut forest, self.options.expansion_budget)
                .await?;
            if report.remaining > 0 {
                warn!(
                    "{} placeholders in {} left unexpanded after {} expansions",
                    report.remaining,
                    submission.fullname(),
                    report.expanded
                );
            }
            collector.record_forest(&forest);

            info!(
                "[{}/{}] {} ({} expansions): {} usernames so far",
                top.yielded(),
                self.options.limit,
                submission.fullname(),
                report.expanded,
                collector.len()
            );
        }

        let usernames = collector.into_unique();
        info!(
            "Found {} unique usernames in {} submissions from {subreddit}",
            usernames.len(),
            top.yielded()
        );
        Ok(usernames)
    }
}
