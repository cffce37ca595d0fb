// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Environment and configuration utilities.
//!
//! Credentials are read by [`Credentials::from_env()`]; everything else
//! the program can be told lives here.
//!
//! [`Credentials::from_env()`]: crate::reddit::Credentials::from_env

use crate::reddit::Subreddit;
use std::path::PathBuf;

/// Environment variable naming the subreddit to collect from when it is
/// not given on the command line.
pub const SUBREDDIT_VAR: &str = "REDDIT_SUBREDDIT";

/// Default number of top submissions to walk.
///
/// Reddit stops returning listing pages after roughly 1,000 items, so
/// asking for more than this rarely returns anything extra.
pub const DEFAULT_LIMIT: usize = 1000;

/// Default number of placeholder expansions per submission.
pub const DEFAULT_EXPANSION_BUDGET: usize = 1000;

/// Default path of the CSV file for `subreddit`, relative to the current
/// working directory.
///
/// # Examples
///
/// ```
/// use redleads::conf::output_path;
/// use redleads::reddit::Subreddit;
/// let subreddit = Subreddit::new("onlineeslteaching").unwrap();
/// assert_eq!(
///     output_path(&subreddit).to_str(),
///     Some("usernames_onlineeslteaching.csv")
/// );
/// ```
pub fn output_path(subreddit: &Subreddit) -> PathBuf {
    PathBuf::from(format!("usernames_{}.csv", subreddit.name()))
}
