// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! redleads is a command-line tool for building a list of everyone who is
//! active in a subreddit. It walks a subreddit's all-time top submissions,
//! loads every comment on each of them (including the ones hidden behind
//! "load more comments" links), and writes the unique usernames of the
//! submitters and commenters to a CSV file.
//!
//! # Examples
//!
//! Collect usernames from r/onlineeslteaching into
//! `usernames_onlineeslteaching.csv`:
//!
//! ```bash
//! redleads collect onlineeslteaching
//! ```
//!
//! Only walk the top 50 submissions, load "more comments" at most 10 times
//! per submission, and write the results somewhere else:
//!
//! ```bash
//! redleads collect onlineeslteaching -n 50 --expand-limit 10 -o esl.csv
//! ```
//!
//! Check that your credentials work:
//!
//! ```bash
//! redleads whoami
//! ```
//!
//! Get usage and help for the tool:
//!
//! ```bash
//! redleads --help
//! ```
//!
//! # Reddit API Setup
//!
//! redleads talks to Reddit as a "script" application, which means it
//! logs in with the username and password of the account that owns the
//! application. To set it up:
//!
//! 1. Create an application of type "script" on Reddit's [app preferences]
//!    page.
//! 2. Copy the client ID (the string under the application's name) and the
//!    client secret.
//! 3. Store them in the environment along with the owning account's
//!    username and password:
//!
//!    ```bash
//!    $ export REDDIT_CLIENT_ID='copied client id'
//!    $ export REDDIT_CLIENT_SECRET='copied secret'
//!    $ export REDDIT_USERNAME='account name'
//!    $ export REDDIT_PASSWORD='account password'
//!    ```
//!
//! Optionally set `$REDDIT_USER_AGENT` to a user agent that follows
//! Reddit's [API rules], and `$REDDIT_SUBREDDIT` to a default subreddit.
//!
//! Walking a large subreddit makes a lot of requests; Reddit's rate limits
//! apply.
//!
//! # License
//!
//! redleads is licensed under the terms of the [Apache License 2.0]. Please
//! see the LICENSE file accompanying this source code or visit the previous
//! link for more information on licensing.
//!
//! [Apache License 2.0]: https://www.apache.org/licenses/LICENSE-2.0
//! [API rules]: https://github.com/reddit-archive/reddit/wiki/API
//! [app preferences]: https://www.reddit.com/prefs/apps

pub mod cli;
pub mod conf;
pub mod export;
pub mod harvest;
pub mod http;
pub mod reddit;

#[cfg(test)]
mod test_utils;
