// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Drives the command-line program.

use crate::conf;
use crate::export;
use crate::harvest::{HarvestOptions, Harvester};
use crate::reddit::auth::{AuthError, Credentials};
use crate::reddit::client;
use crate::reddit::service::{RedditService, Service};
use crate::reddit::subreddit::InvalidSubreddit;
use crate::reddit::{Reddit, Subreddit};
use clap::{Args, Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use log::LevelFilter;
use std::path::PathBuf;
use std::process;
use thiserror::Error;

/// Prints `message` to stderr and exits with `error_code`.
pub fn die(error_code: i32, message: &str) -> ! {
    eprintln!("{}", message);
    process::exit(error_code);
}

/// Program configuration.
#[derive(Debug, Parser)]
#[command(version)]
#[command(about = "Collects the usernames of everyone posting and commenting in a subreddit", long_about = None
)]
pub struct Config {
    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,

    #[command(subcommand)]
    command: Command,
}

impl Config {
    /// Most verbose log level requested on the command line.
    pub fn log_level_filter(&self) -> LevelFilter {
        self.verbosity.log_level_filter()
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write the usernames of a subreddit's submitters and commenters to a
    /// CSV file
    #[command(alias = "c")]
    Collect(CollectConfig),

    /// Check Reddit credentials and print the name of the account
    Whoami,
}

#[derive(Args, Debug)]
struct CollectConfig {
    /// Subreddit to collect usernames from
    #[arg(env = "REDDIT_SUBREDDIT")]
    subreddit: String,

    /// Only walk the top 'n' submissions
    #[arg(short = 'n', long, default_value_t = conf::DEFAULT_LIMIT)]
    limit: usize,

    /// Load "more comments" at most 'n' times per submission
    #[arg(short = 'e', long, value_name = "N", default_value_t = conf::DEFAULT_EXPANSION_BUDGET)]
    expand_limit: usize,

    /// Write usernames to PATH instead of usernames_<subreddit>.csv
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,
}

impl CollectConfig {
    fn harvest_options(&self) -> HarvestOptions {
        HarvestOptions::default()
            .limit(self.limit)
            .expansion_budget(self.expand_limit)
    }
}

/// Runs the command-line program.
#[derive(Debug)]
pub struct Runner {
    config: Config,
}

impl Runner {
    /// Create a new program runner using the given `config`.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the command-line program using its stored configuration options.
    ///
    /// Credentials are read from the environment; see
    /// [`Credentials::from_env()`].
    pub async fn run(&self) -> Result<(), Error> {
        let credentials = Credentials::from_env()?;
        let service = RedditService::new(&credentials).map_err(client::Error::from)?;

        match &self.config.command {
            Command::Collect(config) => {
                let (count, output) = self.run_collect(config, &credentials, service).await?;
                println!("Wrote {count} usernames to {}", output.display());
            }
            Command::Whoami => {
                let name = self.run_whoami(&credentials, service).await?;
                println!("{name}");
            }
        }
        Ok(())
    }

    async fn run_collect<S: Service>(
        &self,
        config: &CollectConfig,
        credentials: &Credentials,
        service: S,
    ) -> Result<(usize, PathBuf), Error> {
        let subreddit = Subreddit::new(&config.subreddit)?;
        let output = config
            .output
            .clone()
            .unwrap_or_else(|| conf::output_path(&subreddit));

        let reddit = Reddit::login_with_service(credentials, service).await?;
        let usernames = Harvester::new(&reddit, config.harvest_options())
            .harvest(&subreddit)
            .await?;

        // Nothing touches the output file until every request has succeeded.
        let count = export::write_usernames(&output, &usernames)?;
        Ok((count, output))
    }

    async fn run_whoami<S: Service>(
        &self,
        credentials: &Credentials,
        service: S,
    ) -> Result<String, Error> {
        let reddit = Reddit::login_with_service(credentials, service).await?;
        Ok(reddit.me().await?)
    }
}

/// A fatal program error.
#[derive(Debug, Error)]
pub enum Error {
    /// Credentials could not be read.
    #[error("{0}")]
    Credentials(#[from] AuthError),

    /// A request to Reddit failed.
    #[error("{0}")]
    Reddit(#[from] client::Error),

    /// The subreddit name is not valid.
    #[error("{0}")]
    Subreddit(#[from] InvalidSubreddit),

    /// The usernames could not be written.
    #[error("Could not write usernames: {0}")]
    Export(#[from] export::Error),
}

#[cfg(test)]
mod tests {
    mod config {
        use crate::cli::{Command, Config};
        use crate::conf;
        use clap::Parser;
        use log::LevelFilter;
        use std::path::PathBuf;
        use temp_env::with_var;

        fn parse(args: &[&str]) -> Config {
            Config::try_parse_from(args).unwrap()
        }

        #[test]
        fn it_parses_a_collect_command() {
            let config = parse(&["redleads", "collect", "onlineeslteaching"]);
            let Command::Collect(collect) = config.command else {
                panic!("expected a collect command");
            };
            assert_eq!(collect.subreddit, "onlineeslteaching");
            assert_eq!(collect.limit, conf::DEFAULT_LIMIT);
            assert_eq!(collect.expand_limit, conf::DEFAULT_EXPANSION_BUDGET);
            assert_eq!(collect.output, None);
        }

        #[test]
        fn it_parses_collect_options() {
            let config = parse(&[
                "redleads", "collect", "rust", "-n", "25", "--expand-limit", "3", "-o", "out.csv",
            ]);
            let Command::Collect(collect) = config.command else {
                panic!("expected a collect command");
            };
            assert_eq!(collect.limit, 25);
            assert_eq!(collect.expand_limit, 3);
            assert_eq!(collect.output, Some(PathBuf::from("out.csv")));
        }

        #[test]
        fn it_reads_the_subreddit_from_the_environment() {
            with_var(conf::SUBREDDIT_VAR, Some("fromenv"), || {
                let config = parse(&["redleads", "collect"]);
                let Command::Collect(collect) = config.command else {
                    panic!("expected a collect command");
                };
                assert_eq!(collect.subreddit, "fromenv");
            })
        }

        #[test]
        fn it_requires_a_subreddit() {
            with_var(conf::SUBREDDIT_VAR, None::<&str>, || {
                assert!(Config::try_parse_from(["redleads", "collect"]).is_err());
            })
        }

        #[test]
        fn it_parses_a_whoami_command() {
            let config = parse(&["redleads", "whoami"]);
            assert!(matches!(config.command, Command::Whoami));
        }

        #[test]
        fn it_logs_at_info_level_by_default() {
            let config = parse(&["redleads", "whoami"]);
            assert_eq!(config.log_level_filter(), LevelFilter::Info);
        }

        #[test]
        fn it_logs_more_when_asked() {
            let config = parse(&["redleads", "-v", "whoami"]);
            assert_eq!(config.log_level_filter(), LevelFilter::Debug);
        }
    }

    mod runner {
        use crate::cli::{CollectConfig, Command, Config, Error, Runner};
        use crate::reddit::auth::AuthError;
        use crate::reddit::client;
        use crate::test_utils::{TestService, test_credentials};
        use clap::Parser;
        use pretty_assertions::assert_eq;
        use std::fs;
        use std::path::Path;
        use tempfile::tempdir;

        fn runner(subreddit: &str, output: &Path) -> Runner {
            let output = output.to_str().unwrap();
            let config =
                Config::try_parse_from(["redleads", "collect", subreddit, "--output", output])
                    .unwrap();
            Runner::new(config)
        }

        impl Runner {
            fn collect_config(&self) -> &CollectConfig {
                match &self.config.command {
                    Command::Collect(config) => config,
                    _ => panic!("expected a collect command"),
                }
            }
        }

        #[tokio::test]
        async fn it_writes_collected_usernames_to_a_file() {
            let dir = tempdir().unwrap();
            let path = dir.path().join("usernames_scenario.csv");
            let runner = runner("scenario", &path);

            let (count, output) = runner
                .run_collect(runner.collect_config(), &test_credentials(), TestService::authorized())
                .await
                .unwrap();

            assert_eq!(count, 2);
            assert_eq!(output, path);
            assert_eq!(fs::read_to_string(&path).unwrap(), "alice\r\nbob\r\n");
        }

        #[tokio::test]
        async fn it_writes_no_file_when_credentials_are_rejected() {
            let dir = tempdir().unwrap();
            let path = dir.path().join("usernames_scenario.csv");
            let runner = runner("scenario", &path);

            let err = runner
                .run_collect(runner.collect_config(), &test_credentials(), TestService::rejected())
                .await
                .unwrap_err();

            assert!(
                matches!(err, Error::Reddit(client::Error::Auth(AuthError::Rejected(_)))),
                "{err:?}"
            );
            assert!(!path.exists());
        }

        #[tokio::test]
        async fn it_leaves_an_existing_file_untouched_when_collection_fails() {
            let dir = tempdir().unwrap();
            let path = dir.path().join("usernames_broken.csv");
            fs::write(&path, "previous\r\nrun\r\n").unwrap();
            let runner = runner("broken", &path);

            let result = runner
                .run_collect(runner.collect_config(), &test_credentials(), TestService::authorized())
                .await;

            assert!(result.is_err());
            assert_eq!(fs::read_to_string(&path).unwrap(), "previous\r\nrun\r\n");
        }

        #[tokio::test]
        async fn it_validates_the_subreddit_before_logging_in() {
            let dir = tempdir().unwrap();
            let runner = runner("not/valid", &dir.path().join("out.csv"));

            let err = runner
                .run_collect(runner.collect_config(), &test_credentials(), TestService::unauthorized())
                .await
                .unwrap_err();

            assert!(matches!(err, Error::Subreddit(_)), "{err:?}");
        }

        #[tokio::test]
        async fn it_returns_the_account_name() {
            let config = Config::try_parse_from(["redleads", "whoami"]).unwrap();
            let name = Runner::new(config)
                .run_whoami(&test_credentials(), TestService::authorized())
                .await
                .unwrap();
            assert_eq!(name, "redleads_bot");
        }
    }
}
