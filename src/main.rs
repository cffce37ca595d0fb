// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

use clap::Parser;
use redleads::cli::{self, Config, Runner};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = Config::parse();
    env_logger::Builder::new()
        .filter_level(config.log_level_filter())
        .init();

    if let Err(err) = Runner::new(config).run().await {
        cli::die(1, &format!("{err}"));
    }
}
