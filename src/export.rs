// SPDX-License-Identifier: Apache-2.0
// Copyright (C) 2025 Michael Dippery <michael@monkey-robot.com>

//! Writes usernames to CSV files.

use csv::{Terminator, WriterBuilder};
use log::info;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;
use thiserror::Error;

/// Writes one username per record to the file at `path`, replacing any
/// existing content.
///
/// The file has a single column and no header row. Returns the number of
/// usernames written.
pub fn write_usernames<I, T>(path: impl AsRef<Path>, usernames: I) -> Result<usize, Error>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let path = path.as_ref();
    let file = File::create(path)?;
    let count = write_records(file, usernames)?;
    info!("Wrote {count} usernames to {}", path.display());
    Ok(count)
}

/// Writes one username per record to `writer` and flushes it.
pub fn write_records<W, I, T>(writer: W, usernames: I) -> Result<usize, Error>
where
    W: Write,
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::CRLF)
        .from_writer(writer);

    let mut count = 0;
    for username in usernames {
        writer.write_record([username.as_ref()])?;
        count += 1;
    }
    writer.flush()?;
    Ok(count)
}

/// An error writing usernames.
#[derive(Debug, Error)]
pub enum Error {
    /// The output file could not be created or written.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A record could not be encoded.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn to_string(usernames: &[&str]) -> String {
        let mut buf = vec![];
        write_records(&mut buf, usernames).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn it_writes_one_username_per_line() {
        assert_eq!(to_string(&["alice", "bob"]), "alice\r\nbob\r\n");
    }

    #[test]
    fn it_writes_nothing_for_no_usernames() {
        assert_eq!(to_string(&[]), "");
    }

    #[test]
    fn it_quotes_fields_only_when_needed() {
        assert_eq!(to_string(&["plain", "with,comma"]), "plain\r\n\"with,comma\"\r\n");
    }

    #[test]
    fn it_returns_the_number_of_usernames_written() {
        let mut buf = vec![];
        let count = write_records(&mut buf, ["a", "b", "c"]).unwrap();
        assert_eq!(count, 3);
    }

    #[test]
    fn it_writes_a_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("usernames_test.csv");
        write_usernames(&path, vec![String::from("alice"), String::from("bob")]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "alice\r\nbob\r\n");
    }

    #[test]
    fn it_overwrites_an_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("usernames_test.csv");
        fs::write(&path, "mallory\r\ntrent\r\nvictor\r\n").unwrap();
        write_usernames(&path, ["alice"]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "alice\r\n");
    }

    #[test]
    fn it_fails_when_the_file_cannot_be_created() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("no/such/dir/usernames.csv");
        let err = write_usernames(&path, ["alice"]).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
