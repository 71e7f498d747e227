//! Tests for parse, download, fetch and playlist argument handling.

use super::parse;
use crate::cli::{Cli, CliCommand};
use clap::Parser;
use std::path::Path;

#[test]
fn cli_parse_parse() {
    match parse(&["dypl", "parse", "look https://v.example.com/abc/"]).command {
        CliCommand::Parse { text, save } => {
            assert_eq!(text, "look https://v.example.com/abc/");
            assert!(save.is_none());
        }
        _ => panic!("expected Parse"),
    }
}

#[test]
fn cli_parse_parse_save() {
    match parse(&["dypl", "parse", "https://v.example.com/abc/", "--save", "item.json"]).command {
        CliCommand::Parse { save, .. } => assert_eq!(save.as_deref(), Some(Path::new("item.json"))),
        _ => panic!("expected Parse with --save"),
    }
}

#[test]
fn cli_parse_download_overrides() {
    match parse(&[
        "dypl", "download", "--details", "item.json", "--author", "B", "--title", "New",
    ])
    .command
    {
        CliCommand::Download {
            details,
            author,
            title,
        } => {
            assert_eq!(details, Path::new("item.json"));
            assert_eq!(author.as_deref(), Some("B"));
            assert_eq!(title.as_deref(), Some("New"));
        }
        _ => panic!("expected Download"),
    }
}

#[test]
fn cli_download_requires_details() {
    assert!(Cli::try_parse_from(["dypl", "download"]).is_err());
}

#[test]
fn cli_parse_fetch() {
    match parse(&["dypl", "fetch", "https://v.example.com/abc/", "--title", "T"]).command {
        CliCommand::Fetch {
            text,
            author,
            title,
        } => {
            assert_eq!(text, "https://v.example.com/abc/");
            assert!(author.is_none());
            assert_eq!(title.as_deref(), Some("T"));
        }
        _ => panic!("expected Fetch"),
    }
}

#[test]
fn cli_parse_playlist() {
    match parse(&["dypl", "playlist"]).command {
        CliCommand::Playlist => {}
        _ => panic!("expected Playlist"),
    }
}
