//! Test utilities: build throwaway migration archives on disk

#![allow(dead_code)]

use gh_attachments::{Archive, ScanOptions, ScanReport, Scanner};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const PR_URL: &str = "https://github.com/caffeinesoftware/rewardnights/pull/337";
pub const ISSUE_URL: &str = "https://github.com/caffeinesoftware/rewardnights/issues/12";
pub const COMMENT_URL: &str =
    "https://github.com/caffeinesoftware/website/issues/3#issuecomment-1001";

/// Which field links an attachment to its parent
#[derive(Debug, Clone, Copy)]
pub enum Link<'a> {
    PullRequest(&'a str),
    Issue(&'a str),
    IssueComment(&'a str),
    Orphan,
}

/// An extracted archive living in a temporary directory
pub struct ArchiveFixture {
    dir: TempDir,
}

impl ArchiveFixture {
    /// Empty archive with an `attachments/` directory and no metadata yet
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        fs::create_dir(dir.path().join("attachments")).expect("create attachments dir");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Write a blob of `size` bytes at `attachments/<relative>`
    pub fn add_blob(&self, relative: &str, size: usize) -> PathBuf {
        let path = self.root().join("attachments").join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create blob dir");
        }
        fs::write(&path, vec![b'x'; size]).expect("write blob");
        path
    }

    /// Write `attachments_<index>.json` with the given records
    pub fn write_metadata(&self, index: usize, records: &[Value]) -> PathBuf {
        let path = self.root().join(format!("attachments_{:06}.json", index));
        let content = serde_json::to_string_pretty(records).expect("serialize records");
        fs::write(&path, content).expect("write metadata");
        path
    }

    /// Write a raw metadata file
    pub fn write_raw_metadata(&self, index: usize, content: &str) -> PathBuf {
        let path = self.root().join(format!("attachments_{:06}.json", index));
        fs::write(&path, content).expect("write metadata");
        path
    }

    pub fn open(&self) -> Archive {
        Archive::open(self.root()).expect("fixture should be a valid archive")
    }

    pub fn scan(&self, options: ScanOptions) -> ScanReport {
        Scanner::new(options)
            .scan(&self.open())
            .expect("scan should succeed")
    }
}

/// A metadata record for a blob stored at `attachments/<blob>`
pub fn record(asset_name: &str, blob: &str, link: Link<'_>) -> Value {
    let mut value = json!({
        "type": "attachment",
        "url": format!("https://github.com/caffeinesoftware/rewardnights/files/1/{}", asset_name),
        "user": "https://github.com/octocat",
        "asset_name": asset_name,
        "asset_content_type": "image/jpeg",
        "asset_url": format!("tarball://root/attachments/{}", blob),
        "created_at": "2021-05-05T10:12:13.000+01:00",
    });

    let field = match link {
        Link::PullRequest(url) => Some(("pull_request", url)),
        Link::Issue(url) => Some(("issue", url)),
        Link::IssueComment(url) => Some(("issue_comment", url)),
        Link::Orphan => None,
    };
    if let Some((field, url)) = field {
        value[field] = json!(url);
    }
    value
}

/// Assert the listing lines of a report
pub fn assert_listing(report: &ScanReport, expected: &[&str]) {
    let lines = gh_attachments::core::listing_lines(report);
    assert_eq!(lines, expected, "unexpected listing");
}

/// Assert the asset names of listed attachments, in order
pub fn assert_order(report: &ScanReport, expected: &[&str]) {
    let names: Vec<&str> = report
        .entries
        .iter()
        .map(|e| e.attachment.asset_name.as_str())
        .collect();
    assert_eq!(names, expected, "unexpected order");
}
