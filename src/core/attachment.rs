//! Attachment metadata records as stored in `attachments_*.json`

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Scheme prefix GitHub uses for files stored inside the archive
pub const ASSET_URL_PREFIX: &str = "tarball://root/";

/// A single attachment record from a migration archive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    /// Record type, always `attachment` in practice
    #[serde(rename = "type")]
    pub kind: String,

    /// Attachment URL on GitHub
    pub url: String,

    /// Owning pull request, if any
    #[serde(default)]
    pub pull_request: Option<String>,

    /// Owning issue, if any
    #[serde(default)]
    pub issue: Option<String>,

    /// Owning issue comment, if any
    #[serde(default)]
    pub issue_comment: Option<String>,

    /// Uploading user
    pub user: String,

    /// Original file name
    pub asset_name: String,

    /// MIME type of the asset
    pub asset_content_type: String,

    /// Location of the blob inside the archive
    pub asset_url: String,

    /// Upload time
    pub created_at: DateTime<FixedOffset>,
}

/// What an attachment was uploaded to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentKind {
    PullRequest,
    Issue,
    IssueComment,
}

impl ParentKind {
    /// All kinds, in resolution priority order
    pub const ALL: [ParentKind; 3] = [
        ParentKind::PullRequest,
        ParentKind::Issue,
        ParentKind::IssueComment,
    ];

    /// Plural label for human-readable output
    pub fn label(&self) -> &'static str {
        match self {
            ParentKind::PullRequest => "pull requests",
            ParentKind::Issue => "issues",
            ParentKind::IssueComment => "issue comments",
        }
    }
}

impl fmt::Display for ParentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParentKind::PullRequest => "pull_request",
            ParentKind::Issue => "issue",
            ParentKind::IssueComment => "issue_comment",
        };
        f.write_str(name)
    }
}

/// The resolved owner of an attachment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parent {
    pub kind: ParentKind,
    pub url: String,
}

impl Attachment {
    /// Resolve the owning pull request, issue or issue comment.
    ///
    /// Pull requests take priority over issues, which take priority over
    /// issue comments. Returns `None` for orphaned attachments.
    pub fn parent(&self) -> Option<Parent> {
        let candidates = [
            (ParentKind::PullRequest, &self.pull_request),
            (ParentKind::Issue, &self.issue),
            (ParentKind::IssueComment, &self.issue_comment),
        ];

        candidates.into_iter().find_map(|(kind, url)| {
            url.as_ref().map(|url| Parent {
                kind,
                url: url.clone(),
            })
        })
    }

    /// Path of the asset relative to the archive root
    pub fn relative_path(&self) -> &Path {
        Path::new(
            self.asset_url
                .strip_prefix(ASSET_URL_PREFIX)
                .unwrap_or(&self.asset_url),
        )
    }

    /// Path of the asset on disk under `root`.
    ///
    /// Returns `None` when the asset URL is absolute or climbs out of the
    /// root with `..`; such a blob is never inside the archive.
    pub fn path_in(&self, root: &Path) -> Option<PathBuf> {
        let relative = self.relative_path();
        let contained = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_) | Component::CurDir));

        contained.then(|| root.join(relative))
    }
}
