//! Scan results and their renderings

use crate::core::size::format_size;
use crate::core::{Attachment, Parent, ParentKind};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Bucket for parent URLs that don't look like GitHub issue/PR links
pub const UNKNOWN_REPOSITORY: &str = "(unknown)";

/// An attachment whose blob was found on disk
#[derive(Debug, Clone, PartialEq)]
pub struct SizedAttachment {
    pub attachment: Attachment,
    pub parent: Parent,
    pub path: PathBuf,
    pub size: u64,
}

/// An attachment whose blob is listed in the metadata but absent from disk
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MissingAsset {
    pub asset_name: String,
    pub path: PathBuf,
}

/// Outcome of scanning an archive
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Number of metadata files read
    pub metadata_files: usize,

    /// Number of records found across all metadata files
    pub total_records: usize,

    /// Listed attachments, largest first
    pub entries: Vec<SizedAttachment>,

    /// Attachments with no pull request, issue or issue comment
    pub orphans: Vec<Attachment>,

    /// Blobs that could not be found
    pub missing: Vec<MissingAsset>,
}

/// Serializable view of a listed attachment
#[derive(Debug, Serialize)]
pub struct ListingEntry<'a> {
    pub asset_name: &'a str,
    pub parent_kind: ParentKind,
    pub parent_url: &'a str,
    pub path: &'a PathBuf,
    pub size: u64,
    pub size_display: String,
    pub content_type: &'a str,
    pub created_at: String,
}

impl<'a> From<&'a SizedAttachment> for ListingEntry<'a> {
    fn from(entry: &'a SizedAttachment) -> Self {
        Self {
            asset_name: &entry.attachment.asset_name,
            parent_kind: entry.parent.kind,
            parent_url: &entry.parent.url,
            path: &entry.path,
            size: entry.size,
            size_display: format_size(entry.size),
            content_type: &entry.attachment.asset_content_type,
            created_at: entry.attachment.created_at.to_rfc3339(),
        }
    }
}

/// Render one line per listed attachment: `<name> (<parent>) - <size>`
pub fn listing_lines(report: &ScanReport) -> Vec<String> {
    report
        .entries
        .iter()
        .map(|entry| {
            format!(
                "{} ({}) - {}",
                entry.attachment.asset_name,
                entry.parent.url,
                format_size(entry.size)
            )
        })
        .collect()
}

/// Structured listing for JSON output
pub fn listing_entries(report: &ScanReport) -> Vec<ListingEntry<'_>> {
    report.entries.iter().map(ListingEntry::from).collect()
}

/// Count and byte total for one parent kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KindTotal {
    pub kind: ParentKind,
    pub count: usize,
    pub bytes: u64,
}

/// Count and byte total for one repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryTotal {
    pub repository: String,
    pub count: usize,
    pub bytes: u64,
}

/// Aggregate view of a scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub listed: usize,
    pub total_bytes: u64,
    pub by_kind: Vec<KindTotal>,
    pub by_repository: Vec<RepositoryTotal>,
    pub orphans: usize,
    pub missing: usize,
}

impl Summary {
    pub fn from_report(report: &ScanReport) -> Self {
        let by_kind = ParentKind::ALL
            .iter()
            .map(|kind| {
                let matching = report.entries.iter().filter(|e| e.parent.kind == *kind);
                KindTotal {
                    kind: *kind,
                    count: matching.clone().count(),
                    bytes: matching.map(|e| e.size).sum(),
                }
            })
            .collect();

        let mut repositories: BTreeMap<String, (usize, u64)> = BTreeMap::new();
        for entry in &report.entries {
            let name = repository_of(&entry.parent.url)
                .unwrap_or_else(|| UNKNOWN_REPOSITORY.to_string());
            let totals = repositories.entry(name).or_insert((0, 0));
            totals.0 += 1;
            totals.1 += entry.size;
        }

        let mut by_repository: Vec<RepositoryTotal> = repositories
            .into_iter()
            .map(|(repository, (count, bytes))| RepositoryTotal {
                repository,
                count,
                bytes,
            })
            .collect();
        by_repository.sort_by(|a, b| {
            b.bytes
                .cmp(&a.bytes)
                .then_with(|| a.repository.cmp(&b.repository))
        });

        Self {
            listed: report.entries.len(),
            total_bytes: report.entries.iter().map(|e| e.size).sum(),
            by_kind,
            by_repository,
            orphans: report.orphans.len(),
            missing: report.missing.len(),
        }
    }
}

fn repository_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^https?://[^/]+/([^/]+)/([^/]+)/(?:pull|issues)/\d+")
            .expect("repository pattern is valid")
    })
}

/// Extract `owner/name` from a pull request, issue or issue comment URL
pub fn repository_of(url: &str) -> Option<String> {
    repository_pattern()
        .captures(url)
        .map(|caps| format!("{}/{}", &caps[1], &caps[2]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn entry(name: &str, parent: Parent, size: u64) -> SizedAttachment {
        SizedAttachment {
            attachment: Attachment {
                kind: "attachment".to_string(),
                url: format!("https://github.com/files/{}", name),
                pull_request: None,
                issue: None,
                issue_comment: None,
                user: "https://github.com/octocat".to_string(),
                asset_name: name.to_string(),
                asset_content_type: "image/png".to_string(),
                asset_url: format!("tarball://root/attachments/{}", name),
                created_at: DateTime::parse_from_rfc3339("2022-01-02T03:04:05+00:00").unwrap(),
            },
            parent,
            path: PathBuf::from(format!("attachments/{}", name)),
            size,
        }
    }

    fn pr(url: &str) -> Parent {
        Parent {
            kind: ParentKind::PullRequest,
            url: url.to_string(),
        }
    }

    fn issue(url: &str) -> Parent {
        Parent {
            kind: ParentKind::Issue,
            url: url.to_string(),
        }
    }

    #[test]
    fn test_listing_line_format() {
        let report = ScanReport {
            entries: vec![entry(
                "photo.jpg",
                pr("https://github.com/octo/app/pull/337"),
                144_100,
            )],
            ..Default::default()
        };

        assert_eq!(
            listing_lines(&report),
            vec!["photo.jpg (https://github.com/octo/app/pull/337) - 144.1 KB"]
        );
    }

    #[test]
    fn test_listing_entries_carry_structured_fields() {
        let report = ScanReport {
            entries: vec![entry("a.png", issue("https://github.com/octo/app/issues/4"), 2_500_000)],
            ..Default::default()
        };

        let entries = listing_entries(&report);
        let json = serde_json::to_value(&entries).unwrap();
        assert_eq!(json[0]["asset_name"], "a.png");
        assert_eq!(json[0]["parent_kind"], "issue");
        assert_eq!(json[0]["size"], 2_500_000);
        assert_eq!(json[0]["size_display"], "2.5 MB");
        assert_eq!(json[0]["created_at"], "2022-01-02T03:04:05+00:00");
    }

    #[test]
    fn test_repository_of() {
        assert_eq!(
            repository_of("https://github.com/octo/app/pull/337"),
            Some("octo/app".to_string())
        );
        assert_eq!(
            repository_of("https://github.com/octo/app/issues/1#issuecomment-42"),
            Some("octo/app".to_string())
        );
        assert_eq!(repository_of("not a url"), None);
    }

    #[test]
    fn test_summary_totals() {
        let report = ScanReport {
            entries: vec![
                entry("a", pr("https://github.com/octo/app/pull/1"), 300),
                entry("b", issue("https://github.com/octo/lib/issues/2"), 500),
                entry("c", pr("https://github.com/octo/app/pull/3"), 100),
                entry("d", pr("weird://elsewhere"), 50),
            ],
            ..Default::default()
        };

        let summary = Summary::from_report(&report);
        assert_eq!(summary.listed, 4);
        assert_eq!(summary.total_bytes, 950);
        assert_eq!(
            summary.by_kind,
            vec![
                KindTotal { kind: ParentKind::PullRequest, count: 3, bytes: 450 },
                KindTotal { kind: ParentKind::Issue, count: 1, bytes: 500 },
                KindTotal { kind: ParentKind::IssueComment, count: 0, bytes: 0 },
            ]
        );
        let repos: Vec<(&str, usize, u64)> = summary
            .by_repository
            .iter()
            .map(|r| (r.repository.as_str(), r.count, r.bytes))
            .collect();
        assert_eq!(
            repos,
            vec![("octo/lib", 1, 500), ("octo/app", 2, 400), (UNKNOWN_REPOSITORY, 1, 50)]
        );
        assert_eq!(summary.orphans, 0);
        assert_eq!(summary.missing, 0);
    }

    #[test]
    fn test_empty_summary() {
        let summary = Summary::from_report(&ScanReport::default());
        assert_eq!(summary.listed, 0);
        assert_eq!(summary.total_bytes, 0);
        assert!(summary.by_repository.is_empty());
        assert!(summary.by_kind.iter().all(|k| k.count == 0));
    }
}
