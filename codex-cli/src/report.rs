//! Human and machine rendering of a plan and its outcome.
//!
//! Rendering only reads; nothing here can change a classification or a count.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use codex_core::{DiffEntry, SyncCounts};
use codex_sync::{ExecutionOutcome, SyncPlan};

// ---------------------------------------------------------------------------
// Preview
// ---------------------------------------------------------------------------

/// List every diff entry with a one-character marker.
pub fn render_preview(
    out: &mut impl Write,
    plan: &SyncPlan,
    delete_removed: bool,
    dry_run: bool,
) -> io::Result<()> {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let counts = plan.partition.counts();
    writeln!(
        out,
        "{prefix}{} local files, {} remote files: {} to add, {} to update, {} to delete, {} unchanged",
        plan.local.len(),
        plan.remote.records.len(),
        counts.to_add,
        counts.to_update,
        counts.to_delete,
        counts.unchanged,
    )?;

    for entry in &plan.partition.entries {
        match entry {
            DiffEntry::ToAdd { identifier, .. } => {
                writeln!(out, "  {}  {identifier}", "+".green().bold())?;
            }
            DiffEntry::ToUpdate {
                identifier,
                local_modified_at,
                remote_modified_at,
                ..
            } => {
                writeln!(
                    out,
                    "  {}  {identifier} (local {} > remote {})",
                    "~".yellow().bold(),
                    format_time(local_modified_at.as_ref()),
                    format_time(remote_modified_at.as_ref()),
                )?;
            }
            DiffEntry::ToDelete { identifier, .. } if delete_removed => {
                writeln!(out, "  {}  {identifier}", "-".red().bold())?;
            }
            DiffEntry::ToDelete { identifier, .. } => {
                writeln!(
                    out,
                    "  {}  {identifier} {}",
                    "-".bright_black(),
                    "(would delete; deletion disabled)".bright_black()
                )?;
            }
            DiffEntry::Unchanged { identifier, .. } => {
                writeln!(out, "  {}  {}", "·".bright_black(), identifier.bright_black())?;
            }
        }
    }

    if plan.remote.skipped() > 0 {
        writeln!(
            out,
            "{} skipped {} remote record(s): {} malformed, {} corrupted title",
            "!".yellow(),
            plan.remote.skipped(),
            plan.remote.malformed,
            plan.remote.corrupted,
        )?;
    }
    if !plan.partition.shadowed.is_empty() {
        writeln!(
            out,
            "{} ignored {} remote record(s) sharing a title with another record",
            "!".yellow(),
            plan.partition.shadowed.len(),
        )?;
    }
    for collision in &plan.local.collisions {
        writeln!(
            out,
            "{} '{}' exists more than once; using {}",
            "!".yellow(),
            collision.identifier,
            collision.kept.display(),
        )?;
    }
    Ok(())
}

fn format_time(ts: Option<&DateTime<Utc>>) -> String {
    ts.map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Tabled)]
struct CountRow {
    #[tabled(rename = "result")]
    label: &'static str,
    #[tabled(rename = "files")]
    count: usize,
}

/// Final counts as a table, followed by any failed items.
pub fn render_summary(
    out: &mut impl Write,
    outcome: &ExecutionOutcome,
    delete_removed: bool,
) -> io::Result<()> {
    if outcome.dry_run {
        writeln!(out, "[dry-run] no remote changes made")?;
    } else if outcome.is_success() {
        writeln!(out, "{} sync complete", "✓".green().bold())?;
    } else {
        writeln!(
            out,
            "{} sync finished with {} error(s)",
            "✗".red().bold(),
            outcome.errors()
        )?;
    }

    let counts = outcome.counts;
    let mut rows = vec![
        CountRow {
            label: "added",
            count: counts.files_added,
        },
        CountRow {
            label: "updated",
            count: counts.files_updated,
        },
        CountRow {
            label: "deleted",
            count: counts.files_deleted,
        },
        CountRow {
            label: "unchanged",
            count: counts.files_unchanged,
        },
    ];
    if !delete_removed && outcome.skipped_deletes > 0 {
        rows.push(CountRow {
            label: "kept (deletion disabled)",
            count: outcome.skipped_deletes,
        });
    }
    rows.push(CountRow {
        label: "errors",
        count: outcome.errors(),
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    writeln!(out, "{table}")?;

    for failure in &outcome.failures {
        writeln!(
            out,
            "  {}  {} {}: {}",
            "✗".red(),
            failure.action,
            failure.identifier,
            failure.message
        )?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Structured output
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct OutcomeJson<'a> {
    #[serde(flatten)]
    counts: SyncCounts,
    errors: usize,
    dry_run: bool,
    failures: Vec<FailureJson<'a>>,
}

#[derive(Serialize)]
struct FailureJson<'a> {
    identifier: &'a str,
    action: String,
    message: &'a str,
}

#[derive(Serialize)]
struct PlanJson<'a> {
    to_add: Vec<&'a str>,
    to_update: Vec<&'a str>,
    to_delete: Vec<&'a str>,
    unchanged: Vec<&'a str>,
    skipped_malformed: usize,
    skipped_corrupted: usize,
}

pub fn render_outcome_json(out: &mut impl Write, outcome: &ExecutionOutcome) -> io::Result<()> {
    let payload = OutcomeJson {
        counts: outcome.counts,
        errors: outcome.errors(),
        dry_run: outcome.dry_run,
        failures: outcome
            .failures
            .iter()
            .map(|f| FailureJson {
                identifier: &f.identifier,
                action: f.action.to_string(),
                message: &f.message,
            })
            .collect(),
    };
    serde_json::to_writer_pretty(&mut *out, &payload)?;
    writeln!(out)
}

pub fn render_plan_json(out: &mut impl Write, plan: &SyncPlan) -> io::Result<()> {
    let p = &plan.partition;
    let payload = PlanJson {
        to_add: p.to_add().map(DiffEntry::identifier).collect(),
        to_update: p.to_update().map(DiffEntry::identifier).collect(),
        to_delete: p.to_delete().map(DiffEntry::identifier).collect(),
        unchanged: p.unchanged().map(DiffEntry::identifier).collect(),
        skipped_malformed: plan.remote.malformed,
        skipped_corrupted: plan.remote.corrupted,
    };
    serde_json::to_writer_pretty(&mut *out, &payload)?;
    writeln!(out)
}

/// Append `name=value` lines for the four counts to a step-output file.
pub fn write_step_outputs(path: &Path, counts: &SyncCounts) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    for (name, value) in counts.as_pairs() {
        writeln!(file, "{name}={value}")?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use codex_core::{ContentId, LocalRecord, RemoteRecord};
    use codex_sync::{
        Action, DiffPartition, ItemFailure, LocalInventory, RemoteInventory,
    };
    use tempfile::TempDir;

    use super::*;

    fn plan() -> SyncPlan {
        let mut local = LocalInventory::default();
        local.records.insert(
            "a.md".into(),
            LocalRecord {
                identifier: "a.md".into(),
                path: PathBuf::from("/docs/a.md"),
                modified_at: None,
            },
        );
        let remote = RemoteInventory {
            records: vec![RemoteRecord {
                content_id: ContentId::from("r1"),
                title: "old.md".into(),
                modified_at: None,
            }],
            malformed: 1,
            corrupted: 2,
        };
        let partition = DiffPartition {
            entries: vec![
                DiffEntry::ToAdd {
                    identifier: "a.md".into(),
                    path: PathBuf::from("/docs/a.md"),
                    local_modified_at: None,
                },
                DiffEntry::ToDelete {
                    identifier: "old.md".into(),
                    remote_id: ContentId::from("r1"),
                },
            ],
            shadowed: vec![],
        };
        SyncPlan {
            local,
            remote,
            partition,
        }
    }

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        colored::control::set_override(false);
        let mut buf = Vec::new();
        f(&mut buf).expect("render");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn preview_lists_entries_and_skips() {
        let text = render(|out| render_preview(out, &plan(), true, false));
        assert!(text.contains("1 to add, 0 to update, 1 to delete, 0 unchanged"));
        assert!(text.contains("+  a.md"));
        assert!(text.contains("-  old.md"));
        assert!(text.contains("skipped 3 remote record(s): 1 malformed, 2 corrupted title"));
    }

    #[test]
    fn preview_marks_kept_files_when_deletion_disabled() {
        let text = render(|out| render_preview(out, &plan(), false, true));
        assert!(text.starts_with("[dry-run] "));
        assert!(text.contains("old.md (would delete; deletion disabled)"));
    }

    #[test]
    fn summary_reports_failures() {
        let outcome = ExecutionOutcome {
            counts: SyncCounts {
                files_added: 2,
                ..SyncCounts::default()
            },
            failures: vec![ItemFailure {
                identifier: "big.pdf".into(),
                action: Action::Add,
                message: "HTTP 413: too large".into(),
            }],
            skipped_deletes: 0,
            dry_run: false,
        };
        let text = render(|out| render_summary(out, &outcome, true));
        assert!(text.contains("sync finished with 1 error(s)"));
        assert!(text.contains("added"));
        assert!(text.contains("add big.pdf: HTTP 413: too large"));
    }

    #[test]
    fn outcome_json_flattens_counts() {
        let outcome = ExecutionOutcome {
            counts: SyncCounts {
                files_updated: 3,
                ..SyncCounts::default()
            },
            ..ExecutionOutcome::default()
        };
        let text = render(|out| render_outcome_json(out, &outcome));
        let value: serde_json::Value = serde_json::from_str(&text).expect("json");
        assert_eq!(value["files_updated"], 3);
        assert_eq!(value["errors"], 0);
    }

    #[test]
    fn plan_json_groups_identifiers() {
        let text = render(|out| render_plan_json(out, &plan()));
        let value: serde_json::Value = serde_json::from_str(&text).expect("json");
        assert_eq!(value["to_add"][0], "a.md");
        assert_eq!(value["to_delete"][0], "old.md");
        assert_eq!(value["skipped_corrupted"], 2);
    }

    #[test]
    fn step_outputs_are_appended() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("github_output");
        std::fs::write(&path, "existing=1\n").expect("seed");

        let counts = SyncCounts {
            files_added: 1,
            files_updated: 0,
            files_deleted: 4,
            files_unchanged: 9,
        };
        write_step_outputs(&path, &counts).expect("write");

        let text = std::fs::read_to_string(&path).expect("read");
        assert_eq!(
            text,
            "existing=1\nfiles_added=1\nfiles_updated=0\nfiles_deleted=4\nfiles_unchanged=9\n"
        );
    }
}
