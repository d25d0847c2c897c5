//! Operator-facing text for status checks and runs.

use crate::locator::ResolvedBase;
use crate::ops::{OperationResult, TargetState};
use crate::status::ExistenceReport;
use std::io::{self, Write};

const RULE: &str = "==========================================================";

/// Banner printed at the top of every command.
pub fn banner(title: &str, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{RULE}\n{title}\n{RULE}")
}

pub fn detected(base: &ResolvedBase, out: &mut dyn Write) -> io::Result<()> {
    writeln!(
        out,
        "Database: {} (version {}, via {})",
        base.path().display(),
        base.version(),
        base.source()
    )
}

pub fn render_status(report: &ExistenceReport, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "\nLicence files:\n")?;

    for entry in &report.entries {
        match (entry.present, entry.children) {
            (true, Some(n)) => writeln!(out, "  [present] {} ({} files)", entry.description, n)?,
            (true, None) => writeln!(out, "  [present] {}", entry.description)?,
            (false, Some(_)) => writeln!(out, "  [ok] {} (empty)", entry.description)?,
            (false, None) => writeln!(out, "  [ok] {} (removed)", entry.description)?,
        }
    }

    if report.leftovers.is_empty() {
        writeln!(out, "  [ok] {} (removed)", report.scan_description)?;
    } else {
        writeln!(
            out,
            "  [present] {} ({} files)",
            report.scan_description,
            report.leftovers.len()
        )?;
    }

    writeln!(out, "\n{RULE}")?;
    writeln!(
        out,
        "Licence files: {} present / {} removed",
        report.present_count(),
        report.cleared_count()
    )?;
    if report.is_applied() {
        writeln!(out, "Real names are applied.")?;
    } else {
        writeln!(out, "Real names are NOT applied. Run: fm24-real --apply")?;
    }
    writeln!(out, "{RULE}")
}

/// Per-target lines followed by the summary counters.
pub fn render_run(result: &OperationResult, out: &mut dyn Write) -> io::Result<()> {
    for target in &result.targets {
        match &target.state {
            TargetState::Absent => writeln!(out, "  - {}: not found", target.description)?,
            TargetState::Unreadable(e) => {
                writeln!(out, "  ! {}: cannot be listed: {}", target.description, e)?
            }
            TargetState::Processed(items) => {
                let failed: Vec<_> = items.iter().filter(|i| !i.removed).collect();
                if failed.is_empty() {
                    writeln!(out, "  + {}: {} removed", target.description, items.len())?;
                } else {
                    writeln!(
                        out,
                        "  ! {}: {} removed, {} failed",
                        target.description,
                        items.len() - failed.len(),
                        failed.len()
                    )?;
                    for item in failed {
                        writeln!(
                            out,
                            "      {}: {}",
                            item.path.display(),
                            item.error.as_deref().unwrap_or("unknown error")
                        )?;
                    }
                }
            }
        }
    }

    writeln!(out)?;
    render_summary(result, out)
}

pub fn render_summary(result: &OperationResult, out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "Targets:          {}", result.total())?;
    writeln!(out, "Deleted:          {}", result.deleted())?;
    writeln!(out, "Already absent:   {}", result.absent())?;
    writeln!(out, "Failed:           {}", result.failed())?;
    if result.backup_failures() > 0 {
        writeln!(out, "Backup failures:  {}", result.backup_failures())?;
    }
    writeln!(out, "Backup location:  {}", result.backup_dir.display())?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "Restart the game to pick up the change.")?;
    writeln!(
        out,
        "Game updates may restore these files; run 'fm24-real --update' if they do."
    )
}
