//! The check, apply, update and init commands.
//!
//! Each flow resolves the database directory once and threads the
//! [`ResolvedBase`] through the later steps. Output goes to the supplied
//! writer and confirmations come from a [`Prompt`], so the flows run the
//! same way from the binary and from tests.

use crate::backup::BackupDestination;
use crate::config::Config;
use crate::locator::{Locator, ResolvedBase};
use crate::manifest::{PatternScan, TargetEntry, DEFAULT_MANIFEST};
use crate::ops::{self, OperationResult};
use crate::report;
use crate::status::{self, ExistenceReport};
use crate::utils::errors::{Result, ToolError};
use std::io::{self, BufRead, Write};
use std::path::Path;

/// The command to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Init,
    Check,
    Apply,
    Update,
}

impl Action {
    /// Pick one action from the command-line flags.
    ///
    /// `init` wins over everything, then check > apply > update.
    pub fn select(init: bool, check: bool, apply: bool, update: bool) -> Option<Self> {
        if init {
            Some(Action::Init)
        } else if check {
            Some(Action::Check)
        } else if apply {
            Some(Action::Apply)
        } else if update {
            Some(Action::Update)
        } else {
            None
        }
    }
}

/// Yes/no questions asked before destructive steps.
pub trait Prompt {
    fn confirm(&mut self, question: &str) -> io::Result<bool>;
}

/// Asks on stdout and reads the answer from stdin. Only `y`/`Y` confirms.
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let mut stdout = io::stdout();
        write!(stdout, "{} (y/n): ", question)?;
        stdout.flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(matches!(answer.trim(), "y" | "Y"))
    }
}

/// Confirms everything (`--yes`).
pub struct AssumeYes;

impl Prompt for AssumeYes {
    fn confirm(&mut self, _question: &str) -> io::Result<bool> {
        Ok(true)
    }
}

/// Inputs shared by check, apply and update.
pub struct Context<'a> {
    pub config: &'a Config,
    pub locator: Locator,
    pub override_path: Option<&'a Path>,
    pub manifest: &'a [TargetEntry],
    pub scan: PatternScan,
}

impl<'a> Context<'a> {
    /// Default manifest and pattern scan on the running system.
    pub fn new(config: &'a Config, override_path: Option<&'a Path>) -> Self {
        Self {
            config,
            locator: Locator::for_current_system(),
            override_path,
            manifest: &DEFAULT_MANIFEST,
            scan: PatternScan::default(),
        }
    }

    fn resolve(&self, out: &mut dyn Write) -> Result<ResolvedBase> {
        let base = self
            .locator
            .resolve(&self.config.install_paths, self.override_path)?;
        report::detected(&base, out)?;
        Ok(base)
    }

    fn status(&self, base: &ResolvedBase, out: &mut dyn Write) -> Result<ExistenceReport> {
        let existence = status::inspect(base, self.manifest, &self.scan)?;
        report::render_status(&existence, out)?;
        Ok(existence)
    }

    /// Create the backup folder and remove every target.
    fn execute(&self, base: &ResolvedBase, out: &mut dyn Write) -> Result<OperationResult> {
        let backup = BackupDestination::create_now(&self.config.backup_root())?;
        writeln!(out, "\nBackup directory: {}", backup.dir().display())?;
        writeln!(out, "\nRemoving licence files...\n")?;

        let result = ops::run(base, self.manifest, &self.scan, &backup);
        report::render_run(&result, out)?;
        Ok(result)
    }

    fn ensure_backups_enabled(&self) -> Result<()> {
        if self.config.backup.enabled {
            Ok(())
        } else {
            Err(ToolError::BackupDisabled)
        }
    }
}

/// Show which licence files are still present.
pub fn check(ctx: &Context<'_>, out: &mut dyn Write) -> Result<ExistenceReport> {
    report::banner("FM24 real-name status", out)?;
    let base = ctx.resolve(out)?;
    ctx.status(&base, out)
}

/// Back up and remove the licence files after confirmation.
///
/// Returns `None` when the operator declines.
pub fn apply(
    ctx: &Context<'_>,
    out: &mut dyn Write,
    prompt: &mut dyn Prompt,
) -> Result<Option<OperationResult>> {
    report::banner("FM24 real-name apply", out)?;
    let base = ctx.resolve(out)?;
    ctx.ensure_backups_enabled()?;

    writeln!(out, "\nWarning: the licence files listed above will be deleted.")?;
    writeln!(out, "A backup is made first, but you run this at your own risk.")?;
    if !prompt.confirm("Continue?")? {
        writeln!(out, "Cancelled.")?;
        return Ok(None);
    }

    ctx.execute(&base, out).map(Some)
}

/// Re-apply after a game update restored some files.
///
/// Shows the current status first and asks once before removing anything.
pub fn update(
    ctx: &Context<'_>,
    out: &mut dyn Write,
    prompt: &mut dyn Prompt,
) -> Result<Option<OperationResult>> {
    report::banner("FM24 real-name update (re-apply)", out)?;
    writeln!(out, "Use this when a game update has restored the licence files.\n")?;

    let base = ctx.resolve(out)?;
    ctx.status(&base, out)?;
    ctx.ensure_backups_enabled()?;

    if !prompt.confirm("\nRe-apply real names?")? {
        writeln!(out, "Cancelled.")?;
        return Ok(None);
    }

    ctx.execute(&base, out).map(Some)
}

/// Write the default config to `path`, asking before overwriting.
///
/// Returns whether the file was written.
pub fn init(path: &Path, out: &mut dyn Write, prompt: &mut dyn Prompt) -> Result<bool> {
    if path.exists() {
        writeln!(out, "Config file already exists: {}", path.display())?;
        if !prompt.confirm("Overwrite?")? {
            writeln!(out, "Cancelled.")?;
            return Ok(false);
        }
    }

    Config::default().save(path)?;
    writeln!(out, "Wrote default config: {}", path.display())?;
    Ok(true)
}
