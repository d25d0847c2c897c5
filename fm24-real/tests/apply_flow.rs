//! End-to-end runs of the check/apply/update flows against a fake install.

use fm24_real::cli::{self, AssumeYes, Context, Prompt};
use fm24_real::config::{BackupConfig, Config, InstallPath, LogConfig};
use fm24_real::fs::walker::walk_tree;
use fm24_real::locator::Locator;
use fm24_real::manifest::{PatternScan, DEFAULT_MANIFEST};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

struct Decline;

impl Prompt for Decline {
    fn confirm(&mut self, _question: &str) -> io::Result<bool> {
        Ok(false)
    }
}

struct Install {
    _root: TempDir,
    backups: TempDir,
    db: PathBuf,
    version_dir: PathBuf,
}

/// `<tmp>/Football Manager 2024/data/database/db/{2400,2430}` with every
/// licence file present in 2430.
fn fake_install() -> io::Result<Install> {
    let root = TempDir::new()?;
    let db = root.path().join("Football Manager 2024/data/database/db");
    fs::create_dir_all(db.join("2400"))?;
    let version_dir = db.join("2430");

    let files = [
        "lnc/all/clubs.lnc",
        "lnc/all/comps.lnc",
        "lnc/all/people/players.lnc",
        "lnc/greek/greek.lnc",
        "edt/permanent/fake.edt",
        "dbc/permanent/brazil_kits.dbc",
        "dbc/permanent/forbidden names.dbc",
        "dbc/permanent/license.dbc",
        "dbc/permanent/j league non player.dbc",
        "dbc/permanent/1_japan_removed_clubs.dbc",
        "dbc/permanent/japan_a.dbc",
        "dbc/permanent/japanese.txt",
        "dbc/permanent/other.dbc",
        "language/Licensing2.dbc",
        "language/Licensing2_chn.dbc",
    ];
    for file in files {
        let path = version_dir.join(file);
        fs::create_dir_all(path.parent().unwrap())?;
        fs::write(&path, file)?;
    }

    Ok(Install {
        _root: root,
        backups: TempDir::new()?,
        db,
        version_dir,
    })
}

fn config_for(install: &Install) -> Config {
    Config {
        install_paths: vec![
            InstallPath {
                name: "elsewhere".to_string(),
                path: PathBuf::from("/definitely/not/here"),
                platform: "linux".to_string(),
                description: String::new(),
            },
            InstallPath {
                name: "fake".to_string(),
                path: install.db.clone(),
                platform: "linux".to_string(),
                description: "Test install".to_string(),
            },
        ],
        backup: BackupConfig {
            enabled: true,
            directory: Some(install.backups.path().to_path_buf()),
        },
        log: LogConfig::default(),
    }
}

fn context<'a>(config: &'a Config, home: &Path) -> Context<'a> {
    Context {
        config,
        locator: Locator::new("linux", home),
        override_path: None,
        manifest: &DEFAULT_MANIFEST,
        scan: PatternScan::default(),
    }
}

#[test]
fn apply_backs_up_then_removes_everything() -> fm24_real::Result<()> {
    let install = fake_install()?;
    let config = config_for(&install);
    let ctx = context(&config, install.backups.path());
    let mut out = Vec::new();

    let before = cli::check(&ctx, &mut out)?;
    assert_eq!(before.present_count(), 12);

    let result = cli::apply(&ctx, &mut out, &mut AssumeYes)?.expect("confirmed run");

    // 10 manifest entries plus japan_a.dbc and japanese.txt
    assert_eq!(result.total(), 12);
    // 3 children of lnc/all, 1 of lnc/greek, 8 single files, 2 matches
    assert_eq!(result.deleted(), 14);
    assert_eq!(result.failed(), 0);
    assert_eq!(result.absent(), 0);
    assert_eq!(result.backup_failures(), 0);

    assert!(result.backup_dir.starts_with(install.backups.path()));
    assert_eq!(walk_tree(&result.backup_dir).files().count(), 14);
    assert_eq!(
        fs::read_to_string(result.backup_dir.join("lnc/all/people/players.lnc"))?,
        "lnc/all/people/players.lnc"
    );

    assert!(install.version_dir.join("lnc/all").is_dir());
    assert!(install.version_dir.join("dbc/permanent/other.dbc").exists());
    assert!(!install.version_dir.join("language/Licensing2.dbc").exists());

    let after = cli::check(&ctx, &mut out)?;
    assert!(after.is_applied());

    let text = String::from_utf8(out).expect("utf-8 output");
    assert!(text.contains("version 2430"));
    assert!(text.contains("Test install (fake)"));
    Ok(())
}

#[test]
fn update_on_clean_tree_deletes_nothing() -> fm24_real::Result<()> {
    let install = fake_install()?;
    let config = config_for(&install);
    let ctx = context(&config, install.backups.path());
    let mut out = Vec::new();

    cli::apply(&ctx, &mut out, &mut AssumeYes)?;
    let second = cli::update(&ctx, &mut out, &mut AssumeYes)?.expect("confirmed run");

    assert_eq!(second.deleted(), 0);
    assert_eq!(second.failed(), 0);
    assert_eq!(second.total(), DEFAULT_MANIFEST.len());
    Ok(())
}

#[test]
fn declined_apply_touches_nothing() -> fm24_real::Result<()> {
    let install = fake_install()?;
    let config = config_for(&install);
    let ctx = context(&config, install.backups.path());
    let mut out = Vec::new();

    assert!(cli::apply(&ctx, &mut out, &mut Decline)?.is_none());
    assert!(install.version_dir.join("lnc/all/clubs.lnc").exists());
    assert_eq!(fs::read_dir(install.backups.path())?.count(), 0);
    Ok(())
}

#[test]
fn apply_refuses_without_backups() -> io::Result<()> {
    let install = fake_install()?;
    let mut config = config_for(&install);
    config.backup.enabled = false;
    let ctx = context(&config, install.backups.path());

    let result = cli::apply(&ctx, &mut Vec::new(), &mut AssumeYes);
    assert!(matches!(result, Err(fm24_real::ToolError::BackupDisabled)));
    assert!(install.version_dir.join("edt/permanent/fake.edt").exists());
    Ok(())
}

#[test]
fn override_path_wins_over_config() -> fm24_real::Result<()> {
    let install = fake_install()?;
    let other = TempDir::new()?;
    fs::create_dir_all(other.path().join("9000"))?;

    let config = config_for(&install);
    let mut ctx = context(&config, install.backups.path());
    ctx.override_path = Some(other.path());

    let report = cli::check(&ctx, &mut Vec::new())?;
    assert!(report.is_applied());
    assert!(report.entries[0].path.starts_with(other.path().join("9000")));
    Ok(())
}
