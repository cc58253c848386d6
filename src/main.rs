use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;

use cms_backup::cli::{Cli, Commands};
use cms_backup::config::Config;
use cms_backup::constants::{
    ERROR_BACKUP_CREATE_FAILED, ERROR_BACKUP_DELETE_FAILED, ERROR_BACKUP_READ_FAILED, ERROR_IMPORT_FAILED,
    NO_BACKUPS_FOUND, SUCCESS_BACKUP_CREATED, SUCCESS_BACKUP_DELETED, SUCCESS_DATA_IMPORTED,
};
use cms_backup::restore::RestoreResult;
use cms_backup::utils::{datetime, size};
use cms_backup::{logger, BackupService, SnapshotType};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Commands::InitConfig { path } = &cli.command {
        let path = match path {
            Some(path) => path.clone(),
            None => Config::get_default_config_path()?,
        };
        return Config::generate_default_config(path);
    }

    let config = Config::load_from(cli.config.as_deref())?;
    logger::init(&config.logging)?;

    let service = BackupService::from_config(&config.storage)
        .await
        .with_context(|| format!("Failed to open database {}", config.storage.database_url))?;

    match cli.command {
        Commands::Backup { snapshot_type } => handle_backup(&service, snapshot_type).await?,
        Commands::List => handle_list(&service).await?,
        Commands::Show { filename } => handle_show(&service, &filename).await?,
        Commands::Delete { filename } => {
            service.delete_backup(&filename).await.context(ERROR_BACKUP_DELETE_FAILED)?;
            println!("{SUCCESS_BACKUP_DELETED}: {filename}");
        }
        Commands::Import { path } => handle_import(&service, &path).await?,
        Commands::Restore { filename } => {
            let result = service.restore_backup(&filename).await.context(ERROR_IMPORT_FAILED)?;
            print_restore(&result);
        }
        Commands::InitConfig { .. } => {}
    }

    Ok(())
}

async fn handle_backup(service: &BackupService, snapshot_type: SnapshotType) -> Result<()> {
    let backup = service
        .create_backup(snapshot_type)
        .await
        .context(ERROR_BACKUP_CREATE_FAILED)?;
    println!("{SUCCESS_BACKUP_CREATED}");
    println!("   {} ({})", backup.filename, size::format_size(backup.size_bytes));
    println!("   {}", service.manager().backup_dir().join(&backup.filename).display());
    Ok(())
}

async fn handle_list(service: &BackupService) -> Result<()> {
    let backups = service.list_backups().await?;
    if backups.is_empty() {
        println!("{NO_BACKUPS_FOUND} in {}", service.manager().backup_dir().display());
        return Ok(());
    }

    let now = Utc::now();
    println!("{:<52} {:<9} {:>10}  CREATED", "FILENAME", "TYPE", "SIZE");
    for backup in backups {
        println!(
            "{:<52} {:<9} {:>10}  {}",
            backup.filename,
            backup.snapshot_type.as_str(),
            size::format_size(backup.size_bytes),
            datetime::format_age(backup.created_at, now)
        );
    }
    Ok(())
}

async fn handle_show(service: &BackupService, filename: &str) -> Result<()> {
    let snapshot = service.read_backup(filename).await.context(ERROR_BACKUP_READ_FAILED)?;
    println!("📄 {filename}");
    println!("   Type:           {}", snapshot.snapshot_type());
    println!("   Format version: {}", snapshot.metadata.format_version);
    println!("   Created:        {}", snapshot.metadata.created_at.to_rfc3339());
    for (kind, count) in snapshot.record_counts() {
        println!("   {:<15} {count}", format!("{kind}:"));
    }
    Ok(())
}

async fn handle_import(service: &BackupService, path: &Path) -> Result<()> {
    let raw = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let result = service.import_bytes(&raw).await.context(ERROR_IMPORT_FAILED)?;
    print_restore(&result);
    Ok(())
}

fn print_restore(result: &RestoreResult) {
    println!("{SUCCESS_DATA_IMPORTED} ({} snapshot)", result.snapshot_type);
    for (kind, count) in &result.counts {
        println!("   {:<15} {count}", format!("{kind}:"));
    }
}
