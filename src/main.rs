mod cli;
mod logging;

use std::path::Path;
use std::process;

use backup_pruner::analysis::DeletionPolicy;
use backup_pruner::config::{self, EXAMPLE_CONFIG};
use backup_pruner::{AppSettings, RetentionEngine, RunSummary};
use clap::{CommandFactory, Parser};
use cli::Cli;
use colored::*;
use dotenv::dotenv;
use tracing::{error, info, warn};

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let args = Cli::parse();

    if args.example {
        println!("{}", EXAMPLE_CONFIG);
        return Ok(());
    }

    let Some(config_path) = args.config.clone() else {
        Cli::command().print_help()?;
        process::exit(1);
    };

    let settings = match config::load_settings() {
        Ok(settings) => apply_flags(settings, &args),
        Err(err) => {
            let _guard = logging::init_logger(args.log_file.as_deref());
            error!("Error loading settings: {}", err);
            return Ok(());
        }
    };

    let log_file = settings.log_file.as_deref().map(Path::new);
    let _guard = logging::init_logger(log_file);

    let entries = match config::load_backup_list(&config_path) {
        Ok(entries) => entries,
        Err(err) => {
            error!("{}", err);
            return Ok(());
        }
    };

    if settings.keep_last_n == 0 {
        warn!("keep-last-n 0 would delete every generation, keeping 1");
    }

    let policy = DeletionPolicy {
        delete_archived: settings.delete_archived,
        dry_run: settings.dry_run,
    };
    let summary = RetentionEngine::new(&entries)
        .with_keep_last_n(settings.keep_last_n as usize)
        .with_policy(policy)
        .run();

    report(&summary);
    Ok(())
}

fn apply_flags(mut settings: AppSettings, args: &Cli) -> AppSettings {
    if let Some(keep_last_n) = args.keep_last_n {
        settings.keep_last_n = keep_last_n;
    }
    settings.delete_archived |= args.with_archive_attr;
    settings.dry_run |= args.dryrun;
    if let Some(log_file) = &args.log_file {
        settings.log_file = Some(log_file.to_string_lossy().into_owned());
    }
    settings
}

fn report(summary: &RunSummary) {
    info!(
        "Catalog: {}, Plan: {}, Delete: {}",
        format!("{:.2}s", summary.scan_duration.as_secs_f64()).green(),
        format!("{:.2}s", summary.plan_duration.as_secs_f64()).green(),
        format!("{:.2}s", summary.delete_duration.as_secs_f64()).green(),
    );
    info!(
        "{} of {} directories listed, {} entries, {} kept",
        format!("{}", summary.directories_listed).cyan(),
        summary.directories_configured,
        summary.entries_catalogued,
        format!("{}", summary.entries_kept).cyan(),
    );
    if summary.dry_run {
        info!(
            "{} files would be removed (dry run)",
            format!("{}", summary.planned).yellow(),
        );
    } else {
        info!(
            "{} removed, {} failed",
            format!("{}", summary.removed).green(),
            format!("{}", summary.failed).red(),
        );
    }
}
