use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "backup-pruner")]
#[command(about = "Keeps the most recent backup generations per database and deletes the rest", long_about = None)]
pub struct Cli {
    /// Backup list (JSON array of {path, Filename, suffix, Days})
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Also delete files whose archive attribute is still set
    #[arg(long = "with-archive-attr")]
    pub with_archive_attr: bool,

    /// Print the rm lines without deleting anything
    #[arg(long)]
    pub dryrun: bool,

    /// Generations to keep per database and suffix [default: 2]
    #[arg(long = "keep-last-n", value_name = "N")]
    pub keep_last_n: Option<u32>,

    /// Write the log to this file instead of stdout
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Print an example backup list and exit
    #[arg(long)]
    pub example: bool,
}
