use std::path::PathBuf;

use clap::Parser;

/// Send spreadsheets to a row-deletion service and save the packaged result.
#[derive(Debug, Clone, Parser)]
#[command(name = "rowtrim")]
#[command(about = "Delete leading rows from a batch of spreadsheets via a processing service", long_about = None)]
pub struct Cli {
    /// Spreadsheet file to add (.xlsx or .xls). Repeatable.
    #[arg(long = "excel", value_name = "FILE")]
    pub spreadsheets: Vec<PathBuf>,

    /// Zip archive of spreadsheets to add. Repeatable.
    #[arg(long = "zip", value_name = "FILE")]
    pub archives: Vec<PathBuf>,

    /// Folder whose .xlsx/.xls files are added. Repeatable.
    #[arg(long = "folder", value_name = "DIR")]
    pub folders: Vec<PathBuf>,

    /// Number of rows to delete from each spreadsheet.
    #[arg(short, long, value_name = "N")]
    pub rows: Option<String>,

    /// Base URL of the processing service.
    #[arg(long, value_name = "URL")]
    pub server: Option<String>,

    /// Directory the result archive is saved into.
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// RON configuration file (defaults to ./rowtrim.ron when present).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Leave the job's data on the server instead of removing it afterwards.
    #[arg(long)]
    pub keep_remote: bool,

    /// Also write logs to this file.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log debug output.
    #[arg(short, long)]
    pub verbose: bool,
}
