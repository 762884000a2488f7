use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gemwatch")]
#[command(about = "Snapshots the gem store catalog and reports new items")]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding dated snapshots
    #[arg(long, global = true)]
    pub snapshot_dir: Option<PathBuf>,

    /// Show debug diagnostics on stderr
    #[arg(long, short = 'v', global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch the catalog, save today's snapshot and report new items (default)
    Run(RunArgs),

    /// List stored snapshots, newest first
    List,

    /// Report items added between two stored snapshots
    Diff(DiffArgs),
}

#[derive(Parser, Default)]
pub struct RunArgs {
    /// Also append the report to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Report to stdout only
    #[arg(long, default_value_t = false, conflicts_with = "log_file")]
    pub no_log_file: bool,
}

#[derive(Parser)]
pub struct DiffArgs {
    /// Older snapshot date (YYYY-MM-DD)
    #[arg(long, requires = "to")]
    pub from: Option<NaiveDate>,

    /// Newer snapshot date (YYYY-MM-DD)
    #[arg(long, requires = "from")]
    pub to: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_run() {
        let cli = Cli::try_parse_from(["gemwatch"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn diff_dates_parse() {
        let cli = Cli::try_parse_from(["gemwatch", "diff", "--from", "2024-01-01", "--to", "2024-01-02"])
            .unwrap();
        match cli.command {
            Some(Command::Diff(args)) => {
                assert_eq!(args.from, NaiveDate::from_ymd_opt(2024, 1, 1));
                assert_eq!(args.to, NaiveDate::from_ymd_opt(2024, 1, 2));
            }
            _ => panic!("expected diff"),
        }
    }

    #[test]
    fn diff_requires_both_dates() {
        assert!(Cli::try_parse_from(["gemwatch", "diff", "--from", "2024-01-01"]).is_err());
    }

    #[test]
    fn global_snapshot_dir_after_subcommand() {
        let cli = Cli::try_parse_from(["gemwatch", "list", "--snapshot-dir", "snaps"]).unwrap();
        assert_eq!(cli.snapshot_dir, Some(PathBuf::from("snaps")));
    }

    #[test]
    fn log_file_flags_conflict() {
        assert!(Cli::try_parse_from(["gemwatch", "run", "--log-file", "a.txt", "--no-log-file"]).is_err());
    }
}
