//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use booklist::REQUEST_TIMEOUT_SECS;

/// Search a public library's catalog website for this year's publications
/// from authors listed in the given config file.
///
/// Only catalogs running the CARL.X integrated library system are supported.
#[derive(Parser, Debug)]
#[command(name = "booklist")]
#[command(author, version, about)]
pub struct Args {
    /// Config file with the library's catalog URL and list of authors
    pub config_file: PathBuf,

    /// Print debug information to stderr (same as -v)
    #[arg(short, long)]
    pub debug: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, conflicts_with_all = ["debug", "verbose"])]
    pub quiet: bool,

    /// Per-request timeout in seconds (1-120)
    #[arg(short = 't', long, default_value_t = REQUEST_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=120))]
    pub timeout: u64,

    /// Continue with the remaining authors when one search fails
    #[arg(short = 'k', long)]
    pub keep_going: bool,
}

impl Args {
    /// Default tracing filter implied by the verbosity flags.
    #[must_use]
    pub fn default_log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match (self.verbose, self.debug) {
            (0, false) => "warn",
            (0 | 1, _) => "debug",
            _ => "trace",
        }
    }
}
