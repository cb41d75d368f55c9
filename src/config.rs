use clap::Parser;
use std::path::PathBuf;

/// Command-line configuration. Running without flags uses `expenses.csv` in
/// the working directory.
#[derive(Parser, Debug)]
#[command(name = "expenses")]
#[command(about = "Record expenses in a CSV file and query them from a text menu")]
pub(crate) struct Config {
    /// Location of the expense table.
    #[arg(long, default_value = "expenses.csv")]
    pub store: PathBuf,

    /// Currency symbol printed in front of monthly totals.
    #[arg(long, default_value = "₹")]
    pub currency: String,
}
