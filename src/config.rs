use std::path::PathBuf;

use clap::Parser;

use crate::data::loader::DEFAULT_PATTERN;
use crate::data::stats::{DEFAULT_BINS, MAX_BINS, MIN_BINS};

/// Rows shown in the filtered-data preview table.
pub const DEFAULT_TABLE_ROWS: usize = 1000;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

/// Interactive dashboard for exploring a vehicle-sales CSV
#[derive(Parser, Debug, Clone)]
#[command(name = "car-sales-dashboard", version)]
pub struct Args {
    /// Directory searched for the source CSV
    #[arg(long, env = "VEHICLES_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// File name pattern of the source CSV (`*` and `?` wildcards)
    #[arg(long, env = "VEHICLES_PATTERN", default_value = DEFAULT_PATTERN)]
    pub pattern: String,

    /// Number of filtered rows shown in the table
    #[arg(long, default_value_t = DEFAULT_TABLE_ROWS)]
    pub table_rows: usize,

    /// Initial histogram bin count (10-100)
    #[arg(long, default_value_t = DEFAULT_BINS)]
    pub bins: usize,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            pattern: DEFAULT_PATTERN.to_string(),
            table_rows: DEFAULT_TABLE_ROWS,
            bins: DEFAULT_BINS,
        }
    }
}

impl Args {
    /// Bin count clamped to the slider's range.
    pub fn bins(&self) -> usize {
        self.bins.clamp(MIN_BINS, MAX_BINS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_flags() {
        let args = Args::try_parse_from([
            "car-sales-dashboard",
            "--data-dir",
            "/data",
            "--pattern",
            "cars_*.csv",
            "--table-rows",
            "50",
            "--bins",
            "500",
        ])
        .unwrap();
        assert_eq!(args.data_dir, PathBuf::from("/data"));
        assert_eq!(args.pattern, "cars_*.csv");
        assert_eq!(args.table_rows, 50);
        assert_eq!(args.bins(), MAX_BINS);
    }

    #[test]
    fn test_bins_clamped_low() {
        let args = Args {
            bins: 2,
            ..Args::default()
        };
        assert_eq!(args.bins(), MIN_BINS);
    }

    #[test]
    fn test_rejects_non_numeric_rows() {
        assert!(Args::try_parse_from(["car-sales-dashboard", "--table-rows", "many"]).is_err());
    }
}
