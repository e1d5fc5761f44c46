//! Utility functions for the CLI.

use indicatif::{ProgressBar, ProgressStyle};
use pairpack_core::Entry;
use std::time::Duration;

/// Create a progress bar with standard styling.
pub fn create_progress_bar(len: u64, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    if let Ok(style) =
        ProgressStyle::with_template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("█▓▒░ "));
    }
    pb
}

/// Create a spinner for work whose length is not known up front.
pub fn create_spinner(enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) =
        ProgressStyle::with_template("{spinner:.cyan} [{elapsed_precise}] {pos} entries {wide_msg}")
    {
        pb.set_style(style);
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Percentage saved going from `size` to `stored`.
pub fn savings(size: u64, stored: u64) -> f64 {
    if size == 0 {
        0.0
    } else {
        (1.0 - stored as f64 / size as f64) * 100.0
    }
}

/// Print entries in a formatted table.
pub fn print_entries(entries: &[Entry], verbose: bool) {
    if verbose {
        println!(
            "{:>10} {:>10} {:>6} {:>6}  Name",
            "Size", "Stored", "Ratio", "Passes",
        );
        println!("{}", "-".repeat(60));

        let mut total_size = 0u64;
        let mut total_stored = 0u64;
        let mut files = 0usize;

        for entry in entries {
            if entry.is_dir() {
                println!("{:>10} {:>10} {:>6} {:>6}  d {}", "-", "-", "-", "-", entry.name);
                continue;
            }

            let ratio = if entry.size > 0 {
                format!("{:.1}%", entry.space_savings())
            } else {
                "-".to_string()
            };
            println!(
                "{:>10} {:>10} {:>6} {:>6}    {}",
                entry.size, entry.stored_size, ratio, entry.passes, entry.name
            );

            total_size += entry.size;
            total_stored += entry.stored_size;
            files += 1;
        }

        println!("{}", "-".repeat(60));
        println!(
            "{:>10} {:>10} {:>5.1}%          {} files, {} directories",
            total_size,
            total_stored,
            savings(total_size, total_stored),
            files,
            entries.len() - files
        );
    } else {
        for entry in entries {
            println!("{}", entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_savings() {
        assert_eq!(savings(0, 0), 0.0);
        assert_eq!(savings(100, 25), 75.0);
        assert_eq!(savings(100, 100), 0.0);
    }

    #[test]
    fn test_hidden_bars() {
        assert!(create_progress_bar(10, false).is_hidden());
        assert!(create_spinner(false).is_hidden());
    }
}
