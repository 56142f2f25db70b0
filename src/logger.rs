//! Console logging for the CLI: verbosity, optional timestamps and durations.
use colored::Colorize;

#[derive(Debug, Clone, Copy, Default)]
pub struct Logger {
    pub verbose: bool,
    pub quiet: bool,
    pub timestamps: bool,
    pub durations: bool,
}

impl Logger {
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("{}{msg}", self.stamp());
        }
    }

    /// As [`Logger::info`], with the duration appended under `--durations`.
    pub fn info_timed(&self, msg: &str, duration_ms: f64) {
        if self.durations && duration_ms > 0.0 {
            self.info(&format!("{msg} {}", format!("({duration_ms:.1}ms)").dimmed()));
        } else {
            self.info(msg);
        }
    }

    pub fn debug(&self, msg: &str) {
        if self.verbose && !self.quiet {
            println!("{}{} {msg}", self.stamp(), "[DEBUG]".dimmed());
        }
    }

    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            eprintln!("{}{} {msg}", self.stamp(), "[WARN]".yellow().bold());
        }
    }

    /// Errors are printed even under `--quiet`.
    pub fn error(&self, msg: &str) {
        eprintln!("{}{} {msg}", self.stamp(), "[ERROR]".red().bold());
    }

    fn stamp(&self) -> String {
        if self.timestamps {
            format!("[{}] ", chrono::Local::now().format("%H:%M:%S"))
        } else {
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamp_only_with_timestamps() {
        assert_eq!(Logger::default().stamp(), "");
        let stamp = Logger { timestamps: true, ..Logger::default() }.stamp();
        // `[HH:MM:SS] `
        assert_eq!(stamp.len(), 11);
        assert!(stamp.starts_with('[') && stamp.ends_with("] "));
        assert_eq!(stamp.matches(':').count(), 2);
    }
}
