//! Human-readable output formatter with colors and styling.

use super::formatter::ListedFile;
use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use treeport_core::ExportReport;
use treeport_core::PublishReport;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        let mut count = 0;

        for c in s.chars().rev() {
            if count == 3 {
                result.push(',');
                count = 0;
            }
            result.push(c);
            count += 1;
        }

        result.chars().rev().collect()
    }

    fn write_header(&self, text: &str) {
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {text}", style("✓").green().bold()));
        } else {
            let _ = self.term.write_line(text);
        }
    }

    fn write_warnings(&self, warnings: &[String]) {
        if warnings.is_empty() {
            return;
        }
        let _ = self.term.write_line("");
        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{}", style("Warnings:").yellow().bold()));
        } else {
            let _ = self.term.write_line("Warnings:");
        }
        for warning in warnings {
            let _ = self.term.write_line(&format!("  - {warning}"));
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_download_result(&self, report: &ExportReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let saved_to = report
            .output_path
            .as_ref()
            .map_or_else(|| "-".to_string(), |p| p.display().to_string());
        self.write_header(&format!("Archive saved: {saved_to}"));

        let _ = self.term.write_line("");
        let _ = self.term.write_line(&format!(
            "  Files added:      {}",
            Self::format_number(report.files_added)
        ));
        let _ = self.term.write_line(&format!(
            "  Source size:      {}",
            Self::format_size(report.bytes_read)
        ));
        let _ = self.term.write_line(&format!(
            "  Archive size:     {}",
            Self::format_size(report.archive_bytes)
        ));

        if report.files_skipped > 0 {
            let _ = self
                .term
                .write_line(&format!("  Files skipped:    {}", report.files_skipped));
        }

        if self.verbose {
            let _ = self.term.write_line(&format!(
                "  Ratio:            {:.2}",
                report.compression_ratio()
            ));
            let _ = self
                .term
                .write_line(&format!("  Duration:         {:?}", report.duration));
        }

        self.write_warnings(&report.warnings);

        Ok(())
    }

    fn format_publish_result(&self, target: &str, report: &PublishReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.write_header(&format!("Published to {target}"));

        let _ = self.term.write_line("");
        if report.initialized_repo {
            let _ = self.term.write_line("  Branch created with an empty initial commit");
        }
        let _ = self.term.write_line(&format!(
            "  Files created:    {}",
            Self::format_number(report.files_created)
        ));
        let _ = self.term.write_line(&format!(
            "  Files updated:    {}",
            Self::format_number(report.files_updated)
        ));
        let _ = self.term.write_line(&format!(
            "  Uploaded:         {}",
            Self::format_size(report.bytes_uploaded)
        ));

        if self.verbose {
            let _ = self
                .term
                .write_line(&format!("  Duration:         {:?}", report.duration));
            for path in &report.uploaded {
                let _ = self.term.write_line(&format!("    {path}"));
            }
        }

        Ok(())
    }

    fn format_file_list(&self, files: &[ListedFile], long: bool) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for file in files {
            if long {
                let _ = self
                    .term
                    .write_line(&format!("{:<40}  {}", file.path, file.key));
            } else {
                let _ = self.term.write_line(&file.path);
            }
        }

        if long {
            let _ = self.term.write_line("");
            let _ = self.term.write_line(&format!(
                "Total: {} files",
                Self::format_number(files.len())
            ));
        }

        Ok(())
    }

    fn format_warning(&self, message: &str) {
        if self.quiet {
            return;
        }

        if self.use_colors {
            let _ = self
                .term
                .write_line(&format!("{} {message}", style("⚠").yellow().bold()));
        } else {
            let _ = self.term.write_line(&format!("WARNING: {message}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(HumanFormatter::format_size(0), "0 B");
        assert_eq!(HumanFormatter::format_size(1023), "1023 B");
        assert_eq!(HumanFormatter::format_size(1536), "1.5 KB");
        assert_eq!(HumanFormatter::format_size(2 * 1024 * 1024), "2.0 MB");
        assert_eq!(HumanFormatter::format_size(1024 * 1024 * 1024), "1.0 GB");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(HumanFormatter::format_number(0), "0");
        assert_eq!(HumanFormatter::format_number(999), "999");
        assert_eq!(HumanFormatter::format_number(1000), "1,000");
        assert_eq!(HumanFormatter::format_number(1_234_567), "1,234,567");
    }
}
