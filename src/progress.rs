//! # Progress Tracking and Statistics Module
//!
//! Questo modulo gestisce il progress tracking e le statistiche della conversione.
//!
//! ## Responsabilità:
//! - Progress bar visual con `indicatif` per feedback real-time
//! - Tracking statistiche (file convertiti, saltati, errori, byte)
//! - Report finale con statistiche aggregate
//!
//! ## Componenti principali:
//! - `ProgressManager`: Gestisce la progress bar principale
//! - `ConversionStats`: Traccia statistiche cumulative
//!
//! ## Statistiche tracciate:
//! - **files_processed**: Totale file incontrati
//! - **files_converted**: File convertiti e scritti in output
//! - **files_skipped**: File con estensione non supportata
//! - **errors**: File falliti (solo con `--keep-going` il run prosegue)
//! - **total_input_size** / **total_output_size**: Byte letti e scritti
//!
//! ## Visual feedback:
//! ```text
//! ⠋ [00:00:04] [========================>---------------] 6/10 (60%) photo.png -> photo_processed.png
//! ```

use crate::file_manager::FileManager;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Manages progress reporting for a batch conversion
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a new progress manager
    pub fn new(total_files: u64) -> Self {
        let bar = ProgressBar::new(total_files);

        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );

        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// A manager that draws nothing, used in JSON mode
    pub fn hidden(total_files: u64) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_length(total_files);
        Self { bar }
    }

    /// Update progress with a message
    pub fn update(&self, message: &str) {
        self.bar.inc(1);
        self.bar.set_message(message.to_string());
    }

    /// Finish with a final message
    pub fn finish(&self, message: &str) {
        self.bar.finish_with_message(message.to_string());
    }

    /// Abandon the bar, leaving the last message visible
    pub fn abandon(&self, message: &str) {
        self.bar.abandon_with_message(message.to_string());
    }

    /// Run `f` with the bar cleared, so log lines do not mix with it
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.bar.suspend(f)
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }
}

/// Statistics tracker for conversion results
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConversionStats {
    pub files_processed: usize,
    pub files_converted: usize,
    pub files_skipped: usize,
    pub errors: usize,
    pub total_input_size: u64,
    pub total_output_size: u64,
}

impl ConversionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_converted(&mut self, original_size: u64, new_size: u64) {
        self.files_processed += 1;
        self.files_converted += 1;
        self.total_input_size += original_size;
        self.total_output_size += new_size;
    }

    pub fn add_skipped(&mut self) {
        self.files_processed += 1;
        self.files_skipped += 1;
    }

    pub fn add_error(&mut self) {
        self.files_processed += 1;
        self.errors += 1;
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// Size change over converted files; negative when outputs grew
    pub fn overall_reduction_percent(&self) -> f64 {
        FileManager::calculate_reduction(self.total_input_size, self.total_output_size)
    }

    pub fn format_summary(&self) -> String {
        format!(
            "Processed: {} files | Converted: {} | Skipped: {} | Errors: {} | {} -> {} ({:.2}%)",
            self.files_processed,
            self.files_converted,
            self.files_skipped,
            self.errors,
            FileManager::format_size(self.total_input_size),
            FileManager::format_size(self.total_output_size),
            self.overall_reduction_percent()
        )
    }
}
