//! # Progress Tracking Module
//!
//! Unifica progress bar, statistiche ed eventi JSON in un singolo tracker.
//! Il run è sequenziale: il tracker è posseduto dall'orchestratore, senza lock.
//! I log per file passano da `suspend` per non sovrapporsi alla barra.

use crate::{
    converter::task_converter::ConvertedFile,
    json_output::JsonMessage,
    progress::{ConversionStats, ProgressManager},
};
use std::path::Path;
use tracing::{error, info};

/// Tracker progress unificato
pub struct ProgressTracker {
    pub total_files: usize,
    json_output: bool,
    stats: ConversionStats,
    progress_manager: ProgressManager,
}

impl ProgressTracker {
    /// Crea un nuovo tracker; in modalità JSON la barra non viene disegnata
    pub fn new(total_files: usize, json_output: bool) -> Self {
        let progress_manager = if json_output {
            ProgressManager::hidden(total_files as u64)
        } else {
            ProgressManager::new(total_files as u64)
        };

        Self {
            total_files,
            json_output,
            stats: ConversionStats::new(),
            progress_manager,
        }
    }

    /// Evento di inizio file
    pub fn file_started(&self, file_path: &Path, index: usize) {
        if self.json_output {
            JsonMessage::file_start(file_path.to_path_buf(), index, self.total_files).emit();
        }
    }

    /// File convertito con successo
    pub fn file_converted(&mut self, converted: &ConvertedFile) {
        self.stats.add_converted(converted.original_size, converted.converted_size);

        if self.json_output {
            JsonMessage::file_complete(converted).emit();
        } else {
            self.progress_manager.suspend(|| {
                info!(
                    "Processed file: {} -> Saved as: {}",
                    converted.input_path.display(),
                    converted.output_path.display()
                )
            });
        }

        let message = format!(
            "[OK] {} -> {}",
            file_name(&converted.input_path),
            file_name(&converted.output_path)
        );
        self.progress_manager.update(&message);
    }

    /// File con estensione non supportata
    pub fn file_skipped(&mut self, file_path: &Path, extension: &str) {
        self.stats.add_skipped();

        if self.json_output {
            JsonMessage::file_skipped(file_path.to_path_buf(), extension.to_string()).emit();
        } else {
            self.progress_manager.suspend(|| {
                info!(
                    "Skipping unsupported file: {} (Extension: {})",
                    file_path.display(),
                    extension
                )
            });
        }

        self.progress_manager.update(&format!("[SKIP] {}", file_name(file_path)));
    }

    /// File fallito
    pub fn file_failed(&mut self, file_path: &Path, err: &anyhow::Error) {
        self.stats.add_error();

        if self.json_output {
            JsonMessage::file_failed(file_path.to_path_buf(), err).emit();
        } else {
            self.progress_manager.suspend(|| error!("{:#}", err));
        }

        self.progress_manager.update(&format!("[ERROR] {}", file_name(file_path)));
    }

    /// Finalizza progress bar
    pub fn finish(&self) {
        let summary = self.stats.format_summary();
        if self.stats.has_errors() {
            self.progress_manager.abandon(&summary);
        } else {
            self.progress_manager.finish(&summary);
        }
    }

    /// Statistiche per il report finale
    pub fn into_stats(self) -> ConversionStats {
        self.stats
    }
}

fn file_name(path: &Path) -> String {
    path.file_name().unwrap_or_default().to_string_lossy().into_owned()
}
