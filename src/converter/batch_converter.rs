//! # Batch Converter Main Orchestrator
//!
//! Orchestratore principale: prepara le cartelle, scopre i file e li converte
//! uno alla volta, delegando ai moduli specializzati.

use crate::{
    config::{Config, FailurePolicy},
    converter::{progress_tracker::ProgressTracker, task_converter::TaskConverter},
    file_manager::FileManager,
    image_buffer::ContainerFormat,
    json_output::JsonMessage,
    progress::ConversionStats,
};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Orchestratore principale della conversione
pub struct BatchConverter {
    config: Config,
    task_converter: TaskConverter,
}

impl BatchConverter {
    /// Crea nuova istanza del converter
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let task_converter = TaskConverter::new(config.clone());

        Ok(Self {
            config,
            task_converter,
        })
    }

    /// Esegue la conversione di tutta la cartella di input.
    ///
    /// Con `FailurePolicy::Abort` il primo errore interrompe il run e viene
    /// restituito; i file già scritti restano in output. Con `Continue` gli errori
    /// vengono contati nelle statistiche restituite.
    pub fn run(&self) -> Result<ConversionStats> {
        let start_time = Instant::now();

        self.prepare_folders();

        let files = FileManager::find_input_files(&self.config.input_dir)
            .with_context(|| format!("Failed to list input folder {}", self.config.input_dir.display()))?;

        self.emit_start_message(&files);
        self.log_configuration(&files);

        if files.is_empty() {
            let stats = ConversionStats::new();
            self.handle_empty_directory(&stats, start_time);
            return Ok(stats);
        }

        let mut tracker = ProgressTracker::new(files.len(), self.config.json_output);

        for (index, file_path) in files.iter().enumerate() {
            if ContainerFormat::from_path(file_path).is_none() {
                tracker.file_skipped(file_path, &FileManager::extension_lowercase(file_path));
                continue;
            }

            tracker.file_started(file_path, index);

            match self.task_converter.process_single_file(file_path) {
                Ok(converted) => tracker.file_converted(&converted),
                Err(e) => match self.config.failure_policy {
                    FailurePolicy::Abort => {
                        tracker.finish();
                        if self.config.json_output {
                            JsonMessage::error(format!("{}", e), Some(format!("{:#}", e))).emit();
                        }
                        return Err(e);
                    }
                    FailurePolicy::Continue => tracker.file_failed(file_path, &e),
                },
            }
        }

        tracker.finish();
        let stats = tracker.into_stats();
        self.print_final_stats(&stats, start_time.elapsed().as_secs_f64());

        Ok(stats)
    }

    /// Controlla/crea cartelle di input e output; i fallimenti sono solo loggati
    fn prepare_folders(&self) {
        for folder in [&self.config.input_dir, &self.config.output_dir] {
            if !FileManager::ensure_folder(folder) {
                warn!("Continuing without folder: {}", folder.display());
            }
        }

        if !self.config.json_output {
            info!(
                "Paste the image files inside {} to process them",
                self.config.input_dir.display()
            );
        }
    }

    /// Invia messaggio di inizio
    fn emit_start_message(&self, files: &[PathBuf]) {
        if self.config.json_output {
            JsonMessage::start(&self.config, files.len()).emit();
        } else {
            info!("Starting image conversion in: {}", self.config.input_dir.display());
        }
    }

    /// Logga configurazione (solo se non JSON mode)
    fn log_configuration(&self, files: &[PathBuf]) {
        if self.config.json_output {
            return;
        }

        info!("JPEG quality: {}", self.config.quality);
        info!("Output directory: {}", self.config.output_dir.display());

        match self.config.failure_policy {
            FailurePolicy::Abort => info!("Failure mode: abort on first error"),
            FailurePolicy::Continue => info!("Failure mode: log errors and keep going"),
        }

        if self.config.jpg_extension {
            info!("Converted PNG files will use the .jpg extension");
        }

        let supported = files.iter().filter(|f| FileManager::is_supported_format(f)).count();
        info!("Found {} files ({} supported)", files.len(), supported);
        for file in files {
            debug!("  • {}", file.display());
        }
    }

    /// Gestisce directory vuota
    fn handle_empty_directory(&self, stats: &ConversionStats, start_time: Instant) {
        if self.config.json_output {
            JsonMessage::complete(stats, start_time.elapsed().as_secs_f64()).emit();
        } else {
            info!("No files found to process");
        }
    }

    /// Stampa statistiche finali
    fn print_final_stats(&self, stats: &ConversionStats, duration: f64) {
        if self.config.json_output {
            JsonMessage::complete(stats, duration).emit();
            return;
        }

        info!("=== Conversion Complete ===");
        info!("Files processed: {}", stats.files_processed);
        info!("Files converted: {}", stats.files_converted);
        info!("Files skipped: {}", stats.files_skipped);
        info!("Input size: {}", FileManager::format_size(stats.total_input_size));
        info!("Output size: {}", FileManager::format_size(stats.total_output_size));
        info!("Size reduction: {:.2}%", stats.overall_reduction_percent());
        info!("Duration: {:.2}s", duration);

        if stats.has_errors() {
            error!("Errors: {}", stats.errors);
        }
    }
}
