//! # JSON Output Module
//!
//! Questo modulo gestisce l'output strutturato in JSON per l'uso da script e altri processi.
//!
//! ## Responsabilità:
//! - Emette un oggetto JSON per riga su stdout per ogni evento della conversione
//! - Riutilizza `ConvertedFile` e `ConversionStats` per i dati
//!
//! ## Tipi di messaggi:
//! - `start`: Inizio conversione
//! - `file_start`: Inizio elaborazione di un file
//! - `file_complete`: File convertito e scritto
//! - `file_skipped`: Estensione non supportata
//! - `file_failed`: Errore su un file
//! - `complete`: Fine processo con statistiche finali
//! - `error`: Errore che interrompe il run

use crate::config::{Config, FailurePolicy};
use crate::converter::task_converter::ConvertedFile;
use crate::image_buffer::ContainerFormat;
use crate::progress::ConversionStats;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Tipo di messaggio JSON
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum JsonMessage {
    /// Inizio della conversione
    #[serde(rename = "start")]
    Start {
        input_dir: PathBuf,
        output_dir: PathBuf,
        total_files: usize,
        config: JsonConfig,
    },

    /// Inizio elaborazione di un file specifico
    #[serde(rename = "file_start")]
    FileStart {
        path: PathBuf,
        index: usize,
        total: usize,
    },

    /// File convertito
    #[serde(rename = "file_complete")]
    FileComplete {
        path: PathBuf,
        output_path: PathBuf,
        format: ContainerFormat,
        original_size: u64,
        converted_size: u64,
        reduction_percent: f64,
    },

    /// File ignorato
    #[serde(rename = "file_skipped")]
    FileSkipped { path: PathBuf, extension: String },

    /// File fallito
    #[serde(rename = "file_failed")]
    FileFailed { path: PathBuf, error: String },

    /// Processo completato
    #[serde(rename = "complete")]
    Complete {
        files_processed: usize,
        files_converted: usize,
        files_skipped: usize,
        errors: usize,
        total_input_size: u64,
        total_output_size: u64,
        duration_seconds: f64,
    },

    /// Errore generale
    #[serde(rename = "error")]
    Error {
        message: String,
        details: Option<String>,
    },
}

/// Configurazione per output JSON
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonConfig {
    pub quality: u8,
    pub failure_policy: FailurePolicy,
    pub jpg_extension: bool,
}

impl JsonMessage {
    /// Emette il messaggio JSON su stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    pub fn start(config: &Config, total_files: usize) -> Self {
        Self::Start {
            input_dir: config.input_dir.clone(),
            output_dir: config.output_dir.clone(),
            total_files,
            config: JsonConfig::from(config),
        }
    }

    pub fn file_start(path: PathBuf, index: usize, total: usize) -> Self {
        Self::FileStart { path, index, total }
    }

    pub fn file_complete(converted: &ConvertedFile) -> Self {
        Self::FileComplete {
            path: converted.input_path.clone(),
            output_path: converted.output_path.clone(),
            format: converted.source_format,
            original_size: converted.original_size,
            converted_size: converted.converted_size,
            reduction_percent: converted.reduction_percent(),
        }
    }

    pub fn file_skipped(path: PathBuf, extension: String) -> Self {
        Self::FileSkipped { path, extension }
    }

    pub fn file_failed(path: PathBuf, error: &anyhow::Error) -> Self {
        Self::FileFailed {
            path,
            error: format!("{:#}", error),
        }
    }

    pub fn complete(stats: &ConversionStats, duration_seconds: f64) -> Self {
        Self::Complete {
            files_processed: stats.files_processed,
            files_converted: stats.files_converted,
            files_skipped: stats.files_skipped,
            errors: stats.errors,
            total_input_size: stats.total_input_size,
            total_output_size: stats.total_output_size,
            duration_seconds,
        }
    }

    pub fn error(message: String, details: Option<String>) -> Self {
        Self::Error { message, details }
    }
}

impl From<&Config> for JsonConfig {
    fn from(config: &Config) -> Self {
        Self {
            quality: config.quality,
            failure_policy: config.failure_policy,
            jpg_extension: config.jpg_extension,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_start_message_shape() {
        let config = Config {
            quality: 42,
            ..Default::default()
        };
        let json = serde_json::to_value(JsonMessage::start(&config, 3)).unwrap();

        assert_eq!(json["type"], "start");
        assert_eq!(json["total_files"], 3);
        assert_eq!(json["config"]["quality"], 42);
        assert_eq!(json["config"]["failure_policy"], "abort");
    }

    #[test]
    fn test_file_complete_message_shape() {
        let converted = ConvertedFile {
            input_path: PathBuf::from("input/a.png"),
            output_path: PathBuf::from("output/a_processed.png"),
            source_format: ContainerFormat::Png,
            original_size: 200,
            converted_size: 50,
        };
        let json = serde_json::to_value(JsonMessage::file_complete(&converted)).unwrap();

        assert_eq!(json["type"], "file_complete");
        assert_eq!(json["format"], "png");
        assert_eq!(json["converted_size"], 50);
        assert_eq!(json["reduction_percent"], 75.0);
    }

    #[test]
    fn test_file_failed_includes_context_chain() {
        let err = anyhow::anyhow!("Decode error: empty").context("Failed to convert b.jpg");
        let json = serde_json::to_value(JsonMessage::file_failed(PathBuf::from("b.jpg"), &err)).unwrap();

        assert_eq!(json["type"], "file_failed");
        let message = json["error"].as_str().unwrap();
        assert!(message.contains("Failed to convert b.jpg"));
        assert!(message.contains("Decode error: empty"));
    }

    #[test]
    fn test_complete_message_round_trip() {
        let mut stats = ConversionStats::new();
        stats.add_converted(10, 5);
        stats.add_skipped();

        let line = serde_json::to_string(&JsonMessage::complete(&stats, 1.5)).unwrap();
        let parsed: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["type"], "complete");
        assert_eq!(parsed["files_processed"], 2);
        assert_eq!(parsed["files_skipped"], 1);

        let back: JsonMessage = serde_json::from_str(&line).unwrap();
        assert!(matches!(back, JsonMessage::Complete { files_converted: 1, .. }));
    }
}
