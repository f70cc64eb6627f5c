//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione di una conversione batch.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con tutti i parametri della conversione
//! - Fornisce validazione dei path di input/output
//! - Fornisce valori di default sensati per tutti i parametri
//!
//! ## Parametri di configurazione:
//! - `input_dir`: Cartella di input (default: "./input")
//! - `output_dir`: Cartella di output (default: "./output")
//! - `quality`: Qualità JPEG (default: 80, non validata: l'encoder la limita a 1-100)
//! - `failure_policy`: `Abort` al primo errore (default) o `Continue`
//! - `jpg_extension`: Salva i PNG convertiti con estensione `.jpg` (default: false)
//! - `json_output`: Eventi JSON su stdout (default: false)
//!
//! ## Esempio:
//! ```rust
//! let config = Config {
//!     quality: 85,
//!     failure_policy: FailurePolicy::Continue,
//!     ..Default::default()
//! };
//! config.validate()?;
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// What the batch does when a single file fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the whole run on the first failure
    #[default]
    Abort,
    /// Log the failure, count it, and move on to the next file
    Continue,
}

/// Configuration for a batch conversion
#[derive(Debug, Clone)]
pub struct Config {
    /// Folder scanned for PNG/JPEG files
    pub input_dir: PathBuf,
    /// Folder receiving `<stem>_processed.<ext>` files
    pub output_dir: PathBuf,
    /// JPEG quality, passed through to the encoder
    pub quality: u8,
    /// Abort on first failure or keep going
    pub failure_policy: FailurePolicy,
    /// Name converted PNG outputs `.jpg` instead of keeping `.png`
    pub jpg_extension: bool,
    /// Output progress and status as JSON for programmatic use
    pub json_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./input"),
            output_dir: PathBuf::from("./output"),
            quality: 80,
            failure_policy: FailurePolicy::Abort,
            jpg_extension: false,
            json_output: false,
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.input_dir.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("Input directory must not be empty"));
        }

        if self.output_dir.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("Output directory must not be empty"));
        }

        if self.input_dir.is_file() {
            return Err(anyhow::anyhow!("Input path is not a directory: {}", self.input_dir.display()));
        }

        if self.output_dir.is_file() {
            return Err(anyhow::anyhow!("Output path is not a directory: {}", self.output_dir.display()));
        }

        if self.quality > 100 {
            warn!("Quality {} is above 100, the encoder will clamp it", self.quality);
        }

        Ok(())
    }
}
