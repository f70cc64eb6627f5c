//! # Path Resolution Module
//!
//! Centralizza la logica di calcolo dei path di output.
//! Nome di output: `<stem>_processed.<estensione originale in minuscolo>`.

use crate::{config::Config, file_manager::FileManager, image_buffer::ContainerFormat};
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

const PROCESSED_SUFFIX: &str = "_processed";

/// Utility per calcolare i path di output in modo centralizzato
pub struct PathResolver;

impl PathResolver {
    /// Calcola il path di output per un file dato
    pub fn get_output_path(input_path: &Path, config: &Config) -> Result<PathBuf> {
        let file_stem = input_path
            .file_stem()
            .ok_or_else(|| anyhow::anyhow!("Invalid file name: {}", input_path.display()))?
            .to_string_lossy();

        let extension = Self::get_output_extension(input_path, config);
        let filename = format!("{}{}.{}", file_stem, PROCESSED_SUFFIX, extension);
        let result = config.output_dir.join(filename);

        debug!("Resolved output path: {} -> {}", input_path.display(), result.display());
        Ok(result)
    }

    /// Estensione originale, oppure `jpg` per i PNG con `jpg_extension` attivo
    fn get_output_extension(input_path: &Path, config: &Config) -> String {
        if config.jpg_extension && ContainerFormat::from_path(input_path) == Some(ContainerFormat::Png) {
            "jpg".to_string()
        } else {
            FileManager::extension_lowercase(input_path)
        }
    }
}
