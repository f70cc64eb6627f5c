//! # File Management Module
//!
//! Questo modulo gestisce le operazioni sulle cartelle e la discovery delle immagini.
//!
//! ## Responsabilità:
//! - Controllo e creazione delle cartelle di input/output
//! - Discovery dei file regolari nella cartella di input (non ricorsiva)
//! - Riconoscimento estensioni supportate (case-insensitive)
//! - Utilità per calcoli dimensioni e percentuali
//!
//! ## Formati supportati:
//! - **Immagini**: PNG, JPG, JPEG
//!
//! ## Gestione errori cartelle:
//! Un fallimento nel controllo/creazione viene loggato e non interrompe il run:
//! eventuali problemi reali emergono alla prima lettura o scrittura.
//!
//! ## Esempio:
//! ```rust
//! FileManager::ensure_folder(&config.output_dir);
//! for file in FileManager::find_input_files(&config.input_dir)? {
//!     if FileManager::is_supported_format(&file) {
//!         // convert image
//!     }
//! }
//! ```

use crate::error::ConvertError;
use crate::image_buffer::ContainerFormat;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use walkdir::WalkDir;

/// Manages folder setup and file discovery
pub struct FileManager;

impl FileManager {
    /// Check that a folder exists and is a directory
    pub fn check_folder_path(path: &Path) -> bool {
        if path.is_dir() {
            true
        } else {
            info!("Folder does not exist: {}", path.display());
            false
        }
    }

    /// Create a folder (and missing parents)
    pub fn create_folder(path: &Path) -> Result<(), ConvertError> {
        if path.exists() {
            info!("Folder already exists: {}", path.display());
            return Ok(());
        }

        std::fs::create_dir_all(path)
            .map_err(|e| ConvertError::Folder(format!("Failed to create folder {}: {}", path.display(), e)))?;
        info!("Folder created successfully: {}", path.display());
        Ok(())
    }

    /// Make sure a folder is there, creating it if needed.
    ///
    /// Never fails: problems are logged and the return value says whether the
    /// folder is usable.
    pub fn ensure_folder(path: &Path) -> bool {
        if Self::check_folder_path(path) {
            return true;
        }

        match Self::create_folder(path) {
            Ok(()) => true,
            Err(e) => {
                error!("{}", e);
                false
            }
        }
    }

    /// List every regular file directly inside `dir`, sorted by file name.
    ///
    /// Symlinks are followed, subfolders are not descended into.
    pub fn find_input_files(dir: &Path) -> Result<Vec<PathBuf>, ConvertError> {
        let mut files = Vec::new();

        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| match e.into_io_error() {
                Some(io) => ConvertError::Io(io),
                None => ConvertError::Folder(format!("Failed to list {}", dir.display())),
            })?;

            if entry.file_type().is_file() {
                files.push(entry.into_path());
            } else {
                debug!("Ignoring non-file entry: {}", entry.path().display());
            }
        }

        Ok(files)
    }

    /// Lowercased extension, empty when the file has none
    pub fn extension_lowercase(path: &Path) -> String {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }

    /// Check if a file format is supported
    pub fn is_supported_format(path: &Path) -> bool {
        ContainerFormat::from_path(path).is_some()
    }

    /// Size of a file in bytes
    pub fn get_file_size(path: &Path) -> Result<u64, ConvertError> {
        Ok(std::fs::metadata(path)?.len())
    }

    /// Get human-readable file size
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Calculate percentage reduction
    pub fn calculate_reduction(original_size: u64, new_size: u64) -> f64 {
        if original_size == 0 {
            0.0
        } else {
            ((original_size as f64 - new_size as f64) / original_size as f64) * 100.0
        }
    }
}
