//! # Task Converter Module
//!
//! Worker per la conversione di singoli file.
//! Legge l'input, lo passa alla pipeline e scrive l'output solo a encode riuscito.

use crate::{
    config::Config,
    converter::path_resolver::PathResolver,
    error::ConvertError,
    file_manager::FileManager,
    image_buffer::ContainerFormat,
    image_processor::ImagePipeline,
};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Risultato della conversione di un file
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedFile {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub source_format: ContainerFormat,
    pub original_size: u64,
    pub converted_size: u64,
}

impl ConvertedFile {
    pub fn reduction_percent(&self) -> f64 {
        FileManager::calculate_reduction(self.original_size, self.converted_size)
    }
}

/// Worker per elaborazione singoli file
pub struct TaskConverter {
    config: Config,
    pipeline: ImagePipeline,
}

impl TaskConverter {
    /// Crea nuovo task converter
    pub fn new(config: Config) -> Self {
        let pipeline = ImagePipeline::new(config.quality);
        Self { config, pipeline }
    }

    /// Calcola path di output atteso (delegato a PathResolver)
    pub fn get_expected_output_path(&self, input_path: &Path) -> Result<PathBuf> {
        PathResolver::get_output_path(input_path, &self.config)
    }

    /// Converte un singolo file
    pub fn process_single_file(&self, file_path: &Path) -> Result<ConvertedFile> {
        let source_format = ContainerFormat::from_path(file_path).ok_or_else(|| {
            ConvertError::UnsupportedFormat(format!("Unsupported file type: {}", file_path.display()))
        })?;

        let output_path = self.get_expected_output_path(file_path)?;

        let bytes = std::fs::read(file_path)
            .map_err(ConvertError::Io)
            .with_context(|| format!("Failed to read input file {}", file_path.display()))?;
        debug!("Read {} ({})", file_path.display(), FileManager::format_size(bytes.len() as u64));

        let encoded = self
            .pipeline
            .convert(source_format, &bytes)
            .with_context(|| format!("Failed to convert {}", file_path.display()))?;

        std::fs::write(&output_path, &encoded.bytes).map_err(|source| ConvertError::OutputWrite {
            path: output_path.clone(),
            source,
        })?;

        match source_format {
            ContainerFormat::Png => debug!("JPEG file successfully created at {}", output_path.display()),
            ContainerFormat::Jpeg => debug!("JPEG file successfully compressed and saved at {}", output_path.display()),
        }

        let converted_size = FileManager::get_file_size(&output_path)
            .with_context(|| format!("Failed to stat output file {}", output_path.display()))?;

        Ok(ConvertedFile {
            input_path: file_path.to_path_buf(),
            output_path,
            source_format,
            original_size: bytes.len() as u64,
            converted_size,
        })
    }
}
