//! # Error Types Module
//!
//! Questo modulo definisce tutti i tipi di errore custom della conversione.
//!
//! ## Responsabilità:
//! - Definisce `ConvertError` enum per categorizzare tutti gli errori possibili
//! - Fornisce messaggi di errore descrittivi e strutturati
//! - Integra con `thiserror` per automatic error conversion
//! - Resta downcastable quando viene avvolto da `anyhow::Context`
//!
//! ## Categorie di errori:
//! - `Io`: Errori di I/O in lettura (input non leggibile, listing cartella)
//! - `Folder`: Controllo/creazione cartelle fallito (non fatale)
//! - `Decode`: PNG/JPEG corrotto, troncato o vuoto
//! - `Encode`: Buffer non valido o compressione JPEG fallita
//! - `OutputWrite`: Impossibile aprire/scrivere il file di output
//! - `BufferLength`: Violazione invariante width × height × canali
//! - `UnsupportedFormat`: Estensione non gestita dalla pipeline
//!
//! ## Esempio:
//! ```rust
//! if bytes.is_empty() {
//!     return Err(ConvertError::Decode("empty input".to_string()));
//! }
//! ```

use std::path::PathBuf;

/// Custom error types for image conversion
#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Folder error: {0}")]
    Folder(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Failed to write output file {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid pixel buffer: expected {expected} bytes (width * height * channels), got {actual}")]
    BufferLength { expected: usize, actual: usize },

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
}
