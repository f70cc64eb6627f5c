//! # Space Image Converter Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per altri consumatori
//!
//! ## Architettura dei moduli:
//! - `config`: Configurazione della conversione e validazione parametri
//! - `error`: Tipi di errore custom per le diverse operazioni
//! - `image_buffer`: Buffer di pixel, layout e immagini codificate
//! - `image_processor`: Pipeline decode → RGB → encode JPEG
//! - `file_manager`: Operazioni su cartelle e discovery immagini
//! - `converter`: Orchestratore del processo batch
//! - `progress`: Progress bar e statistiche
//! - `json_output`: Eventi JSON per uso programmatico
//!
//! ## Utilizzo:
//! ```rust
//! use space_image_converter::{BatchConverter, Config};
//!
//! let config = Config { quality: 85, ..Default::default() };
//! let stats = BatchConverter::new(config)?.run()?;
//! ```

pub mod config;
pub mod error;
pub mod image_buffer;
pub mod image_processor;
pub mod file_manager;
pub mod converter;
pub mod progress;
pub mod json_output;

pub use config::{Config, FailurePolicy};
pub use error::ConvertError;
pub use image_buffer::{ContainerFormat, EncodedImage, ImageBuffer, PixelLayout};
pub use image_processor::ImagePipeline;
pub use converter::BatchConverter;
pub use progress::ConversionStats;
