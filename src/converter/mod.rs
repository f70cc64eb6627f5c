//! # Converter Module
//!
//! Modulo che separa le responsabilità in sottomoduli:
//! - `batch_converter`: Orchestratore principale
//! - `task_converter`: Worker per singoli file
//! - `progress_tracker`: Gestione progress unificata
//! - `path_resolver`: Logica di calcolo path centralizzata

pub mod batch_converter;
pub mod task_converter;
pub mod progress_tracker;
pub mod path_resolver;

pub use batch_converter::BatchConverter;
pub use task_converter::{ConvertedFile, TaskConverter};
pub use progress_tracker::ProgressTracker;
pub use path_resolver::PathResolver;
