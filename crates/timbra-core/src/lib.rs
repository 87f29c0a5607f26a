//! Core domain model for timbra.
//!
//! This crate defines the voice-entry data model, the supported-audio
//! extension policy, and the SQLite-backed catalog that maps display
//! labels to registered file paths.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod catalog;
pub mod error;
pub mod model;

pub use catalog::Catalog;
pub use error::{Error, Result};
pub use model::{has_audio_extension, is_audio_file, VoiceEntry, AUDIO_EXTENSIONS};
