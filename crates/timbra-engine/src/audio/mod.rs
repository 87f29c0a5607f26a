pub mod decoder;
pub mod features;

pub use decoder::{decode, DecodedAudio};
pub use features::{cepstral_matrix, FingerprintConfig};
