pub mod entry;
pub mod format;

pub use entry::{display_name, VoiceEntry};
pub use format::{has_audio_extension, is_audio_file, AUDIO_EXTENSIONS};
