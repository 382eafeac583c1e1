//! Storage Adapter - 临时音频文件

mod file_storage;
mod wav_probe;

pub use file_storage::FileAudioStorage;
pub use wav_probe::probe_duration_ms;
