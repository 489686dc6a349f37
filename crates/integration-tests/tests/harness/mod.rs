#![allow(dead_code)]

pub mod config;
pub mod mock_engines;
pub mod server;

/// A short but well-formed WAV header followed by silence
pub const WAV: &[u8] = b"RIFF\x2c\x00\x00\x00WAVEfmt \x10\x00\x00\x00\x01\x00\x01\x00\x40\x1f\x00\x00\x80\x3e\x00\x00\x02\x00\x10\x00data\x08\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00\x00";

/// Bytes the mock synthesis engine returns
pub const MP3: &[u8] = b"ID3\x04\x00\x00\x00\x00\x00\x00\xff\xfb\x90\x00mock-frames";

/// Number of entries in a directory
pub fn file_count(dir: &std::path::Path) -> usize {
    std::fs::read_dir(dir).map_or(0, Iterator::count)
}
