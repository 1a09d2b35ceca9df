use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How byte sequences that are not valid UTF-8 are handled when reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DecodeMode {
    /// Drop undecodable bytes
    #[default]
    Ignore,
    /// Substitute U+FFFD for undecodable bytes
    Replace,
}

/// Decodes `bytes` as UTF-8 without ever failing.
pub fn decode_lossy(bytes: &[u8], mode: DecodeMode) -> String {
    match mode {
        DecodeMode::Ignore => {
            let mut text = String::with_capacity(bytes.len());
            for chunk in bytes.utf8_chunks() {
                text.push_str(chunk.valid());
            }
            text
        }
        DecodeMode::Replace => String::from_utf8_lossy(bytes).into_owned(),
    }
}
