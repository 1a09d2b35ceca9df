pub mod decode;
pub mod text_cleaner;

pub use decode::{decode_lossy, DecodeMode};
pub use text_cleaner::{CleanedText, TextCleaner};
