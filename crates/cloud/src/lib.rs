//! Clients for third-party services: the image host that stores uploads and
//! the language model that expands product search terms.

pub mod compress;
pub mod media;
pub mod transliteration;

pub use compress::{CompressingHost, CompressionSettings};
pub use media::{CloudinaryConfig, CloudinaryHost, MediaError, MediaHost, UploadFile};
pub use transliteration::{LlmConfig, LlmTransliterator, TransliterationError};
