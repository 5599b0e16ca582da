//! HTTP collaborators that answer with raw bytes.

mod illustrator;
mod speech;
mod transport;

pub use illustrator::HttpSceneIllustrator;
pub use speech::HttpSpeechSynthesizer;
