//! Audio assembly for the storyvox pipeline.
//!
//! [`AudioAssembler`] concatenates synthesized fragments, in the order the
//! caller gives them, into one narration file. Fragments are decoded with
//! `symphonia`, joined sample for sample and written once with `hound`.
//! Non-WAV containers are produced by handing the assembled WAV to
//! [`Transcoder`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod assembler;
mod decode;
mod transcode;

pub use assembler::AudioAssembler;
pub use decode::{DecodedFragment, Pcm, StreamSpec, decode_fragment};
pub use transcode::Transcoder;
