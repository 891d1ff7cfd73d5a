//! Recording adapters that capture producer exchanges to a tape.

pub mod producer;

pub use producer::RecordingProducer;
