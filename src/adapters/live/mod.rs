//! Live adapters backed by the real system and the Anthropic API.

pub mod clock;
pub mod filesystem;
pub mod id_gen;
pub mod producer;

pub use clock::LiveClock;
pub use filesystem::LiveFileSystem;
pub use id_gen::LiveIdGenerator;
pub use producer::LiveProducer;
