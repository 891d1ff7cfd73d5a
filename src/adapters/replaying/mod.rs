//! Replaying adapters serving recorded producer exchanges.

pub mod producer;

pub use producer::ReplayingProducer;
