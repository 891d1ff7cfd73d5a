//! Adapter implementations of the port traits.
//!
//! `live` talks to the real world, `replaying` serves producer calls from a
//! recorded tape, `recording` wraps the live producer and captures a tape.

pub mod live;
pub mod recording;
pub mod replaying;
