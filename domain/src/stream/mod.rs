//! Turn output streaming.
//!
//! - [`demux::StreamDemultiplexer`] splits raw agent output into reasoning and answer
//! - [`event::TurnEvent`] is the caller-facing event stream

pub mod demux;
pub mod event;
