//! Delivery sinks
//!
//! A sink is the receiving end of one subscription. The bus hands events to
//! a sink from that subscription's own worker thread, one at a time and in
//! publish order, so `deliver` may block without stalling anyone else.
//! Returning [`SinkError::Closed`] ends the subscription.

use crate::bus::event::Event;
use crate::utils::error::SinkError;

pub trait Sink: Send + Sync {
    fn deliver(&self, event: &Event) -> Result<(), SinkError>;
}

/// Callback sink.
pub struct FnSink<F>(F);

impl<F> FnSink<F>
where
    F: Fn(&Event) -> Result<(), SinkError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> Sink for FnSink<F>
where
    F: Fn(&Event) -> Result<(), SinkError> + Send + Sync,
{
    fn deliver(&self, event: &Event) -> Result<(), SinkError> {
        (self.0)(event)
    }
}
