use futures::Stream;

use crate::domain::{Chart, Error, Event};

pub trait EventStream {
    type EvStream: Stream<Item = Result<Event, Error>> + Send + Unpin + 'static;
    fn stream(&mut self) -> Self::EvStream;
}

pub trait DeadLetterQueue {
    fn report(&self, error: &Error);
}

/// Anything that can draw a [`Chart`].
pub trait ChartSurface {
    fn render(&mut self, chart: &Chart) -> Result<(), Error>;
}
