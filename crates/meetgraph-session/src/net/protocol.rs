use meetgraph_core::ChannelEvent;

/// What the channel reader delivers to the session loop. Transport faults
/// surface as values; the session resumes idempotently on reconnect.
#[derive(Debug, Clone)]
pub enum Incoming {
    Connected,
    Disconnected,
    Event(ChannelEvent),
    Error(String),
}
