pub mod channel;
pub mod protocol;

pub use channel::{spawn_channel, ChannelHandle};
pub use protocol::Incoming;
