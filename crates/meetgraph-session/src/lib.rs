pub mod bootstrap;
pub mod config;
pub mod graph;
pub mod interact;
pub mod net;
pub mod playback;
pub mod render;
pub mod session;
