mod client_sink;
mod registry;
mod ws_handler;

pub use client_sink::ClientSink;
pub use registry::ClientRegistry;
pub use ws_handler::ws_handler;
