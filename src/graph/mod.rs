pub mod client;
#[cfg(test)]
pub(crate) mod scripted;
pub mod transport;

pub use client::GraphClient;
pub use transport::{HttpReply, HttpTransport, ReqwestTransport};
