pub mod connection;
pub mod types;

pub use connection::{MiddlewarePoolConnection, MiddlewareTx};
pub use types::MiddlewarePool;
