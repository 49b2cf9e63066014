//! Wire types and errors used by the server.

pub mod capabilities;
pub mod error;
pub mod response;

pub use capabilities::*;
pub use error::*;
pub use response::*;
