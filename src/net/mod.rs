//! IP address and network value types.
//!
//! [`mask`] is the only place where host bits get cleared: SPF `a/<n>` and
//! `mx/<n>` mechanisms apply a prefix to DNS answers that rarely sit on a
//! network boundary, so forced masking must never fail for a valid prefix.

mod address;
mod error;
mod network;

pub use address::{IpAddress, IpFamily};
pub use error::NetError;
pub use network::{IpNetwork, contains, mask, parse_cidr};

#[cfg(test)]
mod tests;
