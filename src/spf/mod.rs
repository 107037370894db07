//! SPF resolution: fetch a domain's `v=spf1` record, walk its mechanisms and
//! flatten `include`/`redirect`/`a`/`mx` into authorized addresses and networks.
//!
//! [`resolve_with_resolver`] takes any [`DnsResolver`](crate::dns::DnsResolver);
//! [`resolve_spf`] wires in the system resolver (feature `with-dns`).

mod entry;
mod error;
mod mechanism;
mod options;
mod record;
mod resolve;

pub use entry::{SpfEntry, SpfPrefix};
pub use error::{MalformedReason, SpfError};
pub use options::{DEFAULT_MAX_DEPTH, ResolverErrorPolicy, SpfOptions};
pub use record::{SpfAction, SpfIpAddress, SpfIpNetwork, SpfIssue, SpfRecord};
pub use resolve::{parse_record, resolve_with_resolver};

#[cfg(feature = "with-dns")]
use crate::dns::{ResolverOptions, SystemResolver};

#[cfg(feature = "with-dns")]
pub fn resolve_spf(domain: &str) -> Result<Vec<SpfRecord>, SpfError> {
    resolve_spf_with_options(domain, &SpfOptions::default(), &ResolverOptions::default())
}

#[cfg(feature = "with-dns")]
pub fn resolve_spf_with_options(
    domain: &str,
    options: &SpfOptions,
    resolver_options: &ResolverOptions,
) -> Result<Vec<SpfRecord>, SpfError> {
    let ascii = resolve::normalize_domain(domain)?;
    let resolver = SystemResolver::with_options(resolver_options)?;
    resolve_with_resolver(&resolver, &ascii, options)
}
