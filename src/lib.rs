#![forbid(unsafe_code)]
//! spfcheck_lib — résolution récursive des enregistrements SPF

#[macro_use]
mod logging;

pub mod dns;
pub mod net;
pub mod spf;

pub use dns::{DnsResolver, DnsValue, RecordType, ResolutionError, ResolverOptions};
#[cfg(feature = "with-dns")]
pub use dns::SystemResolver;
pub use net::{IpAddress, IpFamily, IpNetwork, NetError, contains, mask, parse_cidr};
pub use spf::{
    DEFAULT_MAX_DEPTH, MalformedReason, ResolverErrorPolicy, SpfAction, SpfEntry, SpfError,
    SpfIpAddress, SpfIpNetwork, SpfIssue, SpfOptions, SpfPrefix, SpfRecord, parse_record,
    resolve_with_resolver,
};
#[cfg(feature = "with-dns")]
pub use spf::{resolve_spf, resolve_spf_with_options};
