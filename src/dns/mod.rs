//! DNS collaborator consumed by the SPF engine.
//!
//! The engine only ever talks to a [`DnsResolver`]; [`SystemResolver`] is the
//! trust-dns backed implementation (feature `with-dns`). Tests plug in stubs.

mod error;
mod options;
#[cfg(feature = "with-dns")]
mod system;
mod types;

pub use error::ResolutionError;
pub use options::ResolverOptions;
#[cfg(feature = "with-dns")]
pub use system::SystemResolver;
pub use types::{DnsValue, RecordType};

use crate::net::IpAddress;

/// Typed DNS lookups.
///
/// Implementations report "name not found" and "no records of this type" as
/// an empty vector. Every other failure is a [`ResolutionError`].
pub trait DnsResolver {
    fn lookup(&self, name: &str, record_type: RecordType)
    -> Result<Vec<DnsValue>, ResolutionError>;

    /// A then AAAA answers for `name`.
    fn lookup_addresses(&self, name: &str) -> Result<Vec<IpAddress>, ResolutionError> {
        let mut addresses = Vec::new();
        for record_type in [RecordType::A, RecordType::Aaaa] {
            addresses.extend(
                self.lookup(name, record_type)?
                    .into_iter()
                    .filter_map(DnsValue::into_address),
            );
        }
        Ok(addresses)
    }

    fn lookup_mx_hosts(&self, name: &str) -> Result<Vec<String>, ResolutionError> {
        Ok(self
            .lookup(name, RecordType::Mx)?
            .into_iter()
            .filter_map(DnsValue::into_name)
            .collect())
    }

    fn lookup_cname(&self, name: &str) -> Result<Vec<String>, ResolutionError> {
        Ok(self
            .lookup(name, RecordType::Cname)?
            .into_iter()
            .filter_map(DnsValue::into_name)
            .collect())
    }

    fn get_txt(&self, name: &str) -> Result<Vec<String>, ResolutionError> {
        Ok(self
            .lookup(name, RecordType::Txt)?
            .into_iter()
            .filter_map(DnsValue::into_text)
            .collect())
    }

    /// TXT records of `name` that start with `v=spf1` (any case).
    fn get_spf_txt(&self, name: &str) -> Result<Vec<String>, ResolutionError> {
        Ok(self
            .get_txt(name)?
            .into_iter()
            .map(|record| record.trim().to_string())
            .filter(|trimmed| starts_with_ignore_ascii_case(trimmed, "v=spf1"))
            .collect())
    }
}

pub(crate) fn starts_with_ignore_ascii_case(input: &str, prefix: &str) -> bool {
    input
        .get(..prefix.len())
        .map(|head| head.eq_ignore_ascii_case(prefix))
        .unwrap_or(false)
}

/// Lowercase a DNS name and drop the trailing root dot.
pub(crate) fn normalize_name(name: &str) -> String {
    name.trim().trim_end_matches('.').to_ascii_lowercase()
}

#[cfg(test)]
mod tests;
