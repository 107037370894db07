use trust_dns_resolver::{
    Resolver,
    config::{NameServerConfigGroup, ResolverConfig, ResolverOpts},
    error::{ResolveError, ResolveErrorKind},
    lookup::TxtLookup,
    proto::rr::{RData, RecordType as WireRecordType},
};

use super::{DnsResolver, DnsValue, RecordType, ResolutionError, ResolverOptions, normalize_name};
use crate::net::IpAddress;

/// Blocking resolver backed by trust-dns.
pub struct SystemResolver {
    inner: Resolver,
}

impl SystemResolver {
    /// Without nameservers, falls back to `/etc/resolv.conf` (or the platform equivalent).
    pub fn with_options(options: &ResolverOptions) -> Result<Self, ResolutionError> {
        let ips = options.nameserver_ips();
        let (config, mut opts) = if ips.is_empty() {
            trust_dns_resolver::system_conf::read_system_conf()
                .map_err(|err| ResolutionError::resolver_init(std::io::Error::other(err)))?
        } else {
            let group = NameServerConfigGroup::from_ips_clear(&ips, 53, true);
            (
                ResolverConfig::from_parts(None, Vec::new(), group),
                ResolverOpts::default(),
            )
        };
        opts.timeout = options.timeout();
        opts.attempts = options.attempts();

        let inner = Resolver::new(config, opts).map_err(ResolutionError::resolver_init)?;
        Ok(Self { inner })
    }

    fn lookup_txt(&self, name: &str) -> Result<Vec<DnsValue>, ResolutionError> {
        let lookup = match self.inner.txt_lookup(name) {
            Ok(lookup) => lookup,
            Err(err) => {
                if should_treat_as_empty(&err) {
                    return Ok(Vec::new());
                }
                return Err(ResolutionError::lookup(name, RecordType::Txt, err));
            }
        };
        collect_txt_records(name, &lookup)
    }
}

impl DnsResolver for SystemResolver {
    fn lookup(
        &self,
        name: &str,
        record_type: RecordType,
    ) -> Result<Vec<DnsValue>, ResolutionError> {
        let answers = match record_type {
            RecordType::A => self.inner.ipv4_lookup(name).map(|lookup| {
                lookup
                    .iter()
                    .map(|a| DnsValue::Address(IpAddress::from(a.0)))
                    .collect()
            }),
            RecordType::Aaaa => self.inner.ipv6_lookup(name).map(|lookup| {
                lookup
                    .iter()
                    .map(|aaaa| DnsValue::Address(IpAddress::from(aaaa.0)))
                    .collect()
            }),
            RecordType::Mx => self.inner.mx_lookup(name).map(|lookup| {
                lookup
                    .iter()
                    .map(|mx| DnsValue::Name(normalize_name(&mx.exchange().to_utf8())))
                    .collect()
            }),
            RecordType::Cname => self
                .inner
                .lookup(name, WireRecordType::CNAME)
                .map(|lookup| {
                    lookup
                        .iter()
                        .filter_map(|rdata| match rdata {
                            RData::CNAME(cname) => {
                                Some(DnsValue::Name(normalize_name(&cname.0.to_utf8())))
                            }
                            _ => None,
                        })
                        .collect()
                }),
            RecordType::Txt => return self.lookup_txt(name),
        };

        match answers {
            Ok(values) => Ok(values),
            Err(err) if should_treat_as_empty(&err) => Ok(Vec::new()),
            Err(err) => Err(ResolutionError::lookup(name, record_type, err)),
        }
    }
}

fn collect_txt_records(name: &str, lookup: &TxtLookup) -> Result<Vec<DnsValue>, ResolutionError> {
    let mut records = Vec::new();
    for txt in lookup.iter() {
        let mut record = String::new();
        for piece in txt.txt_data().iter() {
            let segment = std::str::from_utf8(piece.as_ref())
                .map_err(|err| ResolutionError::txt_data_utf8(name, err))?;
            record.push_str(segment);
        }
        records.push(DnsValue::Text(record));
    }
    Ok(records)
}

fn should_treat_as_empty(err: &ResolveError) -> bool {
    matches!(err.kind(), ResolveErrorKind::NoRecordsFound { .. })
}
