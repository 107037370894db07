use std::collections::HashSet;

use super::{
    MalformedReason, ResolverErrorPolicy, SpfError, SpfIpAddress, SpfIpNetwork, SpfIssue,
    SpfOptions, SpfPrefix, SpfRecord,
    mechanism::{CidrLengths, Term},
};
use crate::dns::{DnsResolver, ResolutionError, normalize_name};
use crate::net::IpNetwork;

/// Resolve the SPF policy published by `domain`.
///
/// Returns the records in depth-first token order: the root record first,
/// then one record per successfully expanded `include`/`redirect`. An empty
/// vector means the domain publishes no `v=spf1` TXT record.
pub fn resolve_with_resolver<R>(
    resolver: &R,
    domain: &str,
    options: &SpfOptions,
) -> Result<Vec<SpfRecord>, SpfError>
where
    R: DnsResolver + ?Sized,
{
    let ascii = normalize_domain(domain)?;
    let Some(raw) = resolver.get_spf_txt(&ascii)?.into_iter().next() else {
        spf_debug!("no SPF record published at {ascii}");
        return Ok(Vec::new());
    };

    Engine::new(resolver, options).parse(&ascii, &ascii, &raw, 0)
}

/// Parse an SPF record already fetched for `domain`, expanding its
/// mechanisms through `resolver`.
pub fn parse_record<R>(
    resolver: &R,
    domain: &str,
    raw: &str,
    options: &SpfOptions,
) -> Result<Vec<SpfRecord>, SpfError>
where
    R: DnsResolver + ?Sized,
{
    let ascii = normalize_domain(domain)?;
    Engine::new(resolver, options).parse(&ascii, &ascii, raw, 0)
}

pub(crate) fn normalize_domain(domain: &str) -> Result<String, SpfError> {
    let trimmed = domain.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        return Err(SpfError::EmptyDomain);
    }
    idna::domain_to_ascii(trimmed).map_err(SpfError::idna)
}

/// State shared by every nested parse of one resolution.
struct Engine<'a, R: ?Sized> {
    resolver: &'a R,
    options: &'a SpfOptions,
    visited: HashSet<String>,
}

impl<'a, R> Engine<'a, R>
where
    R: DnsResolver + ?Sized,
{
    fn new(resolver: &'a R, options: &'a SpfOptions) -> Self {
        Self {
            resolver,
            options,
            visited: HashSet::new(),
        }
    }

    fn parse(
        &mut self,
        domain: &str,
        source: &str,
        raw: &str,
        depth: usize,
    ) -> Result<Vec<SpfRecord>, SpfError> {
        let tokens: Vec<&str> = raw.split(' ').filter(|token| !token.is_empty()).collect();
        if tokens.len() < 2 {
            return Err(SpfError::malformed(raw, MalformedReason::TooFewTokens));
        }

        // The last `v=` wins even after a terminal; reject before expanding so a
        // malformed branch leaves nothing behind in `visited`.
        let version = tokens
            .iter()
            .copied()
            .filter_map(|token| match Term::parse(token) {
                Term::Version(value) => Some(value),
                _ => None,
            })
            .last();
        if !version.is_some_and(|value| value.eq_ignore_ascii_case("spf1")) {
            let reason = MalformedReason::InvalidVersion {
                version: version.map(str::to_string),
            };
            return Err(SpfError::malformed(raw, reason));
        }

        spf_debug!("parsing SPF record of {source} for {domain} at depth {depth}: {raw}");
        self.visited.insert(normalize_name(source));

        let mut record = SpfRecord::new(domain, source, raw, depth);
        let mut nested = Vec::new();
        let mut terminal = false;

        for token in tokens {
            match Term::parse(token) {
                Term::Version(value) => record.set_version(value),
                _ if terminal => {}
                Term::Ip { prefix, value } => record.push_entry(prefix, value),
                Term::Include(target) => {
                    record.push_entry(SpfPrefix::Include, target);
                    self.expand(&mut record, &mut nested, target)?;
                }
                Term::Redirect(target) => {
                    record.push_entry(SpfPrefix::Redirect, target);
                    self.expand(&mut record, &mut nested, target)?;
                }
                Term::Host {
                    prefix,
                    malformed_cidr: true,
                    value,
                    ..
                } => {
                    spf_warn!("invalid mask in {prefix} mechanism {token} of {source}");
                    record.push_entry(SpfPrefix::InvalidNetwork, value);
                }
                Term::Host {
                    prefix,
                    target,
                    cidr,
                    value,
                    ..
                } => {
                    record.push_entry(prefix, value);
                    let host = target.unwrap_or(source);
                    if prefix == SpfPrefix::Mx {
                        self.resolve_mx(&mut record, host, token, cidr)?;
                    } else {
                        self.resolve_host(&mut record, host, token, cidr)?;
                    }
                }
                Term::Passthrough { prefix, value } => record.push_entry(prefix, value),
                Term::All(action) => {
                    record.set_final_action(action);
                    terminal = true;
                }
                Term::Exp(target) => {
                    record.push_entry(SpfPrefix::Exp, target);
                    if self.options.fetches_explanation() {
                        self.fetch_explanation(&mut record, target)?;
                    }
                }
                Term::Unknown => spf_debug!("ignoring unknown token {token} in {source}"),
            }
        }

        record.resolve_literals();

        let mut records = Vec::with_capacity(nested.len() + 1);
        records.push(record);
        records.append(&mut nested);
        Ok(records)
    }

    /// Follow an `include` or `redirect`; the target's records go to `nested`.
    fn expand(
        &mut self,
        record: &mut SpfRecord,
        nested: &mut Vec<SpfRecord>,
        target: &str,
    ) -> Result<(), SpfError> {
        if self.visited.contains(&normalize_name(target)) {
            spf_warn!("{target} already expanded, skipping (from {})", record.source());
            record.push_issue(SpfIssue::CycleDetected {
                domain: target.to_string(),
            });
            return Ok(());
        }

        let depth = record.depth() + 1;
        if depth > self.options.max_depth() {
            spf_warn!("depth limit reached before {target} (from {})", record.source());
            record.push_issue(SpfIssue::DepthExceeded {
                domain: target.to_string(),
                depth,
            });
            return Ok(());
        }

        let texts = match self.resolver.get_spf_txt(target) {
            Ok(texts) => texts,
            Err(err) => return self.tolerate(record, target, err),
        };
        if texts.is_empty() {
            spf_warn!("{target} publishes no SPF record (from {})", record.source());
            record.push_issue(SpfIssue::MissingRecord {
                domain: target.to_string(),
            });
            return Ok(());
        }

        let domain = record.domain().to_string();
        for text in texts {
            match self.parse(&domain, target, &text, depth) {
                Ok(mut records) => nested.append(&mut records),
                Err(SpfError::Malformed { reason, .. }) => {
                    spf_warn!("skipping malformed record of {target}: {reason}");
                    record.push_issue(SpfIssue::MalformedInclude {
                        domain: target.to_string(),
                        message: reason.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    /// `a` mechanism: A/AAAA answers of `host` feed the declaring record.
    fn resolve_host(
        &self,
        record: &mut SpfRecord,
        host: &str,
        token: &str,
        cidr: Option<CidrLengths>,
    ) -> Result<(), SpfError> {
        let addresses = match self.resolver.lookup_addresses(host) {
            Ok(addresses) => addresses,
            Err(err) => return self.tolerate(record, host, err),
        };

        let origin = format!("{host} {token}");
        for address in addresses {
            let Some(prefix_len) = cidr.and_then(|cidr| cidr.for_family(address.family())) else {
                record.push_address(SpfIpAddress::new(origin.clone(), address));
                continue;
            };
            match IpNetwork::new_masked(address, prefix_len) {
                Ok(network) => record.push_network(SpfIpNetwork::new(origin.clone(), network)),
                Err(err) => {
                    spf_warn!("cannot mask {address} from {origin}: {err}");
                    record.push_entry(SpfPrefix::InvalidNetwork, format!("{address}/{prefix_len}"));
                }
            }
        }
        Ok(())
    }

    /// `mx` mechanism: every exchange of `domain` is treated like an `a` target.
    fn resolve_mx(
        &self,
        record: &mut SpfRecord,
        domain: &str,
        token: &str,
        cidr: Option<CidrLengths>,
    ) -> Result<(), SpfError> {
        let hosts = match self.resolver.lookup_mx_hosts(domain) {
            Ok(hosts) => hosts,
            Err(err) => return self.tolerate(record, domain, err),
        };
        for host in hosts {
            self.resolve_host(record, &host, token, cidr)?;
        }
        Ok(())
    }

    fn fetch_explanation(&self, record: &mut SpfRecord, target: &str) -> Result<(), SpfError> {
        match self.resolver.get_txt(target) {
            Ok(texts) => {
                if let Some(text) = texts.into_iter().next() {
                    record.set_explanation(text);
                }
                Ok(())
            }
            Err(err) => self.tolerate(record, target, err),
        }
    }

    fn tolerate(
        &self,
        record: &mut SpfRecord,
        target: &str,
        err: ResolutionError,
    ) -> Result<(), SpfError> {
        match self.options.resolver_errors() {
            ResolverErrorPolicy::Abort => Err(SpfError::from(err)),
            ResolverErrorPolicy::Tolerate => {
                spf_warn!("lookup failed for {target} (from {}): {err}", record.source());
                record.push_issue(SpfIssue::LookupFailed {
                    target: target.to_string(),
                    message: err.to_string(),
                });
                Ok(())
            }
        }
    }
}
