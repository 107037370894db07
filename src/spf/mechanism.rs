use crate::net::IpFamily;

use super::{SpfAction, SpfPrefix};

/// Classification of one space-separated token of an SPF record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Term<'a> {
    Version(&'a str),
    Ip {
        prefix: SpfPrefix,
        value: &'a str,
    },
    Include(&'a str),
    Redirect(&'a str),
    /// `a` or `mx`, with optional `+` qualifier, target and CIDR lengths.
    Host {
        prefix: SpfPrefix,
        target: Option<&'a str>,
        cidr: Option<CidrLengths>,
        malformed_cidr: bool,
        value: &'a str,
    },
    /// `exists` and `ptr`: recorded, never expanded.
    Passthrough {
        prefix: SpfPrefix,
        value: &'a str,
    },
    All(SpfAction),
    Exp(&'a str),
    Unknown,
}

/// Prefix lengths applied to `a`/`mx` answers, per family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CidrLengths {
    v4: Option<u8>,
    v6: Option<u8>,
}

impl CidrLengths {
    pub(crate) fn for_family(self, family: IpFamily) -> Option<u8> {
        match family {
            IpFamily::V4 => self.v4,
            IpFamily::V6 => self.v6,
        }
    }
}

impl<'a> Term<'a> {
    pub(crate) fn parse(token: &'a str) -> Self {
        let lower = token.to_ascii_lowercase();

        if lower.starts_with("v=") {
            return Self::Version(&token[2..]);
        }
        if lower.starts_with("ip4:") {
            return Self::Ip {
                prefix: SpfPrefix::Ip4,
                value: &token[4..],
            };
        }
        if lower.starts_with("ip6:") {
            return Self::Ip {
                prefix: SpfPrefix::Ip6,
                value: &token[4..],
            };
        }
        if lower.starts_with("include:") {
            return Self::Include(&token[8..]);
        }
        if lower.starts_with("redirect=") {
            return Self::Redirect(&token[9..]);
        }
        if lower.starts_with("exp=") {
            return Self::Exp(&token[4..]);
        }
        if lower.starts_with("exists:") {
            return Self::Passthrough {
                prefix: SpfPrefix::Exists,
                value: &token[7..],
            };
        }
        if lower == "ptr" || lower.starts_with("ptr:") {
            return Self::Passthrough {
                prefix: SpfPrefix::Ptr,
                value: token.get(4..).unwrap_or(""),
            };
        }

        match lower.as_str() {
            "all" | "+all" => return Self::All(SpfAction::Pass),
            "-all" => return Self::All(SpfAction::Fail),
            "~all" => return Self::All(SpfAction::SoftFail),
            "?all" => return Self::All(SpfAction::Neutral),
            _ => {}
        }

        let (qualifier_len, unqualified) = match lower.strip_prefix('+') {
            Some(rest) => (1, rest),
            None => (0, lower.as_str()),
        };
        for (name, prefix) in [("a", SpfPrefix::A), ("mx", SpfPrefix::Mx)] {
            let Some(rest) = unqualified.strip_prefix(name) else {
                continue;
            };
            if rest.is_empty() || rest.starts_with(':') || rest.starts_with('/') {
                let start = qualifier_len + name.len();
                return host_term(prefix, &token[start..]);
            }
        }

        Self::Unknown
    }
}

/// `rest` is what follows the mechanism name: `""`, `":host"`, `"/24"`,
/// `":host/24//64"`, ...
fn host_term(prefix: SpfPrefix, rest: &str) -> Term<'_> {
    let value = rest.strip_prefix(':').unwrap_or(rest);
    let (target, cidr_text) = match value.find('/') {
        Some(idx) => (&value[..idx], Some(&value[idx..])),
        None => (value, None),
    };
    let target = Some(target).filter(|target| !target.is_empty());

    let (cidr, malformed_cidr) = match cidr_text {
        None => (None, false),
        Some(text) => match parse_cidr_lengths(text) {
            Some(lengths) => (Some(lengths), false),
            None => (None, true),
        },
    };

    Term::Host {
        prefix,
        target,
        cidr,
        malformed_cidr,
        value,
    }
}

/// Parse `/n`, `//n6` or `/n4//n6`. A single `/n` applies to both families.
fn parse_cidr_lengths(text: &str) -> Option<CidrLengths> {
    if let Some(v6) = text.strip_prefix("//") {
        return Some(CidrLengths {
            v4: None,
            v6: Some(parse_length(v6, 128)?),
        });
    }

    let body = text.strip_prefix('/')?;
    match body.split_once("//") {
        Some((v4, v6)) => Some(CidrLengths {
            v4: Some(parse_length(v4, 32)?),
            v6: Some(parse_length(v6, 128)?),
        }),
        None => {
            let length = parse_length(body, 128)?;
            Some(CidrLengths {
                v4: Some(length),
                v6: Some(length),
            })
        }
    }
}

fn parse_length(text: &str, max: u8) -> Option<u8> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse::<u8>().ok().filter(|length| *length <= max)
}
