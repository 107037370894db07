use std::collections::HashMap;

use super::{
    DnsResolver, DnsValue, RecordType, ResolutionError, ResolverOptions, normalize_name,
};
use crate::net::IpAddress;

struct StubResolver {
    answers: HashMap<(String, RecordType), Vec<DnsValue>>,
}

impl StubResolver {
    fn new() -> Self {
        Self {
            answers: HashMap::new(),
        }
    }

    fn insert(&mut self, name: &str, record_type: RecordType, values: Vec<DnsValue>) {
        self.answers.insert((normalize_name(name), record_type), values);
    }
}

impl DnsResolver for StubResolver {
    fn lookup(
        &self,
        name: &str,
        record_type: RecordType,
    ) -> Result<Vec<DnsValue>, ResolutionError> {
        if name == "servfail.test" {
            return Err(ResolutionError::lookup(name, record_type, "SERVFAIL"));
        }
        Ok(self
            .answers
            .get(&(normalize_name(name), record_type))
            .cloned()
            .unwrap_or_default())
    }
}

fn text(value: &str) -> DnsValue {
    DnsValue::Text(value.to_string())
}

#[test]
fn get_spf_txt_keeps_only_spf_records() {
    let mut stub = StubResolver::new();
    stub.insert(
        "example.com",
        RecordType::Txt,
        vec![
            text("google-site-verification=abc"),
            text("  V=SPF1 ip4:192.0.2.1 -all"),
            text("v=DMARC1; p=none"),
        ],
    );

    let records = stub.get_spf_txt("example.com").expect("lookup succeeds");
    assert_eq!(records, vec!["V=SPF1 ip4:192.0.2.1 -all".to_string()]);
}

#[test]
fn missing_names_yield_empty_answers() {
    let stub = StubResolver::new();
    assert!(stub.get_spf_txt("nowhere.test").expect("empty").is_empty());
    assert!(stub.lookup_addresses("nowhere.test").expect("empty").is_empty());
}

#[test]
fn lookup_addresses_returns_a_before_aaaa() {
    let mut stub = StubResolver::new();
    stub.insert(
        "mail.example.com",
        RecordType::Aaaa,
        vec![DnsValue::Address(IpAddress::parse("2001:db8::25").unwrap())],
    );
    stub.insert(
        "mail.example.com",
        RecordType::A,
        vec![DnsValue::Address(IpAddress::parse("192.0.2.25").unwrap())],
    );

    let addresses = stub.lookup_addresses("Mail.Example.com.").expect("lookup succeeds");
    let rendered: Vec<String> = addresses.iter().map(ToString::to_string).collect();
    assert_eq!(rendered, vec!["192.0.2.25", "2001:db8::25"]);
}

#[test]
fn typed_helpers_filter_by_variant() {
    let mut stub = StubResolver::new();
    stub.insert(
        "example.com",
        RecordType::Mx,
        vec![DnsValue::Name("mx1.example.com".to_string()), text("junk")],
    );
    stub.insert(
        "www.example.com",
        RecordType::Cname,
        vec![DnsValue::Name("edge.example.net".to_string())],
    );

    assert_eq!(
        stub.lookup_mx_hosts("example.com").expect("mx"),
        vec!["mx1.example.com".to_string()]
    );
    assert_eq!(
        stub.lookup_cname("www.example.com").expect("cname"),
        vec!["edge.example.net".to_string()]
    );
}

#[test]
fn transport_failures_surface_as_errors() {
    let stub = StubResolver::new();
    let err = stub.get_txt("servfail.test").expect_err("should fail");
    assert!(matches!(
        err,
        ResolutionError::Lookup {
            record_type: RecordType::Txt,
            ..
        }
    ));
    assert_eq!(err.to_string(), "TXT lookup failed for servfail.test: SERVFAIL");
}

#[test]
fn resolver_options_filter_nameservers() {
    let options = ResolverOptions::new()
        .with_nameservers(["192.0.2.53", "not-an-ip", "192.0.2.53", " 2001:db8::53 "])
        .with_attempts(0)
        .with_timeout_ms(1_500);

    assert_eq!(options.nameservers().len(), 3);
    assert_eq!(options.nameserver_ips().len(), 2);
    assert_eq!(options.attempts(), 1);
    assert_eq!(options.timeout().as_millis(), 1_500);
}

#[test]
fn normalize_name_trims_dot_and_lowercases() {
    assert_eq!(normalize_name("Mail.EXAMPLE.com."), "mail.example.com");
}
