use std::net::{Ipv4Addr, Ipv6Addr};

use proptest::prelude::*;

use super::{IpAddress, IpFamily, IpNetwork, NetError, contains, mask, parse_cidr};

fn v4(text: &str) -> IpAddress {
    IpAddress::parse(text).expect("valid IPv4 literal")
}

fn v6(text: &str) -> IpAddress {
    IpAddress::parse(text).expect("valid IPv6 literal")
}

#[test]
fn parse_cidr_accepts_canonical_literal() {
    let net = parse_cidr("192.0.2.0/24").expect("canonical network");
    assert_eq!(net.base_address(), v4("192.0.2.0"));
    assert_eq!(net.prefix_len(), 24);
    assert_eq!(net.to_string(), "192.0.2.0/24");
}

#[test]
fn parse_cidr_rejects_host_bits() {
    let err = parse_cidr("192.0.2.1/24").expect_err("host bits set");
    assert_eq!(
        err,
        NetError::InvalidNetwork {
            value: "192.0.2.1/24".to_string()
        }
    );
}

#[test]
fn parse_cidr_rejects_bad_shapes() {
    for input in ["192.0.2.0", "192.0.2.0/24/1", "192.0.2.0/abc", "nope/8", "10.0.0.0/33"] {
        assert!(
            matches!(parse_cidr(input), Err(NetError::InvalidNetwork { .. })),
            "{input} should be rejected"
        );
    }
}

#[test]
fn parse_cidr_handles_ipv6() {
    let net = parse_cidr("2001:db8::/32").expect("canonical v6 network");
    assert_eq!(net.family(), IpFamily::V6);
    assert_eq!(net.to_string(), "2001:db8::/32");
    assert!(parse_cidr("2001:db8::1/64").is_err());
}

#[test]
fn mask_without_force_rejects_host_bits() {
    let err = mask(v4("10.1.2.3"), 8, false).expect_err("not on boundary");
    assert!(matches!(err, NetError::InvalidNetwork { .. }));
}

#[test]
fn mask_with_force_clears_host_bits() {
    let net = mask(v4("10.1.2.3"), 8, true).expect("forced mask");
    assert_eq!(net.base_address(), v4("10.0.0.0"));

    let net = mask(v4("203.0.113.77"), 27, true).expect("forced mask");
    assert_eq!(net.to_string(), "203.0.113.64/27");

    let net = mask(v6("2001:db8:abcd:12:1::1"), 48, true).expect("forced v6 mask");
    assert_eq!(net.to_string(), "2001:db8:abcd::/48");
}

#[test]
fn mask_edge_prefixes() {
    assert_eq!(
        mask(v4("198.51.100.9"), 0, true).expect("zero prefix").to_string(),
        "0.0.0.0/0"
    );
    assert_eq!(
        mask(v4("198.51.100.9"), 32, false).expect("full prefix").to_string(),
        "198.51.100.9/32"
    );
    assert_eq!(
        mask(v6("2001:db8::9"), 0, true).expect("zero prefix").to_string(),
        "::/0"
    );
    assert_eq!(
        mask(v6("2001:db8::9"), 128, false).expect("full prefix").to_string(),
        "2001:db8::9/128"
    );
}

#[test]
fn mask_rejects_prefix_wider_than_family() {
    let err = mask(v4("192.0.2.1"), 33, true).expect_err("prefix too wide");
    assert_eq!(
        err,
        NetError::InvalidPrefix {
            prefix: 33,
            family: IpFamily::V4
        }
    );
    assert!(mask(v6("::1"), 129, true).is_err());
}

#[test]
fn contains_checks_family_and_prefix() {
    let net = parse_cidr("192.0.2.0/24").expect("network");
    assert!(contains(&net, &v4("192.0.2.200")));
    assert!(!contains(&net, &v4("192.0.3.1")));
    assert!(!contains(&net, &v6("::ffff:192.0.2.1")));

    let all = parse_cidr("0.0.0.0/0").expect("network");
    assert!(all.contains(&v4("8.8.8.8")));
}

#[test]
fn host_network_uses_family_width() {
    let net = IpNetwork::host(v6("2001:db8::1"));
    assert_eq!(net.prefix_len(), 128);
    assert!(net.contains(&v6("2001:db8::1")));
}

#[test]
fn dotted_forms() {
    let addr = v4("192.0.2.10");
    assert_eq!(addr.to_dotted(), "192.0.2.10");
    assert_eq!(addr.to_reverse_dotted(), "10.2.0.192");

    let addr = v6("2001:db8::1");
    assert_eq!(
        addr.to_dotted(),
        "2.0.0.1.0.d.b.8.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.1"
    );
    assert_eq!(
        addr.to_reverse_dotted(),
        "1.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.0.8.b.d.0.1.0.0.2"
    );
}

#[test]
fn address_reports_family_and_octets() {
    let addr = v4("192.0.2.1");
    assert!(addr.is_ipv4());
    assert!(!addr.is_ipv6());
    assert_eq!(addr.octets(), vec![192, 0, 2, 1]);

    let addr = v6("2001:db8::1");
    assert!(addr.is_ipv6());
    assert_eq!(addr.family().width(), 128);
    assert_eq!(addr.as_ip_addr(), "2001:db8::1".parse::<std::net::IpAddr>().unwrap());
    assert!(IpAddress::parse("not-an-ip").is_err());
}

proptest! {
    #[test]
    fn forced_mask_is_idempotent_v4(raw in any::<u32>(), prefix in 0u8..=32) {
        let addr = IpAddress::from(Ipv4Addr::from(raw));
        let first = mask(addr, prefix, true).unwrap();
        let second = mask(first.base_address(), prefix, true).unwrap();
        prop_assert_eq!(first, second);
        // already canonical, so the strict path agrees
        prop_assert_eq!(mask(first.base_address(), prefix, false).unwrap(), first);
    }

    #[test]
    fn forced_mask_is_idempotent_v6(raw in any::<u128>(), prefix in 0u8..=128) {
        let addr = IpAddress::from(Ipv6Addr::from(raw));
        let first = mask(addr, prefix, true).unwrap();
        let second = mask(first.base_address(), prefix, true).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn forced_mask_clears_host_bits(raw in any::<u32>(), prefix in 0u8..=32) {
        let net = mask(IpAddress::from(Ipv4Addr::from(raw)), prefix, true).unwrap();
        let base = u32::from_be_bytes(net.base_address().octets().try_into().unwrap());
        let host_bits = if prefix == 32 { 0 } else { u32::MAX >> prefix };
        prop_assert_eq!(base & host_bits, 0);
        prop_assert!(net.contains(&IpAddress::from(Ipv4Addr::from(raw))));
    }

    #[test]
    fn contains_is_reflexive_and_prefix_sensitive(raw in any::<u32>(), prefix in 1u8..=32, bit in 0u8..32) {
        let net = mask(IpAddress::from(Ipv4Addr::from(raw)), prefix, true).unwrap();
        prop_assert!(net.contains(&net.base_address()));

        prop_assume!(bit < prefix);
        let base = u32::from_be_bytes(net.base_address().octets().try_into().unwrap());
        let flipped = base ^ (1u32 << (31 - bit));
        prop_assert!(!net.contains(&IpAddress::from(Ipv4Addr::from(flipped))));
    }
}
