//! IP address validation and classification.
//!
//! Every function here is total: malformed input yields `false` or `None`,
//! never a panic. Validation is textual (grammar checks on the string) so that
//! it can gate addresses before they reach any provider.
//!
//! Classification rules:
//! - IPv4: four dot-separated decimal groups of 1-3 digits, each in [0, 255].
//!   Leading zeros (`"01"`) are accepted because each group is checked
//!   numerically.
//! - IPv6: colon-separated hextets with at most one `::`. Without `::` there
//!   must be exactly 8 hextets; with `::` the explicit hextets must total at
//!   most 7, so the compression always stands for at least one group.
//! - IPv4-mapped IPv6 (`::ffff:a.b.c.d`): validity reduces to the trailing
//!   dotted quad, and the address is classified as IPv4.

use regex::Regex;
use std::net::Ipv6Addr;
use std::sync::LazyLock;
use strum_macros::{AsRefStr, Display};

/// Dotted-quad shape; ranges are checked separately.
static IPV4_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,3}\.){3}\d{1,3}$").expect("IPv4 pattern is a valid regex")
});

/// `::ffff:` followed by a dotted quad.
static IPV4_MAPPED_IPV6_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)::ffff:((\d{1,3}\.){3}\d{1,3})$")
        .expect("IPv4-mapped IPv6 pattern is a valid regex")
});

/// RFC 1918 ranges as inclusive `(start, end)` pairs.
const PRIVATE_IPV4_RANGES: [(u32, u32); 3] = [
    (0x0A00_0000, 0x0AFF_FFFF), // 10.0.0.0 - 10.255.255.255
    (0xAC10_0000, 0xAC1F_FFFF), // 172.16.0.0 - 172.31.255.255
    (0xC0A8_0000, 0xC0A8_FFFF), // 192.168.0.0 - 192.168.255.255
];

/// Unique local addresses, fc00:: through fdff:ffff:...:ffff.
const PRIVATE_IPV6_RANGE: ([u8; 16], [u8; 16]) = (
    [0xfc, 0x00, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [
        0xfd, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
        0xff,
    ],
);

/// IP protocol version of a validated address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum IpVersion {
    #[strum(serialize = "v4")]
    V4,
    #[strum(serialize = "v6")]
    V6,
}

/// Returns true for IPv4, IPv6 and IPv4-mapped IPv6 addresses.
pub fn is_valid_ip(ip: &str) -> bool {
    if let Some(ipv4) = mapped_ipv4_part(ip) {
        return is_valid_ipv4(ipv4);
    }
    is_valid_ipv4(ip) || is_valid_ipv6(ip)
}

/// Returns true for a dotted-quad IPv4 address with every octet in [0, 255].
pub fn is_valid_ipv4(ip: &str) -> bool {
    if !IPV4_PATTERN.is_match(ip) {
        return false;
    }
    ip.split('.')
        .all(|octet| octet.parse::<u16>().map(|n| n <= 255).unwrap_or(false))
}

/// Returns true for a hextet-only IPv6 address with at most one `::`.
///
/// Embedded dotted quads are not part of this grammar; the mapped form is
/// recognised by [`is_valid_ip`] instead.
pub fn is_valid_ipv6(ip: &str) -> bool {
    if ip.is_empty() {
        return false;
    }

    let mut halves = ip.split("::");
    let head = halves.next().unwrap_or_default();
    let tail = halves.next();
    if halves.next().is_some() {
        // more than one point of compression
        return false;
    }

    match tail {
        None => match hextets(head) {
            Some(count) => count == 8,
            None => false,
        },
        Some(tail) => match (hextets(head), hextets(tail)) {
            (Some(left), Some(right)) => left + right <= 7,
            _ => false,
        },
    }
}

/// Counts the hextets in one side of an address, or `None` if any group is
/// malformed. An empty side counts as zero groups.
fn hextets(side: &str) -> Option<usize> {
    if side.is_empty() {
        return Some(0);
    }
    let mut count = 0;
    for group in side.split(':') {
        let well_formed = (1..=4).contains(&group.len())
            && group.chars().all(|c| c.is_ascii_hexdigit());
        if !well_formed {
            return None;
        }
        count += 1;
    }
    Some(count)
}

/// Returns the protocol version of an address, or `None` if it is invalid.
///
/// IPv4-mapped IPv6 addresses are reported as [`IpVersion::V4`].
pub fn get_ip_version(ip: &str) -> Option<IpVersion> {
    if let Some(ipv4) = mapped_ipv4_part(ip) {
        return is_valid_ipv4(ipv4).then_some(IpVersion::V4);
    }
    if is_valid_ipv4(ip) {
        Some(IpVersion::V4)
    } else if is_valid_ipv6(ip) {
        Some(IpVersion::V6)
    } else {
        None
    }
}

/// Returns true for RFC 1918 IPv4 addresses and fc00::/7 IPv6 addresses.
///
/// An IPv4-mapped address is classified by its embedded IPv4 address.
pub fn is_private_ip(ip: &str) -> bool {
    match get_ip_version(ip) {
        Some(IpVersion::V4) => {
            let ipv4 = mapped_ipv4_part(ip).unwrap_or(ip);
            ipv4_to_u32(ipv4)
                .map(|n| {
                    PRIVATE_IPV4_RANGES
                        .iter()
                        .any(|&(start, end)| n >= start && n <= end)
                })
                .unwrap_or(false)
        }
        Some(IpVersion::V6) => match ip.parse::<Ipv6Addr>() {
            Ok(addr) => {
                let bytes = addr.octets();
                let (start, end) = PRIVATE_IPV6_RANGE;
                bytes >= start && bytes <= end
            }
            Err(_) => false,
        },
        None => false,
    }
}

fn mapped_ipv4_part(ip: &str) -> Option<&str> {
    IPV4_MAPPED_IPV6_PATTERN
        .captures(ip)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn ipv4_to_u32(ip: &str) -> Option<u32> {
    ip.split('.').try_fold(0u32, |acc, octet| {
        let value = octet.parse::<u8>().ok()?;
        Some((acc << 8) | u32::from(value))
    })
}
