//! Input validation.
//!
//! This module provides the IP address checks used as a correctness gate
//! before any provider is invoked:
//! - Syntax validation for IPv4, IPv6 and IPv4-mapped IPv6
//! - Version classification
//! - Private range detection (RFC 1918 and fc00::/7)

mod ip;

pub use ip::{
    get_ip_version, is_private_ip, is_valid_ip, is_valid_ipv4, is_valid_ipv6, IpVersion,
};
