//! Concrete lookup providers.
//!
//! This module provides:
//! - [`MaxMindProvider`]: local GeoLite2 ASN, City and Country databases
//! - [`IpInfoProvider`]: the remote IPInfo REST API
//!
//! Both validate addresses themselves before doing any work.

mod ipinfo;
mod maxmind;

// Re-export public API
pub use ipinfo::{IpInfoProvider, IpInfoResponse, IPINFO_PROVIDER_NAME};
pub use maxmind::{
    AsnRecord, CityRecord, CountryRecord, MaxMindData, MaxMindPaths, MaxMindProvider,
    MAXMIND_PROVIDER_NAME,
};
