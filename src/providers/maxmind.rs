//! Local MaxMind GeoLite2 database provider.
//!
//! Answers from three databases (ASN, City, Country) loaded into memory at
//! initialisation. Each database is queried independently; a miss or decode
//! failure in one only empties that section of the payload.

use async_trait::async_trait;
use log::{debug, info, warn};
use maxminddb::{geoip2, Reader};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::config::{MAXMIND_ASN_DB, MAXMIND_CITY_DB, MAXMIND_COUNTRY_DB};
use crate::error_handling::ProviderError;
use crate::lookup::{IpLookupProvider, ProviderResponse};
use crate::validation::{get_ip_version, is_valid_ip};

/// Registered provider name.
pub const MAXMIND_PROVIDER_NAME: &str = "MaxMind";

/// Locations of the three GeoLite2 databases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaxMindPaths {
    /// GeoLite2-ASN database file.
    pub asn: PathBuf,
    /// GeoLite2-City database file.
    pub city: PathBuf,
    /// GeoLite2-Country database file.
    pub country: PathBuf,
}

impl MaxMindPaths {
    /// Standard GeoLite2 file names inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            asn: dir.join(MAXMIND_ASN_DB),
            city: dir.join(MAXMIND_CITY_DB),
            country: dir.join(MAXMIND_COUNTRY_DB),
        }
    }
}

struct Readers {
    asn: Reader<Vec<u8>>,
    city: Reader<Vec<u8>>,
    country: Reader<Vec<u8>>,
}

/// ASN section of the payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AsnRecord {
    /// Autonomous system number.
    pub autonomous_system_number: Option<u32>,
    /// Organisation registered for the AS.
    pub autonomous_system_organization: Option<String>,
}

/// City section of the payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CityRecord {
    /// ISO 3166-1 alpha-2 country code.
    pub country_code: Option<String>,
    /// English country name.
    pub country_name: Option<String>,
    /// English name of the first subdivision.
    pub region: Option<String>,
    /// English city name.
    pub city: Option<String>,
    /// Approximate latitude.
    pub latitude: Option<f64>,
    /// Approximate longitude.
    pub longitude: Option<f64>,
    /// Postal code.
    pub postal_code: Option<String>,
    /// IANA time zone, e.g. `America/Chicago`.
    pub timezone: Option<String>,
}

/// Country section of the payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryRecord {
    /// ISO 3166-1 alpha-2 country code.
    pub iso_code: Option<String>,
    /// English country name.
    pub name: Option<String>,
}

/// Full MaxMind payload. A `null` section means that database had no answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaxMindData {
    /// Answer from the ASN database.
    pub asn: Option<AsnRecord>,
    /// Answer from the City database.
    pub city: Option<CityRecord>,
    /// Answer from the Country database.
    pub country: Option<CountryRecord>,
}

/// Provider backed by local GeoLite2 databases.
pub struct MaxMindProvider {
    paths: MaxMindPaths,
    readers: RwLock<Option<Arc<Readers>>>,
}

impl MaxMindProvider {
    /// Creates an uninitialised provider reading from `paths`.
    pub fn new(paths: MaxMindPaths) -> Self {
        Self {
            paths,
            readers: RwLock::new(None),
        }
    }

    fn readers(&self) -> Option<Arc<Readers>> {
        self.readers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// Loads one GeoLite2 database from a local file path.
async fn load_database(path: &Path) -> Result<Reader<Vec<u8>>, ProviderError> {
    debug!("Loading MaxMind database from: {}", path.display());

    let db_bytes = tokio::fs::read(path).await.map_err(|e| {
        ProviderError::Init(format!(
            "Failed to read MaxMind database from {}: {}",
            path.display(),
            e
        ))
    })?;

    Reader::from_source(db_bytes).map_err(|e| {
        ProviderError::Init(format!(
            "Failed to parse MaxMind database from {}: {}",
            path.display(),
            e
        ))
    })
}

/// Looks up and decodes one record, treating any failure as "no data".
fn decode_record<'a, T>(reader: &'a Reader<Vec<u8>>, ip: IpAddr, kind: &str) -> Option<T>
where
    T: Deserialize<'a>,
{
    // maxminddb 0.27 API: lookup() returns Result<LookupResult, MaxMindDbError>
    let result = match reader.lookup(ip) {
        Ok(result) => result,
        Err(e) => {
            warn!("Failed to lookup {} data for {}: {}", kind, ip, e);
            return None;
        }
    };

    if !result.has_data() {
        debug!("No {} data for {}", kind, ip);
        return None;
    }

    match result.decode() {
        Ok(record) => record,
        Err(e) => {
            warn!("Failed to decode {} data for {}: {}", kind, ip, e);
            None
        }
    }
}

fn lookup_asn(reader: &Reader<Vec<u8>>, ip: IpAddr) -> Option<AsnRecord> {
    let asn: geoip2::Asn = decode_record(reader, ip, "asn")?;
    Some(AsnRecord {
        autonomous_system_number: asn.autonomous_system_number,
        autonomous_system_organization: asn.autonomous_system_organization.map(|s| s.to_string()),
    })
}

fn lookup_city(reader: &Reader<Vec<u8>>, ip: IpAddr) -> Option<CityRecord> {
    let city: geoip2::City = decode_record(reader, ip, "city")?;
    Some(CityRecord {
        country_code: city.country.iso_code.map(|s| s.to_string()),
        country_name: city.country.names.english.map(|s| s.to_string()),
        region: city
            .subdivisions
            .first()
            .and_then(|subdivision| subdivision.names.english)
            .map(|s| s.to_string()),
        city: city.city.names.english.map(|s| s.to_string()),
        latitude: city.location.latitude,
        longitude: city.location.longitude,
        postal_code: city.postal.code.map(|s| s.to_string()),
        timezone: city.location.time_zone.map(|s| s.to_string()),
    })
}

fn lookup_country(reader: &Reader<Vec<u8>>, ip: IpAddr) -> Option<CountryRecord> {
    let country: geoip2::Country = decode_record(reader, ip, "country")?;
    Some(CountryRecord {
        iso_code: country.country.iso_code.map(|s| s.to_string()),
        name: country.country.names.english.map(|s| s.to_string()),
    })
}

/// Parses a validated address, unwrapping the IPv4-mapped form.
fn parse_address(ip: &str) -> Result<IpAddr, ProviderError> {
    let addr: IpAddr = ip
        .parse()
        .map_err(|_| ProviderError::InvalidAddress(ip.to_string()))?;
    Ok(match addr {
        IpAddr::V6(v6) => v6
            .to_ipv4_mapped()
            .map(IpAddr::V4)
            .unwrap_or(IpAddr::V6(v6)),
        v4 => v4,
    })
}

#[async_trait]
impl IpLookupProvider for MaxMindProvider {
    fn name(&self) -> &str {
        MAXMIND_PROVIDER_NAME
    }

    async fn initialise(&self) -> Result<(), ProviderError> {
        let (asn, city, country) = tokio::try_join!(
            load_database(&self.paths.asn),
            load_database(&self.paths.city),
            load_database(&self.paths.country),
        )?;

        info!(
            "MaxMind databases loaded: asn=build_{}, city=build_{}, country=build_{}",
            asn.metadata.build_epoch, city.metadata.build_epoch, country.metadata.build_epoch
        );

        let mut guard = self.readers.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(Arc::new(Readers { asn, city, country }));
        Ok(())
    }

    async fn is_available(&self) -> bool {
        let available = self.readers().is_some();
        if !available {
            debug!("MaxMind provider is not available");
        }
        available
    }

    async fn lookup(&self, ip: &str) -> Result<Option<ProviderResponse>, ProviderError> {
        if ip.is_empty() {
            return Err(ProviderError::MissingAddress);
        }
        if !is_valid_ip(ip) {
            debug!(
                "Rejecting malformed address {} (version {:?})",
                ip,
                get_ip_version(ip)
            );
            return Err(ProviderError::InvalidAddress(ip.to_string()));
        }
        let readers = self.readers().ok_or_else(|| {
            ProviderError::Unavailable("MaxMind databases not initialised".to_string())
        })?;

        let addr = parse_address(ip)?;
        let data = MaxMindData {
            asn: lookup_asn(&readers.asn, addr),
            city: lookup_city(&readers.city, addr),
            country: lookup_country(&readers.country, addr),
        };

        if data.asn.is_none() && data.city.is_none() && data.country.is_none() {
            return Err(ProviderError::NoData(ip.to_string()));
        }

        debug!(
            "MaxMind lookup for {}: asn={}, city={}, country={}",
            ip,
            data.asn.is_some(),
            data.city.is_some(),
            data.country.is_some()
        );

        let payload = serde_json::to_value(&data)
            .map_err(|e| ProviderError::Request(format!("Failed to encode MaxMind record: {}", e)))?;
        Ok(Some(ProviderResponse::new(ip, payload)))
    }
}
