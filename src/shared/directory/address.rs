//! Postal addresses and geocoder candidates.
//!
//! Addresses are shared between mailboxes and deduplicated on the geocoder's
//! identifier (`ban_id`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::{require_text, SharedError};

/// Minimum query length before the geocoder is called
pub const MIN_GEOCODE_QUERY_LEN: usize = 3;

/// Maximum candidates requested from the geocoder
pub const GEOCODE_RESULT_LIMIT: usize = 10;

/// A stored address
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Address {
    pub id: Uuid,
    pub ban_id: String,
    pub label: String,
    pub housenumber: Option<String>,
    pub street: Option<String>,
    pub postcode: String,
    pub city: String,
    pub citycode: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
}

/// Address fields needed to create (or find) a stored address
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewAddress {
    pub ban_id: String,
    pub label: String,
    #[serde(default)]
    pub housenumber: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    pub postcode: String,
    pub city: String,
    #[serde(default)]
    pub citycode: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl NewAddress {
    /// Check the required fields
    pub fn validate(&self) -> Result<(), SharedError> {
        require_text("ban_id", &self.ban_id)?;
        require_text("label", &self.label)?;
        require_text("postcode", &self.postcode)?;
        require_text("city", &self.city)?;
        Ok(())
    }
}

/// A geocoder match, as returned to clients by the address search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeocodeCandidate {
    #[serde(flatten)]
    pub address: NewAddress,
    pub score: f64,
}

/// GeoJSON `FeatureCollection` returned by the address API
#[derive(Debug, Clone, Deserialize)]
pub struct BanFeatureCollection {
    #[serde(default)]
    pub features: Vec<BanFeature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BanFeature {
    pub properties: BanProperties,
    pub geometry: Option<BanGeometry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BanProperties {
    pub id: String,
    pub label: String,
    pub housenumber: Option<String>,
    pub street: Option<String>,
    pub postcode: String,
    pub city: String,
    pub citycode: Option<String>,
    #[serde(default)]
    pub score: f64,
}

/// Coordinates are `[longitude, latitude]`
#[derive(Debug, Clone, Deserialize)]
pub struct BanGeometry {
    pub coordinates: Vec<f64>,
}

impl From<BanFeature> for GeocodeCandidate {
    fn from(feature: BanFeature) -> Self {
        let (longitude, latitude) = match feature.geometry.as_ref().map(|g| g.coordinates.as_slice()) {
            Some([lon, lat, ..]) => (Some(*lon), Some(*lat)),
            _ => (None, None),
        };
        let p = feature.properties;
        GeocodeCandidate {
            address: NewAddress {
                ban_id: p.id,
                label: p.label,
                housenumber: p.housenumber,
                street: p.street,
                postcode: p.postcode,
                city: p.city,
                citycode: p.citycode,
                latitude,
                longitude,
            },
            score: p.score,
        }
    }
}

/// Whether a query is long enough to be sent to the geocoder
pub fn is_geocodable(query: &str) -> bool {
    query.trim().chars().count() >= MIN_GEOCODE_QUERY_LEN
}
