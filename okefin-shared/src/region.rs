/// Province and city name lookup
///
/// Users store province and city ids (`id_provinsi`, `id_kota`). Profiles
/// returned to clients carry the names too, fetched from the external
/// Indonesian region service:
///
/// ```text
/// GET {base_url}/province/{id}.json  -> {"id": "11", "name": "ACEH"}
/// GET {base_url}/regency/{id}.json   -> {"id": "1101", "province_id": "11", "name": "KAB. SIMEULUE"}
/// ```
///
/// Lookup failures never fail the request. [`resolve_region`] substitutes
/// a placeholder name and logs a warning.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.emsifa.com/api-wilayah-indonesia/api";
pub const UNKNOWN_PROVINCE: &str = "Unknown Province";
pub const UNKNOWN_CITY: &str = "Unknown City";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Province {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub id: String,
    pub province_id: String,
    pub name: String,
}

/// Error type for region lookups
#[derive(Debug, thiserror::Error)]
pub enum RegionError {
    /// Transport failure, timeout, non-2xx status, or undecodable body
    #[error("Region request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Lookup source has no entry for the id
    #[error("Region {0} not found")]
    NotFound(String),
}

/// Source of province and city names
#[async_trait]
pub trait RegionLookup: Send + Sync {
    async fn province(&self, id: &str) -> Result<Province, RegionError>;

    async fn city(&self, id: &str) -> Result<City, RegionError>;
}

/// [`RegionLookup`] backed by the HTTP region service
#[derive(Debug, Clone)]
pub struct HttpRegionClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRegionClient {
    /// Creates a client with a per-request timeout
    ///
    /// # Errors
    ///
    /// Fails only if the TLS backend cannot be initialized.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RegionError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, RegionError> {
        let url = format!("{}/{}", self.base_url, path);
        let value = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json::<T>()
            .await?;
        Ok(value)
    }
}

#[async_trait]
impl RegionLookup for HttpRegionClient {
    async fn province(&self, id: &str) -> Result<Province, RegionError> {
        self.get_json(&format!("province/{}.json", id)).await
    }

    async fn city(&self, id: &str) -> Result<City, RegionError> {
        self.get_json(&format!("regency/{}.json", id)).await
    }
}

/// Province and city of a user, resolved for display
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedRegion {
    pub province: Option<Province>,
    pub city: Option<City>,
}

/// Resolves province and city names, degrading to placeholders
///
/// An empty id resolves to `None`. A failed lookup resolves to a record
/// carrying the id and a placeholder name.
pub async fn resolve_region(
    lookup: &dyn RegionLookup,
    province_id: &str,
    city_id: &str,
) -> ResolvedRegion {
    let province = async {
        if province_id.is_empty() {
            return None;
        }
        Some(match lookup.province(province_id).await {
            Ok(province) => province,
            Err(e) => {
                tracing::warn!(province_id, error = %e, "Province lookup failed, using placeholder");
                Province {
                    id: province_id.to_string(),
                    name: UNKNOWN_PROVINCE.to_string(),
                }
            }
        })
    };

    let city = async {
        if city_id.is_empty() {
            return None;
        }
        Some(match lookup.city(city_id).await {
            Ok(city) => city,
            Err(e) => {
                tracing::warn!(city_id, error = %e, "City lookup failed, using placeholder");
                City {
                    id: city_id.to_string(),
                    province_id: province_id.to_string(),
                    name: UNKNOWN_CITY.to_string(),
                }
            }
        })
    };

    let (province, city) = tokio::join!(province, city);
    ResolvedRegion { province, city }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedRegions;

    #[async_trait]
    impl RegionLookup for FixedRegions {
        async fn province(&self, id: &str) -> Result<Province, RegionError> {
            match id {
                "11" => Ok(Province {
                    id: "11".to_string(),
                    name: "ACEH".to_string(),
                }),
                _ => Err(RegionError::NotFound(id.to_string())),
            }
        }

        async fn city(&self, id: &str) -> Result<City, RegionError> {
            match id {
                "1101" => Ok(City {
                    id: "1101".to_string(),
                    province_id: "11".to_string(),
                    name: "KAB. SIMEULUE".to_string(),
                }),
                _ => Err(RegionError::NotFound(id.to_string())),
            }
        }
    }

    #[tokio::test]
    async fn test_resolve_known_ids() {
        let region = resolve_region(&FixedRegions, "11", "1101").await;

        assert_eq!(region.province.unwrap().name, "ACEH");
        assert_eq!(region.city.unwrap().name, "KAB. SIMEULUE");
    }

    #[tokio::test]
    async fn test_resolve_unknown_ids_uses_placeholders() {
        let region = resolve_region(&FixedRegions, "99", "9999").await;

        assert_eq!(
            region.province,
            Some(Province {
                id: "99".to_string(),
                name: UNKNOWN_PROVINCE.to_string()
            })
        );
        let city = region.city.unwrap();
        assert_eq!(city.id, "9999");
        assert_eq!(city.province_id, "99");
        assert_eq!(city.name, UNKNOWN_CITY);
    }

    #[tokio::test]
    async fn test_resolve_empty_ids() {
        let region = resolve_region(&FixedRegions, "", "").await;
        assert_eq!(region, ResolvedRegion::default());
    }

    #[tokio::test]
    async fn test_http_client_unreachable_degrades() {
        let client = HttpRegionClient::new("http://127.0.0.1:9/api/", Duration::from_millis(500)).unwrap();
        assert_eq!(client.base_url, "http://127.0.0.1:9/api");

        let region = resolve_region(&client, "11", "1101").await;
        assert_eq!(region.province.unwrap().name, UNKNOWN_PROVINCE);
        assert_eq!(region.city.unwrap().name, UNKNOWN_CITY);
    }
}
