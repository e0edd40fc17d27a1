use crate::core::geo::{slat_to_lat, slng_to_lng};
use crate::core::region::Region;
use crate::data::formats::Payload;
use crate::{MapError, Result};
use async_trait::async_trait;
use reqwest::Url;

/// Query for the stops and pairs inside one delta region.
///
/// `lat`/`lng` are the geographic coordinates of the region's top-left
/// corner; the backend builds its box as `lat - height` by `lng + width`.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub lat: f64,
    pub lng: f64,
    pub width: f64,
    pub height: f64,
    pub min_freq: u32,
}

impl FetchRequest {
    pub fn for_region(region: &Region, min_freq: u32) -> Self {
        Self {
            lat: slat_to_lat(region.min_y),
            lng: slng_to_lng(region.min_x),
            width: region.width(),
            height: region.height(),
            min_freq,
        }
    }

    pub fn to_query_pairs(&self) -> [(&'static str, String); 5] {
        [
            ("lat", self.lat.to_string()),
            ("lng", self.lng.to_string()),
            ("width", self.width.to_string()),
            ("height", self.height.to_string()),
            ("min_freq", self.min_freq.to_string()),
        ]
    }

    pub fn url(&self, base: &str) -> Result<Url> {
        Url::parse_with_params(base, self.to_query_pairs())
            .map_err(|e| MapError::ParseError(format!("invalid base url {}: {}", base, e)))
    }
}

/// Anything that can answer a [`FetchRequest`] with a payload.
///
/// Implementations must be safe to call concurrently: the tracker does not
/// wait for one request before issuing the next.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> Result<Payload>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_from_region_flips_latitude() {
        let region = Region::new(0.698, 0.798, -51.566, -51.516);
        let request = FetchRequest::for_region(&region, 2);

        assert_eq!(request.lat, 51.566);
        assert_eq!(request.lng, 0.698);
        assert!((request.width - 0.1).abs() < 1e-9);
        assert!((request.height - 0.05).abs() < 1e-9);
        assert_eq!(request.min_freq, 2);
    }

    #[test]
    fn test_url_query() {
        let request = FetchRequest {
            lat: 51.5,
            lng: 0.5,
            width: 0.1,
            height: 0.05,
            min_freq: 1,
        };
        let url = request.url("http://localhost:5000/json/").unwrap();

        assert_eq!(url.path(), "/json/");
        assert_eq!(
            url.query(),
            Some("lat=51.5&lng=0.5&width=0.1&height=0.05&min_freq=1")
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let request = FetchRequest::for_region(&Region::default(), 1);
        assert!(matches!(
            request.url("not a url"),
            Err(MapError::ParseError(_))
        ));
    }
}
