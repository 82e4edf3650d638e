//! Reverse-geocoding response types (Google Geocoding API JSON format).

use serde::Deserialize;

/// Address component type tag for postal codes.
pub const POSTAL_CODE: &str = "postal_code";

/// Top-level status of a geocoding request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GeocoderStatus {
    Ok,
    ZeroResults,
    OverDailyLimit,
    OverQueryLimit,
    RequestDenied,
    InvalidRequest,
    UnknownError,
    Error,
    #[serde(other)]
    Unrecognized,
}

impl GeocoderStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, GeocoderStatus::Ok)
    }
}

/// One named part of an address, tagged with its granularity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

impl AddressComponent {
    #[cfg(test)]
    pub fn new(long_name: &str, types: &[&str]) -> Self {
        Self {
            long_name: long_name.to_string(),
            types: types.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn has_type(&self, kind: &str) -> bool {
        self.types.iter().any(|t| t == kind)
    }
}

/// One candidate address. Results are ordered from most to least specific.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeocodeResult {
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
}

#[cfg(test)]
impl GeocodeResult {
    pub fn from_components(address_components: Vec<AddressComponent>) -> Self {
        Self { address_components }
    }
}

/// Body of a reverse-geocoding response.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResponse {
    pub status: GeocoderStatus,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_ok_response() {
        let json = r#"{
            "results": [
                {
                    "address_components": [
                        {"long_name": "1", "short_name": "1", "types": ["street_number"]},
                        {"long_name": "Rue de Rivoli", "short_name": "Rue de Rivoli", "types": ["route"]},
                        {"long_name": "75001", "short_name": "75001", "types": ["postal_code"]}
                    ],
                    "formatted_address": "1 Rue de Rivoli, 75001 Paris, France",
                    "place_id": "abc",
                    "types": ["street_address"]
                }
            ],
            "status": "OK"
        }"#;

        let response: GeocodeResponse = serde_json::from_str(json).unwrap();
        assert!(response.status.is_ok());
        assert_eq!(response.results.len(), 1);

        let components = &response.results[0].address_components;
        assert_eq!(components[1].long_name, "Rue de Rivoli");
        assert!(components[2].has_type(POSTAL_CODE));
        assert!(!components[1].has_type(POSTAL_CODE));
    }

    #[test]
    fn test_decode_error_statuses() {
        let response: GeocodeResponse =
            serde_json::from_str(r#"{"results": [], "status": "ZERO_RESULTS"}"#).unwrap();
        assert_eq!(response.status, GeocoderStatus::ZeroResults);

        let response: GeocodeResponse = serde_json::from_str(
            r#"{"status": "REQUEST_DENIED", "error_message": "The provided API key is invalid."}"#,
        )
        .unwrap();
        assert_eq!(response.status, GeocoderStatus::RequestDenied);
        assert!(response.results.is_empty());
        assert!(response.error_message.is_some());
    }

    #[test]
    fn test_unknown_status_does_not_fail() {
        let response: GeocodeResponse =
            serde_json::from_str(r#"{"results": [], "status": "SOMETHING_NEW"}"#).unwrap();
        assert_eq!(response.status, GeocoderStatus::Unrecognized);
        assert!(!response.status.is_ok());
    }
}
