//! Turns a reverse-geocoding result list into a short location string.

use super::response::{AddressComponent, GeocodeResult, POSTAL_CODE};

/// Maximum number of address parts shown.
pub const MAX_LOCATION_COMPONENTS: usize = 3;

/// Builds a display string such as `"Montmartre, Paris, France"`.
///
/// Results run from most to least specific, so they are scanned from the last
/// entry backwards. Each new, non-postal-code component is put in front of
/// the ones already taken, which leaves the joined string ordered from most
/// to least specific. Scanning stops once three parts are taken or the
/// results run out.
pub fn parse_location(results: &[GeocodeResult]) -> String {
    let mut parts: Vec<&str> = Vec::with_capacity(MAX_LOCATION_COMPONENTS);

    'scan: for result in results.iter().rev() {
        for component in &result.address_components {
            if parts.len() >= MAX_LOCATION_COMPONENTS {
                break 'scan;
            }
            let name = component.long_name.as_str();
            if !parts.contains(&name) && address_not_postal_code(component) {
                parts.insert(0, name);
            }
        }
        if parts.len() >= MAX_LOCATION_COMPONENTS {
            break;
        }
    }

    parts.join(", ")
}

/// Whether a component is anything other than a postal code.
pub fn address_not_postal_code(component: &AddressComponent) -> bool {
    !component.has_type(POSTAL_CODE)
}
