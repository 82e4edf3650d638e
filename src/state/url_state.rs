//! URL query parameters for configuring the globe.
//!
//! Lets a page embed the globe with its own size, zoom levels, data URLs and
//! geocoder key, e.g. `?width=800&zooms=400,900&autoplay=1`.

/// Parsed URL parameters.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UrlParams {
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub zooms: Option<Vec<f64>>,
    pub topology: Option<String>,
    pub posts: Option<String>,
    pub key: Option<String>,
    pub autoplay: Option<bool>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// Parses a query string (with or without the leading `?`).
pub fn parse_query(search: &str) -> UrlParams {
    let mut params = UrlParams::default();

    let query = search.trim_start_matches('?');
    if query.is_empty() {
        return params;
    }

    for pair in query.split('&') {
        let mut kv = pair.splitn(2, '=');
        let key = kv.next().unwrap_or("");
        let value = decode_component(kv.next().unwrap_or(""));
        match key {
            "width" => params.width = parse_size(&value),
            "height" => params.height = parse_size(&value),
            "zooms" => {
                params.zooms = value
                    .split(',')
                    .map(|z| z.trim().parse::<f64>())
                    .collect::<Result<Vec<_>, _>>()
                    .ok()
            }
            "topology" => params.topology = Some(value),
            "posts" => params.posts = Some(value),
            "key" => params.key = Some(value),
            "autoplay" => params.autoplay = parse_flag(&value),
            "lat" => params.lat = parse_finite(&value),
            "lon" => params.lon = parse_finite(&value),
            _ => {}
        }
    }

    params
}

fn parse_size(value: &str) -> Option<f32> {
    value.parse().ok().filter(|v: &f32| v.is_finite() && *v > 0.0)
}

/// `str::parse` accepts `NaN` and `inf`; neither is a usable coordinate.
fn parse_finite(value: &str) -> Option<f64> {
    value.parse().ok().filter(|v: &f64| v.is_finite())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "1" | "true" | "on" | "" => Some(true),
        "0" | "false" | "off" => Some(false),
        _ => None,
    }
}

/// Decodes `%XX` escapes and `+` as space.
fn decode_component(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => out.push(b' '),
            b'%' if i + 2 < bytes.len() => {
                let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
                match hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                    Some(b) => {
                        out.push(b);
                        i += 2;
                    }
                    None => out.push(b'%'),
                }
            }
            b => out.push(b),
        }
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Percent-encodes everything except RFC 3986 unreserved characters.
pub fn encode_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for b in value.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

/// Parse URL query parameters from the current browser URL.
#[cfg(target_arch = "wasm32")]
pub fn parse_from_url() -> UrlParams {
    let Some(window) = web_sys::window() else {
        return UrlParams::default();
    };
    match window.location().search() {
        Ok(search) => parse_query(&search),
        Err(_) => UrlParams::default(),
    }
}

/// No-op stub for native builds.
#[cfg(not(target_arch = "wasm32"))]
pub fn parse_from_url() -> UrlParams {
    UrlParams::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query() {
        assert_eq!(parse_query(""), UrlParams::default());
        assert_eq!(parse_query("?"), UrlParams::default());
    }

    #[test]
    fn test_full_query() {
        let params = parse_query(
            "?width=800&height=600&zooms=400,900,1600&topology=%2Fdata%2Fworld-110m.json&key=abc&autoplay=1&lat=48.85&lon=2.35",
        );
        assert_eq!(params.width, Some(800.0));
        assert_eq!(params.height, Some(600.0));
        assert_eq!(params.zooms, Some(vec![400.0, 900.0, 1600.0]));
        assert_eq!(params.topology.as_deref(), Some("/data/world-110m.json"));
        assert_eq!(params.key.as_deref(), Some("abc"));
        assert_eq!(params.autoplay, Some(true));
        assert_eq!(params.lat, Some(48.85));
        assert_eq!(params.lon, Some(2.35));
    }

    #[test]
    fn test_bad_values_ignored() {
        let params = parse_query("width=-3&zooms=500,abc&autoplay=maybe&unknown=1");
        assert_eq!(params.width, None);
        assert_eq!(params.zooms, None);
        assert_eq!(params.autoplay, None);
    }

    #[test]
    fn test_non_finite_numbers_ignored() {
        let params = parse_query("?lat=NaN&lon=0&width=inf&height=NaN");
        assert_eq!(params.lat, None);
        assert_eq!(params.lon, Some(0.0));
        assert_eq!(params.width, None);
        assert_eq!(params.height, None);

        let params = parse_query("lat=-inf&lon=infinity");
        assert_eq!(params.lat, None);
        assert_eq!(params.lon, None);
    }

    #[test]
    fn test_encode_component() {
        assert_eq!(encode_component("abc-DEF_1.2~"), "abc-DEF_1.2~");
        assert_eq!(encode_component("a&b=c#d"), "a%26b%3Dc%23d");
        assert_eq!(encode_component("a b/é"), "a%20b%2F%C3%A9");
        assert_eq!(decode_component(&encode_component("k+y&z")), "k+y&z");
    }

    #[test]
    fn test_decode_component() {
        assert_eq!(decode_component("a+b%20c"), "a b c");
        assert_eq!(decode_component("100%"), "100%");
        assert_eq!(decode_component("%zz"), "%zz");
    }
}
