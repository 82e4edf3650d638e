//! Resource retrieval shared by the topology, feed, picture, and geocoder loaders.
//!
//! On WASM this goes through the browser's `fetch`. Native builds only serve
//! local assets: site-relative URLs are resolved against an asset directory,
//! which is enough to run the globe outside a browser during development.

use crate::error::FetchError;

/// Directory that native builds resolve site-relative URLs against.
#[cfg(not(target_arch = "wasm32"))]
const NATIVE_ASSET_ROOT: &str = "public";

/// Fetches a URL and returns the response body as bytes.
#[cfg(target_arch = "wasm32")]
pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>, FetchError> {
    use wasm_bindgen::JsCast as _;
    use web_sys::{Request, RequestInit, RequestMode, Response};

    let opts = RequestInit::new();
    opts.set_method("GET");
    opts.set_mode(RequestMode::Cors);

    let request = Request::new_with_str_and_init(url, &opts).map_err(|e| FetchError::Request {
        url: url.to_string(),
        message: format!("{:?}", e),
    })?;

    let window = web_sys::window().ok_or(FetchError::NoWindow)?;
    let resp_value = wasm_bindgen_futures::JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| FetchError::Network {
            url: url.to_string(),
            message: format!("{:?}", e),
        })?;

    let resp: Response = resp_value.dyn_into().map_err(|_| FetchError::Network {
        url: url.to_string(),
        message: "response is not a Response".to_string(),
    })?;

    if !resp.ok() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: resp.status(),
        });
    }

    let buffer_promise = resp.array_buffer().map_err(|e| FetchError::Network {
        url: url.to_string(),
        message: format!("{:?}", e),
    })?;
    let array_buffer = wasm_bindgen_futures::JsFuture::from(buffer_promise)
        .await
        .map_err(|e| FetchError::Network {
            url: url.to_string(),
            message: format!("{:?}", e),
        })?;

    Ok(js_sys::Uint8Array::new(&array_buffer).to_vec())
}

/// Reads a site-relative URL from the local asset directory.
#[cfg(not(target_arch = "wasm32"))]
pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>, FetchError> {
    let path = native_asset_path(url)?;
    std::fs::read(&path).map_err(|source| FetchError::Io {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn native_asset_path(url: &str) -> Result<std::path::PathBuf, FetchError> {
    if url.contains("://") {
        return Err(FetchError::Unsupported(url.to_string()));
    }
    let relative = url.split('?').next().unwrap_or(url).trim_start_matches('/');
    Ok(std::path::Path::new(NATIVE_ASSET_ROOT).join(relative))
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_native_path_strips_query_and_root() {
        let path = native_asset_path("/world-50m.json?v=2").unwrap();
        assert_eq!(path, std::path::Path::new("public").join("world-50m.json"));
    }

    #[test]
    fn test_native_rejects_remote_urls() {
        let err = native_asset_path("https://example.com/a.json").unwrap_err();
        assert!(matches!(err, FetchError::Unsupported(_)));
    }
}
