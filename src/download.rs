//! Save bytes to the user's disk through an object URL and a throwaway anchor.

use sensor_dashboard_core::{DashboardError, Result};
use tracing::info;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

pub fn save_bytes(bytes: &[u8], mime: &str, filename: &str) -> Result<()> {
    let parts = js_sys::Array::of1(&js_sys::Uint8Array::from(bytes));
    let options = BlobPropertyBag::new();
    options.set_type(mime);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(browser_error)?;

    let url = Url::create_object_url_with_blob(&blob).map_err(browser_error)?;
    let result = click_download_link(&url, filename);
    if let Err(e) = Url::revoke_object_url(&url) {
        tracing::debug!("revoke_object_url failed: {:?}", e);
    }
    result?;

    info!("Downloaded {} ({} bytes)", filename, bytes.len());
    Ok(())
}

fn click_download_link(url: &str, filename: &str) -> Result<()> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| DashboardError::Browser("no document".to_string()))?;
    let body = document
        .body()
        .ok_or_else(|| DashboardError::Browser("no document body".to_string()))?;

    let anchor: HtmlAnchorElement = document
        .create_element("a")
        .map_err(browser_error)?
        .dyn_into()
        .map_err(|_| DashboardError::Browser("created element is not an anchor".to_string()))?;
    anchor.set_href(url);
    anchor.set_download(filename);
    anchor.set_attribute("style", "display: none").map_err(browser_error)?;

    body.append_child(&anchor).map_err(browser_error)?;
    anchor.click();
    anchor.remove();
    Ok(())
}

pub(crate) fn browser_error(err: JsValue) -> DashboardError {
    DashboardError::Browser(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}
