use tracing::warn;
use web_sys::Storage;

const SIDEBAR_COLLAPSED_KEY: &str = "sidebarCollapsed";

fn local_storage() -> Option<Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// Saved sidebar state; false when storage is unavailable or unset.
pub fn sidebar_collapsed() -> bool {
    local_storage()
        .and_then(|storage| storage.get_item(SIDEBAR_COLLAPSED_KEY).ok().flatten())
        .map(|value| value == "true")
        .unwrap_or(false)
}

pub fn set_sidebar_collapsed(collapsed: bool) {
    if let Some(storage) = local_storage() {
        if let Err(e) = storage.set_item(SIDEBAR_COLLAPSED_KEY, if collapsed { "true" } else { "false" }) {
            warn!("Failed to persist sidebar state: {:?}", e);
        }
    }
}
