use fieldgate_domain::{AdminMenu, ChromeDecisions};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Admin navigation registered by the host for the acting user.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/admin-menu-request.ts"
)]
pub struct AdminMenuRequest {
    #[ts(
        type = "{ items: Array<{ slug: string, title?: string }>, submenus: Record<string, Array<{ slug: string, title?: string }>> }"
    )]
    pub menu: AdminMenu,
}

/// Filtered navigation and chrome decisions.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/admin-menu-response.ts"
)]
pub struct AdminMenuResponse {
    #[ts(
        type = "{ items: Array<{ slug: string, title: string }>, submenus: Record<string, Array<{ slug: string, title: string }>> }"
    )]
    pub menu: AdminMenu,
    pub show_admin_bar: bool,
    pub suppress_update_notices: bool,
    pub denied_meta_capabilities: Vec<String>,
}

impl AdminMenuResponse {
    pub fn new(menu: AdminMenu, chrome: ChromeDecisions) -> Self {
        Self {
            menu,
            show_admin_bar: chrome.show_admin_bar,
            suppress_update_notices: chrome.suppress_update_notices,
            denied_meta_capabilities: chrome.denied_meta_capabilities,
        }
    }
}
