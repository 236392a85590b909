//! Browser host for the `navmenu` controller.
//!
//! Built for `wasm32-unknown-unknown`. The module start hook mounts the menu
//! once the document has been parsed. Configuration is read from an optional
//! `<script type="application/json" id="navmenu-config">` element; when it is
//! absent or invalid the defaults apply.

mod console;
mod dom;
mod host;

use std::cell::RefCell;

use gloo::events::EventListener;
use navmenu::MenuConfig;
use tracing::{Level, error, info, warn};
use wasm_bindgen::prelude::*;

pub use console::{ConsoleMakeWriter, init_tracing};
pub use dom::WebDom;
pub use host::WebMenu;

/// Id of the element carrying the JSON menu configuration.
pub const CONFIG_ELEMENT_ID: &str = "navmenu-config";

thread_local! {
    static MENU: RefCell<Option<WebMenu>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() {
    init_tracing(Level::INFO);
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        error!("no document available; navigation menu not initialized");
        return;
    };
    if document.ready_state() == "loading" {
        EventListener::once(&document, "DOMContentLoaded", |_| mount_page_menu()).forget();
    } else {
        mount_page_menu();
    }
}

/// Toggles the menu the way the logo does. Exposed for inline page handlers.
#[wasm_bindgen(js_name = toggleHamburgerMenu)]
pub fn toggle_hamburger_menu() {
    MENU.with(|menu| match menu.borrow().as_ref() {
        Some(menu) => menu.toggle_logo(),
        None => warn!("toggleHamburgerMenu called before the menu was mounted"),
    });
}

fn mount_page_menu() {
    let config = page_config();
    match WebMenu::mount(config) {
        Ok(menu) => {
            info!("navigation menu initialized");
            MENU.with(|slot| *slot.borrow_mut() = Some(menu));
        }
        Err(error) => error!(%error, "Required navigation elements not found!"),
    }
}

fn page_config() -> MenuConfig {
    let content = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(CONFIG_ELEMENT_ID))
        .and_then(|element| element.text_content());
    let Some(content) = content else {
        return MenuConfig::default();
    };
    MenuConfig::from_json_str(&content).unwrap_or_else(|error| {
        warn!(%error, "ignoring invalid navigation menu configuration");
        MenuConfig::default()
    })
}
