/// Tabby - side panel that shows browser windows, tab groups and tabs as
/// one tree and lets them be rearranged by drag and drop.
/// Built with Rust + WASM + Yew

pub mod chrome;
pub mod driver;
pub mod error;
pub mod host;
pub mod locator;
pub mod mutator;
pub mod operations;
pub mod projector;
pub mod session;
pub mod settings;
pub mod tab_data;
pub mod tree;
pub mod ui;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Start the Yew app for the side panel
#[wasm_bindgen]
pub fn start_side_panel() {
    yew::Renderer::<ui::side_panel::SidePanel>::new().render();
}
