// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Massing WebAssembly Bindings
//!
//! JavaScript/TypeScript API for the block studio built with wasm-bindgen.

use wasm_bindgen::prelude::*;

mod draft;
mod studio;

pub use draft::{apply_draft, DraftStatus};
pub use studio::{BlockStudio, ExportFile};

/// Route Rust panics to the browser console
pub fn init_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    init_panic_hook();
}

/// Get the version of the bindings
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
