//! Rugby Pairs core crate.
//!
//! A card-matching memory game for the browser: a grid of face-down cards,
//! flipped in pairs against a countdown. The session rules live in [`game`]
//! as plain Rust; `dom` and `audio` bind them to the page. JS calls the
//! exported `start_game()` once on `DOMContentLoaded` and everything after
//! that is event-driven.

use wasm_bindgen::prelude::*;

pub mod game;

mod audio;
mod dom;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Binds the game to the current page: enumerates `.card` elements and
/// `.overlay-text` triggers, builds the deck, wires clicks. Fails if the
/// expected markup is missing.
#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    dom::mount()
}
