//! Browser shell: finds the board in the DOM, wires input, owns the timers.
//!
//! The session core never touches `web-sys` directly; this module implements
//! its collaborator traits over live elements and translates transition
//! outcomes into `setTimeout`/`setInterval` calls. All state lives in a
//! thread-local cell; everything runs on the page's single thread.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlElement, window};

use crate::audio::AudioFeedback;
use crate::game::{
    CardId, CardSurface, Deck, FlipOutcome, GameConfig, Hud, MatchGame, TickOutcome, TypeKey,
};

const CARD_CLASS: &str = "card";
const CARD_VALUE_CLASS: &str = "card-value";
const OVERLAY_CLASS: &str = "overlay-text";
const VISIBLE_CLASS: &str = "visible";
const MATCHED_CLASS: &str = "matched";

const TIMER_ID: &str = "time-remaining";
const TICKER_ID: &str = "flips";
const VICTORY_ID: &str = "victory-text";
const GAME_OVER_ID: &str = "game-over-text";

const TIME_LIMIT_ATTR: &str = "data-time-limit";

// --- Card surface over the DOM ----------------------------------------------

/// The card grid, enumerated once at mount in logical deck order. Shuffles
/// reorder presentation through the CSS `order` property, so these indices
/// stay stable for the whole page lifetime.
pub struct PageCards {
    cards: Vec<HtmlElement>,
}

impl PageCards {
    fn new(cards: Vec<HtmlElement>) -> Self {
        Self { cards }
    }

    fn card(&self, card: CardId) -> Option<&HtmlElement> {
        self.cards.get(card)
    }
}

impl CardSurface for PageCards {
    fn reveal(&mut self, card: CardId) {
        if let Some(el) = self.card(card) {
            let _ = el.class_list().add_1(VISIBLE_CLASS);
        }
    }

    /// Returns the element to the face-down, unmatched look.
    fn hide(&mut self, card: CardId) {
        if let Some(el) = self.card(card) {
            let list = el.class_list();
            let _ = list.remove_1(VISIBLE_CLASS);
            let _ = list.remove_1(MATCHED_CLASS);
        }
    }

    fn is_revealed(&self, card: CardId) -> bool {
        self.card(card)
            .map(|el| el.class_list().contains(VISIBLE_CLASS))
            .unwrap_or(false)
    }

    fn mark_matched(&mut self, card: CardId) {
        if let Some(el) = self.card(card) {
            let _ = el.class_list().add_1(MATCHED_CLASS);
        }
    }

    fn set_display_order(&mut self, card: CardId, order: usize) {
        if let Some(el) = self.card(card) {
            let _ = el.style().set_property("order", &order.to_string());
        }
    }

    fn clear_display_order(&mut self, card: CardId) {
        if let Some(el) = self.card(card) {
            let _ = el.style().remove_property("order");
        }
    }
}

// --- HUD over the DOM --------------------------------------------------------

/// Countdown and flip-counter text sinks plus the two terminal banners.
pub struct PageHud {
    timer: Element,
    ticker: Element,
    victory: Element,
    game_over: Element,
}

impl PageHud {
    fn from_document(doc: &Document) -> Result<Self, JsValue> {
        Ok(Self {
            timer: require_element(doc, TIMER_ID)?,
            ticker: require_element(doc, TICKER_ID)?,
            victory: require_element(doc, VICTORY_ID)?,
            game_over: require_element(doc, GAME_OVER_ID)?,
        })
    }
}

fn require_element(doc: &Document, id: &str) -> Result<Element, JsValue> {
    doc.get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{id}")))
}

impl Hud for PageHud {
    fn set_time_remaining(&mut self, seconds: u32) {
        self.timer.set_text_content(Some(&seconds.to_string()));
    }

    fn set_click_count(&mut self, clicks: u32) {
        self.ticker.set_text_content(Some(&clicks.to_string()));
    }

    fn show_victory(&mut self) {
        let _ = self.victory.class_list().add_1(VISIBLE_CLASS);
    }

    fn show_game_over(&mut self) {
        let _ = self.game_over.class_list().add_1(VISIBLE_CLASS);
    }
}

// --- App state ---------------------------------------------------------------

type BrowserGame = MatchGame<PageCards, AudioFeedback, PageHud>;

struct App {
    game: BrowserGame,
    /// Live countdown interval handle, `None` outside an active round.
    countdown: Option<i32>,
    /// Long-lived tick callback, registered anew with each round's interval.
    tick_cb: Closure<dyn FnMut()>,
}

thread_local! {
    static APP: RefCell<Option<App>> = RefCell::new(None);
}

fn with_app(f: impl FnOnce(&mut App)) {
    APP.with(|cell| {
        if let Some(app) = cell.borrow_mut().as_mut() {
            f(app);
        }
    });
}

// --- Bootstrap ---------------------------------------------------------------

/// Builds the session from the live page and wires all input. Called once per
/// page load through the exported entry point.
pub fn mount() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let cards = collect_cards(&doc)?;
    if cards.is_empty() {
        return Err(JsValue::from_str("no .card elements on the page"));
    }
    let deck = Deck::new(cards.iter().map(card_type_key).collect());

    let config = page_config(&doc);
    let hud = PageHud::from_document(&doc)?;
    let game = MatchGame::new(
        deck,
        config,
        PageCards::new(cards.clone()),
        AudioFeedback::new(config.music_volume),
        hud,
    );
    let tick_cb = Closure::wrap(Box::new(on_countdown_tick) as Box<dyn FnMut()>);
    APP.with(|cell| {
        *cell.borrow_mut() = Some(App {
            game,
            countdown: None,
            tick_cb,
        });
    });

    // Card clicks flip by logical index.
    for (idx, card) in cards.iter().enumerate() {
        let closure = Closure::wrap(Box::new(move || on_card_click(idx)) as Box<dyn FnMut()>);
        card.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Every overlay (start banner and both terminal banners) hides itself and
    // asks for a round; the session rejects the ones that arrive mid-game.
    let overlays = doc.get_elements_by_class_name(OVERLAY_CLASS);
    for i in 0..overlays.length() {
        if let Some(overlay) = overlays.item(i) {
            let clicked = overlay.clone();
            let closure = Closure::wrap(Box::new(move || {
                let _ = clicked.class_list().remove_1(VISIBLE_CLASS);
                on_overlay_click();
            }) as Box<dyn FnMut()>);
            overlay.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
    }

    Ok(())
}

fn collect_cards(doc: &Document) -> Result<Vec<HtmlElement>, JsValue> {
    let found = doc.get_elements_by_class_name(CARD_CLASS);
    let mut cards = Vec::with_capacity(found.length() as usize);
    for i in 0..found.length() {
        if let Some(el) = found.item(i) {
            cards.push(el.dyn_into()?);
        }
    }
    Ok(cards)
}

/// Equality key for a card: the `src` of its face image. Cards sharing
/// artwork form a pair.
fn card_type_key(card: &HtmlElement) -> TypeKey {
    let key = card
        .get_elements_by_class_name(CARD_VALUE_CLASS)
        .item(0)
        .and_then(|el| el.get_attribute("src"))
        .unwrap_or_default();
    TypeKey::new(key)
}

/// Design defaults, with an optional `data-time-limit` override on `<body>`.
fn page_config(doc: &Document) -> GameConfig {
    let mut config = GameConfig::default();
    if let Some(limit) = doc
        .body()
        .and_then(|body| body.get_attribute(TIME_LIMIT_ATTR))
        .and_then(|raw| raw.parse().ok())
    {
        config.time_limit_secs = limit;
    }
    config
}

// --- Event handlers & timers -------------------------------------------------

fn on_overlay_click() {
    with_app(|app| {
        if app.game.start_game() {
            let delay = app.game.config().start_delay_ms;
            schedule_once(delay, || with_app(begin_round));
        }
    });
}

/// Start-delay completion: open input and start the countdown.
fn begin_round(app: &mut App) {
    if app.game.finish_start() {
        start_countdown(app);
    }
}

fn on_card_click(card: CardId) {
    with_app(|app| match app.game.flip_card(card) {
        FlipOutcome::Mismatched => {
            // The timer carries the round it was scheduled in, so it goes
            // stale with the round instead of resolving a replay's mismatch.
            let round = app.game.round();
            let delay = app.game.config().mismatch_delay_ms;
            schedule_once(delay, move || {
                with_app(|app| app.game.resolve_mismatch(round));
            });
        }
        FlipOutcome::Victory => clear_countdown(app),
        FlipOutcome::Rejected | FlipOutcome::FirstOfPair | FlipOutcome::Matched => {}
    });
}

fn on_countdown_tick() {
    with_app(|app| {
        if app.game.countdown_tick() == TickOutcome::Stop {
            clear_countdown(app);
        }
    });
}

fn start_countdown(app: &mut App) {
    clear_countdown(app);
    if let Some(win) = window() {
        app.countdown = win
            .set_interval_with_callback_and_timeout_and_arguments_0(
                app.tick_cb.as_ref().unchecked_ref(),
                app.game.config().tick_interval_ms as i32,
            )
            .ok();
    }
}

/// Idempotent teardown; every path out of a live round funnels through here.
fn clear_countdown(app: &mut App) {
    if let Some(handle) = app.countdown.take() {
        if let Some(win) = window() {
            win.clear_interval_with_handle(handle);
        }
    }
}

/// One-shot timer; the callback deallocates itself after it fires.
fn schedule_once(delay_ms: u32, callback: impl FnOnce() + 'static) {
    if let Some(win) = window() {
        let cb = Closure::once_into_js(callback);
        let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(
            cb.unchecked_ref(),
            delay_ms as i32,
        );
    }
}
