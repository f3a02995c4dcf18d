// Smoke tests compiled only for wasm32, run with `wasm-pack test --node`.
// The DOM shell needs a real page, so these stick to the session core and the
// entropy path; everything page-shaped is covered by the native tests.
#![cfg(target_arch = "wasm32")]

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rugby_pairs::game::{
    CardId, CardSurface, Deck, Feedback, FlipOutcome, GameConfig, Hud, MatchGame, Outcome, Phase,
    TypeKey, deck,
};
use wasm_bindgen_test::wasm_bindgen_test;

struct NullSurface {
    revealed: Vec<bool>,
}

impl CardSurface for NullSurface {
    fn reveal(&mut self, card: CardId) {
        self.revealed[card] = true;
    }
    fn hide(&mut self, card: CardId) {
        self.revealed[card] = false;
    }
    fn is_revealed(&self, card: CardId) -> bool {
        self.revealed[card]
    }
    fn mark_matched(&mut self, _card: CardId) {}
    fn set_display_order(&mut self, _card: CardId, _order: usize) {}
    fn clear_display_order(&mut self, _card: CardId) {}
}

struct NullFeedback;

impl Feedback for NullFeedback {
    fn start_music(&mut self) {}
    fn stop_music(&mut self) {}
    fn cue_flip(&mut self) {}
    fn cue_match(&mut self) {}
    fn cue_victory(&mut self) {}
    fn cue_game_over(&mut self) {}
}

struct NullHud;

impl Hud for NullHud {
    fn set_time_remaining(&mut self, _seconds: u32) {}
    fn set_click_count(&mut self, _clicks: u32) {}
    fn show_victory(&mut self) {}
    fn show_game_over(&mut self) {}
}

fn pair_deck(keys: &[&str]) -> Deck {
    Deck::new(keys.iter().map(|k| TypeKey::new(*k)).collect())
}

// Shuffling must stay a permutation in the wasm build too.
#[wasm_bindgen_test]
fn shuffled_orders_is_a_permutation() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut orders = deck::shuffled_orders(8, &mut rng);
    orders.sort_unstable();
    assert_eq!(orders, (0..8).collect::<Vec<_>>());
}

// Full round through the core on wasm: start, match both pairs, win.
#[wasm_bindgen_test]
fn session_reaches_victory() {
    let deck = pair_deck(&["a", "b", "a", "b"]);
    let mut game = MatchGame::with_rng(
        deck,
        GameConfig::default(),
        NullSurface {
            revealed: vec![false; 4],
        },
        NullFeedback,
        NullHud,
        ChaCha8Rng::seed_from_u64(3),
    );
    assert!(game.start_game());
    assert!(game.finish_start());
    assert_eq!(game.flip_card(0), FlipOutcome::FirstOfPair);
    assert_eq!(game.flip_card(2), FlipOutcome::Matched);
    assert_eq!(game.flip_card(1), FlipOutcome::FirstOfPair);
    assert_eq!(game.flip_card(3), FlipOutcome::Victory);
    assert_eq!(game.phase(), Phase::Ended(Outcome::Victory));
}

// Entropy-seeded construction exercises getrandom's js backend.
#[wasm_bindgen_test]
fn entropy_seeded_session_starts() {
    let deck = pair_deck(&["a", "a"]);
    let mut game = MatchGame::new(
        deck,
        GameConfig::default(),
        NullSurface {
            revealed: vec![false; 2],
        },
        NullFeedback,
        NullHud,
    );
    assert!(game.start_game());
    assert!(game.finish_start());
    assert_eq!(game.phase(), Phase::Playing);
}
