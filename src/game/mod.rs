//! Card-matching session state machine.
//!
//! Everything in this module is pure Rust: the session mutates the page only
//! through the collaborator traits below, so the whole machine runs (and is
//! tested) natively while `dom`/`audio` supply the browser implementations.
//! Timed transitions are split into an operation that enters the waiting
//! state and a completion the scheduler invokes once the delay elapses,
//! which is how the browser event loop actually delivers them.

pub mod deck;

pub use deck::{CardId, Deck, TypeKey};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// --- Collaborator traits -----------------------------------------------------

/// Visual surface for the card grid. `reveal`/`hide` toggle the face-up state
/// (a CSS class in the browser), `mark_matched` adds the locked-pair look;
/// `hide` clears both. Display order is the presentation-only slot a shuffle
/// assigns, independent of logical deck order.
pub trait CardSurface {
    fn reveal(&mut self, card: CardId);
    fn hide(&mut self, card: CardId);
    fn is_revealed(&self, card: CardId) -> bool;
    fn mark_matched(&mut self, card: CardId);
    fn set_display_order(&mut self, card: CardId, order: usize);
    fn clear_display_order(&mut self, card: CardId);
}

/// Audio cues. Every method is best-effort and fire-and-forget: a missing or
/// broken resource must degrade to a silent no-op, never an error.
///
/// `cue_victory` and `cue_game_over` stop the background music before playing
/// their cue; `start_music` is idempotent while the music is already playing.
pub trait Feedback {
    fn start_music(&mut self);
    fn stop_music(&mut self);
    fn cue_flip(&mut self);
    fn cue_match(&mut self);
    fn cue_victory(&mut self);
    fn cue_game_over(&mut self);
}

/// Scoreboard and terminal banners: two integer sinks updated by assignment
/// and two show-only overlay toggles.
pub trait Hud {
    fn set_time_remaining(&mut self, seconds: u32);
    fn set_click_count(&mut self, clicks: u32);
    fn show_victory(&mut self);
    fn show_game_over(&mut self);
}

// --- Session phases & transition outcomes ------------------------------------

/// How a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Victory,
    Timeout,
}

/// Session phase. `Starting` and `Resolving` are the busy phases: a timed
/// transition is in flight and all input is rejected until its completion
/// runs. `Resolving` carries the mismatched pair so the completion knows
/// which two faces to hide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Starting,
    Playing,
    Resolving { first: CardId, second: CardId },
    Ended(Outcome),
}

/// What a flip did, and what the caller owes the session for it:
/// `Mismatched` means schedule [`MatchGame::resolve_mismatch`] after the
/// mismatch delay, stamped with the current [`MatchGame::round`]; `Victory`
/// means tear down the countdown.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlipOutcome {
    /// Rejected by [`MatchGame::can_flip_card`]; nothing changed.
    Rejected,
    /// First card of a pair is now face up, awaiting a partner.
    FirstOfPair,
    /// Pair matched; the round continues.
    Matched,
    /// Pair mismatched; both faces stay up until the resolve delay elapses.
    Mismatched,
    /// Pair matched and the deck is complete; the session is over.
    Victory,
}

/// Whether the once-per-second countdown should keep firing. `Stop` tells the
/// caller to clear its interval handle; it is also returned (without side
/// effects) for stray ticks delivered after the session already ended.
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Stop,
}

// --- Configuration -----------------------------------------------------------

/// Tunables for a session, captured once at construction.
///
/// The start delay must stay non-zero so the hide animation finishes before
/// the shuffle reorders faces; the mismatch delay is the memorization window.
#[derive(Clone, Copy, Debug)]
pub struct GameConfig {
    pub time_limit_secs: u32,
    pub start_delay_ms: u32,
    pub mismatch_delay_ms: u32,
    pub tick_interval_ms: u32,
    pub music_volume: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: 100,
            start_delay_ms: 500,
            mismatch_delay_ms: 1000,
            tick_interval_ms: 1000,
            music_volume: 0.5,
        }
    }
}

// --- The session -------------------------------------------------------------

/// One live round of the matching game.
///
/// Owns all game state (deck, flip bookkeeping, click counter, countdown
/// value) plus the three collaborators it drives. The browser shell (or a
/// test harness) owns the actual timers and calls the completion methods when
/// they fire; the `busy` phases make the gap between scheduling and firing
/// safe against user input.
pub struct MatchGame<S, F, H> {
    deck: Deck,
    config: GameConfig,
    phase: Phase,
    round: u32,
    time_remaining: u32,
    click_count: u32,
    pending: Option<CardId>,
    matched: Vec<bool>,
    matched_count: usize,
    rng: ChaCha8Rng,
    surface: S,
    feedback: F,
    hud: H,
}

impl<S: CardSurface, F: Feedback, H: Hud> MatchGame<S, F, H> {
    pub fn new(deck: Deck, config: GameConfig, surface: S, feedback: F, hud: H) -> Self {
        Self::with_rng(deck, config, surface, feedback, hud, ChaCha8Rng::from_entropy())
    }

    /// Deterministic construction for tests and reproducible shuffles.
    pub fn with_rng(
        deck: Deck,
        config: GameConfig,
        surface: S,
        feedback: F,
        hud: H,
        rng: ChaCha8Rng,
    ) -> Self {
        let matched = vec![false; deck.len()];
        Self {
            deck,
            config,
            phase: Phase::Idle,
            round: 0,
            time_remaining: config.time_limit_secs,
            click_count: 0,
            pending: None,
            matched,
            matched_count: 0,
            rng,
            surface,
            feedback,
            hud,
        }
    }

    /// Begins a round. Accepted only from `Idle` or `Ended`: replay is a
    /// fresh round over the same deck, and a second click while a round is
    /// starting or running is rejected with no side effects.
    ///
    /// On accept the session bumps its round counter (outstanding timers from
    /// the previous round go stale), resets its counters, hides every card
    /// (clearing its display order), pushes the reset values to the HUD and
    /// enters `Starting`. The caller must schedule [`Self::finish_start`]
    /// after `config.start_delay_ms`.
    pub fn start_game(&mut self) -> bool {
        match self.phase {
            Phase::Idle | Phase::Ended(_) => {}
            Phase::Starting | Phase::Playing | Phase::Resolving { .. } => return false,
        }
        self.round += 1;
        self.pending = None;
        self.click_count = 0;
        self.time_remaining = self.config.time_limit_secs;
        self.matched.fill(false);
        self.matched_count = 0;
        self.phase = Phase::Starting;
        for card in self.deck.cards() {
            self.surface.hide(card);
            self.surface.clear_display_order(card);
        }
        self.hud.set_time_remaining(self.time_remaining);
        self.hud.set_click_count(self.click_count);
        true
    }

    /// Completes the start delay: music on, deck shuffled, input accepted.
    /// Returns `true` when the session entered `Playing`, in which case the
    /// caller starts the once-per-second countdown; a stale timer firing in
    /// any other phase is ignored.
    pub fn finish_start(&mut self) -> bool {
        if self.phase != Phase::Starting {
            return false;
        }
        self.feedback.start_music();
        self.shuffle_cards();
        self.phase = Phase::Playing;
        true
    }

    /// Player flipped a card. Rejected flips change nothing; accepted flips
    /// cue, count, reveal, and then either park the card as pending or
    /// compare it against the pending one.
    pub fn flip_card(&mut self, card: CardId) -> FlipOutcome {
        if !self.can_flip_card(card) {
            return FlipOutcome::Rejected;
        }
        self.feedback.cue_flip();
        self.click_count += 1;
        self.hud.set_click_count(self.click_count);
        self.surface.reveal(card);

        // Pending clears immediately on comparison; only the busy phase
        // holds input back during mismatch resolution.
        let Some(first) = self.pending.take() else {
            self.pending = Some(card);
            return FlipOutcome::FirstOfPair;
        };

        if self.card_type(first) == self.card_type(card) {
            self.matched[first] = true;
            self.matched[card] = true;
            self.matched_count += 2;
            self.surface.mark_matched(first);
            self.surface.mark_matched(card);
            self.feedback.cue_match();
            if self.matched_count == self.deck.len() {
                self.end_session(Outcome::Victory);
                return FlipOutcome::Victory;
            }
            FlipOutcome::Matched
        } else {
            self.phase = Phase::Resolving { first, second: card };
            FlipOutcome::Mismatched
        }
    }

    /// Completes the mismatch delay: hides the pair and reopens input.
    /// `round` is the [`Self::round`] value captured when the timer was
    /// scheduled; a stale timer (countdown expired first, or a replay
    /// already started a new round) is dropped and must leave the session
    /// untouched. The round stamp covers the case the phase alone cannot:
    /// a quick replay that is mid `Resolving` on a mismatch of its own when
    /// the old timer finally fires.
    pub fn resolve_mismatch(&mut self, round: u32) {
        if round != self.round {
            return;
        }
        if let Phase::Resolving { first, second } = self.phase {
            self.surface.hide(first);
            self.surface.hide(second);
            self.phase = Phase::Playing;
        }
    }

    /// Input gate: flips are accepted only in `Playing` (the busy phases and
    /// ended sessions reject everything), and only for a card that is neither
    /// matched nor the current pending card. Unknown ids are rejected too.
    pub fn can_flip_card(&self, card: CardId) -> bool {
        self.phase == Phase::Playing
            && self.matched.get(card) == Some(&false)
            && self.pending != Some(card)
    }

    /// One countdown tick. Decrements the clock while the round is live
    /// (`Playing` or `Resolving`), ending the session on zero. Ticks before
    /// the countdown exists are inert; ticks after `Ended` return `Stop`
    /// without touching state, so a leaked interval can never fire the
    /// game-over transition twice.
    pub fn countdown_tick(&mut self) -> TickOutcome {
        match self.phase {
            Phase::Playing | Phase::Resolving { .. } => {}
            Phase::Ended(_) => return TickOutcome::Stop,
            Phase::Idle | Phase::Starting => return TickOutcome::Continue,
        }
        self.time_remaining = self.time_remaining.saturating_sub(1);
        self.hud.set_time_remaining(self.time_remaining);
        if self.time_remaining == 0 {
            self.end_session(Outcome::Timeout);
            return TickOutcome::Stop;
        }
        TickOutcome::Continue
    }

    /// Fisher-Yates shuffle of presentation order only; the logical deck
    /// sequence and its type keys never move.
    pub fn shuffle_cards(&mut self) {
        let orders = deck::shuffled_orders(self.deck.len(), &mut self.rng);
        for (card, order) in orders.into_iter().enumerate() {
            self.surface.set_display_order(card, order);
        }
    }

    /// Equality key for a card; two cards match iff their keys are equal.
    pub fn card_type(&self, card: CardId) -> &TypeKey {
        self.deck.type_key(card)
    }

    /// Busy while a timed transition is in flight (start delay or mismatch
    /// resolution); derived from the phase so the lock can never desync.
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Starting | Phase::Resolving { .. })
    }

    fn end_session(&mut self, outcome: Outcome) {
        self.phase = Phase::Ended(outcome);
        match outcome {
            Outcome::Victory => {
                self.feedback.cue_victory();
                self.hud.show_victory();
            }
            Outcome::Timeout => {
                self.feedback.cue_game_over();
                self.hud.show_game_over();
            }
        }
    }

    // --- Read-side accessors (shell + tests) ---------------------------------

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Identity of the current round, bumped on every accepted
    /// [`Self::start_game`]. Callers scheduling [`Self::resolve_mismatch`]
    /// capture it so a timer that outlives its round is recognizably stale.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn click_count(&self) -> u32 {
        self.click_count
    }

    pub fn matched_count(&self) -> usize {
        self.matched_count
    }

    pub fn pending_card(&self) -> Option<CardId> {
        self.pending
    }

    pub fn is_matched(&self, card: CardId) -> bool {
        self.matched.get(card).copied().unwrap_or(false)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn hud(&self) -> &H {
        &self.hud
    }
}
