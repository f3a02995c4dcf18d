//! Deck model: the fixed set of cards a session plays over.
//!
//! Cards are enumerated once by the page bootstrap and addressed by index
//! from then on; the deck itself never grows, shrinks or reorders. Shuffling
//! touches presentation order only (CSS `order` on the card surface), so the
//! logical indices handed out here stay valid for the lifetime of the page.

use rand::Rng;
use rand::seq::SliceRandom;

/// Index of a card within its deck; the opaque handle exchanged between the
/// session and its collaborators.
pub type CardId = usize;

/// Opaque equality key identifying which cards form a matching pair.
///
/// Assigned at deck construction (in the browser, from the card's face image
/// resource) and never interpreted afterwards; two cards match iff their keys
/// are equal. A well-formed deck carries exactly two cards per key, but that
/// is a contract on the supplied card set, not something the game enforces.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeKey(String);

impl TypeKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TypeKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for TypeKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// Fixed ordered collection of cards, reused across replays.
#[derive(Clone, Debug)]
pub struct Deck {
    type_keys: Vec<TypeKey>,
}

impl Deck {
    pub fn new(type_keys: Vec<TypeKey>) -> Self {
        Self { type_keys }
    }

    pub fn len(&self) -> usize {
        self.type_keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.type_keys.is_empty()
    }

    /// All card ids, in logical deck order.
    pub fn cards(&self) -> std::ops::Range<CardId> {
        0..self.type_keys.len()
    }

    pub fn type_key(&self, card: CardId) -> &TypeKey {
        &self.type_keys[card]
    }
}

/// Fisher-Yates permutation of display orders for a deck of `n` cards.
///
/// Returns `orders` where `orders[card]` is the presentation slot for that
/// card; the multiset of values is always exactly `0..n`.
pub fn shuffled_orders(n: usize, rng: &mut impl Rng) -> Vec<usize> {
    let mut orders: Vec<usize> = (0..n).collect();
    orders.shuffle(rng);
    orders
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn type_keys_compare_by_value() {
        let deck = Deck::new(vec!["ball.png".into(), "try.png".into(), "ball.png".into()]);
        assert_eq!(deck.type_key(0), deck.type_key(2));
        assert_ne!(deck.type_key(0), deck.type_key(1));
        assert_eq!(deck.type_key(1).as_str(), "try.png");
    }

    #[test]
    fn cards_enumerates_logical_order() {
        let deck = Deck::new(vec!["a".into(), "b".into()]);
        assert_eq!(deck.len(), 2);
        assert_eq!(deck.cards().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn shuffled_orders_is_a_permutation() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut orders = shuffled_orders(16, &mut rng);
        orders.sort_unstable();
        assert_eq!(orders, (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn shuffled_orders_reproducible_for_equal_seeds() {
        let mut a = ChaCha8Rng::seed_from_u64(42);
        let mut b = ChaCha8Rng::seed_from_u64(42);
        assert_eq!(shuffled_orders(12, &mut a), shuffled_orders(12, &mut b));
    }

    #[test]
    fn shuffled_orders_handles_degenerate_decks() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(shuffled_orders(0, &mut rng).is_empty());
        assert_eq!(shuffled_orders(1, &mut rng), vec![0]);
    }
}
