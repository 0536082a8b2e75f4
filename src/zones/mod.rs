//! Draw and reveal stacks.
//!
//! ## Key Types
//!
//! - `CardStack<T>`: draw-from-top / push-to-top pile (deck, discard,
//!   adornment pile). Contents are private; only the count is public.
//! - `RevealedStack<T>`: fixed revealed window plus a private rest pile
//!   (train car tiles, visitors). Replacing a revealed entry rotates it to
//!   the bottom of the rest pile.
//!
//! The Meadow and the station slots are plain vectors on `GameState`.

pub mod card_stack;
pub mod revealed;

pub use card_stack::CardStack;
pub use revealed::RevealedStack;
