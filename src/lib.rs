//! This crate provides two cyclic structures built on one ring: a round-robin
//! [`Scheduler`] of processes, and a [`SeatingRing`] of card players passing
//! two decks around a table.
//!
//! Both keep their elements in a circular doubly-linked ring, and remember
//! positions in it by cursors. Inserting or removing an element takes constant
//! time, and no cursor is ever invalidated by an insertion: a cursor on a
//! removed element moves on to the next one.
//!
//! Here is a quick example showing how the scheduler works.
//!
//! ```
//! use cyclic_ring::Scheduler;
//!
//! let mut scheduler = Scheduler::new();
//! scheduler.add_process(1)?;
//! scheduler.add_process(2)?;
//! scheduler.add_process(3)?;
//! assert_eq!(scheduler.to_string(), "[1*, 2, 3]");
//!
//! scheduler.advance()?;
//! assert_eq!(scheduler.current_process()?, &2);
//!
//! scheduler.pause(&3)?;
//! scheduler.advance()?;
//! assert_eq!(scheduler.to_string(), "[1*, 2, 3 (i)]");
//! # Ok::<(), cyclic_ring::Error>(())
//! ```
//!
//! # Memory Layout
//!
//! The nodes of a ring live side by side in one arena, and link to each other
//! by index:
//! ```text
//!          ┌──────────────────────────────────────────────────────┐
//!          ↓                                                      │
//!    ╔═══════════╗           ╔═══════════╗           ╔═══════════╗│
//!    ║   next    ║ ────────→ ║   next    ║ ────────→ ║   next    ║┘
//!    ╟───────────╢           ╟───────────╢           ╟───────────╢
//! ┌─ ║   prev    ║ ←──────── ║   prev    ║ ←──────── ║   prev    ║
//! │  ╟───────────╢           ╟───────────╢           ╟───────────╢
//! │  ║ payload T ║           ║ payload T ║           ║ payload T ║
//! │  ╚═══════════╝           ╚═══════════╝           ╚═══════════╝
//! │    slot 0                  slot 1       vacant     slot 3  ↑
//! └────────────────────────────────────────────────────────────┘
//!          ↑                                   ↑
//!       current                           next vacant
//! ```
//! Every node is an element: there is no head, tail or ghost node, so
//! following `next` from any node comes back to it after exactly `len` steps.
//!
//! A removed node leaves a vacant slot behind, and vacant slots are reused
//! first by later insertions. Cursors are plain slot indices held by the
//! wrappers, `None` exactly when the ring is empty.
//!
//! # Seating Ring
//!
//! A [`SeatingRing`] keeps a score for every player, and two decks: red and
//! blue. New players sit right after the holder of the blue deck; either deck
//! can be passed any number of seats in both directions.
//!
//! ```
//! use cyclic_ring::SeatingRing;
//!
//! let mut table = SeatingRing::new();
//! table.add_player("e1")?;
//! table.add_player("e2")?;
//! table.add_player("e3")?;
//! assert_eq!(table.to_string(), "[(e1, 0)*, (e3, 0), (e2, 0)]");
//!
//! table.advance_red(-1)?;
//! assert_eq!(table.red_holder()?, &"e2");
//! # Ok::<(), cyclic_ring::Error>(())
//! ```
//!
//! # Seeking
//!
//! Passing a deck `n` seats walks `n` links. With the `fast-seek` feature,
//! enabled by default, `n` is first reduced modulo the number of players and
//! the deck goes the shorter way around. It can be disabled in your
//! `Cargo.toml`:
//! ```text
//! [dependencies]
//! cyclic_ring = { default-features = false }
//! ```
//!
//! # Errors
//!
//! Every fallible operation checks its precondition before touching the ring
//! and reports a broken one as an [`Error`]; the structure is left as it was.

#[doc(inline)]
pub use error::{Error, ErrorKind, Result};
#[doc(inline)]
pub use scheduler::Scheduler;
#[doc(inline)]
pub use seating::SeatingRing;

pub mod error;
pub mod scheduler;
pub mod seating;

mod ring;

#[cfg(test)]
pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
