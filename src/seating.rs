use std::fmt;

use crate::error::{Error, Result};
use crate::ring::cursor::reseat;
use crate::ring::{NodeId, Ring};

/// Players seated around a card table, with a score each and two decks, red
/// and blue, passed around independently.
///
/// New players sit right after the holder of the blue deck. Either deck may be
/// passed any number of seats forward or backward, and both may be held by the
/// same player. When a deck holder leaves the table, the deck passes to the
/// next player in the round.
///
/// # Examples
///
/// ```
/// use cyclic_ring::SeatingRing;
///
/// let mut table = SeatingRing::new();
/// for player in ["j1", "j2", "j3", "j4"] {
///     table.add_player(player)?;
/// }
/// assert_eq!(table.to_string(), "[(j1, 0)*, (j4, 0), (j3, 0), (j2, 0)]");
///
/// table.advance_red(-1)?;
/// assert_eq!(table.red_holder()?, &"j2");
/// assert_eq!(table.opposite()?, &"j4");
///
/// table.add_score(&"j3", 7)?;
/// assert_eq!(table.winner()?, &"j3");
/// # Ok::<(), cyclic_ring::Error>(())
/// ```
pub struct SeatingRing<T> {
    ring: Ring<Seat<T>>,
    red: Option<NodeId>,
    blue: Option<NodeId>,
}

#[derive(Clone, Debug, PartialEq)]
struct Seat<T> {
    player: T,
    score: i64,
}

impl<T> Seat<T> {
    fn new(player: T) -> Self {
        Self { player, score: 0 }
    }
}

// private methods
impl<T> SeatingRing<T> {
    fn holder(&self, marker: Option<NodeId>) -> Result<&T> {
        marker
            .map(|id| &self.ring.get(id).player)
            .ok_or(Error::Empty)
    }

    fn seek(&self, marker: Option<NodeId>, offset: isize) -> Result<NodeId> {
        let mut cursor = self.ring.cursor(marker.ok_or(Error::Empty)?);
        cursor.seek(offset);
        Ok(cursor.id())
    }

    fn remove_seat(&mut self, id: NodeId) -> T {
        let (seat, successor) = self.ring.remove(id);
        reseat(&mut self.red, id, successor);
        reseat(&mut self.blue, id, successor);
        log::debug!(
            "seating: {:?} left, red at {:?}, blue at {:?}",
            id,
            self.red,
            self.blue
        );
        seat.player
    }

    /// Seats in order from the blue deck, with the red deck's seat index.
    fn seats(&self) -> (impl Iterator<Item = &Seat<T>> + '_, Option<usize>) {
        let red = self
            .red
            .zip(self.blue)
            .map(|(red, blue)| self.ring.distance(blue, red));
        (self.ring.iter_from(self.blue), red)
    }
}

impl<T: PartialEq> SeatingRing<T> {
    fn find(&self, player: &T) -> Option<NodeId> {
        self.ring
            .position(self.blue, |seat| seat.player == *player)
    }
}

impl<T> SeatingRing<T> {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            ring: Ring::new(),
            red: None,
            blue: None,
        }
    }

    /// Passes the red deck `n` seats forward, or `-n` seats backward if `n` is
    /// negative.
    ///
    /// # Errors
    ///
    /// [`Error::Empty`] if nobody is seated.
    pub fn advance_red(&mut self, n: isize) -> Result<()> {
        let red = self.seek(self.red, n)?;
        log::debug!("seating: red {:?} -> {:?}", self.red, red);
        self.red = Some(red);
        Ok(())
    }

    /// Passes the blue deck `n` seats forward, or `-n` seats backward if `n` is
    /// negative.
    ///
    /// # Errors
    ///
    /// [`Error::Empty`] if nobody is seated.
    pub fn advance_blue(&mut self, n: isize) -> Result<()> {
        let blue = self.seek(self.blue, n)?;
        log::debug!("seating: blue {:?} -> {:?}", self.blue, blue);
        self.blue = Some(blue);
        Ok(())
    }

    pub fn red_holder(&self) -> Result<&T> {
        self.holder(self.red)
    }

    pub fn blue_holder(&self) -> Result<&T> {
        self.holder(self.blue)
    }

    /// Returns the player `n` seats after the red deck holder, or `-n` seats
    /// before it if `n` is negative.
    pub fn player_at(&self, n: isize) -> Result<&T> {
        let id = self.seek(self.red, n)?;
        Ok(&self.ring.get(id).player)
    }

    /// Returns the player facing the red deck holder, half the table away.
    ///
    /// # Errors
    ///
    /// [`Error::Empty`] if nobody is seated, [`Error::OddPlayerCount`] if
    /// nobody faces the red deck holder.
    pub fn opposite(&self) -> Result<&T> {
        let len = self.len();
        if len == 0 {
            return Err(Error::Empty);
        }
        if len % 2 != 0 {
            return Err(Error::OddPlayerCount(len));
        }
        self.player_at((len / 2) as isize)
    }

    /// Removes the blue deck holder; the deck passes to the next player.
    ///
    /// # Errors
    ///
    /// [`Error::Empty`] if nobody is seated.
    pub fn remove_blue_holder(&mut self) -> Result<T> {
        let blue = self.blue.ok_or(Error::Empty)?;
        Ok(self.remove_seat(blue))
    }

    /// Returns the player with the highest score.
    ///
    /// # Errors
    ///
    /// [`Error::Empty`] if nobody is seated, [`Error::TiedScores`] if several
    /// players share the highest score.
    pub fn winner(&self) -> Result<&T> {
        let mut seats = self.ring.iter_from(self.blue);
        let mut best = seats.next().ok_or(Error::Empty)?;
        let mut tied = false;
        for seat in seats {
            if seat.score > best.score {
                best = seat;
                tied = false;
            } else if seat.score == best.score {
                tied = true;
            }
        }
        if tied {
            return Err(Error::TiedScores);
        }
        Ok(&best.player)
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Iterates over players and their scores, starting at the blue deck holder.
    pub fn players(&self) -> impl Iterator<Item = (&T, i64)> + '_ {
        self.ring
            .iter_from(self.blue)
            .map(|seat| (&seat.player, seat.score))
    }
}

impl<T: PartialEq> SeatingRing<T> {
    /// Seats `player` right after the blue deck holder. The first player at
    /// an empty table holds both decks.
    ///
    /// # Errors
    ///
    /// [`Error::Duplicate`] if `player` is already seated.
    pub fn add_player(&mut self, player: T) -> Result<()> {
        if self.contains(&player) {
            return Err(Error::Duplicate);
        }
        let id = self.ring.insert_after(self.blue, Seat::new(player));
        if self.blue.is_none() {
            self.red = Some(id);
            self.blue = Some(id);
        }
        log::debug!("seating: {:?} sat down after {:?}", id, self.blue);
        Ok(())
    }

    /// Removes `player` from the table and returns it, or `None` if it is not
    /// seated. Decks it held pass to the next player.
    pub fn remove_player(&mut self, player: &T) -> Option<T> {
        let id = self.find(player)?;
        Some(self.remove_seat(id))
    }

    pub fn contains(&self, player: &T) -> bool {
        self.find(player).is_some()
    }

    /// # Errors
    ///
    /// [`Error::NotFound`] if `player` is not seated, [`Error::ScoreOverflow`]
    /// if the new score does not fit in an `i64`; the score is then unchanged.
    pub fn add_score(&mut self, player: &T, points: i64) -> Result<()> {
        let id = self.find(player).ok_or(Error::NotFound)?;
        let seat = self.ring.get_mut(id);
        seat.score = seat
            .score
            .checked_add(points)
            .ok_or(Error::ScoreOverflow)?;
        Ok(())
    }

    /// # Errors
    ///
    /// [`Error::NotFound`] if `player` is not seated.
    pub fn score_of(&self, player: &T) -> Result<i64> {
        let id = self.find(player).ok_or(Error::NotFound)?;
        Ok(self.ring.get(id).score)
    }
}

impl<T> Default for SeatingRing<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Two tables are equal if the same player holds the red deck and the players
/// sit in the same order, with the same scores, counted from the blue deck.
impl<T: PartialEq> PartialEq for SeatingRing<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.red_holder().ok() == other.red_holder().ok()
            && self
                .ring
                .iter_from(self.blue)
                .eq(other.ring.iter_from(other.blue))
    }
}

impl<T: Eq> Eq for SeatingRing<T> {}

/// Copies the table seat by seat from the blue deck, then passes the red deck
/// in the copy as many seats as it sits after the blue one in `self`.
impl<T: Clone> Clone for SeatingRing<T> {
    fn clone(&self) -> Self {
        let mut ring = Ring::with_capacity(self.ring.len());
        let mut blue = None;
        for seat in self.ring.iter_from(self.blue) {
            // Inserting before the first copied seat appends to the ring.
            let id = ring.insert_before(blue, seat.clone());
            if blue.is_none() {
                blue = Some(id);
            }
        }
        let (_, red_at) = self.seats();
        let red = blue.zip(red_at).map(|(blue, steps)| {
            let mut cursor = ring.cursor(blue);
            cursor.seek_forward(steps);
            cursor.id()
        });
        Self { ring, red, blue }
    }
}

/// Shows `(player, score)` pairs from the blue deck holder, marking the red
/// deck holder with `*`: `[(e2, 0), (e1, 3)*]`.
impl<T: fmt::Display> fmt::Display for SeatingRing<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (seats, red_at) = self.seats();
        write!(f, "[")?;
        for (index, seat) in seats.enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "({}, {})", seat.player, seat.score)?;
            if red_at == Some(index) {
                write!(f, "*")?;
            }
        }
        write!(f, "]")
    }
}

impl<T: fmt::Debug> fmt::Debug for SeatingRing<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeatingRing")
            .field("seats", &self.ring.iter_from(self.blue))
            .field("red", &self.red_holder().ok())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::seating::SeatingRing;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn table_of<'a>(players: impl IntoIterator<Item = &'a str>) -> SeatingRing<&'a str> {
        let mut table = SeatingRing::new();
        for player in players {
            table.add_player(player).unwrap();
        }
        table
    }

    fn check<T>(table: &SeatingRing<T>) {
        table.ring.assert_cyclic();
        assert_eq!(table.red.is_some(), !table.is_empty());
        assert_eq!(table.blue.is_some(), !table.is_empty());
    }

    #[test]
    fn seating_empty() {
        crate::init_logger();
        let mut table = SeatingRing::<&str>::new();
        assert!(table.is_empty());
        assert_eq!(table.len(), 0);
        assert_eq!(table.to_string(), "[]");
        assert_eq!(table.red_holder(), Err(Error::Empty));
        assert_eq!(table.blue_holder(), Err(Error::Empty));
        assert_eq!(table.player_at(1), Err(Error::Empty));
        assert_eq!(table.opposite(), Err(Error::Empty));
        assert_eq!(table.winner(), Err(Error::Empty));
        assert_eq!(table.advance_red(1), Err(Error::Empty));
        assert_eq!(table.advance_blue(-1), Err(Error::Empty));
        assert_eq!(table.remove_blue_holder(), Err(Error::Empty));
        assert_eq!(table.remove_player(&"j1"), None);
        check(&table);
    }

    #[test]
    fn seating_add_after_blue() {
        crate::init_logger();
        let mut table = table_of(["e1"]);
        assert_eq!(table.to_string(), "[(e1, 0)*]");
        table.add_player("e2").unwrap();
        table.add_player("e3").unwrap();
        assert_eq!(table.to_string(), "[(e1, 0)*, (e3, 0), (e2, 0)]");

        table.advance_blue(1).unwrap();
        table.add_player("e4").unwrap();
        assert_eq!(table.to_string(), "[(e3, 0), (e4, 0), (e2, 0), (e1, 0)*]");
        assert_eq!(table.add_player("e2"), Err(Error::Duplicate));
        assert_eq!(table.len(), 4);
        check(&table);
    }

    #[test]
    fn seating_render_two_players() {
        let mut table = table_of(["e1", "e2"]);
        table.advance_blue(1).unwrap();
        assert_eq!(table.to_string(), "[(e2, 0), (e1, 0)*]");
    }

    #[test]
    fn seating_advance() {
        let mut table = table_of(["j1", "j3", "j2"]);
        // seated as [j1 j2 j3]
        table.advance_red(1).unwrap();
        assert_eq!(table.red_holder(), Ok(&"j2"));
        table.advance_red(1).unwrap();
        assert_eq!(table.red_holder(), Ok(&"j3"));
        table.advance_red(2).unwrap();
        assert_eq!(table.red_holder(), Ok(&"j2"));
        table.advance_red(-4).unwrap();
        assert_eq!(table.red_holder(), Ok(&"j1"));
        table.advance_red(3000).unwrap();
        assert_eq!(table.red_holder(), Ok(&"j1"));

        table.advance_blue(-1).unwrap();
        assert_eq!(table.blue_holder(), Ok(&"j3"));
        assert_eq!(table.red_holder(), Ok(&"j1"));
    }

    #[test]
    fn seating_advance_zero_is_idempotent() {
        let mut table = table_of(["a", "b", "c"]);
        table.advance_red(1).unwrap();
        let rendered = table.to_string();
        table.advance_red(0).unwrap();
        table.advance_blue(0).unwrap();
        assert_eq!(table.to_string(), rendered);
    }

    #[test]
    fn seating_player_at() {
        let mut table = table_of(["j1", "j3", "j2"]);
        table.advance_red(1).unwrap();
        assert_eq!(table.player_at(0), Ok(&"j2"));
        assert_eq!(table.player_at(1), Ok(&"j3"));
        assert_eq!(table.player_at(2), Ok(&"j1"));
        assert_eq!(table.player_at(-1), Ok(&"j1"));
        assert_eq!(table.player_at(-5), Ok(&"j3"));
        assert_eq!(table.red_holder(), Ok(&"j2"));
    }

    #[test]
    fn seating_opposite() {
        let mut table = table_of(["j1", "j2", "j3", "j4"]);
        // seated as [j1 j4 j3 j2]
        table.advance_red(3).unwrap();
        assert_eq!(table.red_holder(), Ok(&"j2"));
        assert_eq!(table.opposite(), Ok(&"j4"));

        table.remove_player(&"j3");
        assert_eq!(table.opposite(), Err(Error::OddPlayerCount(3)));
        assert_eq!(
            Error::OddPlayerCount(3).kind(),
            crate::error::ErrorKind::PreconditionViolation
        );
    }

    #[test]
    fn seating_remove_passes_decks() {
        crate::init_logger();
        let mut table = table_of(["j1", "j5", "j4", "j3", "j2"]);
        // seated as [j1 j2 j3 j4 j5]
        table.advance_blue(2).unwrap();
        table.advance_red(2).unwrap();
        assert_eq!(table.blue_holder(), Ok(&"j3"));
        assert_eq!(table.remove_blue_holder(), Ok("j3"));
        assert_eq!(table.blue_holder(), Ok(&"j4"));
        assert_eq!(table.red_holder(), Ok(&"j4"));
        assert_eq!(table.to_string(), "[(j4, 0)*, (j5, 0), (j1, 0), (j2, 0)]");

        assert_eq!(table.remove_player(&"j1"), Some("j1"));
        assert_eq!(table.remove_player(&"j1"), None);
        assert_eq!(table.to_string(), "[(j4, 0)*, (j5, 0), (j2, 0)]");
        check(&table);
    }

    #[test]
    fn seating_remove_red_holder_only() {
        let mut table = table_of(["j1", "j4", "j3", "j2"]);
        // seated as [j1 j2 j3 j4]
        table.advance_red(2).unwrap();
        assert_eq!(table.red_holder(), Ok(&"j3"));
        assert_eq!(table.remove_player(&"j3"), Some("j3"));
        assert_eq!(table.red_holder(), Ok(&"j4"));
        assert_eq!(table.blue_holder(), Ok(&"j1"));
        assert_eq!(table.to_string(), "[(j1, 0), (j2, 0), (j4, 0)*]");

        table.advance_blue(1).unwrap();
        assert_eq!(table.remove_blue_holder(), Ok("j2"));
        assert_eq!(table.blue_holder(), Ok(&"j4"));
        assert_eq!(table.red_holder(), Ok(&"j4"));
        check(&table);
    }

    #[test]
    fn seating_remove_last_player() {
        let mut table = table_of(["solo"]);
        assert_eq!(table.remove_player(&"solo"), Some("solo"));
        assert!(table.is_empty());
        assert_eq!(table.red, None);
        assert_eq!(table.blue, None);
        assert_eq!(table.to_string(), "[]");
        check(&table);

        table.add_player("next").unwrap();
        assert_eq!(table.red_holder(), Ok(&"next"));
        assert_eq!(table.blue_holder(), Ok(&"next"));
        assert_eq!(table.to_string(), "[(next, 0)*]");
        check(&table);

        assert_eq!(table.remove_blue_holder(), Ok("next"));
        assert_eq!(table.red, None);
        assert_eq!(table.blue, None);
    }

    #[test]
    fn seating_scores() {
        let mut table = table_of(["a", "b", "c"]);
        assert_eq!(table.score_of(&"a"), Ok(0));
        table.add_score(&"a", 3).unwrap();
        table.add_score(&"b", 5).unwrap();
        table.add_score(&"a", 1).unwrap();
        assert_eq!(table.score_of(&"a"), Ok(4));
        assert_eq!(table.winner(), Ok(&"b"));

        table.add_score(&"a", 1).unwrap();
        assert_eq!(table.winner(), Err(Error::TiedScores));
        assert_eq!(
            Error::TiedScores.kind(),
            crate::error::ErrorKind::AmbiguousResult
        );

        table.add_score(&"c", -2).unwrap();
        table.add_score(&"b", 1).unwrap();
        assert_eq!(table.winner(), Ok(&"b"));
        assert_eq!(table.add_score(&"z", 1), Err(Error::NotFound));
        assert_eq!(table.score_of(&"z"), Err(Error::NotFound));
        assert_eq!(table.to_string(), "[(a, 5)*, (c, -2), (b, 6)]");
    }

    #[test]
    fn seating_score_overflow() {
        let mut table = table_of(["a", "b"]);
        table.add_score(&"a", i64::MAX).unwrap();
        assert_eq!(table.add_score(&"a", 1), Err(Error::ScoreOverflow));
        assert_eq!(table.score_of(&"a"), Ok(i64::MAX));

        table.add_score(&"b", i64::MIN).unwrap();
        assert_eq!(table.add_score(&"b", -1), Err(Error::ScoreOverflow));
        assert_eq!(table.score_of(&"b"), Ok(i64::MIN));
        assert_eq!(table.add_score(&"b", i64::MAX), Ok(()));
        assert_eq!(table.score_of(&"b"), Ok(-1));
        assert_eq!(
            Error::ScoreOverflow.kind(),
            crate::error::ErrorKind::PreconditionViolation
        );
    }

    #[test]
    fn seating_winner_single_player() {
        let table = table_of(["only"]);
        assert_eq!(table.winner(), Ok(&"only"));
    }

    #[test]
    fn seating_eq() {
        let mut t1 = table_of(["a", "b", "c"]);
        let mut t2 = table_of(["a", "b", "c"]);
        assert_eq!(t1, t2);
        assert_eq!(t2, t1);
        assert_eq!(SeatingRing::<&str>::new(), SeatingRing::new());

        t1.advance_red(1).unwrap();
        assert_ne!(t1, t2);
        t2.advance_red(1).unwrap();
        assert_eq!(t1, t2);

        t1.add_score(&"b", 2).unwrap();
        assert_ne!(t1, t2);
        t2.add_score(&"b", 2).unwrap();
        assert_eq!(t1, t2);

        t1.advance_blue(1).unwrap();
        assert_ne!(t1, t2);
        assert_ne!(t1, table_of(["a", "b"]));
    }

    #[test]
    fn seating_clone_independent() {
        let mut original = table_of(["a", "b", "c", "d"]);
        original.advance_blue(1).unwrap();
        original.advance_red(-1).unwrap();
        original.add_score(&"c", 4).unwrap();
        let rendered = original.to_string();

        let mut copy = original.clone();
        assert_eq!(copy, original);
        assert_eq!(copy.to_string(), rendered);
        assert_eq!(copy.red_holder(), original.red_holder());
        assert_eq!(copy.blue_holder(), original.blue_holder());
        check(&copy);

        copy.remove_blue_holder().unwrap();
        copy.add_score(&"c", 1).unwrap();
        copy.advance_red(2).unwrap();
        copy.add_player("e").unwrap();
        assert_eq!(original.to_string(), rendered);
        assert_eq!(original.len(), 4);

        original.remove_player(&"a");
        assert!(copy.contains(&"a"));
        assert_eq!(copy.score_of(&"c"), Ok(5));
        check(&original);
        check(&copy);

        let empty = SeatingRing::<&str>::new();
        assert_eq!(empty.clone(), empty);
    }

    #[test]
    fn seating_debug() {
        let mut table = table_of(["a", "b"]);
        table.add_score(&"b", 2).unwrap();
        assert_eq!(
            format!("{:?}", table),
            "SeatingRing { seats: [Seat { player: \"a\", score: 0 }, \
             Seat { player: \"b\", score: 2 }], red: Some(\"a\") }"
        );
    }

    #[test]
    fn seating_random_operations() {
        crate::init_logger();
        let mut rng = SmallRng::seed_from_u64(0xcafe);
        let mut table = SeatingRing::new();
        let mut seated: Vec<u32> = Vec::new();

        for _ in 0..2000 {
            let player = rng.random_range(0..10u32);
            match rng.random_range(0..4) {
                0 => {
                    let added = table.add_player(player);
                    if seated.contains(&player) {
                        assert_eq!(added, Err(Error::Duplicate));
                    } else {
                        assert_eq!(added, Ok(()));
                        seated.push(player);
                    }
                }
                1 => {
                    let removed = table.remove_player(&player);
                    assert_eq!(removed.is_some(), seated.contains(&player));
                    seated.retain(|&p| p != player);
                }
                2 if !seated.is_empty() => {
                    let blue = *table.blue_holder().unwrap();
                    assert_eq!(table.remove_blue_holder(), Ok(blue));
                    seated.retain(|&p| p != blue);
                }
                _ => {
                    let offset = rng.random_range(-25i32..25) as isize;
                    let moved = table.advance_red(offset).and(table.advance_blue(-offset));
                    assert_eq!(moved.is_ok(), !seated.is_empty());
                }
            }

            assert_eq!(table.len(), seated.len());
            assert_eq!(table.is_empty(), seated.is_empty());
            for player in &seated {
                assert!(table.contains(player));
            }
            assert_eq!(table.clone(), table);
            check(&table);
        }
    }
}
