use std::fmt;

/// Errors reported by [`Scheduler`] and [`SeatingRing`] when an operation is
/// invoked outside of its precondition.
///
/// A call that returns an error has not touched the ring: links, cursors,
/// flags and scores are exactly as they were before the call.
///
/// [`Scheduler`]: crate::Scheduler
/// [`SeatingRing`]: crate::SeatingRing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// The operation needs at least one element.
    Empty,
    /// The value is already in the ring.
    Duplicate,
    /// The value is not in the ring.
    NotFound,
    /// The scheduler has no active process.
    NoActiveProcess,
    /// The process is already active.
    AlreadyActive,
    /// The process is already paused.
    AlreadyPaused,
    /// The scheduler is already stopped.
    AlreadyStopped,
    /// The scheduler is not stopped.
    NotStopped,
    /// There is no opposite seat at a table with this many players.
    OddPlayerCount(usize),
    /// More than one player shares the highest score.
    TiedScores,
    /// Adding the points would take a score out of the `i64` range.
    ScoreOverflow,
}

/// Broad classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller broke the documented precondition of the operation.
    PreconditionViolation,
    /// The state is valid but does not determine a unique answer.
    AmbiguousResult,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TiedScores => ErrorKind::AmbiguousResult,
            _ => ErrorKind::PreconditionViolation,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "the ring is empty"),
            Self::Duplicate => write!(f, "the value is already in the ring"),
            Self::NotFound => write!(f, "the value is not in the ring"),
            Self::NoActiveProcess => write!(f, "no active process is scheduled"),
            Self::AlreadyActive => write!(f, "the process is already active"),
            Self::AlreadyPaused => write!(f, "the process is already paused"),
            Self::AlreadyStopped => write!(f, "the scheduler is already stopped"),
            Self::NotStopped => write!(f, "the scheduler is not stopped"),
            Self::OddPlayerCount(n) => write!(f, "no opposite seat with {} players", n),
            Self::TiedScores => write!(f, "the highest score is shared"),
            Self::ScoreOverflow => write!(f, "the score is out of range"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T, E = Error> = std::result::Result<T, E>;
