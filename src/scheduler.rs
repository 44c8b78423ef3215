use std::fmt;

use crate::error::{Error, Result};
use crate::ring::cursor::reseat;
use crate::ring::{NodeId, Ring};

/// A round-robin scheduler over processes of type `T`.
///
/// Processes sit in a ring in execution order. One cursor, `current`, marks the
/// process being executed; each process is either active or paused, and only
/// active processes are ever executed. A global `stopped` flag records that the
/// system interrupted scheduling; it is purely informative and does not change
/// the ring.
///
/// Whenever at least one process is active, `current` is on an active process.
/// When every process is paused, `current` still points at some process but
/// nothing is executing.
///
/// # Examples
///
/// ```
/// use cyclic_ring::Scheduler;
///
/// let mut scheduler = Scheduler::new();
/// scheduler.add_process("init")?;
/// scheduler.add_process("shell")?;
/// scheduler.add_process("editor")?;
/// assert_eq!(scheduler.to_string(), "[init*, shell, editor]");
///
/// scheduler.advance()?;
/// assert_eq!(scheduler.current_process()?, &"shell");
///
/// scheduler.pause(&"shell")?;
/// assert_eq!(scheduler.to_string(), "[editor*, init, shell (i)]");
/// # Ok::<(), cyclic_ring::Error>(())
/// ```
pub struct Scheduler<T> {
    ring: Ring<Process<T>>,
    current: Option<NodeId>,
    stopped: bool,
}

#[derive(Clone, PartialEq)]
struct Process<T> {
    value: T,
    active: bool,
}

impl<T> Process<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            active: true,
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

impl<T: fmt::Debug> fmt::Debug for Process<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.active {
            fmt::Debug::fmt(&self.value, f)
        } else {
            write!(f, "{:?} (i)", self.value)
        }
    }
}

// private methods
impl<T> Scheduler<T> {
    /// The cursor node, provided it is active.
    fn executing(&self) -> Option<NodeId> {
        self.current.filter(|&id| self.ring.get(id).is_active())
    }

    fn next_active_after(&self, id: NodeId) -> Option<NodeId> {
        self.ring.cursor(id).find_next(Process::is_active)
    }

    /// Put the cursor on an active process if the one under it is paused and
    /// another one can run.
    fn settle(&mut self) {
        if let Some(id) = self.current.filter(|&id| !self.ring.get(id).is_active()) {
            if let Some(active) = self.ring.cursor(id).find(Process::is_active) {
                log::debug!("scheduler: {:?} takes over from paused {:?}", active, id);
                self.current = Some(active);
            }
        }
    }
}

impl<T: PartialEq> Scheduler<T> {
    fn find(&self, process: &T) -> Result<NodeId> {
        self.ring
            .position(self.current, |entry| entry.value == *process)
            .ok_or(Error::NotFound)
    }
}

impl<T> Scheduler<T> {
    /// Creates an empty, running scheduler.
    pub fn new() -> Self {
        Self {
            ring: Ring::new(),
            current: None,
            stopped: false,
        }
    }

    /// Returns the process being executed.
    ///
    /// # Errors
    ///
    /// [`Error::NoActiveProcess`] if every process is paused or none is scheduled.
    pub fn current_process(&self) -> Result<&T> {
        self.executing()
            .map(|id| &self.ring.get(id).value)
            .ok_or(Error::NoActiveProcess)
    }

    /// Moves execution to the next active process after the current one,
    /// wrapping around the ring. With a single active process this keeps
    /// executing it.
    ///
    /// This operation should compute in *O*(*n*) time.
    ///
    /// # Errors
    ///
    /// [`Error::NoActiveProcess`] if there is no active process.
    pub fn advance(&mut self) -> Result<()> {
        let next = self
            .current
            .and_then(|id| self.next_active_after(id))
            .ok_or(Error::NoActiveProcess)?;
        log::debug!("scheduler: advance {:?} -> {:?}", self.current, next);
        self.current = Some(next);
        Ok(())
    }

    /// Stops the scheduler to serve a system interrupt.
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyStopped`] if the scheduler is already stopped.
    pub fn stop(&mut self) -> Result<()> {
        if self.stopped {
            return Err(Error::AlreadyStopped);
        }
        log::debug!("scheduler: stopped");
        self.stopped = true;
        Ok(())
    }

    /// Resumes the scheduler after a system interrupt.
    ///
    /// # Errors
    ///
    /// [`Error::NotStopped`] if the scheduler is running.
    pub fn resume_system(&mut self) -> Result<()> {
        if !self.stopped {
            return Err(Error::NotStopped);
        }
        log::debug!("scheduler: resumed");
        self.stopped = false;
        Ok(())
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    pub fn has_processes(&self) -> bool {
        !self.ring.is_empty()
    }

    pub fn has_active_processes(&self) -> bool {
        self.ring.iter_from(self.current).any(Process::is_active)
    }

    /// Returns the number of scheduled processes, active or not.
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.ring
            .iter_from(self.current)
            .filter(|entry| entry.is_active())
            .count()
    }

    /// Iterates over the scheduled processes in execution order, starting at
    /// the current one.
    pub fn processes(&self) -> impl Iterator<Item = &T> + '_ {
        self.ring.iter_from(self.current).map(|entry| &entry.value)
    }
}

impl<T: PartialEq> Scheduler<T> {
    /// Schedules `process` immediately before the current one, so that it
    /// runs last in the current round. If nothing is executing, `process`
    /// starts executing right away.
    ///
    /// This operation should compute in *O*(*n*) time.
    ///
    /// # Errors
    ///
    /// [`Error::Duplicate`] if `process` is already scheduled.
    pub fn add_process(&mut self, process: T) -> Result<()> {
        if self.is_scheduled(&process) {
            return Err(Error::Duplicate);
        }
        let id = self.ring.insert_before(self.current, Process::new(process));
        if self.executing().is_none() {
            log::debug!("scheduler: {:?} starts executing", id);
            self.current = Some(id);
        }
        Ok(())
    }

    /// Unschedules `process` and returns it. If it was executing, the next
    /// active process takes over.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if `process` is not scheduled.
    pub fn remove_process(&mut self, process: &T) -> Result<T> {
        let id = self.find(process)?;
        let (removed, successor) = self.ring.remove(id);
        if self.current == Some(id) {
            reseat(&mut self.current, id, successor);
            self.settle();
            log::debug!("scheduler: {:?} removed, current is {:?}", id, self.current);
        }
        Ok(removed.value)
    }

    /// Pauses `process`. If it was executing, the next active process takes
    /// over; if none is left, nothing executes.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if `process` is not scheduled, [`Error::AlreadyPaused`]
    /// if it is paused.
    pub fn pause(&mut self, process: &T) -> Result<()> {
        let id = self.find(process)?;
        let entry = self.ring.get_mut(id);
        if !entry.active {
            return Err(Error::AlreadyPaused);
        }
        entry.active = false;
        if self.current == Some(id) {
            if let Some(next) = self.next_active_after(id) {
                self.current = Some(next);
            }
        }
        log::debug!("scheduler: paused {:?}, current is {:?}", id, self.current);
        Ok(())
    }

    /// Resumes a paused `process`. If nothing was executing, `process` starts
    /// executing.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] if `process` is not scheduled, [`Error::AlreadyActive`]
    /// if it is active.
    pub fn resume(&mut self, process: &T) -> Result<()> {
        let id = self.find(process)?;
        let idle = self.executing().is_none();
        let entry = self.ring.get_mut(id);
        if entry.active {
            return Err(Error::AlreadyActive);
        }
        entry.active = true;
        if idle {
            self.current = Some(id);
        }
        log::debug!("scheduler: resumed {:?}, current is {:?}", id, self.current);
        Ok(())
    }

    pub fn is_scheduled(&self, process: &T) -> bool {
        self.find(process).is_ok()
    }

    /// # Errors
    ///
    /// [`Error::NotFound`] if `process` is not scheduled.
    pub fn is_active(&self, process: &T) -> Result<bool> {
        self.find(process).map(|id| self.ring.get(id).is_active())
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Two schedulers are equal if they have the same `stopped` flag and the same
/// processes, with the same activity, in the same order counted from their
/// current process.
impl<T: PartialEq> PartialEq for Scheduler<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.stopped == other.stopped
            && self
                .ring
                .iter_from(self.current)
                .eq(other.ring.iter_from(other.current))
    }
}

impl<T: Eq> Eq for Scheduler<T> {}

/// Copies the ring in execution order; the copy shares no node with `self`.
impl<T: Clone> Clone for Scheduler<T> {
    fn clone(&self) -> Self {
        let mut ring = Ring::with_capacity(self.ring.len());
        let mut current = None;
        for entry in self.ring.iter_from(self.current) {
            // Inserting before the first copied node appends to the ring.
            let id = ring.insert_before(current, entry.clone());
            if current.is_none() {
                current = Some(id);
            }
        }
        Self {
            ring,
            current,
            stopped: self.stopped,
        }
    }
}

/// Shows the processes in execution order, from the current one. The
/// executing process is marked with `*` and paused ones with ` (i)`:
/// `[p2*, p0 (i), p1]`.
impl<T: fmt::Display> fmt::Display for Scheduler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (index, entry) in self.ring.iter_from(self.current).enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", entry.value)?;
            if !entry.active {
                write!(f, " (i)")?;
            } else if index == 0 {
                write!(f, "*")?;
            }
        }
        write!(f, "]")
    }
}

impl<T: fmt::Debug> fmt::Debug for Scheduler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("processes", &self.ring.iter_from(self.current))
            .field("stopped", &self.stopped)
            .finish()
    }
}
