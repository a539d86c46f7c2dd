use crate::error::{Error, Result};
use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::mem;
use std::time::Instant;

/// A fixed number of slots, each either holding an idle resource, lent out, or
/// vacant (its resource was destroyed and has not been recreated yet).
///
/// Every field of [`State`] is only touched under `state`'s lock; callers get
/// resources handed out of the lock so that dropping or creating them never
/// happens while it is held.
pub(crate) struct Slots<T> {
    capacity: usize,
    state: Mutex<State<T>>,
    available: Condvar,
}

struct State<T> {
    idle: VecDeque<T>,
    leased: usize,
    closed: bool,
}

impl<T> State<T> {
    fn has_vacancy(&self, capacity: usize) -> bool {
        self.idle.len() + self.leased < capacity
    }
}

pub(crate) enum Slot<T> {
    Idle(T),
    Vacant,
}

/// A lent slot that is vacated on drop unless [`Claim::keep`] is called, so a
/// panic between claiming a slot and handing it to a lease does not shrink
/// the pool.
pub(crate) struct Claim<'a, T> {
    slots: &'a Slots<T>,
    held: bool,
}

impl<'a, T> Claim<'a, T> {
    pub fn new(slots: &'a Slots<T>) -> Self {
        Self { slots, held: true }
    }

    pub fn keep(mut self) {
        self.held = false;
    }
}

impl<T> Drop for Claim<'_, T> {
    fn drop(&mut self) {
        if self.held {
            self.slots.vacate();
        }
    }
}

impl<T> Slots<T> {
    pub fn new(capacity: usize, idle: VecDeque<T>) -> Self {
        debug_assert!(idle.len() <= capacity);
        Self {
            capacity,
            state: Mutex::new(State {
                idle,
                leased: 0,
                closed: false,
            }),
            available: Condvar::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Claims a slot, blocking until one is idle or vacant, `deadline` passes
    /// or the slots are closed. `None` waits without a deadline.
    pub fn take(&self, deadline: Option<Instant>) -> Result<Slot<T>> {
        let mut state = self.state.lock();
        let mut timed_out = false;
        loop {
            if state.closed {
                return Err(Error::ShuttingDown);
            }
            if let Some(resource) = state.idle.pop_front() {
                state.leased += 1;
                return Ok(Slot::Idle(resource));
            }
            if state.has_vacancy(self.capacity) {
                state.leased += 1;
                return Ok(Slot::Vacant);
            }
            if timed_out {
                return Err(Error::Timeout);
            }
            match deadline {
                Some(deadline) => {
                    timed_out = self.available.wait_until(&mut state, deadline).timed_out();
                }
                None => self.available.wait(&mut state),
            }
        }
    }

    /// Returns a lent resource to the idle queue. Hands it back if the slots
    /// are closed so the caller can drop it outside the lock.
    pub fn put(&self, resource: T) -> Option<T> {
        let mut state = self.state.lock();
        Self::end_lease(&mut state);
        let rejected = if state.closed {
            Some(resource)
        } else {
            state.idle.push_back(resource);
            None
        };
        drop(state);
        self.available.notify_one();
        rejected
    }

    /// Gives up a lent slot without returning a resource to it.
    pub fn vacate(&self) {
        let mut state = self.state.lock();
        Self::end_lease(&mut state);
        drop(state);
        self.available.notify_one();
    }

    /// Closes the slots and wakes every waiter. Returns the drained idle
    /// resources on the first call and `None` afterwards.
    pub fn close(&self) -> Option<VecDeque<T>> {
        let mut state = self.state.lock();
        if state.closed {
            return None;
        }
        state.closed = true;
        let drained = mem::take(&mut state.idle);
        drop(state);
        self.available.notify_all();
        Some(drained)
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    pub fn idle(&self) -> usize {
        self.state.lock().idle.len()
    }

    pub fn counts(&self) -> (usize, usize) {
        let state = self.state.lock();
        (state.idle.len(), state.leased)
    }

    fn end_lease(state: &mut State<T>) {
        assert!(
            state.leased > 0,
            "released a resource into a pool with no outstanding leases"
        );
        state.leased -= 1;
    }
}
