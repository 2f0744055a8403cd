//! Single-writer, many-reader state cells.
//!
//! All loops run cooperatively on one thread, so a cell is an
//! `Rc<Cell<T>>` holding a `Copy` value. Every write replaces the whole
//! value; a reader can never observe a half-applied update. The writer
//! handle is not `Clone`: each cell has exactly one producer.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::reading::{FrameReadings, InteractionSnapshot};

/// Create a cell and return its unique writer plus a first reader.
pub fn state_cell<T: Copy>(initial: T) -> (StateWriter<T>, StateReader<T>) {
    let inner = Rc::new(Cell::new(initial));
    (StateWriter { inner: Rc::clone(&inner) }, StateReader { inner })
}

// ════════════════════════════════════════════════════════════════════════════
// StateWriter
// ════════════════════════════════════════════════════════════════════════════

/// The only handle that can change a cell's value.
pub struct StateWriter<T: Copy> {
    inner: Rc<Cell<T>>,
}

impl<T: Copy> StateWriter<T> {
    /// Replace the value.
    pub fn set(&self, value: T) {
        self.inner.set(value);
    }

    /// Compute a replacement from the current value and store it.
    pub fn update(&self, f: impl FnOnce(T) -> T) {
        self.inner.set(f(self.inner.get()));
    }

    /// Current value (the writer can always see what it last wrote).
    pub fn get(&self) -> T {
        self.inner.get()
    }

    pub fn reader(&self) -> StateReader<T> {
        StateReader { inner: Rc::clone(&self.inner) }
    }
}

impl StateWriter<InteractionSnapshot> {
    /// Merge one frame's readings into the shared snapshot in a single
    /// replacement (present slots overwritten, missing slots decayed).
    pub fn publish_frame(&self, frame: &FrameReadings) {
        self.update(|snapshot| snapshot.merged(frame));
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for StateWriter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StateWriter").field(&self.inner.get()).finish()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// StateReader
// ════════════════════════════════════════════════════════════════════════════

/// A read-only, cloneable view of a cell. Reads never block.
pub struct StateReader<T: Copy> {
    inner: Rc<Cell<T>>,
}

impl<T: Copy> StateReader<T> {
    pub fn get(&self) -> T {
        self.inner.get()
    }
}

impl<T: Copy> Clone for StateReader<T> {
    fn clone(&self) -> Self {
        StateReader { inner: Rc::clone(&self.inner) }
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for StateReader<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StateReader").field(&self.inner.get()).finish()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
