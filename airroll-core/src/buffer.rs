//! Fixed-Size Ring Buffer for Per-Tick Samples
//!
//! ## Overview
//!
//! A ring buffer whose capacity is fixed at compile time through const generics.
//! The control core uses it for the stick input history, which must never
//! allocate and must keep only the most recent samples.
//!
//! ### Why Not `heapless::Deque`?
//!
//! A deque returns an error (or hands the value back) when full. History
//! tracking wants the opposite: the oldest entry silently falls off. Writing
//! that on top of a deque means a pop-then-push on every tick; a dedicated ring
//! with a write cursor is simpler.
//!
//! ### Memory Layout
//!
//! ```text
//! RingBuffer<T, 3> after 4 pushes (a, b, c, d):
//! ┌─────┬─────┬─────┐
//! │  d  │  b  │  c  │  ← physical slots
//! └─────┴─────┴─────┘
//!          ↑
//!          └── write_pos = 1 (also the oldest entry once full)
//! ```
//!
//! ## Usage Example
//!
//! ```rust
//! use airroll_core::buffer::RingBuffer;
//!
//! let mut history: RingBuffer<f32, 3> = RingBuffer::new();
//! for v in [1.0, 2.0, 3.0, 4.0] {
//!     history.push(v);
//! }
//!
//! let values: Vec<f32> = history.iter().copied().collect();
//! assert_eq!(values, vec![2.0, 3.0, 4.0]);
//! assert_eq!(history.last(), Some(&4.0));
//! ```

/// Fixed-size ring buffer that overwrites its oldest entry when full
///
/// ## Internal Invariants
///
/// - `write_pos < N`
/// - `len <= N`
/// - Iteration yields entries oldest first
#[derive(Debug, Clone)]
pub struct RingBuffer<T: Copy, const N: usize> {
    /// Storage; `None` marks slots never written since the last clear
    data: [Option<T>; N],

    /// Index where the next write lands
    write_pos: usize,

    /// Number of valid entries, saturates at N
    len: usize,
}

impl<T: Copy, const N: usize> RingBuffer<T, N> {
    /// Creates a new empty buffer
    pub const fn new() -> Self {
        Self {
            data: [None; N],
            write_pos: 0,
            len: 0,
        }
    }

    /// Appends an entry, overwriting the oldest one when full
    pub fn push(&mut self, value: T) {
        if N == 0 {
            return;
        }

        self.data[self.write_pos] = Some(value);
        self.write_pos = (self.write_pos + 1) % N;

        if self.len < N {
            self.len += 1;
        }
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if buffer is full
    pub fn is_full(&self) -> bool {
        self.len == N
    }

    /// Capacity fixed at compile time
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Most recent entry
    pub fn last(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }

        let idx = if self.write_pos == 0 { N - 1 } else { self.write_pos - 1 };
        self.data[idx].as_ref()
    }

    /// Iterate oldest to newest
    pub fn iter(&self) -> RingBufferIter<'_, T, N> {
        RingBufferIter {
            buffer: self,
            index: 0,
        }
    }

    /// Drop all entries
    pub fn clear(&mut self) {
        self.data = [None; N];
        self.write_pos = 0;
        self.len = 0;
    }

    /// Entry by logical index (0 = oldest, len-1 = newest)
    ///
    /// ```text
    /// Physical:  [d, b, c]  (write_pos = 1, full)
    /// Logical:   [b, c, d]
    /// logical[i] = physical[(write_pos + i) % N]
    /// ```
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }

        let physical = if self.len < N {
            index
        } else {
            (self.write_pos + index) % N
        };

        self.data[physical].as_ref()
    }
}

impl<T: Copy, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over ring buffer contents, oldest first
pub struct RingBufferIter<'a, T: Copy, const N: usize> {
    buffer: &'a RingBuffer<T, N>,
    index: usize,
}

impl<'a, T: Copy, const N: usize> Iterator for RingBufferIter<'a, T, N> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.buffer.get(self.index)?;
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buffer.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}
