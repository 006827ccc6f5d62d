//! Receive ring buffer
//!
//! Single-producer/single-consumer byte queue between the UART receive
//! interrupt and the polling frame scanner. The producer only writes the
//! write cursor and the consumer only writes the read cursor, so no lock
//! is taken on either side.
//!
//! One slot is always left empty: `read == write` means empty, and
//! `next(write) == read` means full. A full ring drops the incoming byte
//! and counts it; it never overwrites unread data.

use portable_atomic::{AtomicU32, AtomicU8, AtomicUsize, Ordering};

#[allow(clippy::declare_interior_mutable_const)]
const EMPTY_SLOT: AtomicU8 = AtomicU8::new(0);

/// Fixed-capacity SPSC byte ring
///
/// `N` is the slot count; at most `N - 1` bytes are held at once.
/// Usable from a `static` since every method takes `&self`.
pub struct RxRing<const N: usize> {
    slots: [AtomicU8; N],
    /// Next slot to write (producer owned)
    write: AtomicUsize,
    /// Next slot to read (consumer owned)
    read: AtomicUsize,
    /// Bytes dropped because the ring was full
    dropped: AtomicU32,
}

impl<const N: usize> Default for RxRing<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RxRing<N> {
    const MIN_SLOTS: () = assert!(N >= 2, "RxRing needs at least two slots");

    /// Create an empty ring
    pub const fn new() -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::MIN_SLOTS;
        Self {
            slots: [EMPTY_SLOT; N],
            write: AtomicUsize::new(0),
            read: AtomicUsize::new(0),
            dropped: AtomicU32::new(0),
        }
    }

    #[inline]
    const fn advance(index: usize) -> usize {
        if index + 1 == N {
            0
        } else {
            index + 1
        }
    }

    /// Append one byte (producer side)
    ///
    /// Returns `false` if the ring was full and the byte was dropped.
    pub fn push(&self, byte: u8) -> bool {
        let write = self.write.load(Ordering::Relaxed);
        let next = Self::advance(write);

        if next == self.read.load(Ordering::Acquire) {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            return false;
        }

        self.slots[write].store(byte, Ordering::Relaxed);
        // Publish the slot before the cursor moves past it
        self.write.store(next, Ordering::Release);
        true
    }

    /// Append a batch of bytes in order (producer side)
    ///
    /// Not atomic across the batch: once the ring fills, the remaining
    /// bytes are dropped. Returns the number of bytes accepted.
    pub fn push_many(&self, bytes: &[u8]) -> usize {
        let mut accepted = 0;
        for &byte in bytes {
            if self.push(byte) {
                accepted += 1;
            }
        }
        accepted
    }

    /// True if at least one byte is waiting
    pub fn has_data(&self) -> bool {
        self.read.load(Ordering::Relaxed) != self.write.load(Ordering::Acquire)
    }

    /// Remove and return the oldest byte (consumer side)
    pub fn take_byte(&self) -> Option<u8> {
        let read = self.read.load(Ordering::Relaxed);
        if read == self.write.load(Ordering::Acquire) {
            return None;
        }

        let byte = self.slots[read].load(Ordering::Relaxed);
        // Release the slot only after the byte has been read out
        self.read.store(Self::advance(read), Ordering::Release);
        Some(byte)
    }

    /// Iterator that takes bytes until the ring is empty (consumer side)
    ///
    /// Lazy: a byte leaves the ring only when `next` is called.
    pub fn drain(&self) -> Drain<'_, N> {
        Drain { ring: self }
    }

    /// Number of bytes waiting
    pub fn len(&self) -> usize {
        let write = self.write.load(Ordering::Acquire);
        let read = self.read.load(Ordering::Acquire);
        if write >= read {
            write - read
        } else {
            N - read + write
        }
    }

    /// Check if ring is empty
    pub fn is_empty(&self) -> bool {
        !self.has_data()
    }

    /// Check if the next push would be dropped
    pub fn is_full(&self) -> bool {
        self.len() == self.capacity()
    }

    /// Usable capacity (`N - 1`)
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Total bytes dropped on overflow since creation or the last reset
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Return both cursors to the buffer origin and clear the drop counter
    ///
    /// Protocol init only: must not race with `push`.
    pub fn reset(&self) {
        self.read.store(0, Ordering::Relaxed);
        self.write.store(0, Ordering::Release);
        self.dropped.store(0, Ordering::Relaxed);
    }
}

/// Draining iterator returned by [`RxRing::drain`]
pub struct Drain<'a, const N: usize> {
    ring: &'a RxRing<N>,
}

impl<const N: usize> Iterator for Drain<'_, N> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        self.ring.take_byte()
    }
}
