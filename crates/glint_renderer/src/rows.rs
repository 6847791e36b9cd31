//! Lock-free distribution of image rows to render workers.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};

/// One finalized pixel: 8-bit RGB.
pub type Rgb8 = [u8; 3];

/// Hands out image rows to worker threads.
///
/// A single atomic counter is the only synchronized state: each `claim`
/// fetch-and-increments it and maps the claimed index to an exclusive
/// mutable slice of the backing pixel storage. No row index is ever handed
/// out twice, so workers write their rows without any locking.
pub struct RowQueue<'a> {
    base: *mut Rgb8,
    width: usize,
    height: usize,
    next_row: AtomicUsize,
    _buffer: PhantomData<&'a mut [Rgb8]>,
}

// SAFETY: sharing the queue across threads only exposes `claim`, and the
// slices it returns never overlap (each row index is claimed at most once).
unsafe impl Send for RowQueue<'_> {}
unsafe impl Sync for RowQueue<'_> {}

impl<'a> RowQueue<'a> {
    /// Create a queue over a row-major pixel buffer of `height` rows of
    /// `width` cells each.
    ///
    /// Panics if the buffer length is not exactly `width * height`.
    pub fn new(pixels: &'a mut [Rgb8], width: usize, height: usize) -> Self {
        assert_eq!(pixels.len(), width * height);
        Self {
            base: pixels.as_mut_ptr(),
            width,
            height,
            next_row: AtomicUsize::new(0),
            _buffer: PhantomData,
        }
    }

    /// Claim the next unrendered row.
    ///
    /// Returns the row index and an exclusive slice of that row's pixels,
    /// or None once every row has been claimed.
    pub fn claim(&self) -> Option<(usize, &'a mut [Rgb8])> {
        let row = self.next_row.fetch_add(1, Ordering::SeqCst);
        if row >= self.height {
            return None;
        }

        // SAFETY: fetch_add yields each index exactly once, so no other
        // claim aliases this row, and row < height keeps the slice inside
        // the buffer borrowed for 'a.
        let cells = unsafe {
            std::slice::from_raw_parts_mut(self.base.add(row * self.width), self.width)
        };
        Some((row, cells))
    }

    /// Number of rows handed out by this queue.
    pub fn height(&self) -> usize {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_claimed_in_order_then_exhausted() {
        let mut pixels = vec![[0u8; 3]; 4 * 3];
        let queue = RowQueue::new(&mut pixels, 4, 3);

        for expected in 0..3 {
            let (row, cells) = queue.claim().expect("row available");
            assert_eq!(row, expected);
            assert_eq!(cells.len(), 4);
        }

        assert!(queue.claim().is_none());
        assert!(queue.claim().is_none());
    }

    #[test]
    fn test_empty_buffer_yields_nothing() {
        let mut pixels: Vec<Rgb8> = Vec::new();
        let queue = RowQueue::new(&mut pixels, 4, 0);
        assert!(queue.claim().is_none());
    }

    #[test]
    fn test_concurrent_claims_cover_every_row_exactly_once() {
        const WIDTH: usize = 16;
        const HEIGHT: usize = 64;

        let mut pixels = vec![[0u8; 3]; WIDTH * HEIGHT];
        let queue = RowQueue::new(&mut pixels, WIDTH, HEIGHT);
        let claims: Vec<AtomicUsize> = (0..HEIGHT).map(|_| AtomicUsize::new(0)).collect();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    while let Some((row, cells)) = queue.claim() {
                        claims[row].fetch_add(1, Ordering::SeqCst);
                        for cell in cells {
                            *cell = [row as u8; 3];
                        }
                    }
                });
            }
        });

        for (row, count) in claims.iter().enumerate() {
            assert_eq!(count.load(Ordering::SeqCst), 1, "row {row} claim count");
        }
        for (i, pixel) in pixels.iter().enumerate() {
            let row = i / WIDTH;
            assert_eq!(*pixel, [row as u8; 3]);
        }
    }
}
