use cntr_core::stream::RawWord;
use nalgebra::DMatrix;

/// Decodes the raw counter FIFO stream into a rolling per-channel matrix.
///
/// The hardware interleaves one count per routed channel per time bin and
/// compresses not-yet-available samples into gap markers. The decoder
/// expands that stream into scalars, carries partial rows across calls,
/// and keeps the most recent `capture_size` time bins per channel. Missing
/// samples are `NaN`.
pub struct StreamDecoder {
    desired_channels: usize,
    capture_size: usize,
    pending: Vec<f64>,
    /// Column ring, channel-major: column `c` lives at `c * desired_channels`.
    ring: Vec<f64>,
    /// Oldest column, which is also the next to be overwritten.
    cursor: usize,
}

impl StreamDecoder {
    /// Creates a decoder for `desired_channels` channels and a window of
    /// `capture_size` time bins, with every bin missing.
    #[must_use]
    pub fn new(desired_channels: usize, capture_size: usize) -> Self {
        assert!(desired_channels > 0, "at least one channel is required");
        assert!(capture_size > 0, "capture window must not be empty");
        Self {
            desired_channels,
            capture_size,
            pending: Vec::new(),
            ring: vec![f64::NAN; desired_channels * capture_size],
            cursor: 0,
        }
    }

    /// Restores the all-missing matrix and drops any carried partial row.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.ring.fill(f64::NAN);
        self.cursor = 0;
    }

    /// Decodes one burst of raw FIFO words and returns the updated matrix.
    ///
    /// Dummy padding words are dropped, gap markers expand to `NaN` runs,
    /// and only whole rows of `desired_channels` scalars enter the matrix;
    /// the remainder is carried to the next call. A burst yielding no
    /// complete row leaves the matrix untouched.
    pub fn decode(&mut self, raw: &[u32]) -> DMatrix<f64> {
        let k = self.desired_channels;

        let mut working = std::mem::take(&mut self.pending);
        raw.iter()
            .map(|&value| RawWord::new(value))
            .filter(|word| !word.is_dummy())
            .for_each(|word| {
                if word.is_sample() {
                    working.push(word.count() as f64);
                } else {
                    working.extend(std::iter::repeat(f64::NAN).take(self.clamp_gap(word.gap_len())));
                }
            });

        let mut complete_rows = working.len() / k;
        self.pending = working.split_off(complete_rows * k);

        // More than a whole window in one call: older rows never become
        // visible, so they are dropped before entering the ring.
        if complete_rows > self.capture_size {
            working.drain(..(complete_rows - self.capture_size) * k);
            complete_rows = self.capture_size;
        }

        tracing::trace!(
            "decoded {} complete rows, {} scalars pending",
            complete_rows,
            self.pending.len()
        );

        working
            .chunks_exact(k)
            .for_each(|row| self.push_column(row));

        self.matrix()
    }

    /// Snapshot of the rolling matrix, oldest time bin leftmost.
    #[must_use]
    pub fn matrix(&self) -> DMatrix<f64> {
        DMatrix::from_fn(self.desired_channels, self.capture_size, |row, col| {
            let col = (self.cursor + col) % self.capture_size;
            self.ring[col * self.desired_channels + row]
        })
    }

    /// Number of channels per time bin.
    #[must_use]
    pub const fn desired_channels(&self) -> usize {
        self.desired_channels
    }

    /// Width of the rolling window in time bins.
    #[must_use]
    pub const fn capture_size(&self) -> usize {
        self.capture_size
    }

    /// Number of scalars carried over to the next decode call.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Any gap of at least one full window flushes the matrix to all-`NaN`;
    /// only the run length modulo the channel count affects what comes
    /// after, so longer runs need not be materialized.
    fn clamp_gap(&self, len: u32) -> usize {
        let len = len as usize;
        let bound = (self.capture_size + 2) * self.desired_channels;
        if len > bound {
            bound + len % self.desired_channels
        } else {
            len
        }
    }

    fn push_column(&mut self, row: &[f64]) {
        let base = self.cursor * self.desired_channels;
        self.ring[base..base + self.desired_channels].copy_from_slice(row);
        self.cursor = (self.cursor + 1) % self.capture_size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// NaN-tolerant comparison: missing samples map to a sentinel value
    /// that never occurs as a count.
    fn masked(matrix: &DMatrix<f64>) -> DMatrix<f64> {
        matrix.map(|v| if v.is_nan() { -1.0 } else { v })
    }

    fn expect(rows: usize, cols: usize, data: &[f64]) -> DMatrix<f64> {
        DMatrix::from_column_slice(rows, cols, data)
    }

    const MISSING: f64 = -1.0;

    #[test]
    fn starts_all_missing() {
        let decoder = StreamDecoder::new(2, 3);
        assert_eq!(
            expect(2, 3, &[MISSING; 6]),
            masked(&decoder.matrix())
        );
    }

    #[test]
    fn gap_expansion() {
        let mut decoder = StreamDecoder::new(1, 4);
        let matrix = decoder.decode(&[
            RawWord::gap(3).get(),
            RawWord::sample(5).get(),
        ]);
        assert_eq!(expect(1, 4, &[MISSING, MISSING, MISSING, 5.0]), masked(&matrix));
        assert_eq!(0, decoder.pending_len());
    }

    #[test]
    fn channel_demux() {
        let mut decoder = StreamDecoder::new(2, 2);
        let matrix = decoder.decode(&[
            RawWord::sample(1).get(),
            RawWord::sample(2).get(),
            RawWord::sample(3).get(),
            RawWord::sample(4).get(),
        ]);
        // channel 0: [1, 3], channel 1: [2, 4]
        assert_eq!(expect(2, 2, &[1.0, 2.0, 3.0, 4.0]), masked(&matrix));
    }

    #[test]
    fn partial_row_carry_over() {
        let mut decoder = StreamDecoder::new(3, 4);
        let words: Vec<_> = (1..=4).map(|c| RawWord::sample(c).get()).collect();
        let matrix = decoder.decode(&words);
        assert_eq!(1, decoder.pending_len());
        assert_eq!(
            expect(3, 4, &[MISSING, MISSING, MISSING, MISSING, MISSING, MISSING, MISSING, MISSING, MISSING, 1.0, 2.0, 3.0]),
            masked(&matrix)
        );

        let matrix = decoder.decode(&[RawWord::sample(5).get(), RawWord::sample(6).get()]);
        assert_eq!(0, decoder.pending_len());
        assert_eq!(
            expect(3, 4, &[MISSING, MISSING, MISSING, MISSING, MISSING, MISSING, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
            masked(&matrix)
        );
    }

    #[test]
    fn overflow_keeps_most_recent_rows() {
        let mut decoder = StreamDecoder::new(1, 2);
        let words: Vec<_> = (1..=5).map(|c| RawWord::sample(c).get()).collect();
        let matrix = decoder.decode(&words);
        assert_eq!(expect(1, 2, &[4.0, 5.0]), masked(&matrix));
    }

    #[test]
    fn empty_burst_is_a_no_op() {
        let mut decoder = StreamDecoder::new(2, 2);
        decoder.decode(&[RawWord::sample(7).get(), RawWord::sample(8).get()]);
        let before = masked(&decoder.matrix());

        assert_eq!(before, masked(&decoder.decode(&[])));
        assert_eq!(before, masked(&decoder.decode(&[0, 0, 0])));
        assert_eq!(0, decoder.pending_len());
    }

    #[test]
    fn dummy_words_are_dropped_in_place() {
        let mut decoder = StreamDecoder::new(1, 4);
        let matrix = decoder.decode(&[
            0,
            RawWord::sample(1).get(),
            0,
            RawWord::gap(1).get(),
            RawWord::sample(2).get(),
            0,
        ]);
        assert_eq!(expect(1, 4, &[MISSING, 1.0, MISSING, 2.0]), masked(&matrix));
    }

    #[test]
    fn matrix_is_idempotent_between_calls() {
        let mut decoder = StreamDecoder::new(2, 3);
        decoder.decode(&[RawWord::sample(1).get(), RawWord::sample(2).get()]);
        assert_eq!(masked(&decoder.matrix()), masked(&decoder.matrix()));
    }

    #[test]
    fn gap_longer_than_window_flushes_and_realigns() {
        let mut decoder = StreamDecoder::new(2, 3);
        decoder.decode(&[RawWord::sample(11).get(), RawWord::sample(12).get()]);

        let mut words = vec![RawWord::gap(1_000_001).get()];
        words.extend((1..=4).map(|c| RawWord::sample(c).get()));
        let matrix = decoder.decode(&words);

        assert_eq!(
            expect(2, 3, &[MISSING, MISSING, MISSING, 1.0, 2.0, 3.0]),
            masked(&matrix)
        );
        assert_eq!(1, decoder.pending_len());
    }

    #[test]
    fn reset_clears_matrix_and_pending() {
        let mut decoder = StreamDecoder::new(2, 2);
        decoder.decode(&[
            RawWord::sample(1).get(),
            RawWord::sample(2).get(),
            RawWord::sample(3).get(),
        ]);
        assert_eq!(1, decoder.pending_len());

        decoder.reset();
        assert_eq!(0, decoder.pending_len());
        assert_eq!(expect(2, 2, &[MISSING; 4]), masked(&decoder.matrix()));
    }

    #[test]
    fn counts_above_float_precision_of_f32_survive() {
        let mut decoder = StreamDecoder::new(1, 1);
        let matrix = decoder.decode(&[RawWord::sample(0x7FFF_FFFF).get()]);
        assert_eq!(expect(1, 1, &[2_147_483_647.0]), masked(&matrix));
    }
}
