/// A deterministic low-discrepancy point sequence in the unit hypercube.
pub trait LowDiscrepancySequence {
    /// Number of coordinates in each point.
    fn dimension(&self) -> usize;

    /// Advance the sequence and return the next point, each coordinate in `[0, 1)`.
    fn next_point(&mut self) -> &[f64];

    /// Rewind to the first point.
    fn reset(&mut self);

    /// Discard the next `n` points.
    fn skip(&mut self, n: usize) {
        for _ in 0..n {
            self.next_point();
        }
    }
}
