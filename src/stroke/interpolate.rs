use crate::geom::Point;

/// Computes the stamp centers for one pointer-move segment.
///
/// Raw pointer-move events are sparse relative to cursor speed; stamping only
/// at the endpoints leaves gaps proportional to velocity. This emits `steps`
/// equally spaced centers from `from` to `to`, inclusive of **both** ends, so
/// consecutive segments never leave a gap at their shared boundary.
///
/// The result is a pure function of its inputs: lazy, finite, and
/// restartable. The brush radius applied at each center is the caller's
/// concern; it does not influence the centers.
///
/// # Edge cases
/// - `from == to` (stationary pointer) collapses to exactly one stamp.
/// - `steps == 0` is treated as 1: a segment always produces at least one
///   stamp.
pub fn interpolate(from: Point, to: Point, steps: usize) -> StampPath {
    let steps = if from == to { 1 } else { steps.max(1) };
    StampPath { from, to, steps, next: 0 }
}

/// Iterator over the stamp centers of one segment. See [`interpolate`].
#[derive(Debug, Clone)]
pub struct StampPath {
    from:  Point,
    to:    Point,
    steps: usize,
    next:  usize,
}

impl Iterator for StampPath {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.next >= self.steps {
            return None;
        }
        // With a single step the segment degenerates to its start point.
        let denom = (self.steps - 1).max(1) as f64;
        let t = self.next as f64 / denom;
        self.next += 1;
        Some(self.from.lerp(self.to, t))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.steps - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for StampPath {}
