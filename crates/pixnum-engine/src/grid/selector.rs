//! Color-advance selector.

use super::counts::ColorProgress;

/// Find the next palette index that still has unpainted cells.
///
/// Scans `palette_order` cyclically, starting right after `current` and
/// wrapping around; `current` itself is the last candidate of the cycle.
/// If `current` is not in the order the scan starts at the first entry.
/// Colors with no cells and fully painted colors are skipped.
///
/// ```
/// use pixnum_engine::{next_incomplete, ColorProgress};
///
/// let progress = |i: u8| match i {
///     1 => ColorProgress::new(1, 1),
///     2 => ColorProgress::new(3, 0),
///     _ => ColorProgress::default(),
/// };
/// assert_eq!(next_incomplete(&[1, 2], 1, progress), Some(2));
/// ```
pub fn next_incomplete<F>(palette_order: &[u8], current: u8, progress_lookup: F) -> Option<u8>
where
    F: Fn(u8) -> ColorProgress,
{
    let len = palette_order.len();
    let start = palette_order
        .iter()
        .position(|&i| i == current)
        .map_or(0, |pos| pos + 1);

    (0..len)
        .map(|step| palette_order[(start + step) % len])
        .find(|&index| progress_lookup(index).is_incomplete())
}
