//! Pairwise queue balancing used by the work-balancing discipline.

use rand::Rng;

use crate::queue::DeQueue;

/// Decides whether a worker with `local_size` queued tasks balances on this pass.
///
/// A value is drawn uniformly from `0..=local_size` and balancing happens only when
/// it lands on `local_size`, so the chance is `1 / (local_size + 1)`.
pub fn should_balance<R: Rng + ?Sized>(rng: &mut R, local_size: usize) -> bool {
    rng.gen_range(0..=local_size) == local_size
}

/// Evens out `own` and `victim` when their sizes differ by more than `threshold`.
///
/// The larger queue gives `(larger - smaller) / 2` items from its top to the bottom
/// of the smaller one; on equal sizes `own` counts as the larger. `own` must be the
/// caller's local queue. If `victim` turns out to be closed, the item in flight goes
/// back onto `own` and the exchange stops. Returns the number of items moved.
pub fn balance<T>(own: &DeQueue<T>, victim: &DeQueue<T>, threshold: usize) -> usize {
    let (max, min) = if own.size() < victim.size() {
        (victim, own)
    } else {
        (own, victim)
    };

    let gap = max.size().saturating_sub(min.size());
    if gap <= threshold {
        return 0;
    }

    let mut moved = 0;
    for _ in 0..gap / 2 {
        let Some(item) = max.pop_top() else {
            break;
        };
        if let Err(item) = min.try_push_bottom(item) {
            own.push_bottom(item);
            break;
        }
        moved += 1;
    }
    moved
}
