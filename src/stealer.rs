//! Queue-to-queue transfers used by the work-stealing discipline.
//!
//! Both the global drain and a steal take from the top of the source and push onto
//! the bottom of the caller's own queue, one lock acquisition per item.

use crate::queue::DeQueue;

/// Moves up to `budget` items from the top of `global` to the bottom of `local`,
/// stopping as soon as `global` runs dry. Returns the number moved.
pub fn drain<T>(global: &DeQueue<T>, local: &DeQueue<T>, budget: usize) -> usize {
    let mut moved = 0;
    while moved < budget {
        match global.pop_top() {
            Some(item) => {
                local.push_bottom(item);
                moved += 1;
            }
            None => break,
        }
    }
    moved
}

/// Makes `budget` attempts to take an item from the top of `victim` and push it
/// onto the bottom of `thief`. A failed attempt still uses up budget but does not
/// end the steal, since the victim may refill between attempts.
pub fn steal<T>(victim: &DeQueue<T>, thief: &DeQueue<T>, budget: usize) -> usize {
    let mut stolen = 0;
    for _ in 0..budget {
        if let Some(item) = victim.pop_top() {
            thief.push_bottom(item);
            stolen += 1;
        }
    }
    stolen
}
