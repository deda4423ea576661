/// In-place bubble sort keyed by `key`, ascending.
///
/// Only adjacent elements are ever exchanged and only when strictly out of
/// order, so equal keys keep their input order. Stops after the first pass
/// without a swap, or after `n - 1` passes. Returns the number of passes run.
pub fn bubble_sort_by_key<T, K, F>(items: &mut [T], key: F) -> usize
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let n = items.len();
    let mut passes = 0;

    for pass in 0..n.saturating_sub(1) {
        passes += 1;
        let mut swapped = false;

        // The last `pass` slots already hold the largest keys.
        for j in 0..n - pass - 1 {
            if key(&items[j]) > key(&items[j + 1]) {
                items.swap(j, j + 1);
                swapped = true;
            }
        }

        if !swapped {
            break;
        }
    }

    passes
}
