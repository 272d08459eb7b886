//! Order-statistic selection over an index permutation.
//!
//! Places the k-th order statistic of a sequence at position `k` of an
//! index permutation without sorting the whole sequence and without
//! touching the data itself.
//!
//! # Algorithm
//!
//! Iterative quickselect with median-of-three pivoting. Each pass orders
//! the triple `{left, mid, right}`, partitions `[left, right]` around the
//! median with two inward scans, then keeps only the side that contains
//! `k`. The outer elements of the ordered triple act as scan sentinels, so
//! neither scan needs a bounds check.
//!
//! Average O(N); adversarial inputs can drive it to O(N²).
//!
//! # References
//!
//! - Hoare (1961), "Algorithm 65: Find"
//! - Press et al. (1992), *Numerical Recipes in C*, 2nd ed., §8.5 (`select`)

use std::cmp::Ordering;

use crate::error::{NumericError, Result};

/// Returns an index permutation with the k-th smallest element (0-based,
/// under `compare`) at position `k`.
///
/// For the returned `indices`, every `i < k < j` satisfies
/// `data[indices[i]] ≤ data[indices[k]] ≤ data[indices[j]]`. The two sides
/// are not sorted internally. `data` is never mutated, so several callers
/// can rank the same slice independently.
///
/// Passing a reversed comparator selects the k-th largest instead.
///
/// # Errors
/// [`NumericError::Index`] when `k >= data.len()` (including empty data).
///
/// # Examples
/// ```
/// use u_numstat::collections::find_kth_largest;
///
/// let data = [5, 3, 8, 1, 9];
/// let indices = find_kth_largest(2, &data, |a, b| a.cmp(b)).unwrap();
/// assert_eq!(data[indices[2]], 5);
/// assert!(indices[..2].iter().all(|&i| data[i] <= 5));
/// assert!(indices[3..].iter().all(|&i| data[i] >= 5));
/// ```
pub fn find_kth_largest<T, F>(k: usize, data: &[T], mut compare: F) -> Result<Vec<usize>>
where
    F: FnMut(&T, &T) -> Ordering,
{
    let n = data.len();
    if k >= n {
        return Err(NumericError::Index { index: k, len: n });
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut left = 0;
    let mut right = n - 1;

    loop {
        if right <= left + 1 {
            if right == left + 1 {
                swap_if_greater(left, right, &mut indices, data, &mut compare);
            }
            return Ok(indices);
        }

        let mid = (left + right) / 2;
        indices.swap(mid, left + 1);
        swap_if_greater(left, right, &mut indices, data, &mut compare);
        swap_if_greater(left + 1, right, &mut indices, data, &mut compare);
        swap_if_greater(left, left + 1, &mut indices, data, &mut compare);

        let pivot_index = indices[left + 1];
        let pivot = &data[pivot_index];
        let mut i = left + 1;
        let mut j = right;
        loop {
            i += 1;
            while compare(&data[indices[i]], pivot) == Ordering::Less {
                i += 1;
            }
            j -= 1;
            while compare(&data[indices[j]], pivot) == Ordering::Greater {
                j -= 1;
            }
            if j < i {
                break;
            }
            indices.swap(i, j);
        }

        // j >= left + 1: the pivot slot itself stops the downward scan.
        indices[left + 1] = indices[j];
        indices[j] = pivot_index;

        if j >= k {
            right = j - 1;
        }
        if j <= k {
            left = i;
        }
    }
}

/// [`find_kth_largest`] over `f64` values in IEEE total order.
///
/// NaNs sort after every number (positive NaN) or before every number
/// (negative NaN), so they never break the partition invariant.
pub fn find_kth_largest_f64(k: usize, data: &[f64]) -> Result<Vec<usize>> {
    find_kth_largest(k, data, f64::total_cmp)
}

fn swap_if_greater<T, F>(a: usize, b: usize, indices: &mut [usize], data: &[T], compare: &mut F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    if compare(&data[indices[a]], &data[indices[b]]) == Ordering::Greater {
        indices.swap(a, b);
    }
}
