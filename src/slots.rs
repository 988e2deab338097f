//! Time-slot combinatorics for lecture blocks.
//!
//! Slot labels have the form `"HH:MM - HH:MM"`. Two slots are adjacent
//! when the start hour of the second is exactly one greater than the start
//! hour of the first; a block is a run of adjacent slots treated as one
//! teaching unit. All functions here are pure; the per-run memoization in
//! [`CombinationCache`] is safe because days and slot lists are immutable
//! for the duration of a run.

use std::collections::HashMap;

/// Parses the start hour of a `"HH:MM - HH:MM"` slot label.
pub fn start_hour(slot: &str) -> Option<u32> {
    slot.split(':').next()?.trim().parse().ok()
}

/// Desirability of a slot's start time.
///
/// Morning (08–10) and late afternoon (16+) score 3, midday (10–14)
/// scores 2, everything else 1. Candidates are tried best-first.
pub fn time_priority(slot: &str) -> u8 {
    match start_hour(slot) {
        Some(h) if (8..10).contains(&h) || h >= 16 => 3,
        Some(h) if (10..14).contains(&h) => 2,
        _ => 1,
    }
}

/// Decomposes weekly credit hours into contiguous-slot block sizes.
///
/// Prefers blocks of 2 with an optional trailing single: credit 3 →
/// `[2, 1]`, credit 2 → `[2]`, credit 5 → `[2, 2, 1]`.
pub fn credit_blocks(credit_hours: u32) -> Vec<usize> {
    let mut blocks = vec![2; (credit_hours / 2) as usize];
    if credit_hours % 2 == 1 {
        blocks.push(1);
    }
    blocks
}

/// Whether consecutive slots' start hours increase by exactly 1.
pub fn is_contiguous(slots: &[String]) -> bool {
    slots.windows(2).all(|pair| {
        matches!(
            (start_hour(&pair[0]), start_hour(&pair[1])),
            (Some(a), Some(b)) if a + 1 == b
        )
    })
}

/// All (day index, start-slot index) pairs where a block of `block_size`
/// contiguous slots fits. A block size exceeding every contiguous window
/// yields an empty result rather than an error.
pub fn valid_combinations(
    day_count: usize,
    time_slots: &[String],
    block_size: usize,
) -> Vec<(usize, usize)> {
    if block_size == 0 || block_size > time_slots.len() {
        return Vec::new();
    }
    let mut combinations = Vec::new();
    for start in 0..=(time_slots.len() - block_size) {
        if is_contiguous(&time_slots[start..start + block_size]) {
            for day in 0..day_count {
                combinations.push((day, start));
            }
        }
    }
    combinations.sort();
    combinations
}

/// Per-run memo for [`valid_combinations`], keyed by block size.
///
/// Days and slot lists never change within a run, so block size is the
/// only varying input.
#[derive(Debug, Default)]
pub struct CombinationCache {
    cache: HashMap<usize, Vec<(usize, usize)>>,
}

impl CombinationCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns (computing on first use) the combinations for a block size.
    pub fn get(
        &mut self,
        day_count: usize,
        time_slots: &[String],
        block_size: usize,
    ) -> &[(usize, usize)] {
        self.cache
            .entry(block_size)
            .or_insert_with(|| valid_combinations(day_count, time_slots, block_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(hours: &[u32]) -> Vec<String> {
        hours
            .iter()
            .map(|h| format!("{h:02}:00 - {h:02}:55"))
            .collect()
    }

    #[test]
    fn test_start_hour() {
        assert_eq!(start_hour("08:00 - 08:55"), Some(8));
        assert_eq!(start_hour("16:00 - 16:55"), Some(16));
        assert_eq!(start_hour("garbage"), None);
    }

    #[test]
    fn test_time_priority_bands() {
        assert_eq!(time_priority("08:00 - 08:55"), 3);
        assert_eq!(time_priority("09:00 - 09:55"), 3);
        assert_eq!(time_priority("16:00 - 16:55"), 3);
        assert_eq!(time_priority("10:00 - 10:55"), 2);
        assert_eq!(time_priority("13:00 - 13:55"), 2);
        assert_eq!(time_priority("14:00 - 14:55"), 1);
        assert_eq!(time_priority("07:00 - 07:55"), 1);
    }

    #[test]
    fn test_credit_blocks() {
        assert_eq!(credit_blocks(1), vec![1]);
        assert_eq!(credit_blocks(2), vec![2]);
        assert_eq!(credit_blocks(3), vec![2, 1]);
        assert_eq!(credit_blocks(5), vec![2, 2, 1]);
        assert!(credit_blocks(0).is_empty());
    }

    #[test]
    fn test_is_contiguous() {
        assert!(is_contiguous(&labels(&[8, 9, 10])));
        assert!(!is_contiguous(&labels(&[8, 10])));
        assert!(is_contiguous(&labels(&[15]))); // single slot is trivially contiguous
    }

    #[test]
    fn test_valid_combinations_skip_gaps() {
        // 08, 09, then a gap, then 13, 14
        let slots = labels(&[8, 9, 13, 14]);
        let combos = valid_combinations(2, &slots, 2);
        // Valid starts: 0 (08→09) and 2 (13→14), for each of 2 days
        let starts: Vec<usize> = combos.iter().map(|&(_, s)| s).collect();
        assert_eq!(combos.len(), 4);
        assert!(starts.contains(&0) && starts.contains(&2));
        assert!(!starts.contains(&1));
    }

    #[test]
    fn test_oversized_block_yields_nothing() {
        let slots = labels(&[8, 9]);
        assert!(valid_combinations(5, &slots, 3).is_empty());
        assert!(valid_combinations(5, &slots, 0).is_empty());
    }

    #[test]
    fn test_cache_consistency() {
        let slots = labels(&[8, 9, 10]);
        let mut cache = CombinationCache::new();
        let first = cache.get(3, &slots, 2).to_vec();
        let second = cache.get(3, &slots, 2).to_vec();
        assert_eq!(first, second);
        assert_eq!(first, valid_combinations(3, &slots, 2));
    }
}
