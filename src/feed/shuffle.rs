use std::collections::BTreeMap;

use rand::Rng;

use crate::feed::types::RankedContentItem;

/// Orders items by descending match count, with each band of equal match count
/// independently shuffled.
pub fn banded_shuffle<R: Rng + ?Sized>(
    items: Vec<RankedContentItem>,
    rng: &mut R,
) -> Vec<RankedContentItem> {
    let total = items.len();
    let mut bands: BTreeMap<usize, Vec<RankedContentItem>> = BTreeMap::new();
    for item in items {
        bands.entry(item.match_count).or_default().push(item);
    }

    let mut ordered = Vec::with_capacity(total);
    for (_, mut band) in bands.into_iter().rev() {
        fisher_yates(&mut band, rng);
        ordered.append(&mut band);
    }
    ordered
}

/// Unbiased in-place shuffle: walks from the last index down, swapping each slot
/// with a uniformly chosen slot at or before it.
pub fn fisher_yates<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::testing::{content, ranked};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_bands_are_in_descending_match_count() {
        let mut rng = StdRng::seed_from_u64(11);
        let items: Vec<RankedContentItem> = [1, 3, 2, 1, 3, 2, 2, 1]
            .into_iter()
            .enumerate()
            .map(|(i, count)| ranked(content(&format!("item-{i}")), count))
            .collect();

        for _ in 0..50 {
            let ordered = banded_shuffle(items.clone(), &mut rng);
            assert_eq!(ordered.len(), items.len());
            for pair in ordered.windows(2) {
                assert!(pair[0].match_count >= pair[1].match_count);
            }
        }
    }

    #[test]
    fn test_band_contents_are_preserved() {
        let mut rng = StdRng::seed_from_u64(3);
        let items: Vec<RankedContentItem> =
            (0..5).map(|i| ranked(content(&format!("item-{i}")), 1)).collect();

        let mut before: Vec<_> = items.iter().map(|r| r.item.id).collect();
        let mut after: Vec<_> = banded_shuffle(items, &mut rng).iter().map(|r| r.item.id).collect();
        before.sort();
        after.sort();
        assert_eq!(before, after);
    }

    #[test]
    fn test_shuffle_has_no_positional_bias() {
        const N: usize = 4;
        const TRIALS: usize = 40_000;
        let mut rng = StdRng::seed_from_u64(7);
        let mut counts = [[0usize; N]; N];

        for _ in 0..TRIALS {
            let mut band: Vec<usize> = (0..N).collect();
            fisher_yates(&mut band, &mut rng);
            for (position, item) in band.into_iter().enumerate() {
                counts[item][position] += 1;
            }
        }

        let expected = TRIALS as f64 / N as f64;
        for row in counts {
            for observed in row {
                let deviation = (observed as f64 - expected).abs() / expected;
                assert!(deviation < 0.05, "observed {observed}, expected about {expected}");
            }
        }
    }

    #[test]
    fn test_trivial_bands_are_untouched() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut empty: Vec<u8> = Vec::new();
        fisher_yates(&mut empty, &mut rng);
        let mut single = vec![42];
        fisher_yates(&mut single, &mut rng);
        assert_eq!(single, vec![42]);
    }
}
