//! Deterministic group-stratified split planners
//!
//! Every operation here shares one pattern: partition the catalog by
//! (region, sensor), then shuffle and slice each group independently with a
//! private generator seeded from the same constant. Seeding per group keeps
//! the outcome independent of group iteration order, at the cost of every
//! group shuffling with the identical seed value. Sampling alone is
//! deliberately non-deterministic.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{thread_rng, SeedableRng};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::catalog::record::SceneRecord;
use crate::catalog::store::Catalog;
use crate::errors::{SceneError, SceneResult};

/// Seed used for every group's shuffle
pub const SHUFFLE_SEED: u64 = 42;

/// Result of a train/test split, as scene names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPlan {
    /// Names assigned to the training set
    pub train: Vec<String>,
    /// Names assigned to the test set
    pub test: Vec<String>,
}

/// Groups catalog records by (region, sensor) in first-appearance order
///
/// Fails with `MissingAttribute` when any record lacks its region.
fn group_records(catalog: &Catalog) -> SceneResult<Vec<Vec<&SceneRecord>>> {
    let mut index: HashMap<(String, String), usize> = HashMap::new();
    let mut groups: Vec<Vec<&SceneRecord>> = Vec::new();

    for record in catalog {
        let key = (record.region()?.to_string(), record.sensor.clone());
        match index.get(&key) {
            Some(&i) => groups[i].push(record),
            None => {
                index.insert(key, groups.len());
                groups.push(vec![record]);
            }
        }
    }

    Ok(groups)
}

/// Number of records a ratio selects from a group
///
/// Uses round-half-away-from-zero (`f64::round`), so a group of 10 at
/// ratio 0.25 selects 3. A size-1 group with a positive ratio above 0.5
/// lands entirely in the selection.
fn rounded_count(len: usize, ratio: f64) -> usize {
    (len as f64 * ratio).round() as usize
}

/// Validates that a ratio lies in [0, 1]
fn check_ratio(ratio: f64) -> SceneResult<()> {
    if !(0.0..=1.0).contains(&ratio) {
        return Err(SceneError::GenericError(format!(
            "ratio must be within [0, 1], got {}",
            ratio
        )));
    }
    Ok(())
}

/// Splits the catalog into train and test name lists
///
/// Per (region, sensor) group: shuffle the group's names with a fresh
/// generator seeded from `SHUFFLE_SEED`, take the first
/// `round(len * test_ratio)` names as test and the rest as train, then
/// concatenate across groups. Two runs over the same catalog produce
/// identical plans.
///
/// # Arguments
/// * `catalog` - Catalog with populated region attributes
/// * `test_ratio` - Fraction of each group assigned to the test set
pub fn train_test_split(catalog: &Catalog, test_ratio: f64) -> SceneResult<SplitPlan> {
    check_ratio(test_ratio)?;

    let mut plan = SplitPlan {
        train: Vec::new(),
        test: Vec::new(),
    };

    for group in group_records(catalog)? {
        let mut names: Vec<String> = group.iter().map(|r| r.name.clone()).collect();
        let mut rng = StdRng::seed_from_u64(SHUFFLE_SEED);
        names.shuffle(&mut rng);

        let n_test = rounded_count(names.len(), test_ratio);
        plan.test.extend(names[..n_test].iter().cloned());
        plan.train.extend(names[n_test..].iter().cloned());
    }

    Ok(plan)
}

/// Partitions the catalog's scene paths into `n` balanced chunks
///
/// Per (region, sensor) group: shuffle the group's paths with a fresh
/// generator seeded from `SHUFFLE_SEED`, then cut the list into `n`
/// contiguous chunks whose sizes differ by at most one (the first
/// `len % n` chunks carry the extra element). Chunk `i` of every group is
/// concatenated into partition `i`. The result is a pure plan; moving the
/// files is the transfer executor's job.
///
/// # Arguments
/// * `catalog` - Catalog with populated region attributes
/// * `n` - Number of partitions
pub fn split_into_n(catalog: &Catalog, n: usize) -> SceneResult<Vec<Vec<PathBuf>>> {
    if n == 0 {
        return Err(SceneError::GenericError(
            "partition count must be positive".to_string(),
        ));
    }

    let mut partitions: Vec<Vec<PathBuf>> = vec![Vec::new(); n];

    for group in group_records(catalog)? {
        let mut paths: Vec<PathBuf> = group.iter().map(|r| r.path.clone()).collect();
        let mut rng = StdRng::seed_from_u64(SHUFFLE_SEED);
        paths.shuffle(&mut rng);

        let base = paths.len() / n;
        let extra = paths.len() % n;
        let mut offset = 0;
        for (i, partition) in partitions.iter_mut().enumerate() {
            let size = base + usize::from(i < extra);
            partition.extend(paths[offset..offset + size].iter().cloned());
            offset += size;
        }
    }

    Ok(partitions)
}

/// Samples a fraction of each (region, sensor) group
///
/// Unlike the split operations this draws from `thread_rng`, so repeated
/// calls select different records.
///
/// # Arguments
/// * `catalog` - Catalog with populated region attributes
/// * `ratio` - Fraction of each group to sample
pub fn sample_by_ratio(catalog: &Catalog, ratio: f64) -> SceneResult<Catalog> {
    check_ratio(ratio)?;

    let mut sampled = Catalog::new();
    let mut rng = thread_rng();

    for group in group_records(catalog)? {
        let count = rounded_count(group.len(), ratio);
        for record in group.choose_multiple(&mut rng, count) {
            sampled.push((*record).clone());
        }
    }

    Ok(sampled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{extract_footprint, GeoTransform, GeographicCrs};

    fn record(name: &str, region: &str, sensor: &str) -> SceneRecord {
        SceneRecord {
            sensor: sensor.to_string(),
            path: PathBuf::from(format!("/scenes/{}/{}/{}.tif", region, sensor, name)),
            name: name.to_string(),
            extension: "tif".to_string(),
            annotated: false,
            footprint: extract_footprint(10, 10, &GeoTransform::identity(), &GeographicCrs)
                .unwrap(),
            region: Some(region.to_string()),
            inferred: None,
        }
    }

    fn single_group_catalog(size: usize) -> Catalog {
        Catalog::from_records(
            (0..size)
                .map(|i| record(&format!("scene_{:03}", i), "north", "WV3"))
                .collect(),
        )
    }

    #[test]
    fn train_test_split_is_deterministic() {
        let catalog = single_group_catalog(10);

        let first = train_test_split(&catalog, 0.2).unwrap();
        let second = train_test_split(&catalog, 0.2).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.test.len(), 2);
        assert_eq!(first.train.len(), 8);
    }

    #[test]
    fn split_covers_every_name_exactly_once() {
        let catalog = single_group_catalog(10);
        let plan = train_test_split(&catalog, 0.2).unwrap();

        let mut all: Vec<String> = plan.train.iter().chain(&plan.test).cloned().collect();
        all.sort();
        let mut expected: Vec<String> =
            catalog.iter().map(|r| r.name.clone()).collect();
        expected.sort();
        assert_eq!(all, expected);
    }

    #[test]
    fn split_respects_group_boundaries() {
        let mut records = Vec::new();
        for i in 0..10 {
            records.push(record(&format!("n_wv3_{}", i), "north", "WV3"));
        }
        for i in 0..10 {
            records.push(record(&format!("s_k3_{}", i), "south", "K3"));
        }
        let catalog = Catalog::from_records(records);

        let plan = train_test_split(&catalog, 0.2).unwrap();

        // Each group contributes round(10 * 0.2) = 2 test names
        assert_eq!(plan.test.len(), 4);
        assert_eq!(plan.test.iter().filter(|n| n.starts_with("n_")).count(), 2);
        assert_eq!(plan.test.iter().filter(|n| n.starts_with("s_")).count(), 2);
    }

    #[test]
    fn ratio_zero_and_one_are_degenerate_but_valid() {
        let catalog = single_group_catalog(5);

        let all_train = train_test_split(&catalog, 0.0).unwrap();
        assert!(all_train.test.is_empty());
        assert_eq!(all_train.train.len(), 5);

        let all_test = train_test_split(&catalog, 1.0).unwrap();
        assert!(all_test.train.is_empty());
        assert_eq!(all_test.test.len(), 5);
    }

    #[test]
    fn out_of_range_ratio_is_rejected() {
        let catalog = single_group_catalog(5);
        assert!(train_test_split(&catalog, 1.5).is_err());
        assert!(train_test_split(&catalog, -0.1).is_err());
    }

    #[test]
    fn split_into_n_balances_chunk_sizes() {
        let catalog = single_group_catalog(10);
        let partitions = split_into_n(&catalog, 3).unwrap();

        let sizes: Vec<usize> = partitions.iter().map(Vec::len).collect();
        assert_eq!(sizes.iter().sum::<usize>(), 10);
        let max = sizes.iter().max().unwrap();
        let min = sizes.iter().min().unwrap();
        assert!(max - min <= 1);
        // numpy-style array_split: leading chunks take the remainder
        assert_eq!(sizes, vec![4, 3, 3]);
    }

    #[test]
    fn split_into_n_is_idempotent() {
        let catalog = single_group_catalog(7);
        let first = split_into_n(&catalog, 3).unwrap();
        let second = split_into_n(&catalog, 3).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn split_into_zero_is_rejected() {
        let catalog = single_group_catalog(3);
        assert!(split_into_n(&catalog, 0).is_err());
    }

    #[test]
    fn sample_by_ratio_takes_the_rounded_share_per_group() {
        let mut records = Vec::new();
        for i in 0..10 {
            records.push(record(&format!("a_{}", i), "north", "WV3"));
        }
        for i in 0..4 {
            records.push(record(&format!("b_{}", i), "north", "K3"));
        }
        let catalog = Catalog::from_records(records);

        let sampled = sample_by_ratio(&catalog, 0.5).unwrap();
        assert_eq!(sampled.len(), 5 + 2);
    }

    #[test]
    fn missing_region_fails_the_split() {
        let mut bad = record("x", "north", "WV3");
        bad.region = None;
        let catalog = Catalog::from_records(vec![bad]);
        assert!(matches!(
            train_test_split(&catalog, 0.2),
            Err(SceneError::MissingAttribute("region"))
        ));
    }
}
