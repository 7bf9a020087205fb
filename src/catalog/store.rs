//! In-memory catalog store
//!
//! The catalog is an ordered collection of scene records. Filters are
//! non-destructive and return new catalogs; the only in-place mutation is
//! `exclude_duplicated`, which callers invoke explicitly. The store is not
//! meant to be mutated from multiple threads.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::catalog::record::SceneRecord;
use crate::errors::SceneResult;

/// Ordered collection of scene records
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    records: Vec<SceneRecord>,
}

impl Catalog {
    /// Creates an empty catalog
    pub fn new() -> Self {
        Catalog::default()
    }

    /// Wraps an existing record collection
    pub fn from_records(records: Vec<SceneRecord>) -> Self {
        Catalog { records }
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in catalog order
    pub fn records(&self) -> &[SceneRecord] {
        &self.records
    }

    /// Iterator over records
    pub fn iter(&self) -> std::slice::Iter<'_, SceneRecord> {
        self.records.iter()
    }

    /// Appends a record
    pub fn push(&mut self, record: SceneRecord) {
        self.records.push(record);
    }

    /// Appends all records of another catalog
    pub fn merge(&mut self, other: Catalog) {
        self.records.extend(other.records);
    }

    /// New catalog with the records matching the predicate
    pub fn filter<F>(&self, predicate: F) -> Catalog
    where
        F: Fn(&SceneRecord) -> bool,
    {
        Catalog::from_records(
            self.records
                .iter()
                .filter(|r| predicate(r))
                .cloned()
                .collect(),
        )
    }

    /// How often each name occurs in the catalog
    fn name_counts(&self) -> HashMap<&str, usize> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for record in &self.records {
            *counts.entry(record.name.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// All records whose name occurs more than once
    ///
    /// Every occurrence of a repeated name is returned, not just the extra
    /// ones, so callers can inspect the full collision before deciding
    /// which copies to drop.
    pub fn duplicated(&self) -> Catalog {
        let counts = self.name_counts();
        self.filter(|r| counts[r.name.as_str()] > 1)
    }

    /// All occurrences after the first of each repeated name
    ///
    /// The complement of what `exclude_duplicated(None)` keeps: for every
    /// repeated name the first occurrence in catalog order is left out and
    /// every later one is returned. This is the set a quarantine move
    /// operates on, so one copy of each scene always stays in place.
    pub fn repeat_occurrences(&self) -> Catalog {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut repeats = Vec::new();
        for record in &self.records {
            if !seen.insert(record.name.as_str()) {
                repeats.push(record.clone());
            }
        }
        Catalog::from_records(repeats)
    }

    /// Removes duplicate records in place
    ///
    /// With `other` given, every record whose name appears anywhere in
    /// `other` is removed, regardless of path. Without it, repeat
    /// occurrences of a name are dropped and the first occurrence in
    /// catalog order survives.
    pub fn exclude_duplicated(&mut self, other: Option<&Catalog>) {
        match other {
            Some(other) => {
                let names: HashSet<&str> =
                    other.records.iter().map(|r| r.name.as_str()).collect();
                self.records.retain(|r| !names.contains(r.name.as_str()));
            }
            None => {
                let mut seen: HashSet<String> = HashSet::new();
                self.records.retain(|r| seen.insert(r.name.clone()));
            }
        }
    }

    /// New catalog with the records lacking a sidecar annotation
    pub fn not_annotated(&self) -> Catalog {
        self.filter(|r| !r.annotated)
    }

    /// New catalog with the records not yet run through inference
    ///
    /// Fails when any record never had its `inferred` attribute populated.
    pub fn not_inferred(&self) -> SceneResult<Catalog> {
        let mut kept = Vec::new();
        for record in &self.records {
            if !record.inferred()? {
                kept.push(record.clone());
            }
        }
        Ok(Catalog::from_records(kept))
    }

    /// Record counts grouped by region, in first-appearance order
    ///
    /// # Arguments
    /// * `only_annotated` - Count only records with a sidecar annotation
    pub fn counts_by_region(&self, only_annotated: bool) -> SceneResult<Vec<(String, usize)>> {
        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, usize> = HashMap::new();

        for record in &self.records {
            if only_annotated && !record.annotated {
                continue;
            }
            let region = record.region()?.to_string();
            if !counts.contains_key(&region) {
                order.push(region.clone());
            }
            *counts.entry(region).or_insert(0) += 1;
        }

        Ok(order.into_iter().map(|r| {
            let count = counts[&r];
            (r, count)
        }).collect())
    }

    /// Record counts grouped by sensor, in first-appearance order
    pub fn counts_by_sensor(&self) -> Vec<(String, usize)> {
        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, usize> = HashMap::new();

        for record in &self.records {
            if !counts.contains_key(&record.sensor) {
                order.push(record.sensor.clone());
            }
            *counts.entry(record.sensor.clone()).or_insert(0) += 1;
        }

        order
            .into_iter()
            .map(|s| {
                let count = counts[&s];
                (s, count)
            })
            .collect()
    }

    /// Number of annotated records
    pub fn count_annotated(&self) -> usize {
        self.records.iter().filter(|r| r.annotated).count()
    }

    /// Number of records already run through inference
    pub fn count_inferred(&self) -> SceneResult<usize> {
        let mut count = 0;
        for record in &self.records {
            if record.inferred()? {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Distinct sensors present, in first-appearance order
    pub fn sensors(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut sensors = Vec::new();
        for record in &self.records {
            if seen.insert(record.sensor.as_str()) {
                sensors.push(record.sensor.clone());
            }
        }
        sensors
    }

    /// Path of the first record carrying the given name
    pub fn path_of(&self, name: &str) -> Option<&Path> {
        self.records
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.path.as_path())
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a SceneRecord;
    type IntoIter = std::slice::Iter<'a, SceneRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
