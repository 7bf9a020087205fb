use std::path::{Path, PathBuf};
use log::info;

use crate::catalog::{self, Catalog, CatalogBuilder, ScanRoot};
use crate::errors::SceneResult;
use crate::partition::{self, SplitPlan, TransferExecutor, TransferReport};
use crate::utils::logger::Logger;
use crate::viz::SceneMap;

/// Main interface to the SceneKit library
pub struct SceneKit {
    logger: Logger,
}

impl SceneKit {
    /// Create a new SceneKit instance
    ///
    /// # Arguments
    /// * `log_file` - Optional path to log file, defaults to "scenekit.log"
    ///
    /// # Returns
    /// A SceneKit instance or an error if initialization fails
    pub fn new(log_file: Option<&str>) -> SceneResult<Self> {
        let log_path = log_file.unwrap_or("scenekit.log");
        let logger = Logger::new(log_path)?;
        Ok(SceneKit { logger })
    }

    /// Build a catalog by scanning root directories
    ///
    /// # Arguments
    /// * `roots` - Directories to scan, with optional stem-suffix filters
    /// * `extensions` - Image extension allow-list; empty uses the default
    /// * `follow_links` - Whether the walk follows symbolic links
    ///
    /// # Returns
    /// The merged catalog; unreadable files are skipped with a diagnostic
    pub fn build_catalog(
        &self,
        roots: &[ScanRoot],
        extensions: &[&str],
        follow_links: bool,
    ) -> SceneResult<Catalog> {
        let mut builder = CatalogBuilder::new(&self.logger).follow_links(follow_links);
        if !extensions.is_empty() {
            builder = builder.extensions(extensions);
        }
        for root in roots {
            builder = builder.root(root.clone());
        }
        builder.build()
    }

    /// Load a catalog from a previously exported CSV file
    pub fn load_catalog(&self, csv_path: &Path) -> SceneResult<Catalog> {
        catalog::import_csv(csv_path)
    }

    /// Export a catalog to a CSV file
    pub fn export_catalog(&self, catalog: &Catalog, csv_path: &Path) -> SceneResult<()> {
        catalog::export_csv(catalog, csv_path)
    }

    /// Deterministic stratified train/test split
    ///
    /// # Arguments
    /// * `catalog` - Catalog with populated region attributes
    /// * `test_ratio` - Fraction of each (region, sensor) group for test
    pub fn train_test_split(&self, catalog: &Catalog, test_ratio: f64) -> SceneResult<SplitPlan> {
        partition::train_test_split(catalog, test_ratio)
    }

    /// Plan a stratified N-way partition of the catalog's scene paths
    pub fn split_into_n(&self, catalog: &Catalog, n: usize) -> SceneResult<Vec<Vec<PathBuf>>> {
        partition::split_into_n(catalog, n)
    }

    /// Plan and execute a stratified N-way partition
    ///
    /// # Arguments
    /// * `catalog` - Catalog with populated region attributes
    /// * `destinations` - One destination root per partition
    /// * `anchor` - Anchor directory name for destination layout
    /// * `move_files` - Move instead of copy
    pub fn partition_to(
        &self,
        catalog: &Catalog,
        destinations: &[PathBuf],
        anchor: &str,
        move_files: bool,
    ) -> SceneResult<TransferReport> {
        let plan = partition::split_into_n(catalog, destinations.len())?;
        let executor = TransferExecutor::new(&self.logger)
            .anchor(anchor)
            .move_files(move_files);
        executor.distribute(&plan, destinations)
    }

    /// Stratified random sample of the catalog
    pub fn sample_by_ratio(&self, catalog: &Catalog, ratio: f64) -> SceneResult<Catalog> {
        partition::sample_by_ratio(catalog, ratio)
    }

    /// Render the catalog's footprints to an HTML map file
    pub fn render_map(&self, catalog: &Catalog, output: &Path) -> SceneResult<()> {
        let map = SceneMap::from_catalog(catalog);
        info!(
            "Rendering {} footprints to {}",
            map.polygons().len(),
            output.display()
        );
        map.save(output)
    }
}
