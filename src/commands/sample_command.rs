//! Ratio sampling command
//!
//! Draws a stratified random sample of the catalog and exports it to CSV.
//! Unlike the split commands, two runs select different records.

use clap::ArgMatches;
use log::info;
use std::path::PathBuf;

use crate::catalog::export_csv;
use crate::commands::command_traits::Command;
use crate::commands::CatalogSource;
use crate::errors::{SceneError, SceneResult};
use crate::partition::sample_by_ratio;
use crate::utils::logger::Logger;

/// Command for stratified ratio sampling
pub struct SampleCommand<'a> {
    /// Catalog input specification
    source: CatalogSource,
    /// Fraction of each group to sample
    ratio: f64,
    /// CSV export destination
    export: PathBuf,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> SampleCommand<'a> {
    /// Create a new sample command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> SceneResult<Self> {
        let ratio = args
            .get_one::<String>("sample")
            .ok_or_else(|| SceneError::GenericError("missing sample ratio".to_string()))?
            .parse::<f64>()
            .map_err(|e| SceneError::GenericError(format!("bad sample ratio: {}", e)))?;

        let export = args
            .get_one::<String>("export")
            .map(PathBuf::from)
            .ok_or_else(|| {
                SceneError::GenericError("--sample needs --export for its output".to_string())
            })?;

        Ok(SampleCommand {
            source: CatalogSource::from_args(args)?,
            ratio,
            export,
            logger,
        })
    }
}

impl Command for SampleCommand<'_> {
    fn execute(&self) -> SceneResult<()> {
        let catalog = self.source.load(self.logger)?;
        let sampled = sample_by_ratio(&catalog, self.ratio)?;

        export_csv(&sampled, &self.export)?;
        info!(
            "Sampled {} of {} scenes into {}",
            sampled.len(),
            catalog.len(),
            self.export.display()
        );
        Ok(())
    }
}
