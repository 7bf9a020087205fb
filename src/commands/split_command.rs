//! Train/test split command
//!
//! Runs the deterministic stratified split and writes the resulting name
//! lists to two plain-text files, one name per line.

use clap::ArgMatches;
use log::info;
use std::fs;
use std::path::PathBuf;

use crate::commands::command_traits::Command;
use crate::commands::CatalogSource;
use crate::errors::{SceneError, SceneResult};
use crate::partition::train_test_split;
use crate::utils::logger::Logger;

/// Command for stratified train/test splitting
pub struct SplitCommand<'a> {
    /// Catalog input specification
    source: CatalogSource,
    /// Fraction of each group assigned to test
    test_ratio: f64,
    /// Output file for training names
    train_out: PathBuf,
    /// Output file for test names
    test_out: PathBuf,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> SplitCommand<'a> {
    /// Create a new split command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> SceneResult<Self> {
        let test_ratio = args
            .get_one::<String>("split")
            .ok_or_else(|| SceneError::GenericError("missing split ratio".to_string()))?
            .parse::<f64>()
            .map_err(|e| SceneError::GenericError(format!("bad split ratio: {}", e)))?;

        Ok(SplitCommand {
            source: CatalogSource::from_args(args)?,
            test_ratio,
            train_out: args
                .get_one::<String>("train-out")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("train.txt")),
            test_out: args
                .get_one::<String>("test-out")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("test.txt")),
            logger,
        })
    }
}

impl Command for SplitCommand<'_> {
    fn execute(&self) -> SceneResult<()> {
        let catalog = self.source.load(self.logger)?;
        let plan = train_test_split(&catalog, self.test_ratio)?;

        fs::write(&self.train_out, plan.train.join("\n"))?;
        fs::write(&self.test_out, plan.test.join("\n"))?;

        info!(
            "Split {} scenes: {} train -> {}, {} test -> {}",
            catalog.len(),
            plan.train.len(),
            self.train_out.display(),
            plan.test.len(),
            self.test_out.display()
        );
        Ok(())
    }
}
