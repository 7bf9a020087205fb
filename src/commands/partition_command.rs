//! N-way partition command
//!
//! Plans the stratified N-way partition and hands the plan to the transfer
//! executor, which copies (or moves) each chunk's scene directories under
//! its destination root.

use clap::ArgMatches;
use log::info;
use std::path::PathBuf;

use crate::commands::command_traits::Command;
use crate::commands::CatalogSource;
use crate::errors::{SceneError, SceneResult};
use crate::partition::{split_into_n, TransferExecutor};
use crate::utils::logger::Logger;

/// Command for stratified N-way partitioning with file transfer
pub struct PartitionCommand<'a> {
    /// Catalog input specification
    source: CatalogSource,
    /// Number of partitions
    n: usize,
    /// Destination roots, one per partition
    destinations: Vec<PathBuf>,
    /// Anchor directory name for destination layout
    anchor: String,
    /// Move instead of copy
    move_files: bool,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> PartitionCommand<'a> {
    /// Create a new partition command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> SceneResult<Self> {
        let n = args
            .get_one::<String>("partition")
            .ok_or_else(|| SceneError::GenericError("missing partition count".to_string()))?
            .parse::<usize>()
            .map_err(|e| SceneError::GenericError(format!("bad partition count: {}", e)))?;

        let destinations: Vec<PathBuf> = args
            .get_many::<String>("dest")
            .map(|v| v.map(PathBuf::from).collect())
            .unwrap_or_default();
        // A single destination root expands to numbered subdirectories
        let destinations = match destinations.len() {
            0 => {
                return Err(SceneError::GenericError(
                    "--partition needs at least one --dest".to_string(),
                ))
            }
            1 if n > 1 => (0..n).map(|i| destinations[0].join(i.to_string())).collect(),
            len if len == n => destinations,
            len => {
                return Err(SceneError::GenericError(format!(
                    "{} destinations for {} partitions",
                    len, n
                )))
            }
        };

        Ok(PartitionCommand {
            source: CatalogSource::from_args(args)?,
            n,
            destinations,
            anchor: args
                .get_one::<String>("anchor")
                .cloned()
                .unwrap_or_else(|| "scenes".to_string()),
            move_files: args.get_flag("move"),
            logger,
        })
    }
}

impl Command for PartitionCommand<'_> {
    fn execute(&self) -> SceneResult<()> {
        let catalog = self.source.load(self.logger)?;
        let plan = split_into_n(&catalog, self.n)?;

        for (i, chunk) in plan.iter().enumerate() {
            info!(
                "Partition {} -> {} ({} scenes)",
                i,
                self.destinations[i].display(),
                chunk.len()
            );
        }

        let executor = TransferExecutor::new(self.logger)
            .anchor(self.anchor.clone())
            .move_files(self.move_files);
        let report = executor.distribute(&plan, &self.destinations)?;

        if !report.failed.is_empty() {
            return Err(SceneError::GenericError(format!(
                "{} transfers failed (see log)",
                report.failed.len()
            )));
        }
        Ok(())
    }
}
