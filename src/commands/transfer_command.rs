//! Bulk maintenance transfers command
//!
//! Covers the catalog-wide filesystem operations: quarantining duplicate
//! scene directories, copying all scene directories, and collecting sidecar
//! annotation files. Several targets can be given in one invocation.

use clap::ArgMatches;
use std::path::PathBuf;

use crate::commands::command_traits::Command;
use crate::commands::CatalogSource;
use crate::errors::SceneResult;
use crate::partition::TransferExecutor;
use crate::utils::logger::Logger;

/// Command for bulk copy/move maintenance operations
pub struct TransferCommand<'a> {
    /// Catalog input specification
    source: CatalogSource,
    /// Quarantine directory for duplicate scene directories
    move_duplicated: Option<PathBuf>,
    /// Destination for copying all scene directories
    copy_scenes: Option<PathBuf>,
    /// Destination for collecting sidecar annotation files
    copy_labels: Option<PathBuf>,
    /// Anchor directory name for destination layout
    anchor: String,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> TransferCommand<'a> {
    /// Create a new transfer command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> SceneResult<Self> {
        Ok(TransferCommand {
            source: CatalogSource::from_args(args)?,
            move_duplicated: args
                .get_one::<String>("move-duplicated")
                .map(PathBuf::from),
            copy_scenes: args.get_one::<String>("copy-scenes").map(PathBuf::from),
            copy_labels: args.get_one::<String>("copy-labels").map(PathBuf::from),
            anchor: args
                .get_one::<String>("anchor")
                .cloned()
                .unwrap_or_else(|| "scenes".to_string()),
            logger,
        })
    }
}

impl Command for TransferCommand<'_> {
    fn execute(&self) -> SceneResult<()> {
        let catalog = self.source.load(self.logger)?;
        let executor = TransferExecutor::new(self.logger).anchor(self.anchor.clone());

        if let Some(destination) = &self.move_duplicated {
            executor.move_duplicated_to(&catalog, destination)?;
        }
        if let Some(destination) = &self.copy_scenes {
            executor.copy_scenes_to(&catalog, destination)?;
        }
        if let Some(destination) = &self.copy_labels {
            executor.copy_labels_to(&catalog, destination)?;
        }

        Ok(())
    }
}
