//! CLI command implementations
//!
//! This module contains implementations of various commands
//! supported by the CLI application using the Command pattern.

pub mod command_traits;
pub mod scan_command;
pub mod split_command;
pub mod partition_command;
pub mod sample_command;
pub mod map_command;
pub mod transfer_command;

pub use command_traits::{Command, CommandFactory};
pub use scan_command::ScanCommand;
pub use split_command::SplitCommand;
pub use partition_command::PartitionCommand;
pub use sample_command::SampleCommand;
pub use map_command::MapCommand;
pub use transfer_command::TransferCommand;

use clap::ArgMatches;
use std::path::PathBuf;

use crate::catalog::{import_csv, Catalog, CatalogBuilder, ScanRoot};
use crate::errors::{SceneError, SceneResult};
use crate::utils::logger::Logger;

/// Where a command gets its catalog from
///
/// Either a previously exported CSV (the only way `region`/`inferred`
/// columns come in) or a fresh scan of root directories.
#[derive(Debug, Clone)]
pub struct CatalogSource {
    /// Catalog CSV to load, when given
    catalog_csv: Option<PathBuf>,
    /// Roots to scan otherwise
    roots: Vec<ScanRoot>,
    /// Extension allow-list
    extensions: Vec<String>,
    /// Whether the scan follows symlinks
    follow_links: bool,
}

impl CatalogSource {
    /// Parses the catalog-input arguments shared by every command
    pub fn from_args(args: &ArgMatches) -> SceneResult<Self> {
        let catalog_csv = args.get_one::<String>("catalog").map(PathBuf::from);

        let roots: Vec<String> = args
            .get_many::<String>("roots")
            .map(|v| v.cloned().collect())
            .unwrap_or_default();
        let suffixes: Vec<String> = args
            .get_many::<String>("suffix")
            .map(|v| v.cloned().collect())
            .unwrap_or_default();

        if catalog_csv.is_none() && roots.is_empty() {
            return Err(SceneError::GenericError(
                "no input: give root directories or --catalog".to_string(),
            ));
        }

        // Suffix filters pair up with roots positionally
        let roots = roots
            .into_iter()
            .enumerate()
            .map(|(i, dir)| match suffixes.get(i) {
                Some(suffix) if !suffix.is_empty() => ScanRoot::with_suffix(dir, suffix),
                _ => ScanRoot::new(dir),
            })
            .collect();

        let extensions = args
            .get_one::<String>("ext")
            .map(|s| s.split(',').map(|e| e.trim().to_string()).collect())
            .unwrap_or_default();

        Ok(CatalogSource {
            catalog_csv,
            roots,
            extensions,
            follow_links: args.get_flag("follow-links"),
        })
    }

    /// Loads or builds the catalog
    pub fn load(&self, logger: &Logger) -> SceneResult<Catalog> {
        if let Some(csv) = &self.catalog_csv {
            return import_csv(csv);
        }

        let ext_refs: Vec<&str> = self.extensions.iter().map(String::as_str).collect();
        let mut builder = CatalogBuilder::new(logger).follow_links(self.follow_links);
        if !ext_refs.is_empty() {
            builder = builder.extensions(&ext_refs);
        }
        for root in &self.roots {
            builder = builder.root(root.clone());
        }
        builder.build()
    }
}

/// Factory for creating command instances based on CLI arguments
///
/// This factory examines the command-line arguments and creates
/// the appropriate command instance for execution.
pub struct SceneKitCommandFactory;

impl SceneKitCommandFactory {
    /// Create a new factory instance
    pub fn new() -> Self {
        SceneKitCommandFactory
    }
}

impl Default for SceneKitCommandFactory {
    fn default() -> Self {
        SceneKitCommandFactory::new()
    }
}

impl<'a> CommandFactory<'a> for SceneKitCommandFactory {
    fn create_command(&self, args: &ArgMatches, logger: &'a Logger) -> SceneResult<Box<dyn Command + 'a>> {
        // Determine which command to run based on args
        if args.contains_id("split") {
            Ok(Box::new(SplitCommand::new(args, logger)?))
        } else if args.contains_id("partition") {
            Ok(Box::new(PartitionCommand::new(args, logger)?))
        } else if args.contains_id("sample") {
            Ok(Box::new(SampleCommand::new(args, logger)?))
        } else if args.contains_id("map") {
            Ok(Box::new(MapCommand::new(args, logger)?))
        } else if args.contains_id("move-duplicated")
            || args.contains_id("copy-scenes")
            || args.contains_id("copy-labels")
        {
            Ok(Box::new(TransferCommand::new(args, logger)?))
        } else {
            // Default to a catalog scan with optional export
            Ok(Box::new(ScanCommand::new(args, logger)?))
        }
    }
}
