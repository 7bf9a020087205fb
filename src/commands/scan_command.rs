//! Catalog scan and report command
//!
//! The default command: builds (or loads) the catalog, reports counts,
//! optionally flags duplicates, applies the explicit duplicate exclusion,
//! and exports the result to CSV.

use clap::ArgMatches;
use log::{info, warn};
use std::path::PathBuf;

use crate::catalog::export_csv;
use crate::commands::command_traits::Command;
use crate::commands::CatalogSource;
use crate::errors::SceneResult;
use crate::utils::logger::Logger;

/// Command for building a catalog and reporting on it
pub struct ScanCommand<'a> {
    /// Catalog input specification
    source: CatalogSource,
    /// CSV export destination, when requested
    export: Option<PathBuf>,
    /// Whether to report duplicate names
    dedup_report: bool,
    /// Whether to drop repeat occurrences before exporting
    exclude_duplicated: bool,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> ScanCommand<'a> {
    /// Create a new scan command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> SceneResult<Self> {
        Ok(ScanCommand {
            source: CatalogSource::from_args(args)?,
            export: args.get_one::<String>("export").map(PathBuf::from),
            dedup_report: args.get_flag("dedup-report"),
            exclude_duplicated: args.get_flag("exclude-duplicated"),
            logger,
        })
    }
}

impl Command for ScanCommand<'_> {
    fn execute(&self) -> SceneResult<()> {
        let mut catalog = self.source.load(self.logger)?;

        info!("Catalog: {} scenes", catalog.len());
        for (sensor, count) in catalog.counts_by_sensor() {
            info!("  {}: {}", sensor, count);
        }
        info!("  annotated: {}", catalog.count_annotated());

        if self.dedup_report {
            let duplicated = catalog.duplicated();
            if duplicated.is_empty() {
                info!("No duplicate scene names");
            } else {
                warn!("{} records share a duplicated name:", duplicated.len());
                for record in &duplicated {
                    warn!("  {} ({})", record.name, record.path.display());
                }
            }
        }

        if self.exclude_duplicated {
            let before = catalog.len();
            catalog.exclude_duplicated(None);
            info!(
                "Excluded {} repeat-occurrence records",
                before - catalog.len()
            );
        }

        if let Some(export) = &self.export {
            export_csv(&catalog, export)?;
            info!("Catalog exported to {}", export.display());
        }

        Ok(())
    }
}
