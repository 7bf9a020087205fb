//! Footprint map rendering command

use clap::ArgMatches;
use log::info;
use std::path::PathBuf;

use crate::commands::command_traits::Command;
use crate::commands::CatalogSource;
use crate::errors::{SceneError, SceneResult};
use crate::utils::logger::Logger;
use crate::viz::SceneMap;

/// Command for rendering catalog footprints to an HTML map
pub struct MapCommand<'a> {
    /// Catalog input specification
    source: CatalogSource,
    /// HTML output path
    output: PathBuf,
    /// Logger for recording operations
    logger: &'a Logger,
}

impl<'a> MapCommand<'a> {
    /// Create a new map command
    ///
    /// # Arguments
    /// * `args` - CLI argument matches from clap
    /// * `logger` - Logger for recording operations
    pub fn new(args: &ArgMatches, logger: &'a Logger) -> SceneResult<Self> {
        let output = args
            .get_one::<String>("map")
            .map(PathBuf::from)
            .ok_or_else(|| SceneError::GenericError("missing map output path".to_string()))?;

        Ok(MapCommand {
            source: CatalogSource::from_args(args)?,
            output,
            logger,
        })
    }
}

impl Command for MapCommand<'_> {
    fn execute(&self) -> SceneResult<()> {
        let catalog = self.source.load(self.logger)?;
        let map = SceneMap::from_catalog(&catalog);

        map.save(&self.output)?;
        info!(
            "Rendered {} footprints ({} sensors) to {}",
            map.polygons().len(),
            map.legend().len(),
            self.output.display()
        );
        Ok(())
    }
}
