use clap::{Arg, Command as ClapCommand, ArgAction};
use std::process;
use log::error;

use scenekit::utils::logger::Logger;
use scenekit::commands::{CommandFactory, SceneKitCommandFactory};

fn main() {
    let matches = ClapCommand::new("SceneKit")
        .version("0.1")
        .about("Catalog satellite scenes and partition them into datasets")
        .arg(
            Arg::new("roots")
                .help("Root directories to scan for scenes")
                .value_name("DIR")
                .num_args(0..)
                .index(1),
        )
        .arg(
            Arg::new("catalog")
                .long("catalog")
                .help("Load a previously exported catalog CSV instead of scanning")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("suffix")
                .long("suffix")
                .help("Filename-stem suffix filter for the matching root (repeatable, positional)")
                .value_name("SUFFIX")
                .action(ArgAction::Append)
                .required(false),
        )
        .arg(
            Arg::new("ext")
                .long("ext")
                .help("Comma-separated image extension allow-list")
                .value_name("LIST")
                .default_value("jp2,tif")
                .required(false),
        )
        .arg(
            Arg::new("follow-links")
                .long("follow-links")
                .help("Follow symbolic links while scanning")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("export")
                .short('o')
                .long("export")
                .help("Export the catalog (or sample) to this CSV file")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("dedup-report")
                .long("dedup-report")
                .help("Report records sharing a duplicated scene name")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("exclude-duplicated")
                .long("exclude-duplicated")
                .help("Drop repeat occurrences of duplicated names before exporting")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("split")
                .long("split")
                .help("Stratified train/test split with this test ratio")
                .value_name("RATIO")
                .required(false),
        )
        .arg(
            Arg::new("train-out")
                .long("train-out")
                .help("Output file for training scene names")
                .value_name("FILE")
                .default_value("train.txt")
                .required(false),
        )
        .arg(
            Arg::new("test-out")
                .long("test-out")
                .help("Output file for test scene names")
                .value_name("FILE")
                .default_value("test.txt")
                .required(false),
        )
        .arg(
            Arg::new("partition")
                .short('n')
                .long("partition")
                .help("Stratified N-way partition into the --dest directories")
                .value_name("N")
                .required(false),
        )
        .arg(
            Arg::new("dest")
                .long("dest")
                .help("Destination root for a partition (repeatable, or one root for numbered subdirectories)")
                .value_name("DIR")
                .action(ArgAction::Append)
                .required(false),
        )
        .arg(
            Arg::new("move")
                .long("move")
                .help("Move scene directories instead of copying")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("sample")
                .long("sample")
                .help("Stratified random sample with this ratio (needs --export)")
                .value_name("RATIO")
                .required(false),
        )
        .arg(
            Arg::new("map")
                .long("map")
                .help("Render footprints to this HTML map file")
                .value_name("FILE")
                .required(false),
        )
        .arg(
            Arg::new("move-duplicated")
                .long("move-duplicated")
                .help("Quarantine repeat occurrences of duplicate-name scenes into this directory")
                .value_name("DIR")
                .required(false),
        )
        .arg(
            Arg::new("copy-scenes")
                .long("copy-scenes")
                .help("Copy all scene directories under this destination")
                .value_name("DIR")
                .required(false),
        )
        .arg(
            Arg::new("copy-labels")
                .long("copy-labels")
                .help("Copy all sidecar annotation files into this directory")
                .value_name("DIR")
                .required(false),
        )
        .arg(
            Arg::new("anchor")
                .long("anchor")
                .help("Directory name anchoring the destination layout")
                .value_name("NAME")
                .default_value("scenes")
                .required(false),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose output")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let log_file = "scenekit.log";
    let logger = match Logger::new(log_file) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error initializing logger: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = Logger::init_global_logger("scenekit-global.log", matches.get_flag("verbose")) {
        eprintln!("Error setting up global logger: {}", e);
        process::exit(1);
    }

    let factory = SceneKitCommandFactory::new();

    let command_result = factory.create_command(&matches, &logger);
    match command_result {
        Ok(command) => {
            if let Err(e) = command.execute() {
                error!("Command execution error: {}", e);
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        Err(e) => {
            error!("Failed to create command: {}", e);
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
}
