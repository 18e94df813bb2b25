use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::{
    Arg, ArgAction, ArgMatches, Command, command, crate_authors, crate_description, crate_name,
    crate_version, value_parser,
};

use crate::config::{WatcherOptions, load_options};
use crate::constants::{
    BACKUP_DIRECTORY_HELP, CONFIG_HELP, DIRECTORY_HELP, EXTENSION_HELP, INTERVAL_HELP,
    LOG_FILE_HELP, LOG_LEVEL_HELP, NO_BACKUP_HELP, NO_RENAME_HELP, TEMPLATE_HELP,
    TYPE_MATCH_HELP, VERBOSE_HELP,
};
use crate::errors::Result;
use crate::logging::LogLevel;

/// Defines the command-line interface
///
/// Every watcher option has a flag; flags override values read from the
/// `--config` file, which in turn override the `FILELOADER_*` environment.
pub fn build_command() -> Command {
    let arg_config = Arg::new("config")
        .short('c')
        .long("config")
        .help(CONFIG_HELP)
        .value_parser(value_parser!(PathBuf));

    let arg_directory = Arg::new("directory")
        .short('d')
        .long("directory")
        .help(DIRECTORY_HELP);

    let arg_interval = Arg::new("interval")
        .short('i')
        .long("interval")
        .help(INTERVAL_HELP)
        .value_parser(value_parser!(u64));

    let arg_extension = Arg::new("ext")
        .short('e')
        .long("ext")
        .help(EXTENSION_HELP);

    let arg_type_match = Arg::new("type_match")
        .short('t')
        .long("type-match")
        .help(TYPE_MATCH_HELP);

    let arg_no_rename = Arg::new("no_rename")
        .long("no-rename")
        .help(NO_RENAME_HELP)
        .action(ArgAction::SetTrue);

    let arg_template = Arg::new("template")
        .short('r')
        .long("template")
        .help(TEMPLATE_HELP);

    let arg_no_backup = Arg::new("no_backup")
        .long("no-backup")
        .help(NO_BACKUP_HELP)
        .action(ArgAction::SetTrue);

    let arg_backup_directory = Arg::new("backup_directory")
        .short('b')
        .long("backup-directory")
        .help(BACKUP_DIRECTORY_HELP);

    let arg_verbose = Arg::new("verbose")
        .short('v')
        .long("verbose")
        .help(VERBOSE_HELP)
        .action(ArgAction::Count);

    let arg_log_level = Arg::new("log_level")
        .long("log-level")
        .help(LOG_LEVEL_HELP)
        .value_parser(LogLevel::from_str)
        .conflicts_with("verbose");

    let arg_log_file = Arg::new("log_file")
        .short('l')
        .long("log-file")
        .help(LOG_FILE_HELP)
        .value_parser(value_parser!(PathBuf));

    command!()
        .author(crate_authors!())
        .about(crate_description!())
        .name(crate_name!())
        .version(crate_version!())
        .arg(arg_config)
        .arg(arg_directory)
        .arg(arg_interval)
        .arg(arg_extension)
        .arg(arg_type_match)
        .arg(arg_no_rename)
        .arg(arg_template)
        .arg(arg_no_backup)
        .arg(arg_backup_directory)
        .arg(arg_verbose)
        .arg(arg_log_level)
        .arg(arg_log_file)
}

/// Parses the process arguments
pub fn get_matches() -> ArgMatches {
    build_command().get_matches()
}

/// Collects the watcher options given on the command line
///
/// Options from the `--config` file fill whatever the flags leave unset.
///
/// # Errors
/// Returns an error if the option file cannot be read or parsed
pub fn get_watcher_options(matches: &ArgMatches) -> Result<WatcherOptions> {
    let flags = WatcherOptions {
        directory: matches.get_one::<String>("directory").cloned(),
        interval: matches.get_one::<u64>("interval").copied(),
        fileext: matches.get_one::<String>("ext").cloned(),
        typematch: matches.get_one::<String>("type_match").cloned(),
        mustrename: matches.get_flag("no_rename").then_some(false),
        renametemplate: matches.get_one::<String>("template").cloned(),
        mustbackup: matches.get_flag("no_backup").then_some(false),
        backupdirectory: matches.get_one::<String>("backup_directory").cloned(),
    };

    match matches.get_one::<PathBuf>("config") {
        Some(file) => Ok(flags.or(load_options(file)?)),
        None => Ok(flags),
    }
}

/// Gets the log level from `--log-level`, or from the number of `-v` flags
pub fn get_verbosity(matches: &ArgMatches) -> LogLevel {
    matches
        .get_one::<LogLevel>("log_level")
        .copied()
        .unwrap_or_else(|| LogLevel::from_occurrences(matches.get_count("verbose")))
}

pub fn get_log_file(matches: &ArgMatches) -> Option<&Path> {
    matches.get_one::<PathBuf>("log_file").map(PathBuf::as_path)
}
