/// Constants used throughout the application
///
/// This module centralises defaults, fallback variable names and help texts.

/// Option name of the watched directory
pub const OPTION_DIRECTORY: &str = "directory";

/// Option name of the polling interval in milliseconds
pub const OPTION_INTERVAL: &str = "interval";

/// Option name of the file extension filter
pub const OPTION_FILE_EXTENSION: &str = "fileext";

/// Option name of the rename flag
pub const OPTION_MUST_RENAME: &str = "mustrename";

/// Option name of the backup flag
pub const OPTION_MUST_BACKUP: &str = "mustbackup";

pub const ENV_DIRECTORY: &str = "FILELOADER_DIRECTORY";
pub const ENV_INTERVAL: &str = "FILELOADER_INTERVAL";
pub const ENV_FILE_EXTENSION: &str = "FILELOADER_EXT";
pub const ENV_TYPE_MATCH: &str = "FILELOADER_TYPEMATCH";
pub const ENV_MUST_RENAME: &str = "FILELOADER_MUSTRENAME";
pub const ENV_RENAME_TEMPLATE: &str = "FILELOADER_RENAMETEMPLATE";
pub const ENV_MUST_BACKUP: &str = "FILELOADER_MUSTBACKUP";
pub const ENV_BACKUP_DIRECTORY: &str = "FILELOADER_BACKUPDIRECTORY";

/// Default type-extraction pattern: everything up to the first `-`
pub const DEFAULT_TYPE_MATCH: &str = r"[^\-]*";

/// Default rename template
pub const DEFAULT_RENAME_TEMPLATE: &str = "[TYPE]-[TIMESTAMP]-[COUNTER].dat";

/// Name of the backup directory created inside the watched directory by default
pub const DEFAULT_BACKUP_FOLDER: &str = "_backup";

/// Placeholder replaced by the extracted type token
pub const PLACEHOLDER_TYPE: &str = "[TYPE]";

/// Placeholder replaced by the capture timestamp in milliseconds
pub const PLACEHOLDER_TIMESTAMP: &str = "[TIMESTAMP]";

/// Placeholder replaced by the ordinal index within the pass
pub const PLACEHOLDER_COUNTER: &str = "[COUNTER]";

/// Operation label of a failed directory listing
pub const READ_DIRECTORY: &str = "read directory";

/// Name of the scheduler thread
pub const SCHEDULER_THREAD_NAME: &str = "dropwatch-scheduler";

/// Help text for the config command-line option
pub const CONFIG_HELP: &str = "Read options from a YAML file";

/// Help text for the directory command-line option
pub const DIRECTORY_HELP: &str = "Directory to watch for new files";

/// Help text for the interval command-line option
pub const INTERVAL_HELP: &str = "Polling interval in milliseconds (0 runs a single pass)";

/// Help text for the extension command-line option
pub const EXTENSION_HELP: &str = "Only handle files whose name ends with this suffix";

/// Help text for the type-match command-line option
pub const TYPE_MATCH_HELP: &str = "Regular expression extracting the file type from its name";

/// Help text for the no-rename command-line option
pub const NO_RENAME_HELP: &str = "Leave matched files under their original name";

/// Help text for the template command-line option
pub const TEMPLATE_HELP: &str = "Rename template using [TYPE], [TIMESTAMP] and [COUNTER]";

/// Help text for the no-backup command-line option
pub const NO_BACKUP_HELP: &str = "Do not copy matched files to the backup directory";

/// Help text for the backup-directory command-line option
pub const BACKUP_DIRECTORY_HELP: &str = "Directory receiving backup copies";

/// Help text for the verbose command-line option
pub const VERBOSE_HELP: &str = "Increase verbosity level (can be used multiple times)";

pub const LOG_LEVEL_HELP: &str = "Log level: error, warn, info, debug or trace";

/// Help text for the log file command-line option
pub const LOG_FILE_HELP: &str = "Also write log output to this file";
