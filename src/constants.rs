// src/constants.rs

/// Name of the per-user and per-project Claude directory.
pub const CLAUDE_DIR: &str = ".claude";

/// Name of the directory (inside `.claude/`) holding installed commands.
pub const COMMANDS_DIR: &str = "commands";

/// Extension of every command file on disk.
pub const COMMAND_FILE_EXTENSION: &str = "md";

/// Name of the application's config and cache directories.
pub const APP_DIR_NAME: &str = "claude-cmd";

/// Name of the settings file (inside the config directory).
pub const SETTINGS_FILENAME: &str = "config.toml";

/// Name of the installation ledger (inside the cache directory).
pub const INSTALL_LEDGER_FILENAME: &str = "installations.bin";

/// Upstream location of the command catalog.
pub const DEFAULT_BASE_URL: &str = "https://raw.githubusercontent.com/kiliczsh/claude-cmd/main";

/// Path segment between the base URL and the language directory.
pub const REMOTE_COMMANDS_SEGMENT: &str = "commands";

/// Name of the manifest file inside each language directory.
pub const MANIFEST_FILENAME: &str = "manifest.json";

/// Language used when nothing else is configured.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Default cache time-to-live, in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Default per-request HTTP timeout, in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// On-disk format version written into every cache entry.
pub const CACHE_FORMAT_VERSION: &str = "1.0.0";

/// Prefix of manifest cache keys (`manifest-{lang}`).
pub const MANIFEST_CACHE_PREFIX: &str = "manifest";

/// Prefix of command content cache keys (`command-{lang}-{name}-{digest}`).
pub const COMMAND_CACHE_PREFIX: &str = "command";

/// Maximum length of a single sanitized cache key component, in characters.
pub const MAX_CACHE_KEY_COMPONENT_LEN: usize = 255;

/// Maximum byte length of a whole cache key. Leaves room for the `.json.tmp`
/// suffix under the common 255-byte file name limit.
pub const MAX_CACHE_KEY_LEN: usize = 200;

/// Hex characters of the name digest appended to command cache keys.
pub const COMMAND_KEY_DIGEST_LEN: usize = 8;

/// Version string used for manifests built from a local scan.
pub const LOCAL_MANIFEST_VERSION: &str = "local";
