//! Application-wide constants.

/// The display name of the application.
pub const APP_NAME: &str = "Bitscope";

/// The binary name of the application (used in command examples).
pub const APP_BINARY_NAME: &str = "bitscope";

/// Directory name under the platform config directory.
pub const CONFIG_DIR_NAME: &str = "bitscope";

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "BITSCOPE_CONFIG_DIR";

/// Largest number of cells a single grid may register.
pub const MAX_GRID_CELLS: u64 = 1 << 20;
