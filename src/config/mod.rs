//! Layered configuration.
//!
//! Sources, lowest to highest priority, merged field by field:
//! 1. **Defaults** - `Config::default()`
//! 2. **Project** - `$CWD/taskflow/config.yaml`
//! 3. **User** - `~/.taskflow/config.yaml`
//! 4. **Environment** - `TASKFLOW_*` variables
//!
//! CLI flags are applied on top by the binary.
//!
//! ## Environment Variables
//! - `TASKFLOW_CONFIG_PATH` - Explicit config file (skips tier merging)
//! - `TASKFLOW_PROJECT_DIR` - Project config dir (default: `./taskflow`)
//! - `TASKFLOW_USER_DIR` - User config dir (default: `~/.taskflow`)
//! - `TASKFLOW_DB_PATH` - Database path
//! - `TASKFLOW_HOST` - Listen address
//! - `TASKFLOW_PORT` - Listen port
//! - `TASKFLOW_STATIC_DIR` - Directory with the browser client

mod loader;
mod merge;
mod types;

pub use loader::{ConfigLoader, ConfigPaths, EnvOverrides};
pub use merge::{deep_merge, deep_merge_all};
pub use types::*;
