// src/lib.rs

//! `jsonfig` loads a JSON config file into a caller-defined model.
//!
//! The file path comes from command-line flags (`-configDir` +
//! `-environment`, giving `<configDir><environment>.json`) unless one is set
//! explicitly. A [`Repository`] can then:
//! - `load` the file into a model,
//! - `write_skeleton` a model's defaults when no file exists yet,
//! - report whether the file `is_empty`.
//!
//! ```no_run
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, Serialize, Deserialize)]
//! struct AppConfig {
//!     name: String,
//!     version: i64,
//! }
//!
//! # fn main() -> jsonfig::Result<()> {
//! let mut repo = jsonfig::Repository::new()?;
//! let mut cfg = AppConfig::default();
//! if repo.is_empty(&cfg)? {
//!     repo.write_skeleton(&cfg)?;
//! }
//! repo.load(&mut cfg)?;
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod flags;
pub mod fs;
pub mod logging;
pub mod model;
pub mod repository;

pub use errors::{JsonfigError, Result};
pub use flags::{FlagDefinition, FlagKind, FlagValue, FlagValues};
pub use fs::{FileSystem, RealFileSystem};
pub use repository::{Repository, RepositoryBuilder};
