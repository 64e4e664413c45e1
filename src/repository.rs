// src/repository.rs

//! The config repository: flag-driven path resolution plus the file
//! lifecycle (load, skeleton, emptiness check) on top of a [`FileSystem`].

use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde::de::{Deserialize, DeserializeOwned};
use serde_json::Value;
use tracing::{debug, info};

use crate::errors::{JsonfigError, Result};
use crate::flags::{
    CONFIG_DIR_FLAG, ENVIRONMENT_FLAG, FlagDefinition, FlagValues, apply_flags,
    default_definitions,
};
use crate::fs::{FileSystem, RealFileSystem};
use crate::model::{check_model, merge_document, to_skeleton_json};

/// Collects construction options for a [`Repository`].
///
/// Defaults: the process arguments, the real filesystem, no caller flags,
/// default flags enabled, path derived from `-configDir` + `-environment`.
#[derive(Debug)]
pub struct RepositoryBuilder {
    args: Vec<String>,
    fs: Arc<dyn FileSystem>,
    flags: Vec<FlagDefinition>,
    disable_default_flags: bool,
    explicit_path: Option<PathBuf>,
}

impl RepositoryBuilder {
    pub fn new() -> Self {
        Self {
            args: std::env::args_os()
                .map(|a| a.to_string_lossy().into_owned())
                .collect(),
            fs: Arc::new(RealFileSystem),
            flags: Vec::new(),
            disable_default_flags: false,
            explicit_path: None,
        }
    }

    /// Parse these arguments instead of the process arguments. The first one
    /// is the program name.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_file_system<F: FileSystem + 'static>(mut self, fs: F) -> Self {
        self.fs = Arc::new(fs);
        self
    }

    pub fn append_flag(mut self, flag: FlagDefinition) -> Self {
        self.flags.push(flag);
        self
    }

    /// Replace every caller flag definition added so far.
    pub fn with_flags(mut self, flags: Vec<FlagDefinition>) -> Self {
        self.flags = flags;
        self
    }

    pub fn disable_default_flags(mut self, disable: bool) -> Self {
        self.disable_default_flags = disable;
        self
    }

    /// Use this file path. Path derivation from flags is skipped, so the
    /// explicit path is never overwritten.
    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_path = Some(path.into());
        self
    }

    /// Apply the flag definitions and resolve the file path.
    pub fn build(self) -> Result<Repository> {
        let mut definitions = self.flags;
        if !self.disable_default_flags {
            definitions.extend(default_definitions());
        }

        let flags = apply_flags(&self.args, &definitions)?;

        let file_path = match self.explicit_path {
            Some(path) => Some(path).filter(|p| !p.as_os_str().is_empty()),
            None => Some(derive_file_path(&flags)),
        };

        debug!(path = ?file_path, "config repository ready");

        Ok(Repository {
            file_path,
            fs: self.fs,
            definitions,
            flags,
            last_loaded: None,
        })
    }
}

impl Default for RepositoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// `<configDir><environment>.json`. A flag that was never defined counts as
/// the empty string, so with neither flag the path is `.json`.
pub fn derive_file_path(flags: &FlagValues) -> PathBuf {
    let dir = flags.string(CONFIG_DIR_FLAG).unwrap_or_default();
    let environment = flags.string(ENVIRONMENT_FLAG).unwrap_or_default();
    PathBuf::from(format!("{dir}{environment}.json"))
}

#[derive(Debug)]
pub struct Repository {
    file_path: Option<PathBuf>,
    fs: Arc<dyn FileSystem>,
    definitions: Vec<FlagDefinition>,
    flags: FlagValues,
    last_loaded: Option<Value>,
}

impl Repository {
    pub fn builder() -> RepositoryBuilder {
        RepositoryBuilder::new()
    }

    /// Build with every default: process arguments and the real filesystem.
    pub fn new() -> Result<Self> {
        RepositoryBuilder::new().build()
    }

    /// The resolved file path, `None` if it was never resolved.
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn flags(&self) -> &FlagValues {
        &self.flags
    }

    /// Every definition that was applied, caller flags first.
    pub fn flag_definitions(&self) -> &[FlagDefinition] {
        &self.definitions
    }

    /// The document produced by the last successful [`Repository::load`].
    pub fn last_loaded(&self) -> Option<&Value> {
        self.last_loaded.as_ref()
    }

    fn resolved_path(&self) -> Result<&Path> {
        self.file_path
            .as_deref()
            .ok_or(JsonfigError::EmptyConfigFilePath)
    }

    /// Decode the config file into `model`.
    ///
    /// Keys present in the file overwrite the model's values; everything the
    /// file leaves out keeps its current value. On any error the model is left
    /// untouched.
    ///
    /// The merge works on the model's serialized form, so only serialized
    /// fields carry over. A `#[serde(skip)]` field comes back as its
    /// `Default`, and a `#[serde(skip_serializing)]` field must be in the file
    /// (or also be `#[serde(default)]`), otherwise the load fails with
    /// [`JsonfigError::Json`].
    pub fn load<M>(&mut self, model: &mut M) -> Result<()>
    where
        M: Serialize + DeserializeOwned,
    {
        let mut document = check_model(&*model)?;
        let path = self.resolved_path()?.to_path_buf();

        debug!(path = %path.display(), "loading config file");
        let file = self.fs.open(&path)?;
        let mut de = serde_json::Deserializer::from_reader(BufReader::new(file));
        let decoded = Value::deserialize(&mut de)?;

        merge_document(&mut document, decoded);
        *model = M::deserialize(&document)?;
        self.last_loaded = Some(document);

        Ok(())
    }

    /// Write `model` as a tab-indented JSON skeleton. Refuses to overwrite an
    /// existing file.
    pub fn write_skeleton<M: Serialize>(&self, model: &M) -> Result<()> {
        check_model(model)?;
        let bytes = to_skeleton_json(model)?;
        let path = self.resolved_path()?;

        match self.fs.stat(path) {
            Ok(info) => {
                debug!(
                    path = %path.display(),
                    size = info.size,
                    is_dir = info.is_dir,
                    "config path already taken"
                );
                return Err(JsonfigError::ConfigFileExist);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        let mut file = self.fs.create(path)?;
        file.write_all(&bytes)?;
        file.flush()?;

        info!(path = %path.display(), bytes = bytes.len(), "wrote config skeleton");
        Ok(())
    }

    /// Whether the config file is missing or zero bytes long.
    ///
    /// `model` is only shape-checked. Content is not inspected: a file holding
    /// `{}` is not empty.
    pub fn is_empty<M: Serialize>(&self, model: &M) -> Result<bool> {
        check_model(model)?;
        let path = self.resolved_path()?;

        let file = match self.fs.open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "config file does not exist");
                return Ok(true);
            }
            Err(e) => return Err(e.into()),
        };

        Ok(file.size()? == 0)
    }
}
