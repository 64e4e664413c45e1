#![allow(dead_code)]

use std::path::PathBuf;

use jsonfig::fs::mock::MockFileSystem;
use jsonfig::{FlagDefinition, Repository, RepositoryBuilder};

/// Program name used as `args[0]` by the fixtures.
pub const PROGRAM: &str = "jsonfig-test";

/// Builder for a `Repository` backed by a `MockFileSystem`.
///
/// The filesystem handle is returned alongside the repository so tests can
/// seed and inspect files.
pub struct RepositoryFixture {
    fs: MockFileSystem,
    args: Vec<String>,
    flags: Vec<FlagDefinition>,
    disable_default_flags: bool,
    path: Option<PathBuf>,
    read_only: bool,
}

impl RepositoryFixture {
    pub fn new() -> Self {
        Self {
            fs: MockFileSystem::new(),
            args: vec![PROGRAM.to_string()],
            flags: Vec::new(),
            disable_default_flags: false,
            path: None,
            read_only: false,
        }
    }

    /// A repository whose path is never resolved: an empty explicit path
    /// turns derivation off without naming a file.
    pub fn unresolved() -> Self {
        Self::new().with_path("")
    }

    pub fn at_path(path: &str) -> Self {
        Self::new().with_path(path)
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.path = Some(PathBuf::from(path));
        self
    }

    pub fn with_args(mut self, args: &[&str]) -> Self {
        self.args = std::iter::once(PROGRAM)
            .chain(args.iter().copied())
            .map(String::from)
            .collect();
        self
    }

    pub fn with_flag(mut self, flag: FlagDefinition) -> Self {
        self.flags.push(flag);
        self
    }

    pub fn without_default_flags(mut self) -> Self {
        self.disable_default_flags = true;
        self
    }

    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.fs.add_file(path, content);
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn builder(&self) -> RepositoryBuilder {
        let fs = if self.read_only {
            self.fs.read_only()
        } else {
            self.fs.clone()
        };

        let mut builder = Repository::builder()
            .with_args(self.args.clone())
            .with_file_system(fs)
            .with_flags(self.flags.clone())
            .disable_default_flags(self.disable_default_flags);
        if let Some(path) = &self.path {
            builder = builder.with_file_path(path.clone());
        }
        builder
    }

    pub fn build(self) -> (Repository, MockFileSystem) {
        let repo = self
            .builder()
            .build()
            .expect("Failed to build repository from fixture");
        (repo, self.fs)
    }
}

impl Default for RepositoryFixture {
    fn default() -> Self {
        Self::new()
    }
}
