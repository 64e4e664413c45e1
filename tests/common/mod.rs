#![allow(dead_code)]

use std::error::Error;

pub use jsonfig_test_utils::builders::{PROGRAM, RepositoryFixture};
pub use jsonfig_test_utils::init_tracing;
pub use jsonfig_test_utils::models::{ConfigModel, DatabaseSection, ServiceConfig, Wrapper};

pub type TestResult = Result<(), Box<dyn Error>>;

/// The tab-indented skeleton of `ConfigModel::default()`.
pub const CONFIG_MODEL_SKELETON: &str = "{\n\t\"name\": \"\",\n\t\"version\": 0\n}";
