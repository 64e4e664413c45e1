//! Config models shared by the integration tests.

use serde::{Deserialize, Serialize};

/// The smallest useful model: two scalar fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigModel {
    pub name: String,
    pub version: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSection {
    pub host: String,
    pub port: u16,
}

/// A model with a nested section, a list and a renamed field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub service: String,
    pub database: DatabaseSection,
    pub features: Vec<String>,
    #[serde(rename = "logLevel")]
    pub log_level: String,
}

/// A model whose fields never serialize to an object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wrapper(pub String);
