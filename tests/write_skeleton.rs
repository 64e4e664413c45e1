mod common;
use crate::common::{
    CONFIG_MODEL_SKELETON, ConfigModel, DatabaseSection, RepositoryFixture, ServiceConfig,
    TestResult, Wrapper, init_tracing,
};

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;

use jsonfig::JsonfigError;
use jsonfig::fs::{FileInfo, FileSystem};
use serde::Serialize;

#[test]
fn skeleton_is_tab_indented_json_of_defaults() -> TestResult {
    init_tracing();

    let (repo, fs) = RepositoryFixture::at_path("test.json").build();

    repo.write_skeleton(&ConfigModel::default())?;

    let written = fs.contents("test.json").expect("skeleton was not written");
    assert_eq!(String::from_utf8(written)?, CONFIG_MODEL_SKELETON);
    Ok(())
}

#[test]
fn skeleton_keeps_field_order_and_renames() -> TestResult {
    init_tracing();

    let (repo, fs) = RepositoryFixture::at_path("service.json").build();

    repo.write_skeleton(&ServiceConfig::default())?;

    let expected = "{\n\
        \t\"service\": \"\",\n\
        \t\"database\": {\n\
        \t\t\"host\": \"\",\n\
        \t\t\"port\": 0\n\
        \t},\n\
        \t\"features\": [],\n\
        \t\"logLevel\": \"\"\n\
        }";
    let written = fs.contents("service.json").expect("skeleton was not written");
    assert_eq!(String::from_utf8(written)?, expected);
    Ok(())
}

#[test]
fn skeleton_then_load_round_trips_defaults() -> TestResult {
    init_tracing();

    let (mut repo, _fs) = RepositoryFixture::at_path("service.json").build();
    let defaults = ServiceConfig {
        service: "api".to_string(),
        database: DatabaseSection {
            host: "db".to_string(),
            port: 5432,
        },
        features: vec!["metrics".to_string()],
        log_level: "info".to_string(),
    };
    repo.write_skeleton(&defaults)?;

    let mut loaded = ServiceConfig {
        service: "something else".to_string(),
        ..ServiceConfig::default()
    };
    repo.load(&mut loaded)?;

    assert_eq!(loaded, defaults);
    Ok(())
}

#[test]
fn skeleton_never_overwrites() -> TestResult {
    init_tracing();

    let (repo, fs) = RepositoryFixture::at_path("test.json").build();

    repo.write_skeleton(&ConfigModel::default())?;
    let second = repo.write_skeleton(&ConfigModel {
        name: "new".to_string(),
        version: 2,
    });

    assert!(matches!(second, Err(JsonfigError::ConfigFileExist)));
    let written = fs.contents("test.json").expect("skeleton was not written");
    assert_eq!(String::from_utf8(written)?, CONFIG_MODEL_SKELETON);
    Ok(())
}

#[test]
fn skeleton_refuses_existing_empty_file() {
    init_tracing();

    let (repo, fs) = RepositoryFixture::at_path("test.json")
        .with_file("test.json", "")
        .build();

    let result = repo.write_skeleton(&ConfigModel::default());

    assert!(matches!(result, Err(JsonfigError::ConfigFileExist)));
    assert_eq!(fs.contents("test.json"), Some(Vec::new()));
}

#[test]
fn skeleton_refuses_directory_path() -> TestResult {
    init_tracing();

    let (repo, fs) = RepositoryFixture::at_path("config").build();
    fs.add_dir("config");
    assert_eq!(fs.stat(Path::new("config"))?, FileInfo { size: 0, is_dir: true });

    let result = repo.write_skeleton(&ConfigModel::default());

    assert!(matches!(result, Err(JsonfigError::ConfigFileExist)));
    Ok(())
}

#[test]
fn mock_stat_reports_file_size() -> TestResult {
    let (_repo, fs) = RepositoryFixture::at_path("test.json")
        .with_file("test.json", "{}")
        .build();

    assert_eq!(fs.stat(Path::new("test.json"))?, FileInfo { size: 2, is_dir: false });
    Ok(())
}

#[test]
fn skeleton_rejects_invalid_models_without_touching_storage() {
    init_tracing();

    let (repo, fs) = RepositoryFixture::at_path("test.json").build();

    assert!(matches!(
        repo.write_skeleton(&Option::<ConfigModel>::None),
        Err(JsonfigError::InvalidConfigModel)
    ));
    assert!(matches!(
        repo.write_skeleton(&"string"),
        Err(JsonfigError::InvalidConfigModel)
    ));
    assert!(matches!(
        repo.write_skeleton(&Wrapper::default()),
        Err(JsonfigError::InvalidConfigModel)
    ));
    assert_eq!(fs.access_count(), 0);
    assert_eq!(fs.contents("test.json"), None);
}

#[test]
fn skeleton_propagates_serialization_errors() {
    init_tracing();

    #[derive(Serialize)]
    struct Unencodable {
        grid: BTreeMap<(u8, u8), u8>,
    }

    let (repo, fs) = RepositoryFixture::at_path("test.json").build();
    let model = Unencodable {
        grid: BTreeMap::from([((0, 0), 1)]),
    };

    let result = repo.write_skeleton(&model);

    assert!(matches!(result, Err(JsonfigError::Json(_))));
    assert_eq!(fs.access_count(), 0);
}

#[test]
fn skeleton_requires_a_resolved_path() {
    init_tracing();

    let (repo, fs) = RepositoryFixture::unresolved().build();

    let result = repo.write_skeleton(&ConfigModel::default());

    assert!(matches!(result, Err(JsonfigError::EmptyConfigFilePath)));
    assert_eq!(fs.access_count(), 0);
}

#[test]
fn skeleton_on_read_only_storage_fails() {
    init_tracing();

    let (repo, fs) = RepositoryFixture::at_path("test.json").read_only().build();

    match repo.write_skeleton(&ConfigModel::default()) {
        Err(JsonfigError::Io(e)) => assert_eq!(e.kind(), ErrorKind::PermissionDenied),
        other => panic!("Expected Io(PermissionDenied), got: {:?}", other),
    }
    assert_eq!(fs.contents("test.json"), None);
}
