use std::path::Path;

use volt_core::config::GlobalConfig;
use volt_core::lockfile::{ResolvedLock, LOCK_PATH};
use volt_resolver::provider::LocalStoreProvider;
use volt_resolver::resolve_project;

fn install(store: &Path, id: &str, version: &str, dependencies: &str) {
    let (scope, name) = id.split_once('/').unwrap();
    let dir = store.join(scope).join(name).join(version);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("package.json"),
        format!(r#"{{"id": "{id}", "version": "{version}", "dependencies": {dependencies}}}"#),
    )
    .unwrap();
}

fn config_for(store: &Path) -> GlobalConfig {
    GlobalConfig {
        packages_dir: Some(store.to_path_buf()),
        ..GlobalConfig::default()
    }
}

#[tokio::test]
async fn resolves_project_from_local_store_and_writes_lock() {
    let tmp = tempfile::tempdir().unwrap();
    let store = tmp.path().join("packages");
    install(&store, "volt/json", "1.2.0", r#"{"volt/utf8": "0.2.0"}"#);
    install(&store, "volt/utf8", "0.2.0", "{}");
    install(&store, "volt/utf8", "0.3.0", "{}");

    let project = tmp.path().join("project");
    std::fs::create_dir_all(project.join("src")).unwrap();
    std::fs::write(
        project.join("package.json"),
        r#"{"id": "me/app", "version": "0.1.0", "dependencies": {"volt/json": "1.2.0"}}"#,
    )
    .unwrap();

    let result = resolve_project(&project.join("src"), &config_for(&store))
        .await
        .unwrap();
    assert_eq!(result.summary(), "Finished without warnings.");

    let lock = ResolvedLock::from_path(&project.join(LOCK_PATH)).unwrap();
    let entries: Vec<(&str, &str)> = lock
        .packages
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    assert_eq!(entries, vec![("volt/utf8", "0.2.0"), ("volt/json", "1.2.0")]);

    let raw = std::fs::read_to_string(project.join(LOCK_PATH)).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed["volt/json"], "1.2.0");
    assert!(raw.contains("\n\t\"volt/utf8\""));
}

#[tokio::test]
async fn missing_package_file_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    let err = resolve_project(tmp.path(), &config_for(tmp.path()))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("package.json"));
}

#[tokio::test]
async fn uninstalled_direct_dependency_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::write(
        tmp.path().join("package.json"),
        r#"{"id": "me/app", "version": "0.1.0", "dependencies": {"volt/json": "1.2.0"}}"#,
    )
    .unwrap();

    let store = tmp.path().join("packages");
    let result = resolve_project(tmp.path(), &config_for(&store)).await;
    assert!(result.is_err());
    assert!(!tmp.path().join(LOCK_PATH).exists());
}

#[test]
fn store_layout() {
    let provider = LocalStoreProvider::new("/opt/volt/packages");
    let id = "volt/json".parse().unwrap();
    assert_eq!(
        provider.package_dir(&id),
        Path::new("/opt/volt/packages/volt/json")
    );
}
