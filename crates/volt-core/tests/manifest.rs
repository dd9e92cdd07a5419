use tempfile::TempDir;
use volt_core::manifest::{Manifest, RootPackage, PACKAGE_FILE};
use volt_core::package::PackageId;

const PACKAGE_JSON: &str = r#"{
	"id": "volt/app",
	"version": "1.0.0",
	"description": "ignored",
	"dependencies": {
		"volt/zeta": "1.0.0",
		"volt/alpha": "2.1.0",
		"other/mid": "0.3.0"
	}
}"#;

#[test]
fn root_package_keeps_declaration_order() {
    let pkg = RootPackage::from_json(PACKAGE_JSON).unwrap();
    assert_eq!(pkg.id, PackageId::parse("volt/app").unwrap());
    assert_eq!(pkg.version, "1.0.0");
    let names: Vec<String> = pkg.dependencies.keys().map(|id| id.to_string()).collect();
    assert_eq!(names, vec!["volt/zeta", "volt/alpha", "other/mid"]);
}

#[test]
fn root_package_without_dependencies() {
    let pkg = RootPackage::from_json(r#"{"id": "volt/app", "version": "0.1.0"}"#).unwrap();
    assert!(pkg.dependencies.is_empty());
}

#[test]
fn root_package_rejects_invalid_dependency_id() {
    let err = RootPackage::from_json(
        r#"{"id": "volt/app", "version": "0.1.0", "dependencies": {"Bad": "1.0.0"}}"#,
    );
    assert!(err.is_err());
}

#[test]
fn discover_walks_up() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join(PACKAGE_FILE), PACKAGE_JSON).unwrap();
    let nested = tmp.path().join("src").join("deep");
    std::fs::create_dir_all(&nested).unwrap();

    let (dir, pkg) = RootPackage::discover(&nested).unwrap();
    assert_eq!(dir, tmp.path());
    assert_eq!(pkg.dependencies.len(), 3);
}

#[test]
fn discover_without_package_file_fails() {
    let tmp = TempDir::new().unwrap();
    let err = RootPackage::discover(tmp.path()).unwrap_err();
    assert!(err.to_string().contains("package.json"), "got: {err}");
}

#[test]
fn archive_manifest_parsing() {
    let manifest = Manifest::from_json(
        r#"{
            "git": "https://example.com/volt/json.git",
            "releases": {
                "1.0.0": { "dependencies": { "volt/utf8": "0.2.0" } },
                "1.1.0-beta.1": {}
            }
        }"#,
    )
    .unwrap();
    assert_eq!(manifest.git.as_deref(), Some("https://example.com/volt/json.git"));
    assert!(manifest.has_release("1.0.0"));
    assert!(!manifest.has_release("2.0.0"));
    let release = manifest.release("1.0.0").unwrap();
    assert_eq!(
        release.dependencies.get(&PackageId::parse("volt/utf8").unwrap()),
        Some(&"0.2.0".to_string())
    );
    assert!(manifest.release("1.1.0-beta.1").unwrap().dependencies.is_empty());
}

#[test]
fn archive_manifest_invalid_json() {
    let err = Manifest::from_json("{ not json").unwrap_err();
    assert!(err.to_string().contains("Manifest error"), "got: {err}");
}
