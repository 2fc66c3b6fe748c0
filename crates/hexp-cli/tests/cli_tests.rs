//! Drives the `hexp` binary against a temporary template tree.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

// ============================================================================
// Fixtures
// ============================================================================

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// A scratch directory holding `templates/`, an empty settings file and
/// room for generated projects.
struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path();

        write(
            &root.join("templates/bases/web/manifest.json"),
            r#"{
                "id": "web", "type": "base", "name": "Web", "description": "Web server starter",
                "capabilities": ["web-server"],
                "prompts": [{"id": "port", "label": "Port", "type": "text", "default": 3000}],
                "ops": [
                    {"type": "copy", "from": "files/index.ts", "to": "src/index.ts", "overwrite": true},
                    {"type": "templateRender", "from": "files/README.md.hbs", "to": "README.md"},
                    {"type": "jsonMerge", "target": "package.json", "data": {"name": "web"}}
                ]
            }"#,
        );
        write(&root.join("templates/bases/web/files/index.ts"), "// plugins\nlisten()\n");
        write(
            &root.join("templates/bases/web/files/README.md.hbs"),
            "# {{projectName}}\nPort {{port}} ({{projectType}})\n",
        );

        write(
            &root.join("templates/addons/cors/manifest.json"),
            r#"{
                "id": "cors", "type": "addon", "name": "CORS", "description": "Cross-origin headers",
                "requires": ["web-server"], "provides": ["cors"],
                "ops": [
                    {"type": "textInsert", "target": "src/index.ts", "marker": "// plugins", "content": "\nuse(cors())"}
                ]
            }"#,
        );
        write(
            &root.join("templates/addons/helmet/manifest.json"),
            r#"{
                "id": "helmet", "type": "addon", "name": "Helmet", "description": "Security headers",
                "requires": ["cors"],
                "ops": [
                    {"type": "jsonMerge", "target": "package.json", "data": {"dependencies": {"helmet": "^7"}}}
                ]
            }"#,
        );
        write(
            &root.join("templates/addons/prisma/manifest.json"),
            r#"{
                "id": "prisma", "type": "addon", "name": "Prisma", "description": "Prisma ORM",
                "provides": ["orm"], "conflicts": ["drizzle"]
            }"#,
        );
        write(
            &root.join("templates/addons/drizzle/manifest.json"),
            r#"{
                "id": "drizzle", "type": "addon", "name": "Drizzle", "description": "Drizzle ORM",
                "provides": ["orm"]
            }"#,
        );
        write(
            &root.join("templates/addons/broken-readme/manifest.json"),
            r#"{
                "id": "broken-readme", "type": "addon", "name": "Readme", "description": "Second readme",
                "requires": ["web-server"],
                "ops": [{"type": "templateRender", "from": "README.md.hbs", "to": "README.md"}]
            }"#,
        );
        write(&root.join("templates/addons/broken-readme/README.md.hbs"), "# other\n");

        write(&root.join("hexp.toml"), "");
        fs::create_dir_all(root.join("out")).unwrap();
        Self { dir }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn out(&self) -> PathBuf {
        self.root().join("out")
    }

    /// `hexp` isolated from the user's settings and environment.
    fn hexp(&self) -> Command {
        let mut cmd = Command::cargo_bin("hexp").unwrap();
        cmd.current_dir(self.root())
            .env_remove("RUST_LOG")
            .env_remove("HEXP_TEMPLATES__DIR")
            .env("NO_COLOR", "1")
            .arg("--config")
            .arg(self.root().join("hexp.toml"));
        cmd
    }
}

// ============================================================================
// Basics
// ============================================================================

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("hexp").unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn version_matches_package() {
    Command::cargo_bin("hexp").unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_flag_exits_with_usage_error() {
    Command::cargo_bin("hexp").unwrap()
        .args(["list", "--bogus"])
        .assert()
        .code(2);
}

#[test]
fn completions_mention_binary_name() {
    Command::cargo_bin("hexp").unwrap()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hexp"));
}

// ============================================================================
// list
// ============================================================================

#[test]
fn list_shows_bases_and_addons() {
    let sandbox = Sandbox::new();
    sandbox
        .hexp()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("web"))
        .stdout(predicate::str::contains("Web server starter"))
        .stdout(predicate::str::contains("helmet"));
}

#[test]
fn list_json_is_parseable() {
    let sandbox = Sandbox::new();
    let assert = sandbox
        .hexp()
        .args(["list", "--addons", "--format", "json"])
        .assert()
        .success();

    let json: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert!(json.get("bases").is_none());
    let ids: Vec<&str> = json["addons"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["broken-readme", "cors", "drizzle", "helmet", "prisma"]);
}

#[test]
fn list_reports_unreadable_manifests_as_warnings() {
    let sandbox = Sandbox::new();
    write(&sandbox.root().join("templates/addons/bad/manifest.json"), "{ not json");

    sandbox
        .hexp()
        .args(["list", "--format", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cors"))
        .stdout(predicate::str::contains("bad"));
}

#[test]
fn templates_flag_points_elsewhere() {
    let sandbox = Sandbox::new();
    let empty = TempDir::new().unwrap();
    sandbox
        .hexp()
        .args(["list", "--templates"])
        .arg(empty.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No templates found"));
}

// ============================================================================
// validate
// ============================================================================

#[test]
fn validate_accepts_a_clean_selection() {
    let sandbox = Sandbox::new();
    sandbox
        .hexp()
        .args(["validate", "--base", "web", "--addons", "helmet,cors"])
        .assert()
        .success()
        .stdout(predicate::str::contains("cors -> helmet"))
        .stdout(predicate::str::contains("Plan is valid"));
}

#[test]
fn validate_rejects_conflicts_with_exit_code_two() {
    let sandbox = Sandbox::new();
    sandbox
        .hexp()
        .args(["validate", "--base", "web", "--addons", "prisma,drizzle"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Conflicts detected"));
}

#[test]
fn validate_json_carries_every_stage() {
    let sandbox = Sandbox::new();
    let assert = sandbox
        .hexp()
        .args(["validate", "--base", "web", "--addons", "broken-readme", "--format", "json"])
        .assert()
        .code(2);

    let json: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(json["isValid"], Value::Bool(false));
    assert_eq!(json["collisions"]["hasCollisions"], Value::Bool(true));
    assert_eq!(json["collisions"]["collisions"][0]["file"], "README.md");
    assert_eq!(json["compatibility"]["isCompatible"], Value::Bool(true));
}

#[test]
fn unknown_base_exits_with_not_found() {
    let sandbox = Sandbox::new();
    sandbox
        .hexp()
        .args(["validate", "--base", "ghost"])
        .assert()
        .code(3);
}

// ============================================================================
// create
// ============================================================================

#[test]
fn create_writes_the_project() {
    let sandbox = Sandbox::new();
    sandbox
        .hexp()
        .args(["create", "--base", "web", "--addons", "helmet,cors", "--name", "shop", "--yes", "--output"])
        .arg(sandbox.out())
        .assert()
        .success();

    let project = sandbox.out().join("shop");
    assert_eq!(
        fs::read_to_string(project.join("src/index.ts")).unwrap(),
        "// plugins\nuse(cors())\nlisten()\n"
    );
    assert_eq!(
        fs::read_to_string(project.join("README.md")).unwrap(),
        "# shop\nPort 3000 (single)\n"
    );
    let package: Value =
        serde_json::from_str(&fs::read_to_string(project.join("package.json")).unwrap()).unwrap();
    assert_eq!(package["name"], "web");
    assert_eq!(package["dependencies"]["helmet"], "^7");
}

#[test]
fn create_uses_vars_and_project_type_flags() {
    let sandbox = Sandbox::new();
    sandbox
        .hexp()
        .args(["create", "--base", "web", "--name", "api", "--monorepo", "--var", "port=8080", "--yes", "-o"])
        .arg(sandbox.out())
        .assert()
        .success();

    assert_eq!(
        fs::read_to_string(sandbox.out().join("api/README.md")).unwrap(),
        "# api\nPort 8080 (monorepo)\n"
    );
}

#[test]
fn create_reads_settings_file() {
    let sandbox = Sandbox::new();
    let settings = sandbox.root().join("project.yaml");
    write(
        &settings,
        "base: web\naddons:\n  - cors\nname: from-file\nvariables:\n  port: 4000\n",
    );

    sandbox
        .hexp()
        .args(["create", "--yes", "--from"])
        .arg(&settings)
        .arg("--output")
        .arg(sandbox.out())
        .assert()
        .success();

    let readme = fs::read_to_string(sandbox.out().join("from-file/README.md")).unwrap();
    assert_eq!(readme, "# from-file\nPort 4000 (single)\n");
}

#[test]
fn dry_run_writes_nothing() {
    let sandbox = Sandbox::new();
    sandbox
        .hexp()
        .args(["create", "--base", "web", "--addons", "helmet,cors", "--name", "shop", "--dry-run", "--output"])
        .arg(sandbox.out())
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry run completed"))
        .stdout(predicate::str::contains("cors: CORS (1 operations)"));

    assert!(!sandbox.out().join("shop").exists());
}

#[test]
fn existing_directory_is_refused() {
    let sandbox = Sandbox::new();
    fs::create_dir_all(sandbox.out().join("shop")).unwrap();

    sandbox
        .hexp()
        .args(["create", "--base", "web", "--name", "shop", "--yes", "--output"])
        .arg(sandbox.out())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn invalid_name_is_refused_before_anything_runs() {
    let sandbox = Sandbox::new();
    sandbox
        .hexp()
        .args(["create", "--base", "web", "--name", "My App", "--yes", "--output"])
        .arg(sandbox.out())
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "only lowercase letters, numbers, and hyphens",
        ));

    assert_eq!(fs::read_dir(sandbox.out()).unwrap().count(), 0);
}

#[test]
fn invalid_plan_touches_no_disk() {
    let sandbox = Sandbox::new();
    sandbox
        .hexp()
        .args(["create", "--base", "web", "--addons", "prisma,drizzle", "--name", "shop", "--yes", "--output"])
        .arg(sandbox.out())
        .assert()
        .code(2);

    assert!(!sandbox.out().join("shop").exists());
}

#[test]
fn failed_run_leaves_partial_output_unless_cleanup_requested() {
    let sandbox = Sandbox::new();
    write(
        &sandbox.root().join("templates/addons/routes/manifest.json"),
        r#"{
            "id": "routes", "type": "addon", "name": "Routes", "description": "Routes",
            "requires": ["web-server"],
            "ops": [{"type": "textInsert", "target": "src/missing.ts", "marker": "//", "content": "x"}]
        }"#,
    );

    sandbox
        .hexp()
        .args(["create", "--base", "web", "--addons", "routes", "--name", "kept", "--yes", "--output"])
        .arg(sandbox.out())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Target file does not exist: src/missing.ts"));
    assert!(sandbox.out().join("kept/package.json").exists());

    sandbox
        .hexp()
        .args(["create", "--base", "web", "--addons", "routes", "--name", "gone", "--yes", "--clean-on-failure", "--output"])
        .arg(sandbox.out())
        .assert()
        .failure();
    assert!(!sandbox.out().join("gone").exists());
}

// ============================================================================
// config
// ============================================================================

#[test]
fn config_get_reads_settings_file() {
    let sandbox = Sandbox::new();
    fs::write(
        sandbox.root().join("hexp.toml"),
        "[defaults]\nproject_type = \"monorepo\"\n",
    )
    .unwrap();

    sandbox
        .hexp()
        .args(["config", "get", "defaults.project_type"])
        .assert()
        .success()
        .stdout(predicate::str::diff("monorepo\n"));
}

#[test]
fn config_get_unknown_key_is_configuration_error() {
    let sandbox = Sandbox::new();
    sandbox
        .hexp()
        .args(["config", "get", "nope"])
        .assert()
        .code(4);
}

#[test]
fn missing_settings_file_is_configuration_error() {
    let sandbox = Sandbox::new();
    let mut cmd = Command::cargo_bin("hexp").unwrap();
    cmd.current_dir(sandbox.root())
        .args(["--config", "absent.toml", "list"])
        .assert()
        .code(4);
}

#[test]
fn environment_overrides_templates_dir() {
    let sandbox = Sandbox::new();
    sandbox
        .hexp()
        .env("HEXP_TEMPLATES__DIR", "/somewhere/else")
        .args(["config", "get", "templates.dir"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/somewhere/else"));
}

#[test]
fn init_local_writes_dot_file() {
    let sandbox = Sandbox::new();
    sandbox.hexp().args(["init", "--local"]).assert().success();

    let written = fs::read_to_string(sandbox.root().join(".hexp.toml")).unwrap();
    assert!(written.contains("[templates]"));
}
