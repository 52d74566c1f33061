use assert_cmd::Command;
use javasym_test_utils::write_sources;
use predicates::prelude::*;

fn javasym() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("javasym"))
}

const SERVICE: &str = r#"package app;

public class Service {
    void pick(Object first, String second) {
    }

    void pick(String first, Object second) {
    }

    static int total(int... values) {
        return 0;
    }
}
"#;

#[test]
fn help_mentions_commands() {
    javasym().arg("--help").assert().success().stdout(
        predicate::str::contains("solve-type")
            .and(predicate::str::contains("solve-method"))
            .and(predicate::str::contains("ancestors")),
    );
}

#[test]
fn solve_type_prints_runtime_class() {
    javasym()
        .args(["solve-type", "java.lang.String"])
        .assert()
        .success()
        .stdout(predicate::str::contains("java.lang.String (class, runtime)"));
}

#[test]
fn solve_type_json() {
    let output = javasym()
        .args(["solve-type", "java.util.List", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["qualified_name"], "java.util.List");
    assert_eq!(report["kind"], "interface");
    assert_eq!(report["type_parameters"], serde_json::json!(["E"]));
}

#[test]
fn unsolved_type_exits_with_one() {
    javasym()
        .args(["solve-type", "com.acme.Missing"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("com.acme.Missing"));
}

#[test]
fn unknown_receiver_type_is_a_failed_query() {
    javasym()
        .args(["solve-method", "com.acme.Missing", "f", "int"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("com.acme.Missing"));

    javasym()
        .args(["ancestors", "com.acme.Missing"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("com.acme.Missing"));
}

#[test]
fn unknown_argument_type_is_a_failed_query() {
    javasym()
        .args(["solve-method", "java.lang.String", "valueOf", "NoSuchArg"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unsolved symbol `NoSuchArg`"));
}

#[test]
fn solve_method_picks_the_widened_overload() {
    javasym()
        .args(["solve-method", "java.lang.Math", "max", "long", "int"])
        .assert()
        .success()
        .stdout(predicate::str::contains("java.lang.Math.max(long, long)"));
}

#[test]
fn ancestors_end_with_object() {
    let output = javasym().args(["ancestors", "java.util.ArrayList"]).output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert!(lines.contains(&"java.util.List<E>"), "{lines:?}");
    assert_eq!(lines.last().copied(), Some("java.lang.Object"));
}

#[test]
fn source_roots_from_flags() {
    let dir = tempfile::tempdir().unwrap();
    write_sources(dir.path(), &[("app/Service.java", SERVICE)]);

    javasym()
        .args(["solve-method", "app.Service", "pick", "String", "String", "--source"])
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ambiguous"));

    javasym()
        .args(["solve-method", "app.Service", "total", "int", "int", "int", "--source"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("static int app.Service.total(int[])"));
}

#[test]
fn source_roots_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    write_sources(&dir.path().join("src"), &[("app/Service.java", SERVICE)]);
    let config = dir.path().join("javasym.toml");
    std::fs::write(&config, "source_roots = [\"src\"]\n\n[logging]\nlevel = \"warn\"\n").unwrap();

    javasym()
        .args(["solve-type", "app.Service", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("app.Service (class, source)"));
}

#[test]
fn bad_config_is_a_setup_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("javasym.toml");
    std::fs::write(&config, "classpath = []\n").unwrap();

    javasym()
        .args(["solve-type", "java.lang.String", "--config"])
        .arg(&config)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("failed to load"));
}
