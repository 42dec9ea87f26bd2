//! End-to-end tests for the command handlers, driven through a scripted
//! runner instead of a real X server.

use std::fs;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use gtk_titlebar::cli::Cli;
use gtk_titlebar::execute;
use gtk_titlebar_exec::{argv, TableRunner};

const EDITOR: &str = "/usr/share/code/code";

fn set_variant(window: &str, variant: &str) -> Vec<String> {
    argv([
        "xprop",
        "-id",
        window,
        "-f",
        "_GTK_THEME_VARIANT",
        "8u",
        "-set",
        "_GTK_THEME_VARIANT",
        variant,
    ])
}

/// Two windows: 0x1 owned by the editor, 0x2 owned by something else.
fn desktop() -> TableRunner {
    TableRunner::new()
        .respond(argv(["pidof", EDITOR]), "3394 3283")
        .respond(
            argv(["xprop", "-root", "_NET_CLIENT_LIST"]),
            "_NET_CLIENT_LIST(WINDOW): window id # 0x1, 0x2",
        )
        .respond(argv(["xprop", "-id", "0x1", "_NET_WM_PID"]), "_NET_WM_PID(CARDINAL) = 3394")
        .respond(argv(["xprop", "-id", "0x2", "_NET_WM_PID"]), "_NET_WM_PID(CARDINAL) = 1564")
        .respond(set_variant("0x1", "light"), "")
        .respond(set_variant("0x1", "dark"), "")
}

fn run(args: &[&str], runner: &TableRunner) -> String {
    let cli = Cli::try_parse_from(std::iter::once("gtk-titlebar").chain(args.iter().copied()))
        .unwrap();
    let mut out = Vec::new();
    execute(cli.command, runner, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn write(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

fn set_commands(runner: &TableRunner) -> Vec<Vec<String>> {
    runner
        .calls()
        .into_iter()
        .filter(|cmd| cmd.iter().any(|arg| arg == "-set"))
        .collect()
}

#[test]
fn resolve_from_settings_and_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let settings = write(
        dir.path(),
        "settings.json",
        r#"{
            // editor settings
            "gtkTitleBar.mode": "auto",
            "workbench.colorTheme": "Monokai",
        }"#,
    );
    let catalog = write(
        dir.path(),
        "themes.yaml",
        "- name: Monokai\n  variant: dark\n- name: Tomorrow\n  variant: light\n",
    );

    let runner = TableRunner::new();
    let out = run(&["resolve", "--settings", &settings, "--catalog", &catalog], &runner);
    assert_eq!(out, "dark\n");
    assert!(runner.calls().is_empty());
}

#[test]
fn resolve_with_overrides() {
    let runner = TableRunner::new();
    assert_eq!(run(&["resolve", "--mode", "dark"], &runner), "dark\n");
    assert_eq!(run(&["resolve", "--mode", "sepia"], &runner), "light\n");
    assert_eq!(run(&["resolve"], &runner), "light\n");
}

#[test]
fn resolve_from_manifest() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = write(
        dir.path(),
        "package.json",
        r#"{ "contributes": { "themes": [ { "label": "Abyss", "uiTheme": "vs-dark" } ] } }"#,
    );

    let runner = TableRunner::new();
    let out = run(
        &["resolve", "--mode", "auto", "--theme", "Abyss", "--manifest", &manifest],
        &runner,
    );
    assert_eq!(out, "dark\n");
}

#[test]
fn resolve_with_missing_settings_file_uses_defaults() {
    let runner = TableRunner::new();
    let out = run(&["resolve", "--settings", "/nonexistent/settings.json"], &runner);
    assert_eq!(out, "light\n");
}

#[test]
fn resolve_with_missing_catalog_is_an_error() {
    let cli = Cli::try_parse_from([
        "gtk-titlebar",
        "resolve",
        "--catalog",
        "/nonexistent/themes.yaml",
    ])
    .unwrap();
    let mut out = Vec::new();
    let err = execute(cli.command, &TableRunner::new(), &mut out).unwrap_err();
    assert!(format!("{:#}", err).contains("/nonexistent/themes.yaml"));
}

#[test]
fn apply_tags_only_editor_windows() {
    let runner = desktop();
    let out = run(
        &["apply", "--mode", "dark", "--editor", EDITOR, "--xprop", "xprop"],
        &runner,
    );

    assert_eq!(set_commands(&runner), vec![set_variant("0x1", "dark")]);
    assert!(out.contains("to 1 of 2 windows (2 editor processes)"));
}

#[test]
fn set_json_output() {
    let runner = desktop();
    let out = run(
        &["set", "light", "--editor", EDITOR, "--xprop", "xprop", "--output", "json"],
        &runner,
    );

    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["variant"], "light");
    assert_eq!(value["processes"], serde_json::json!([3283, 3394]));
    assert_eq!(value["windows"][0]["status"], "tagged");
    assert_eq!(value["windows"][1]["status"], "foreign_owner");
    assert_eq!(set_commands(&runner), vec![set_variant("0x1", "light")]);
}

/// Replace a file the way editors save: write a sibling, then rename it over.
fn save_atomically(path: &Path, content: &str) {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content).unwrap();
    fs::rename(&tmp, path).unwrap();
}

#[test]
fn watch_reapplies_when_settings_change() {
    let dir = tempfile::tempdir().unwrap();
    let settings = write(dir.path(), "settings.json", r#"{ "gtkTitleBar.mode": "dark" }"#);
    let runner = desktop();

    let out = thread::scope(|scope| {
        scope.spawn(|| {
            // Edit only after the initial apply, so the watcher is already running.
            let deadline = Instant::now() + Duration::from_secs(10);
            while set_commands(&runner).is_empty() && Instant::now() < deadline {
                thread::sleep(Duration::from_millis(10));
            }
            save_atomically(Path::new(&settings), r#"{ "gtkTitleBar.mode": "light" }"#);
        });

        run(
            &[
                "watch",
                "--settings",
                &settings,
                "--editor",
                EDITOR,
                "--xprop",
                "xprop",
                "--settle-ms",
                "50",
                "--max-events",
                "1",
            ],
            &runner,
        )
    });

    assert_eq!(
        set_commands(&runner),
        vec![set_variant("0x1", "dark"), set_variant("0x1", "light")]
    );
    assert_eq!(out.matches("Applied").count(), 2);
}

#[test]
fn watch_keeps_variant_while_settings_are_half_written() {
    let dir = tempfile::tempdir().unwrap();
    let settings = write(dir.path(), "settings.json", r#"{ "gtkTitleBar.mode": "dark" }"#);
    let runner = desktop();

    let out = thread::scope(|scope| {
        scope.spawn(|| {
            let deadline = Instant::now() + Duration::from_secs(10);
            while set_commands(&runner).is_empty() && Instant::now() < deadline {
                thread::sleep(Duration::from_millis(10));
            }
            save_atomically(Path::new(&settings), r#"{ "gtkTitleBar.mode": "#);
        });

        run(
            &[
                "watch",
                "--settings",
                &settings,
                "--editor",
                EDITOR,
                "--xprop",
                "xprop",
                "--settle-ms",
                "50",
                "--max-events",
                "1",
            ],
            &runner,
        )
    });

    assert_eq!(set_commands(&runner), vec![set_variant("0x1", "dark")]);
    assert_eq!(out.matches("Applied").count(), 1);
}

#[test]
fn watch_without_input_files_applies_once() {
    let runner = desktop();
    let out = run(
        &["watch", "--mode", "dark", "--editor", EDITOR, "--xprop", "xprop"],
        &runner,
    );

    assert_eq!(set_commands(&runner), vec![set_variant("0x1", "dark")]);
    assert_eq!(out.matches("Applied").count(), 1);
}
