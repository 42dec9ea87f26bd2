//! The `gtk-titlebar` command-line host.
//!
//! The binary plays the role an editor extension would: it reads the editor's
//! settings and theme metadata, resolves the variant and hands it to the
//! propagator. All commands take their [`CommandRunner`] from the caller so
//! they can be exercised without an X server.

pub mod cli;
pub mod logging;
pub mod output;
pub mod watch;

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use gtk_titlebar_core::{
    resolve_from_settings, JsonSettings, MapSettings, SettingsReader, ThemeCatalog, VariantSync,
    WindowVariantPropagator, MODE_KEY, THEME_KEY,
};
use gtk_titlebar_exec::{tool_available, CommandRunner, SystemRunner};

use crate::cli::{Cli, Command, InputArgs, TargetArgs};
use crate::output::write_report;
use crate::watch::InputWatcher;

/// Run a parsed command line against the real system.
pub fn run(cli: Cli) -> Result<()> {
    let runner = match &cli.command {
        Command::Resolve { .. } => SystemRunner::new(),
        Command::Apply { target, .. }
        | Command::Set { target, .. }
        | Command::Watch { target, .. } => {
            if !tool_available(&target.xprop) {
                tracing::warn!(tool = %target.xprop, "property tool not found on PATH");
            }
            SystemRunner::new().with_timeout(target.timeout())
        }
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    execute(cli.command, &runner, &mut out)
}

/// Run a command with an explicit runner and output sink.
pub fn execute<R, W>(command: Command, runner: &R, out: &mut W) -> Result<()>
where
    R: CommandRunner + ?Sized,
    W: Write + ?Sized,
{
    match command {
        Command::Resolve { inputs } => {
            let loaded = Inputs::load(&inputs)?;
            let variant = resolve_from_settings(&loaded.settings, loaded.themes.themes());
            writeln!(out, "{}", variant)?;
        }
        Command::Apply { inputs, target } => {
            let loaded = Inputs::load(&inputs)?;
            let variant = resolve_from_settings(&loaded.settings, loaded.themes.themes());
            let report = propagator(&target).propagate(variant, runner);
            write_report(out, &report, target.output)?;
        }
        Command::Set { variant, target } => {
            let report = propagator(&target).propagate(variant.into(), runner);
            write_report(out, &report, target.output)?;
        }
        Command::Watch {
            inputs,
            target,
            settle_ms,
            max_events,
        } => watch(
            &inputs,
            &target,
            Duration::from_millis(settle_ms),
            max_events,
            runner,
            out,
        )?,
    }
    Ok(())
}

fn propagator(target: &TargetArgs) -> WindowVariantPropagator {
    WindowVariantPropagator::for_editor(target.xprop.clone(), &target.editor)
}

/// Apply once, then re-apply whenever an input file change alters the
/// resolved variant.
fn watch<R, W>(
    inputs: &InputArgs,
    target: &TargetArgs,
    settle: Duration,
    max_events: Option<u64>,
    runner: &R,
    out: &mut W,
) -> Result<()>
where
    R: CommandRunner + ?Sized,
    W: Write + ?Sized,
{
    // Watch before the first load so no edit slips in between.
    let watcher = InputWatcher::new(input_paths(inputs), settle).context("watching input files")?;
    let mut sync = VariantSync::new(propagator(target), runner);

    refresh(inputs, target, &mut sync, out)?;
    if watcher.targets().is_empty() {
        tracing::warn!("no input files to watch");
        return Ok(());
    }

    let mut events = 0u64;
    while max_events.map_or(true, |max| events < max) {
        if !watcher.next_change() {
            break;
        }
        events += 1;
        refresh(inputs, target, &mut sync, out)?;
    }
    Ok(())
}

/// Reload the inputs and hand them to `sync`. Inputs that fail to load are
/// skipped, keeping the last applied variant.
fn refresh<R, W>(
    inputs: &InputArgs,
    target: &TargetArgs,
    sync: &mut VariantSync<&R>,
    out: &mut W,
) -> Result<()>
where
    R: CommandRunner + ?Sized,
    W: Write + ?Sized,
{
    match Inputs::reload(inputs) {
        Ok(loaded) => {
            if let Some(report) = sync.refresh(&loaded.settings, loaded.themes.themes()) {
                write_report(out, &report, target.output)?;
                out.flush()?;
            }
        }
        // The file may be mid-write; the next event retries.
        Err(e) => tracing::warn!(error = %format!("{:#}", e), "failed to load inputs, keeping current variant"),
    }
    Ok(())
}

fn input_paths(inputs: &InputArgs) -> impl Iterator<Item = &Path> {
    inputs
        .settings
        .iter()
        .chain(inputs.catalogs.iter())
        .chain(inputs.manifests.iter())
        .map(|path| path.as_path())
}

/// Settings and themes as loaded from the command line.
struct Inputs {
    settings: LayeredSettings,
    themes: ThemeCatalog,
}

impl Inputs {
    fn load(args: &InputArgs) -> Result<Self> {
        let base = args
            .settings
            .as_ref()
            .map(JsonSettings::load_or_empty)
            .unwrap_or_default();
        Self::with_base(args, base)
    }

    /// Like [`Inputs::load`], but a settings file that exists and does not
    /// parse is an error instead of "no settings".
    fn reload(args: &InputArgs) -> Result<Self> {
        let base = match &args.settings {
            Some(path) => JsonSettings::load_if_present(path)
                .with_context(|| format!("loading settings {}", path.display()))?,
            None => JsonSettings::default(),
        };
        Self::with_base(args, base)
    }

    fn with_base(args: &InputArgs, base: JsonSettings) -> Result<Self> {
        let mut overrides = MapSettings::new();
        if let Some(mode) = &args.mode {
            overrides.insert(MODE_KEY, mode.clone());
        }
        if let Some(theme) = &args.theme {
            overrides.insert(THEME_KEY, theme.clone());
        }

        let mut themes = ThemeCatalog::new();
        for path in &args.catalogs {
            let catalog = ThemeCatalog::from_file(path)
                .with_context(|| format!("loading theme catalog {}", path.display()))?;
            themes.extend(catalog);
        }
        for path in &args.manifests {
            let catalog = ThemeCatalog::from_manifest_file(path)
                .with_context(|| format!("loading extension manifest {}", path.display()))?;
            themes.extend(catalog);
        }

        Ok(Self {
            settings: LayeredSettings { overrides, base },
            themes,
        })
    }
}

/// Command-line overrides on top of the settings file.
struct LayeredSettings {
    overrides: MapSettings,
    base: JsonSettings,
}

impl SettingsReader for LayeredSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.overrides.get(key).or_else(|| self.base.get(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gtk_titlebar_core::Variant;

    fn inputs(settings: &Path) -> InputArgs {
        InputArgs {
            settings: Some(settings.to_path_buf()),
            ..InputArgs::default()
        }
    }

    #[test]
    fn load_treats_broken_settings_as_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ \"gtkTitleBar.mode\": \"da").unwrap();

        let loaded = Inputs::load(&inputs(&path)).unwrap();
        assert_eq!(loaded.settings.get(MODE_KEY), None);
    }

    #[test]
    fn reload_rejects_half_written_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ \"gtkTitleBar.mode\": \"da").unwrap();

        let err = Inputs::reload(&inputs(&path)).err().unwrap();
        assert!(format!("{:#}", err).contains("settings.json"));
    }

    #[test]
    fn reload_treats_missing_settings_as_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let mut args = inputs(&dir.path().join("settings.json"));
        args.mode = Some("dark".into());

        let loaded = Inputs::reload(&args).unwrap();
        assert_eq!(
            resolve_from_settings(&loaded.settings, loaded.themes.themes()),
            Variant::Dark
        );
    }
}
