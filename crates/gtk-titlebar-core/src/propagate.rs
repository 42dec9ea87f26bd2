//! Propagating a variant to the editor's windows.
//!
//! One propagation runs this protocol, strictly one command at a time:
//!
//! ```text
//! pidof <editor>                                  → process set
//! <tool> -root _NET_CLIENT_LIST                   → window list
//! for each window, in order:
//!     <tool> -id <window> _NET_WM_PID             → owner
//!     owner in process set?
//!         <tool> -id <window> -f _GTK_THEME_VARIANT 8u -set _GTK_THEME_VARIANT <variant>
//! ```
//!
//! The process set and window list are captured once at the start and never
//! re-queried, so every per-window decision is made against the same snapshot.
//! A window is tagged if and only if its owner is in the process set.
//!
//! Failures degrade instead of aborting; see [`WindowStatus`].

use std::collections::BTreeSet;
use std::path::Path;

use gtk_titlebar_exec::{display_command, CommandRunner};
use serde::Serialize;

use crate::variant::Variant;
use crate::xprop;

/// What happened to one window during a propagation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WindowStatus {
    /// The property was set.
    Tagged,
    /// Owned by a process that is not an editor instance; left alone.
    ForeignOwner,
    /// The owner could not be determined; left alone.
    UnknownOwner { reason: String },
    /// Owned by the editor, but setting the property failed.
    Failed { error: String },
}

/// The outcome for one window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WindowOutcome {
    pub window: String,
    pub owner: Option<u32>,
    #[serde(flatten)]
    pub status: WindowStatus,
}

/// Summary of a single propagation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PropagationReport {
    pub variant: Variant,
    /// Editor process ids found by `pidof`.
    pub processes: BTreeSet<u32>,
    /// Per-window outcomes, in client list order.
    pub windows: Vec<WindowOutcome>,
    /// Discovery steps that failed and were treated as empty.
    pub warnings: Vec<String>,
}

impl PropagationReport {
    /// Ids of the windows that were tagged.
    pub fn tagged(&self) -> impl Iterator<Item = &str> {
        self.windows_with(|status| matches!(status, WindowStatus::Tagged))
    }

    /// Ids of editor windows whose property could not be set.
    pub fn failed(&self) -> impl Iterator<Item = &str> {
        self.windows_with(|status| matches!(status, WindowStatus::Failed { .. }))
    }

    /// Ids of windows that were left alone.
    pub fn skipped(&self) -> impl Iterator<Item = &str> {
        self.windows_with(|status| {
            matches!(
                status,
                WindowStatus::ForeignOwner | WindowStatus::UnknownOwner { .. }
            )
        })
    }

    /// True when every editor window was tagged and discovery succeeded.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.failed().next().is_none()
    }

    fn windows_with(&self, pred: fn(&WindowStatus) -> bool) -> impl Iterator<Item = &str> {
        self.windows
            .iter()
            .filter(move |outcome| pred(&outcome.status))
            .map(|outcome| outcome.window.as_str())
    }
}

/// Sets `_GTK_THEME_VARIANT` on every window owned by a running editor.
///
/// # Example
///
/// ```rust
/// use gtk_titlebar_core::{Variant, WindowVariantPropagator};
/// use gtk_titlebar_exec::ScriptedRunner;
///
/// // No editor running and no windows: nothing gets tagged.
/// let runner = ScriptedRunner::new()
///     .expect(vec!["pidof".into(), "/opt/editor/editor".into()], "")
///     .expect(vec!["xprop".into(), "-root".into(), "_NET_CLIENT_LIST".into()], "");
///
/// let report = WindowVariantPropagator::for_editor("xprop", "/opt/editor/editor")
///     .propagate(Variant::Dark, &runner);
/// assert!(report.windows.is_empty());
/// assert!(runner.is_exhausted());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowVariantPropagator {
    tool: String,
    editor_executable: String,
}

impl WindowVariantPropagator {
    /// Propagate to instances of the current executable.
    ///
    /// This is what an editor embedding the crate wants. Falls back to
    /// `argv[0]` when the executable path cannot be determined.
    pub fn new(tool: impl Into<String>) -> Self {
        let editor_executable = std::env::current_exe()
            .map(|path| path.to_string_lossy().into_owned())
            .or_else(|_| std::env::args().next().ok_or(()))
            .unwrap_or_default();
        Self::for_editor(tool, editor_executable)
    }

    /// Propagate to instances of `editor_executable`.
    pub fn for_editor(tool: impl Into<String>, editor_executable: impl AsRef<Path>) -> Self {
        Self {
            tool: tool.into(),
            editor_executable: editor_executable.as_ref().to_string_lossy().into_owned(),
        }
    }

    /// The property tool invoked for window queries (normally `xprop`).
    pub fn tool(&self) -> &str {
        &self.tool
    }

    /// The executable whose instances are targeted.
    pub fn editor_executable(&self) -> &str {
        &self.editor_executable
    }

    /// Run one propagation.
    pub fn propagate<R>(&self, variant: Variant, runner: &R) -> PropagationReport
    where
        R: CommandRunner + ?Sized,
    {
        let mut report = PropagationReport {
            variant,
            ..PropagationReport::default()
        };

        report.processes = self.discover_processes(runner, &mut report.warnings);
        let windows = self.discover_windows(runner, &mut report.warnings);
        tracing::debug!(
            processes = report.processes.len(),
            windows = windows.len(),
            "discovery complete"
        );

        for window in windows {
            let outcome = self.visit(&window, variant, &report.processes, runner);
            report.windows.push(outcome);
        }

        tracing::info!(
            %variant,
            tagged = report.tagged().count(),
            failed = report.failed().count(),
            "propagation finished"
        );
        report
    }

    fn discover_processes<R>(&self, runner: &R, warnings: &mut Vec<String>) -> BTreeSet<u32>
    where
        R: CommandRunner + ?Sized,
    {
        let argv = xprop::pidof_command(&self.editor_executable);
        match runner.run(&argv) {
            Ok(output) => xprop::parse_pid_list(&output),
            Err(e) => {
                // pidof exits non-zero when nothing matches; same as no output.
                tracing::warn!(command = %display_command(&argv), error = %e, "process discovery failed");
                warnings.push(format!("process discovery failed: {}", e));
                BTreeSet::new()
            }
        }
    }

    fn discover_windows<R>(&self, runner: &R, warnings: &mut Vec<String>) -> Vec<String>
    where
        R: CommandRunner + ?Sized,
    {
        let argv = xprop::client_list_command(&self.tool);
        match runner.run(&argv) {
            Ok(output) => xprop::parse_client_list(&output),
            Err(e) => {
                tracing::warn!(command = %display_command(&argv), error = %e, "window discovery failed");
                warnings.push(format!("window discovery failed: {}", e));
                Vec::new()
            }
        }
    }

    fn visit<R>(
        &self,
        window: &str,
        variant: Variant,
        processes: &BTreeSet<u32>,
        runner: &R,
    ) -> WindowOutcome
    where
        R: CommandRunner + ?Sized,
    {
        let owner = match runner.run(&xprop::window_pid_command(&self.tool, window)) {
            Ok(output) => xprop::parse_window_pid(&output).ok_or_else(|| {
                format!("unrecognised {} output: {:?}", xprop::WM_PID, output.trim())
            }),
            Err(e) => Err(e.to_string()),
        };

        let owner = match owner {
            Ok(pid) => pid,
            Err(reason) => {
                tracing::debug!(window, %reason, "skipping window with unknown owner");
                return WindowOutcome {
                    window: window.to_string(),
                    owner: None,
                    status: WindowStatus::UnknownOwner { reason },
                };
            }
        };

        if !processes.contains(&owner) {
            tracing::trace!(window, owner, "skipping foreign window");
            return WindowOutcome {
                window: window.to_string(),
                owner: Some(owner),
                status: WindowStatus::ForeignOwner,
            };
        }

        let status = match runner.run(&xprop::set_variant_command(&self.tool, window, variant)) {
            Ok(_) => {
                tracing::debug!(window, owner, %variant, "tagged window");
                WindowStatus::Tagged
            }
            Err(e) => {
                tracing::warn!(window, owner, error = %e, "failed to set theme variant");
                WindowStatus::Failed {
                    error: e.to_string(),
                }
            }
        };

        WindowOutcome {
            window: window.to_string(),
            owner: Some(owner),
            status,
        }
    }
}

/// Propagate `variant` to instances of the current executable using `tool`.
pub fn propagate<R>(variant: Variant, tool: &str, runner: &R) -> PropagationReport
where
    R: CommandRunner + ?Sized,
{
    WindowVariantPropagator::new(tool).propagate(variant, runner)
}
