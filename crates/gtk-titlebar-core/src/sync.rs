//! Keeping window decorations in step with configuration changes.
//!
//! The host calls [`VariantSync::refresh`] on activation and whenever the
//! mode setting, the active theme or the installed themes change. The variant
//! is re-resolved every time; windows are only touched when it differs from
//! the last one applied.

use gtk_titlebar_exec::CommandRunner;

use crate::propagate::{PropagationReport, WindowVariantPropagator};
use crate::settings::SettingsReader;
use crate::themes::ThemeInfo;
use crate::variant::{resolve_from_settings, Variant};

/// Remembers the last applied variant and propagates on change.
#[derive(Debug)]
pub struct VariantSync<R> {
    propagator: WindowVariantPropagator,
    runner: R,
    applied: Option<Variant>,
}

impl<R: CommandRunner> VariantSync<R> {
    pub fn new(propagator: WindowVariantPropagator, runner: R) -> Self {
        Self {
            propagator,
            runner,
            applied: None,
        }
    }

    /// The variant most recently propagated, if any.
    pub fn applied(&self) -> Option<Variant> {
        self.applied
    }

    pub fn propagator(&self) -> &WindowVariantPropagator {
        &self.propagator
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Re-resolve from settings and propagate if the variant changed.
    pub fn refresh<S>(&mut self, settings: &S, themes: &[ThemeInfo]) -> Option<PropagationReport>
    where
        S: SettingsReader + ?Sized,
    {
        let variant = resolve_from_settings(settings, themes);
        self.apply(variant)
    }

    /// Propagate `variant` unless it is already applied.
    pub fn apply(&mut self, variant: Variant) -> Option<PropagationReport> {
        if self.applied == Some(variant) {
            tracing::debug!(%variant, "variant unchanged, skipping propagation");
            return None;
        }
        Some(self.force(variant))
    }

    /// Propagate `variant` unconditionally.
    ///
    /// Useful after new editor windows have opened, since a new window starts
    /// without the property.
    pub fn force(&mut self, variant: Variant) -> PropagationReport {
        let report = self.propagator.propagate(variant, &self.runner);
        self.applied = Some(variant);
        report
    }
}
