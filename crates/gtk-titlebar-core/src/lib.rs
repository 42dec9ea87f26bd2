//! Light/dark variant resolution and X11 title bar propagation.
//!
//! GTK client-side decorations pick their light or dark rendering from the
//! `_GTK_THEME_VARIANT` property of each top-level window. An editor whose
//! color theme is dark still gets a light title bar unless someone sets that
//! property. This crate does two things:
//!
//! 1. **Resolve** the variant an editor should use, from its mode setting
//!    (`light`, `dark` or `auto`) and, in `auto` mode, from the variant of the
//!    active color theme. See [`resolve`] and [`resolve_from_settings`].
//! 2. **Propagate** that variant to every top-level window owned by any
//!    running instance of the editor. See [`WindowVariantPropagator`].
//!
//! # Quick Start
//!
//! ```
//! use gtk_titlebar_core::{resolve, Mode, ThemeInfo, Variant, WindowVariantPropagator};
//! use gtk_titlebar_exec::{argv, TableRunner};
//!
//! let themes = vec![
//!     ThemeInfo::new("Monokai", Variant::Dark),
//!     ThemeInfo::new("Tomorrow", Variant::Light),
//! ];
//! let variant = resolve(&Mode::Auto, &themes, Some("Monokai"));
//! assert_eq!(variant, Variant::Dark);
//!
//! let runner = TableRunner::new()
//!     .respond(argv(["pidof", "/usr/share/code/code"]), "3394")
//!     .respond(
//!         argv(["xprop", "-root", "_NET_CLIENT_LIST"]),
//!         "_NET_CLIENT_LIST(WINDOW): window id # 0x260000a",
//!     )
//!     .respond(
//!         argv(["xprop", "-id", "0x260000a", "_NET_WM_PID"]),
//!         "_NET_WM_PID(CARDINAL) = 3394",
//!     )
//!     .respond(
//!         argv([
//!             "xprop", "-id", "0x260000a", "-f", "_GTK_THEME_VARIANT", "8u",
//!             "-set", "_GTK_THEME_VARIANT", "dark",
//!         ]),
//!         "",
//!     );
//!
//! let report = WindowVariantPropagator::for_editor("xprop", "/usr/share/code/code")
//!     .propagate(variant, &runner);
//! assert_eq!(report.tagged().collect::<Vec<_>>(), vec!["0x260000a"]);
//! ```
//!
//! # Failure Policy
//!
//! Nothing in this crate aborts a propagation part way through. A failed
//! `pidof` yields an empty process set, an unreadable client list yields no
//! windows, and a window whose owner cannot be read or whose property cannot
//! be set is recorded in the [`PropagationReport`] and skipped. The worst case
//! is a title bar that stays stale until the next trigger.

mod error;
pub mod propagate;
pub mod settings;
pub mod sync;
pub mod themes;
pub mod variant;
pub mod xprop;

pub use error::{Result, TitlebarError};
pub use propagate::{propagate, PropagationReport, WindowOutcome, WindowStatus, WindowVariantPropagator};
pub use settings::{JsonSettings, MapSettings, SettingsReader, MODE_KEY, THEME_KEY};
pub use sync::VariantSync;
pub use themes::{ThemeCatalog, ThemeInfo};
pub use variant::{resolve, resolve_from_settings, Mode, Variant};
