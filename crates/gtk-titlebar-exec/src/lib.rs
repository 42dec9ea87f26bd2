//! External command execution for gtk-titlebar.
//!
//! Everything gtk-titlebar does to the outside world (asking `pidof` for the
//! editor's processes, asking `xprop` about windows, setting window
//! properties) goes through the single-method [`CommandRunner`] trait. The
//! production implementation is [`SystemRunner`]; tests swap in
//! [`ScriptedRunner`] or [`TableRunner`] and assert on the exact argument
//! vectors that were issued.
//!
//! ```
//! use gtk_titlebar_exec::{argv, CommandRunner, ScriptedRunner};
//!
//! let runner = ScriptedRunner::new()
//!     .expect(argv(["pidof", "/usr/share/code/code"]), "3394 3393");
//!
//! let out = runner.run(&argv(["pidof", "/usr/share/code/code"])).unwrap();
//! assert_eq!(out, "3394 3393");
//! assert!(runner.is_exhausted());
//! ```

mod error;
pub mod runner;
pub mod scripted;

pub use error::{ExecError, Result};
pub use runner::{argv, display_command, tool_available, CommandRunner, SystemRunner};
pub use scripted::{ScriptedRunner, TableRunner};
