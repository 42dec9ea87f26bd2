//! The textual protocol spoken with `pidof` and `xprop`.
//!
//! Command builders produce the exact argument vectors the propagator issues;
//! parsers turn the tools' output back into values. The parsers never fail:
//! anything they do not recognise yields an empty result.
//!
//! ```text
//! $ pidof /usr/share/code/code
//! 3394 3393 3328
//! $ xprop -root _NET_CLIENT_LIST
//! _NET_CLIENT_LIST(WINDOW): window id # 0x260000a, 0x260000b
//! $ xprop -id 0x260000a _NET_WM_PID
//! _NET_WM_PID(CARDINAL) = 3394
//! ```

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::variant::Variant;

/// Root window property listing managed top-level windows.
pub const CLIENT_LIST: &str = "_NET_CLIENT_LIST";

/// Per-window property holding the owning process id.
pub const WM_PID: &str = "_NET_WM_PID";

/// Per-window property read by GTK decorations.
pub const THEME_VARIANT: &str = "_GTK_THEME_VARIANT";

/// Text preceding the window ids in `_NET_CLIENT_LIST` output.
const WINDOW_ID_MARKER: &str = "window id #";

static WINDOW_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0x[0-9a-fA-F]+$").expect("window id pattern is valid"));

static WINDOW_PID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"_NET_WM_PID\(CARDINAL\)\s*=\s*(\d+)").expect("window pid pattern is valid")
});

/// `pidof <executable>`
pub fn pidof_command(executable: &str) -> Vec<String> {
    vec!["pidof".to_string(), executable.to_string()]
}

/// `<tool> -root _NET_CLIENT_LIST`
pub fn client_list_command(tool: &str) -> Vec<String> {
    vec![tool.to_string(), "-root".to_string(), CLIENT_LIST.to_string()]
}

/// `<tool> -id <window> _NET_WM_PID`
pub fn window_pid_command(tool: &str, window: &str) -> Vec<String> {
    vec![
        tool.to_string(),
        "-id".to_string(),
        window.to_string(),
        WM_PID.to_string(),
    ]
}

/// `<tool> -id <window> -f _GTK_THEME_VARIANT 8u -set _GTK_THEME_VARIANT <variant>`
pub fn set_variant_command(tool: &str, window: &str, variant: Variant) -> Vec<String> {
    vec![
        tool.to_string(),
        "-id".to_string(),
        window.to_string(),
        "-f".to_string(),
        THEME_VARIANT.to_string(),
        "8u".to_string(),
        "-set".to_string(),
        THEME_VARIANT.to_string(),
        variant.as_str().to_string(),
    ]
}

/// Parse `pidof` output: whitespace-separated decimal process ids.
/// Tokens that are not process ids are ignored.
pub fn parse_pid_list(output: &str) -> BTreeSet<u32> {
    output
        .split_whitespace()
        .filter_map(|token| token.parse().ok())
        .collect()
}

/// Parse `_NET_CLIENT_LIST` output into window ids, in order.
///
/// Everything on the line after `window id #` is split on commas; only
/// `0x`-prefixed hexadecimal tokens are kept.
pub fn parse_client_list(output: &str) -> Vec<String> {
    let Some(start) = output.find(WINDOW_ID_MARKER) else {
        return Vec::new();
    };
    let rest = &output[start + WINDOW_ID_MARKER.len()..];
    let line = rest.lines().next().unwrap_or_default();

    line.split(',')
        .map(str::trim)
        .filter(|token| WINDOW_ID.is_match(token))
        .map(str::to_string)
        .collect()
}

/// Parse `_NET_WM_PID` output into the owning process id.
pub fn parse_window_pid(output: &str) -> Option<u32> {
    WINDOW_PID
        .captures(output)
        .and_then(|caps| caps.get(1))
        .and_then(|pid| pid.as_str().parse().ok())
}
