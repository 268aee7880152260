//! Terminal styling for shep's own messages.
//!
//! Output goes through anstream, which drops the escape codes when the stream is
//! not a terminal and honours `NO_COLOR` and `CLICOLOR_FORCE`. Child process
//! output is never restyled.
//!
//! Styles are used inline: `println!("{SUCCESS}✓ done{SUCCESS:#}")`.

use anstyle::{AnsiColor, Color, Style};

pub use anstream::{eprintln, println};

/// Progress messages (cyan)
pub const INFO: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan)));

/// Completed actions (green)
pub const SUCCESS: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green)));

/// Advisory failures (yellow)
pub const WARNING: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow)));

/// Fatal errors (red)
pub const ERROR: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red)));

/// Table headers
pub const DIM: Style = Style::new().dimmed();
