//! promptr - terminal teleprompter.
//!
//! Plays a script back token-by-token on a timed schedule, keeping the
//! active token centered in the viewport, with transport controls,
//! live speed adjustment, and an auto-hiding control surface.
//!
//! # Architecture
//!
//! - `script`: tokenization and the edit buffer
//! - `engine`: the playback clock, scroll centering, and the
//!   `Prompter` facade that owns all session state
//! - `controls`: keyboard shortcut binding and the control surface
//!   (pointer attraction, idle auto-hide)
//! - `session`: terminal run loop and rendering
//! - `config`: persistent user defaults (TOML)

pub mod config;
pub mod controls;
pub mod engine;
pub mod script;
pub mod session;

pub use config::Config;
pub use engine::{Prompter, PrompterError, PrompterOptions};
pub use script::tokenize;
