//! Transport controls.
//!
//! - `surface`: control surface visibility, idle auto-hide, and the
//!   pointer-proximity attraction of the play control
//! - `keys`: stateless keyboard shortcut binding

pub mod keys;
pub mod surface;

pub use keys::{apply_to_clock, bind_key, Command};
pub use surface::{attraction_toward, Attraction, ControlSurface};
