//! vkey: Virtual key codes and specs.
//!
//! - `Key`: Enum of the common virtual-key codes delivered by the host input source.
//! - `Modifier`: The co-held modifier keys (shift, control, alt) with conversions to/from `Key`.
//! - Spec helpers: `from_spec` and `to_spec` convert between raw integer codes and
//!   human-readable key names.
//!
//! Bindings store raw `u32` codes rather than `Key` so that hosts may deliver codes that
//! have no name here. Names are only used for display and for parsing user input.

mod key;
pub use key::Key;

mod spec;
pub use spec::{from_spec, to_spec};

mod modifiers;
pub use modifiers::Modifier;

/// Raw physical key code as delivered by the host input source.
pub type KeyCode = u32;
