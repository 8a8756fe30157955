//! Persona system: the fixed set of expert roles a question can be put to.
//!
//! Each persona maps a display label to the system prompt that shapes the
//! assistant's answer. The set is closed and known at compile time.

pub mod registry;
pub mod types;

pub use registry::PersonaRegistry;
pub use types::Persona;
