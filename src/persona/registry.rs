//! Persona registry: label to system prompt lookup with a neutral fallback.

use super::types::Persona;

/// Prompt used when the submitted label matches no persona.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Registry of the personas offered on the form.
///
/// Contents are fixed at compile time; adding a persona means adding a
/// `Persona` variant.
#[derive(Debug, Clone, Copy, Default)]
pub struct PersonaRegistry;

impl PersonaRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Resolve an exact label or slug to a persona.
    pub fn resolve(&self, label: &str) -> Option<Persona> {
        Persona::from_key(label)
    }

    /// System prompt for `label`. Unknown labels get [`DEFAULT_SYSTEM_PROMPT`].
    pub fn lookup(&self, label: &str) -> &'static str {
        self.resolve(label)
            .map(|p| p.system_prompt())
            .unwrap_or(DEFAULT_SYSTEM_PROMPT)
    }

    /// The persona preselected on a fresh form.
    pub fn default_persona(&self) -> Persona {
        Persona::all()[0]
    }

    /// List all personas in display order.
    pub fn list_available(&self) -> Vec<PersonaListing> {
        Persona::all()
            .iter()
            .map(|p| PersonaListing {
                persona: *p,
                label: p.label(),
                slug: p.slug(),
                description: p.description(),
            })
            .collect()
    }
}

/// Summary of an available persona.
#[derive(Debug, Clone)]
pub struct PersonaListing {
    pub persona: Persona,
    pub label: &'static str,
    pub slug: &'static str,
    pub description: &'static str,
}
