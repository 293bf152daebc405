//! Wire protocol definitions for the two OFS request shapes.
//!
//! The line-command shape and the JSON envelope shape are not
//! interchangeable: they frame responses differently and their replies have
//! different structure. They are therefore modelled as two named adapters
//! behind the one client facade, selected up front by [`WireShape`] rather
//! than guessed per deployment at runtime.

pub mod envelope;
pub mod line;

/// Which wire shape the client speaks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WireShape {
    /// Plain-text newline-terminated command lines; responses are
    /// concatenated JSON-like fragments framed by an idle window.
    #[default]
    LineCommand,
    /// One-line JSON request and exactly one newline-terminated JSON
    /// response. Stricter framing; prefer it when the server supports it.
    Envelope,
}
