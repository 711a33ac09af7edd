//! Operator confirmation before destructive actions.

/// Asks the operator to confirm an action.
pub trait Confirm: Send + Sync {
    /// Whether the operator accepted `prompt`.
    fn confirm(&self, prompt: &str) -> bool;
}

/// Accepts every prompt (`--yes`, scripted runs).
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, prompt: &str) -> bool {
        tracing::debug!(prompt, "Confirmation assumed");
        true
    }
}

/// Declines every prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeNo;

impl Confirm for AssumeNo {
    fn confirm(&self, prompt: &str) -> bool {
        tracing::debug!(prompt, "Confirmation declined");
        false
    }
}
