//! User-facing confirmation messages for tree mutations.
//!
//! These are plain formatting helpers: deterministic, side-effect free, and
//! deliberately free of validation. A boundary layer surfaces the returned
//! text as a flash/toast notice alongside the mutated document.

/// Formats the confirmation shown after a document is moved under a new parent.
///
/// Titles are interpolated as-is; empty strings produce a grammatically odd
/// but well-defined sentence rather than an error.
#[must_use]
pub fn move_notice(child_title: &str, parent_title: &str) -> String {
    format!("You have successfully moved {child_title} to the {parent_title} section.")
}
