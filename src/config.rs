//! Application-level configuration constants.

// UI Behavior
/// Delay before a typed term is committed to the search. Zero commits on
/// every keystroke; the in-flight scan is cancelled either way.
pub const SEARCH_DEBOUNCE_MS: u32 = 0;

// Results
pub const MAX_PREVIEWS: usize = 10;

// CSS classes
pub const BLURRED_CLASS: &str = "blurred";
