// src/scope/mod.rs
// =============================================================================
// This module decides WHICH URLs the crawler is allowed to touch.
//
// Submodules:
// - normalize: turns an href/src/action value into one canonical absolute URL
// - filter: checks that URL against the domain and the blacklist
//
// Both are pure functions of their inputs - no network, no shared state -
// so every caller (page handlers, the script resolver) gets the same answer.
// =============================================================================

mod filter;
mod normalize;

pub use filter::{with_explicit_scheme, ScopeFilter};
pub use normalize::normalize;
