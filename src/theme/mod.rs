//! Theme preference storage and resolution.
//!
//! The stored preference may be `light`, `dark` or `system`. Pages never read
//! it directly: they resolve it against the OS colour-scheme signal into an
//! effective light/dark flag and pick their class strings from a [`Palette`].
//!
//! # Architecture
//!
//! - [`ThemePreference`]: the stored value and its resolution rules
//! - [`ThemeStore`]: observable store over a [`PreferenceBackend`]
//! - [`ThemeTracker`]: follows preference and OS signal, yields the effective theme
//! - [`Palette`]: class strings for the effective theme
//!
//! # Example
//!
//! ```rust
//! use course_craft::theme::{MemoryBackend, ThemePreference, ThemeStore};
//!
//! let store = ThemeStore::new(MemoryBackend::default()).unwrap();
//! assert_eq!(store.current(), ThemePreference::System);
//!
//! store.set(ThemePreference::Dark).unwrap();
//! assert!(store.current().resolve(false));
//! ```

mod palette;
mod preference;
mod store;
mod tracker;

pub use palette::Palette;
pub use preference::{COLOR_SCHEME_HINT, OsSignal, ThemePreference};
pub use store::{FileBackend, MemoryBackend, PREFERENCE_KEY, PreferenceBackend, ThemeStore};
pub use tracker::{ThemeState, ThemeTracker};
