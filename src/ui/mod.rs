//! Server-rendered pages and fragments.
//!
//! Markup is produced with `format!` templates and Tailwind class strings.
//! Fragments that change while a page is open (message list, composer,
//! outline) are rendered by the same functions the full page uses, so a
//! fragment pushed over SSE is identical to the initial render.
//!
//! # Structure
//!
//! - [`shell`]: document shell and the not-found page
//! - [`chat`]: chat panel (message list, loading bubble, composer)
//! - [`outline`]: course outline panel
//! - [`editor`]: two-pane editor page combining chat and outline
//! - [`dashboard`]: mock dashboard
//! - [`legal`]: privacy policy and terms of service

pub mod chat;
pub mod dashboard;
pub mod editor;
pub mod legal;
pub mod outline;
pub mod shell;

mod html;

pub use html::escape;
