//! Chat session management.
//!
//! Every open editor page owns one in-memory session holding the message
//! history and the current course outline. Sessions are identified by UUID
//! and are discarded when the page closes or goes idle.
//!
//! # Architecture
//!
//! - [`Session`]: a single page's chat and outline state
//! - [`SessionStore`]: thread-safe store for all active sessions
//! - [`CoursePlanner`]: produces assistant replies; [`MockPlanner`] answers
//!   with canned content after a fixed delay
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use course_craft::session::{MockPlanner, SessionStore};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = SessionStore::new(Arc::new(MockPlanner::default()));
//! let session = store.create_seeded();
//! assert_eq!(session.message_count(), 4);
//!
//! session.send("Let's build a course").unwrap();
//! assert_eq!(session.message_count(), 5);
//! assert!(session.is_loading());
//! # }
//! ```

mod planner;
mod thread;

pub use planner::{CoursePlanner, DEFAULT_REPLY_DELAY, MockPlanner, PlannerReply};
pub use thread::{SendRejected, Session, SessionEvent, SessionSnapshot, SessionStore};
