//! Chat session state and session storage.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, WaitForCancellationFutureOwned};
use tracing::{debug, info};
use uuid::Uuid;

use super::planner::{CoursePlanner, PlannerReply};
use crate::course::mock::{seeded_course, seeded_messages};
use crate::course::{CourseData, Message};

/// Default idle timeout before a session is discarded (30 minutes).
pub(crate) const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(30 * 60);

const EVENT_CAPACITY: usize = 64;

/// A change to a session, broadcast to open pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    MessageAppended { message: Message },
    LoadingChanged { loading: bool },
    CourseReplaced { course: CourseData },
}

/// Reasons a submission is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SendRejected {
    #[error("message is empty")]
    Empty,
    #[error("a reply is already in flight")]
    InFlight,
}

/// Point-in-time copy of a session's state.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub id: String,
    pub messages: Vec<Message>,
    pub course: CourseData,
    pub loading: bool,
}

/// A single editor page's chat and outline state.
///
/// Cloning is cheap and clones share state.
#[derive(Debug, Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

#[derive(Debug)]
struct SessionInner {
    id: String,
    messages: RwLock<Vec<Message>>,
    course: RwLock<CourseData>,
    in_flight: AtomicBool,
    planner: Arc<dyn CoursePlanner>,
    events: broadcast::Sender<SessionEvent>,
    /// Cancelled when the session is closed; each reply runs under a child.
    closed: CancellationToken,
    last_activity: RwLock<DateTime<Utc>>,
}

impl Session {
    fn new(
        id: String,
        planner: Arc<dyn CoursePlanner>,
        messages: Vec<Message>,
        course: CourseData,
    ) -> Self {
        let now = Utc::now();
        let (events, _rx) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(SessionInner {
                id,
                messages: RwLock::new(messages),
                course: RwLock::new(course),
                in_flight: AtomicBool::new(false),
                planner,
                events,
                closed: CancellationToken::new(),
                last_activity: RwLock::new(now),
            }),
        }
    }

    /// Get the session ID.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.inner.id
    }

    /// Submit author input.
    ///
    /// The trimmed text is appended as a user message right away and a reply
    /// is requested from the planner in a background task. Must be called
    /// from within a Tokio runtime.
    pub fn send(&self, text: &str) -> Result<Message, SendRejected> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SendRejected::Empty);
        }
        if self
            .inner
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SendRejected::InFlight);
        }

        let message = Message::user(text);
        self.push_message(message.clone());
        self.emit(SessionEvent::LoadingChanged { loading: true });
        self.spawn_reply(text.to_string());

        info!(
            name: "chat.message.sent",
            session_id = %self.inner.id,
            message_id = %message.id,
            "User message accepted"
        );
        Ok(message)
    }

    fn spawn_reply(&self, prompt: String) {
        let session = self.clone();
        let token = self.inner.closed.child_token();
        tokio::spawn(async move {
            let reply = tokio::select! {
                biased;
                () = token.cancelled() => {
                    debug!(name: "chat.reply.cancelled", session_id = %session.inner.id, "Reply cancelled");
                    return;
                }
                reply = session.inner.planner.respond(&prompt) => reply,
            };
            session.complete(reply);
        });
    }

    fn complete(&self, reply: PlannerReply) {
        if self.is_closed() {
            return;
        }
        self.push_message(Message::assistant(reply.content));
        self.inner.in_flight.store(false, Ordering::Release);
        self.emit(SessionEvent::LoadingChanged { loading: false });

        if let Some(course) = reply.course {
            info!(
                name: "chat.course.replaced",
                session_id = %self.inner.id,
                items = course.outline.len(),
                "Course outline replaced"
            );
            self.set_course(course);
        }
    }

    fn push_message(&self, message: Message) {
        let mut guard = self.inner.messages.write().unwrap();
        guard.push(message.clone());
        drop(guard);
        self.touch();
        self.emit(SessionEvent::MessageAppended { message });
    }

    /// Replace the course data wholesale.
    pub(crate) fn set_course(&self, course: CourseData) {
        let mut guard = self.inner.course.write().unwrap();
        *guard = course.clone();
        drop(guard);
        self.touch();
        self.emit(SessionEvent::CourseReplaced { course });
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine: nobody is watching the page.
        let _ = self.inner.events.send(event);
    }

    /// Get all messages in the conversation.
    #[must_use]
    pub fn messages(&self) -> Vec<Message> {
        self.inner.messages.read().unwrap().clone()
    }

    /// Get the number of messages in the conversation.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.inner.messages.read().unwrap().len()
    }

    /// Get the current course data.
    #[must_use]
    pub fn course(&self) -> CourseData {
        self.inner.course.read().unwrap().clone()
    }

    /// Whether a reply is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.inner.in_flight.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.inner.id.clone(),
            messages: self.messages(),
            course: self.course(),
            loading: self.is_loading(),
        }
    }

    /// Subscribe to changes of this session.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    /// Close the session, cancelling any reply still in flight.
    pub fn close(&self) {
        if !self.inner.closed.is_cancelled() {
            self.inner.closed.cancel();
            debug!(name: "chat.session.closed", session_id = %self.inner.id, "Session closed");
        }
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.closed.is_cancelled()
    }

    /// Resolves once the session is closed.
    #[must_use]
    pub fn closed(&self) -> WaitForCancellationFutureOwned {
        self.inner.closed.clone().cancelled_owned()
    }

    /// Update the last activity timestamp.
    fn touch(&self) {
        let mut guard = self.inner.last_activity.write().unwrap();
        *guard = Utc::now();
    }

    /// Whether an open page is subscribed to this session.
    #[must_use]
    pub fn is_watched(&self) -> bool {
        self.inner.events.receiver_count() > 0
    }

    /// Check if the session has been idle longer than `timeout`.
    ///
    /// A session with an open page never expires.
    #[must_use]
    pub fn is_expired_with_timeout(&self, timeout: Duration) -> bool {
        if self.is_watched() {
            return false;
        }
        let last = *self.inner.last_activity.read().unwrap();
        match (Utc::now() - last).to_std() {
            Ok(idle) => idle > timeout,
            // Negative: clock skew, "last" is in the future.
            Err(_) => false,
        }
    }
}

/// Thread-safe store for sessions.
#[derive(Debug, Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

#[derive(Debug)]
struct SessionStoreInner {
    sessions: RwLock<HashMap<String, Session>>,
    planner: Arc<dyn CoursePlanner>,
}

impl SessionStore {
    /// Create a new session store whose sessions reply through `planner`.
    #[must_use]
    pub fn new(planner: Arc<dyn CoursePlanner>) -> Self {
        Self {
            inner: Arc::new(SessionStoreInner {
                sessions: RwLock::new(HashMap::new()),
                planner,
            }),
        }
    }

    /// Create an empty session.
    #[must_use]
    pub fn create(&self) -> Session {
        self.insert(Vec::new(), seeded_course())
    }

    /// Create a session seeded with the mock history and outline.
    #[must_use]
    pub fn create_seeded(&self) -> Session {
        self.insert(seeded_messages(), seeded_course())
    }

    fn insert(&self, messages: Vec<Message>, course: CourseData) -> Session {
        let id = Uuid::new_v4().to_string();
        let session = Session::new(id.clone(), Arc::clone(&self.inner.planner), messages, course);
        self.inner
            .sessions
            .write()
            .unwrap()
            .insert(id, session.clone());
        session
    }

    /// Get a session by ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Session> {
        self.inner.sessions.read().unwrap().get(id).cloned()
    }

    /// Remove and close a session by ID.
    pub fn remove(&self, id: &str) -> Option<Session> {
        let removed = self.inner.sessions.write().unwrap().remove(id);
        if let Some(session) = &removed {
            session.close();
        }
        removed
    }

    /// Get the number of active sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.sessions.read().unwrap().len()
    }

    /// Check if there are no sessions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// List all session IDs.
    #[must_use]
    pub fn list_ids(&self) -> Vec<String> {
        self.inner
            .sessions
            .read()
            .unwrap()
            .keys()
            .cloned()
            .collect()
    }

    /// Remove all sessions idle for longer than the default timeout.
    pub fn cleanup_expired(&self) -> usize {
        self.cleanup_expired_with_timeout(DEFAULT_SESSION_TIMEOUT)
    }

    /// Remove and close sessions that have been inactive longer than the
    /// timeout and have no open page.
    ///
    /// Returns the number of sessions removed.
    pub fn cleanup_expired_with_timeout(&self, timeout: Duration) -> usize {
        let mut guard = self.inner.sessions.write().unwrap();
        let before = guard.len();
        guard.retain(|_, session| {
            let expired = session.is_expired_with_timeout(timeout);
            if expired {
                session.close();
            }
            !expired
        });
        before - guard.len()
    }

    /// Periodically discard idle sessions until `cancel` fires.
    pub fn spawn_sweeper(
        &self,
        timeout: Duration,
        every: Duration,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every.max(Duration::from_millis(1)));
            loop {
                tokio::select! {
                    () = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        let removed = store.cleanup_expired_with_timeout(timeout);
                        if removed > 0 {
                            info!(name: "chat.session.expired", removed, "Idle sessions removed");
                        }
                    }
                }
            }
        })
    }
}
