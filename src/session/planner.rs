//! Assistant reply generation.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

use crate::course::CourseData;
use crate::course::mock::{DEMO_REPLY, mentions_outline, revised_course};

/// Delay before the mock assistant answers.
pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_secs(1);

/// An assistant reply, optionally carrying a replacement outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerReply {
    pub content: String,
    pub course: Option<CourseData>,
}

/// Source of assistant replies for a session.
#[async_trait]
pub trait CoursePlanner: Send + Sync + fmt::Debug {
    async fn respond(&self, prompt: &str) -> PlannerReply;
}

/// Planner answering with [`DEMO_REPLY`] after a fixed delay.
///
/// Prompts mentioning the course or its outline also get the revised
/// two-week outline.
#[derive(Debug, Clone)]
pub struct MockPlanner {
    delay: Duration,
}

impl MockPlanner {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for MockPlanner {
    fn default() -> Self {
        Self::new(DEFAULT_REPLY_DELAY)
    }
}

#[async_trait]
impl CoursePlanner for MockPlanner {
    async fn respond(&self, prompt: &str) -> PlannerReply {
        tokio::time::sleep(self.delay).await;
        PlannerReply {
            content: DEMO_REPLY.to_string(),
            course: mentions_outline(prompt).then(revised_course),
        }
    }
}
