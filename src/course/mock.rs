//! Placeholder content standing in for a real planning backend.

use chrono::{DateTime, Utc};

use super::{CourseData, CourseOutlineItem, Message, MessageRole};

/// Fixed assistant reply.
pub const DEMO_REPLY: &str = "I understand you'd like to plan a course. This is a demo response. \
In a real implementation, this would connect to an AI service to generate course outlines based on your input.";

/// Title shared by both mock outlines.
pub const COURSE_TITLE: &str = "AI-Powered Course Design with React & Next.js";

/// 2024-04-12T00:00:00Z
const SEED_DAY: i64 = 1_712_880_000;

fn seeded_at(hour: i64, minute: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(SEED_DAY + hour * 3600 + minute * 60, 0).unwrap_or_default()
}

fn seeded_message(id: &str, role: MessageRole, content: &str, hour: i64, minute: i64) -> Message {
    Message {
        id: id.to_string(),
        role,
        content: content.to_string(),
        timestamp: seeded_at(hour, minute),
    }
}

fn item(
    id: &str,
    title: &str,
    description: &str,
    duration: &str,
    week: u32,
    topics: &[&str],
) -> CourseOutlineItem {
    CourseOutlineItem {
        id: id.to_string(),
        title: title.to_string(),
        description: Some(description.to_string()),
        duration: Some(duration.to_string()),
        week: Some(week),
        topics: Some(topics.iter().map(ToString::to_string).collect()),
    }
}

const KICKOFF_TOPICS: &[&str] = &[
    "Define target learner persona",
    "Capture scope with zod-powered schemas",
    "Map conversational UX flows",
];

const INTERFACE_TOPICS: &[&str] = &[
    "Design One Dark Pro inspired UI with Tailwind & shadcn primitives",
    "Structure chat and outline panes in Next.js App Router",
    "Instrument chat state management patterns",
];

const ORCHESTRATION_TOPICS: &[&str] = &[
    "Design system prompts for multi-turn conversation",
    "Stream outline updates with server actions",
    "Build refinement loops with evaluation hooks",
];

/// The four-message history every new session starts with.
pub fn seeded_messages() -> Vec<Message> {
    vec![
        seeded_message(
            "1",
            MessageRole::User,
            "I want to build a course that teaches developers how to co-create outlines with AI.",
            9,
            27,
        ),
        seeded_message(
            "2",
            MessageRole::Assistant,
            "Great! Tell me about your target learners and how you envision supporting them after each module.",
            9,
            27,
        ),
        seeded_message(
            "3",
            MessageRole::User,
            "They already know React. I need structure that shows how to pair UI craft with AI prompts.",
            9,
            29,
        ),
        seeded_message(
            "4",
            MessageRole::Assistant,
            "Understood. I drafted an outline that escalates from foundational UX to advanced AI orchestration. Feel free to iterate further below.",
            9,
            30,
        ),
    ]
}

/// The three-week outline every new session starts with.
pub fn seeded_course() -> CourseData {
    CourseData {
        title: COURSE_TITLE.to_string(),
        outline: vec![
            item(
                "1",
                "Kickoff & Discovery",
                "Set a clear product vision and gather course requirements.",
                "Week 1",
                1,
                KICKOFF_TOPICS,
            ),
            item(
                "2",
                "Interface Foundations",
                "Craft responsive chat surfaces and outline panes.",
                "Week 2",
                2,
                INTERFACE_TOPICS,
            ),
            item(
                "3",
                "AI Orchestration",
                "Integrate AI services that transform chat into structured outlines.",
                "Week 3",
                3,
                ORCHESTRATION_TOPICS,
            ),
        ],
    }
}

/// The two-week outline that replaces the seeded one when the author asks
/// about the course or its outline.
pub fn revised_course() -> CourseData {
    CourseData {
        title: COURSE_TITLE.to_string(),
        outline: vec![
            item(
                "1",
                "Kickoff & Discovery",
                "Overview of course planning fundamentals",
                "2 hours",
                1,
                KICKOFF_TOPICS,
            ),
            item(
                "2",
                "Interface Foundations",
                "Deep dive into advanced concepts",
                "3 hours",
                2,
                INTERFACE_TOPICS,
            ),
        ],
    }
}

/// Whether a prompt asks about the course plan (`course` or `outline`,
/// case-insensitive).
pub fn mentions_outline(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("course") || lower.contains("outline")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_history() {
        let messages = seeded_messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[3].role, MessageRole::Assistant);
        assert_eq!(messages[2].time_label(), "09:29");
        assert_eq!(messages[3].timestamp.to_rfc3339(), "2024-04-12T09:30:00+00:00");
    }

    #[test]
    fn test_seeded_course_has_three_weeks() {
        let course = seeded_course();
        let weeks: Vec<_> = course.outline.iter().filter_map(|i| i.week).collect();
        assert_eq!(weeks, vec![1, 2, 3]);
        assert!(course.outline.iter().all(|i| i.topics.as_ref().map(Vec::len) == Some(3)));
    }

    #[test]
    fn test_revised_course_has_two_weeks() {
        let course = revised_course();
        assert_eq!(course.title, seeded_course().title);
        assert_eq!(course.outline.len(), 2);
        assert_eq!(course.outline[1].duration.as_deref(), Some("3 hours"));
    }

    #[test]
    fn test_mentions_outline() {
        assert!(mentions_outline("Let's build a COURSE"));
        assert!(mentions_outline("update the Outline please"));
        assert!(!mentions_outline("make it friendlier"));
    }
}
