//! Two-pane course editor page.

use crate::session::SessionSnapshot;
use crate::theme::ThemeState;

use super::chat::chat_panel;
use super::html::escape;
use super::outline::outline_panel;
use super::shell::{document, theme_switcher};

/// Chat on the left, outline on the right, both kept live over the
/// session's event stream.
pub fn editor_page(snapshot: &SessionSnapshot, theme: &ThemeState) -> String {
    let id = escape(&snapshot.id);
    let toolbar = format!(
        r#"<nav class="flex items-center gap-3 text-sm text-[#ABB2BF]">
    <a href="/dashboard" class="hover:text-white transition-colors">Dashboard</a>
    <a href="/privacy" class="hover:text-white transition-colors">Privacy</a>
    <a href="/terms" class="hover:text-white transition-colors">Terms</a>
    {switcher}
</nav>"#,
        switcher = theme_switcher(theme.preference)
    );
    let chat = chat_panel(&snapshot.id, &snapshot.messages, snapshot.loading, &toolbar);
    let outline = outline_panel(&snapshot.course);

    let content = format!(
        r#"<div class="flex h-screen bg-[#21252B] overflow-hidden" hx-ext="sse" sse-connect="/api/sessions/{id}/events" data-session-id="{id}">
    <div class="flex-1 flex flex-col border-r border-[#3E4451]">{chat}</div>
    <div class="w-96 flex-shrink-0">{outline}</div>
</div>"#
    );
    document("Course Editor", theme, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::mock::{seeded_course, seeded_messages};
    use crate::theme::{OsSignal, ThemePreference};

    #[test]
    fn test_editor_page_reproduces_seed() {
        let snapshot = SessionSnapshot {
            id: "abc".into(),
            messages: seeded_messages(),
            course: seeded_course(),
            loading: false,
        };
        let theme = ThemeState::resolve(ThemePreference::System, OsSignal::Light);
        let html = editor_page(&snapshot, &theme);

        assert!(html.contains(r#"sse-connect="/api/sessions/abc/events""#));
        assert_eq!(html.matches("data-message-id=").count(), 4);
        assert_eq!(html.matches("data-outline-item=").count(), 3);
        for message in &snapshot.messages {
            assert!(html.contains(&escape(&message.content)));
        }
    }
}
