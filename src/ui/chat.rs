//! Chat panel.

use chrono::Utc;

use crate::course::{Message, MessageRole};

use super::html::{bot_icon, escape, send_icon};

const BUBBLE_ASSISTANT: &str = "bg-[#1D2434] text-[#E0E0E0] border border-[#252C3C]";
const BUBBLE_USER: &str =
    "bg-[#33365D] text-[#E0E0E0] border border-[#444985] shadow-[0_4px_8px_rgba(139,92,246,0.15)]";

/// Full chat panel: header, message list and composer.
///
/// `toolbar` is trusted markup placed at the end of the header.
pub fn chat_panel(session_id: &str, messages: &[Message], loading: bool, toolbar: &str) -> String {
    let list = message_list(messages, loading);
    let form = composer(session_id, loading);
    format!(
        r#"<div class="flex flex-col h-screen bg-[#282C34]">
    <div class="border-b border-[#3E4451] px-6 py-5 flex items-center justify-between gap-4">
        <h1 class="text-2xl font-semibold text-[#E0E0E0]">Chat your way to a course outline</h1>
        {toolbar}
    </div>
    <div id="chat-history" class="flex-1 overflow-y-auto p-6 space-y-6" sse-swap="messages" hx-swap="innerHTML">{list}</div>
    <div id="composer" class="border-t border-[#3E4451] bg-[#1E2025] p-4" sse-swap="composer" hx-swap="innerHTML">{form}</div>
</div>"#
    )
}

/// Message history, or the placeholder when there is none.
///
/// Ends with the scroll anchor the client script keeps in view.
pub fn message_list(messages: &[Message], loading: bool) -> String {
    if messages.is_empty() {
        let icon = bot_icon("w-12 h-12 mx-auto text-[#5C6370] mb-4");
        return format!(
            r#"<div class="flex items-center justify-center h-full">
    <div class="text-center space-y-2">
        {icon}
        <p class="text-[#5C6370] text-lg">Start a conversation to plan your course</p>
    </div>
</div>"#
        );
    }

    let mut out: String = messages.iter().map(message_bubble).collect();
    if loading {
        out.push_str(&loading_bubble());
    }
    out.push_str(r#"<div id="messages-end"></div>"#);
    out
}

fn message_bubble(message: &Message) -> String {
    let (align, bubble) = match message.role {
        MessageRole::User => ("items-end", BUBBLE_USER),
        MessageRole::Assistant => ("items-start", BUBBLE_ASSISTANT),
    };
    let id = escape(&message.id);
    let role = message.role.label();
    let time = message.time_label();
    let content = escape(&message.content);

    format!(
        r#"<div class="flex flex-col gap-2 {align}" data-message-id="{id}">
    <div class="max-w-[85%]">
        <div class="rounded-lg px-4 py-3 {bubble}">
            <div class="flex items-center justify-between mb-2">
                <span class="text-xs font-bold text-[#E0E0E0] uppercase">{role}</span>
                <span class="text-xs font-bold text-[#E0E0E0]">{time}</span>
            </div>
            <p class="text-sm leading-relaxed whitespace-pre-wrap break-words">{content}</p>
        </div>
    </div>
</div>"#
    )
}

/// Assistant bubble with three bouncing dots, shown while a reply is pending.
fn loading_bubble() -> String {
    let time = Utc::now().format("%H:%M");
    let dots: String = [0, 150, 300]
        .iter()
        .map(|delay| {
            format!(
                r#"<span class="w-2 h-2 bg-[#ABB2BF] rounded-full animate-bounce" style="animation-delay: {delay}ms"></span>"#
            )
        })
        .collect();

    format!(
        r#"<div class="flex flex-col gap-2 items-start" data-loading="true">
    <div class="max-w-[85%]">
        <div class="{BUBBLE_ASSISTANT} rounded-lg px-4 py-3">
            <div class="flex items-center justify-between mb-2">
                <span class="text-xs font-bold text-[#E0E0E0] uppercase">ASSISTANT</span>
                <span class="text-xs font-bold text-[#E0E0E0]">{time}</span>
            </div>
            <div class="flex gap-1">{dots}</div>
        </div>
    </div>
</div>"#
    )
}

/// Input form. Disabled while a reply is in flight.
pub fn composer(session_id: &str, loading: bool) -> String {
    let session_id = escape(session_id);
    let disabled = if loading { " disabled" } else { "" };
    let icon = send_icon("w-4 h-4");

    format!(
        r#"<form class="flex gap-2 items-center justify-center" hx-post="/api/sessions/{session_id}/messages" hx-swap="none" hx-on--after-request="if (event.detail.successful) this.reset()">
    <textarea name="message" placeholder="Ask for a new module, change tone, or request more detail..." rows="2"{disabled} class="w-[90%] rounded-xl border border-[#3E4451] bg-[#595959] px-5 py-4 text-sm text-white placeholder:text-[#B0B0B0] focus-visible:outline-none disabled:cursor-not-allowed disabled:opacity-50 resize-none"></textarea>
    <button type="submit"{disabled} class="inline-flex items-center justify-center rounded-md h-10 px-4 bg-[#E0E0E0] text-[#282C34] hover:bg-[#C0C0C0] disabled:pointer-events-none disabled:opacity-50">
        <span class="sr-only">Send</span>
        {icon}
    </button>
</form>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::mock::seeded_messages;

    #[test]
    fn test_empty_list_shows_placeholder() {
        let html = message_list(&[], false);
        assert!(html.contains("Start a conversation to plan your course"));
        assert!(!html.contains("messages-end"));
    }

    #[test]
    fn test_messages_render_with_roles() {
        let html = message_list(&seeded_messages(), false);
        assert_eq!(html.matches("data-message-id=").count(), 4);
        assert_eq!(html.matches(">YOU<").count(), 2);
        assert_eq!(html.matches(">ASSISTANT<").count(), 2);
        assert!(html.contains(">09:30<"));
        assert!(html.ends_with(r#"<div id="messages-end"></div>"#));
        assert!(!html.contains("animate-bounce"));
    }

    #[test]
    fn test_loading_bubble_shown_while_in_flight() {
        let html = message_list(&seeded_messages(), true);
        assert_eq!(html.matches("animate-bounce").count(), 3);
    }

    #[test]
    fn test_content_is_escaped() {
        let msg = Message::user("<script>alert(1)</script>");
        let html = message_list(&[msg], false);
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_composer_disabled_while_loading() {
        assert_eq!(composer("abc", false).matches(" disabled class=").count(), 0);
        let html = composer("abc", true);
        assert_eq!(html.matches(" disabled class=").count(), 2);
        assert!(html.contains(r#"hx-post="/api/sessions/abc/messages""#));
    }
}
