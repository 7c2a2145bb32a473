//! Course outline panel.

use crate::course::{CourseData, CourseOutlineItem};

use super::html::escape;

/// Panel wrapper; its content is replaced whenever the outline changes.
pub fn outline_panel(course: &CourseData) -> String {
    let body = outline(course);
    format!(
        r#"<aside id="course-outline" class="h-screen overflow-y-auto bg-[#21252B] border-l border-[#3E4451]" sse-swap="outline" hx-swap="innerHTML">{body}</aside>"#
    )
}

/// Course title followed by one card per outline item.
pub fn outline(course: &CourseData) -> String {
    let title = escape(&course.title);
    let items: String = course.outline.iter().map(outline_item).collect();
    format!(
        r#"<div class="px-6 py-5 border-b border-[#3E4451]">
    <p class="text-xs uppercase tracking-wide text-[#5C6370]">Course outline</p>
    <h2 class="mt-1 text-lg font-semibold text-[#E0E0E0]">{title}</h2>
</div>
<ol class="p-6 space-y-4">{items}</ol>"#
    )
}

fn outline_item(item: &CourseOutlineItem) -> String {
    let id = escape(&item.id);
    let title = escape(&item.title);
    let week = item
        .week
        .map(|w| {
            format!(
                r#"<span class="rounded-full bg-[#33365D] px-2 py-0.5 text-xs font-semibold text-[#E0E0E0]">Week {w}</span>"#
            )
        })
        .unwrap_or_default();
    let duration = item
        .duration
        .as_deref()
        .map(|d| format!(r#"<span class="text-xs text-[#5C6370]">{}</span>"#, escape(d)))
        .unwrap_or_default();
    let description = item
        .description
        .as_deref()
        .map(|d| format!(r#"<p class="mt-2 text-sm text-[#ABB2BF]">{}</p>"#, escape(d)))
        .unwrap_or_default();
    let topics = item
        .topics
        .as_deref()
        .filter(|t| !t.is_empty())
        .map(|topics| {
            let list: String = topics
                .iter()
                .map(|t| format!("<li>{}</li>", escape(t)))
                .collect();
            format!(
                r#"<ul class="mt-3 list-disc list-inside space-y-1 text-sm text-[#ABB2BF]">{list}</ul>"#
            )
        })
        .unwrap_or_default();

    format!(
        r#"<li class="rounded-lg border border-[#3E4451] bg-[#282C34] p-4" data-outline-item="{id}">
    <div class="flex items-center justify-between gap-2">{week}{duration}</div>
    <h3 class="mt-2 font-semibold text-[#E0E0E0]">{title}</h3>
    {description}{topics}
</li>"#
    )
}
