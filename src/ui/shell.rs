//! Document shell shared by every page.

use crate::theme::{ThemePreference, ThemeState};

use super::html::escape;

/// Wrap page content in the HTML document.
///
/// The root element carries the global theme class and the resolved theme
/// state, which the client script uses to swap themed class strings when the
/// preference or the OS colour scheme changes.
pub fn document(title: &str, theme: &ThemeState, content: &str) -> String {
    let title = escape(title);
    let root_class = theme.root_class;
    let preference = theme.preference;
    let state = escape(&serde_json::to_string(theme).unwrap_or_else(|_| "{}".to_string()));

    format!(
        r#"<!DOCTYPE html>
<html lang="en" class="{root_class}" data-theme-preference="{preference}" data-theme-state="{state}">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="Chat your way to a course outline">
    <title>{title} - Course Craft</title>

    <!-- HTMX and Extensions (local) -->
    <script src="/static/vendor/htmx-2.0.8.min.js"></script>
    <script src="/static/vendor/htmx-sse.js"></script>

    <!-- Application bundle -->
    <script type="module" src="/static/course-craft.js"></script>
    <link rel="stylesheet" href="/static/app.css">
</head>
<body class="min-h-screen antialiased">
{content}
</body>
</html>"#
    )
}

/// Light / dark / system picker. Writes go through `PUT /api/theme`; every
/// open page then picks the change up from the theme event stream.
pub fn theme_switcher(current: ThemePreference) -> String {
    let buttons: String = ThemePreference::ALL
        .iter()
        .map(|pref| {
            let active = if *pref == current {
                "bg-[#3E4451] text-white"
            } else {
                "text-[#ABB2BF] hover:text-white"
            };
            format!(
                r#"<button type="button" class="px-3 py-1 rounded-md text-xs capitalize transition-colors {active}" data-theme-option="{pref}" hx-put="/api/theme" hx-vals='{{"preference":"{pref}"}}' hx-swap="none">{pref}</button>"#
            )
        })
        .collect();

    format!(
        r#"<div class="flex items-center gap-1 rounded-lg border border-[#3E4451] p-1" role="group" aria-label="Theme">{buttons}</div>"#
    )
}

/// 404 Not Found page.
pub fn not_found_page(theme: &ThemeState) -> String {
    let bg = theme.palette.background;
    let text = theme.palette.text;
    let content = format!(
        r#"<div class="min-h-screen {bg} flex flex-col items-center justify-center py-20 transition-colors" data-theme-slot="background">
    <h1 class="text-4xl font-bold mb-4 {text}" data-theme-slot="text">404</h1>
    <p class="mb-6 {text}" data-theme-slot="text">Page not found</p>
    <a href="/" class="rounded-md bg-[#E0E0E0] px-4 py-2 text-sm text-[#282C34] hover:bg-[#C0C0C0]">Go Home</a>
</div>"#
    );
    document("Not Found", theme, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::OsSignal;

    #[test]
    fn test_document_carries_root_class() {
        let theme = ThemeState::resolve(ThemePreference::Light, OsSignal::Dark);
        let html = document("Dashboard", &theme, "<p>hi</p>");
        assert!(html.contains(r#"<html lang="en" class="theme-light""#));
        assert!(html.contains("<title>Dashboard - Course Craft</title>"));
        assert!(html.contains("&quot;is_dark&quot;:false"));
    }

    #[test]
    fn test_switcher_marks_current() {
        let html = theme_switcher(ThemePreference::Dark);
        assert_eq!(html.matches("hx-put=\"/api/theme\"").count(), 3);
        assert!(html.contains(r#"bg-[#3E4451] text-white" data-theme-option="dark""#));
    }
}
