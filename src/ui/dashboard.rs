//! Mock dashboard.

use crate::theme::ThemeState;

use super::shell::document;

const CARD: &str = "rounded-2xl border border-white/10 bg-white/5 p-6 shadow-lg shadow-white/5";

struct Stat {
    label: &'static str,
    value: &'static str,
    trend: &'static str,
    trend_class: &'static str,
}

const STATS: &[Stat] = &[
    Stat {
        label: "Active Projects",
        value: "12",
        trend: "+3 this week",
        trend_class: "text-emerald-400",
    },
    Stat {
        label: "Team Messages",
        value: "248",
        trend: "+58 new replies",
        trend_class: "text-sky-400",
    },
    Stat {
        label: "Completion Rate",
        value: "87%",
        trend: "Up 5% this month",
        trend_class: "text-amber-400",
    },
];

const ACTIVITY: &[&str] = &[
    "Design Review",
    "API Integration",
    "AI Prompting Session",
    "QA Regression",
];

/// (title, detail)
const MILESTONES: &[(&str, &str)] = &[
    ("Week 5 Curriculum", "Due Friday • Outline refinement"),
    ("Stakeholder Review", "Monday • Live feedback session"),
    ("Launch Prep", "Next Wednesday • Production checklist"),
];

pub fn dashboard_page(theme: &ThemeState) -> String {
    let stats: String = STATS
        .iter()
        .map(|s| {
            format!(
                r#"<div class="{CARD}">
    <p class="text-sm text-white/60">{label}</p>
    <p class="mt-4 text-4xl font-semibold">{value}</p>
    <p class="mt-2 text-xs {trend_class}">{trend}</p>
</div>"#,
                label = s.label,
                value = s.value,
                trend = s.trend,
                trend_class = s.trend_class,
            )
        })
        .collect();

    let activity: String = ACTIVITY
        .iter()
        .map(|item| {
            format!(
                r#"<div class="flex items-center justify-between rounded-xl border border-white/5 bg-black/40 px-4 py-3">
    <span class="text-sm font-medium">{item}</span>
    <span class="text-xs text-white/50">In Progress</span>
</div>"#
            )
        })
        .collect();

    let milestones: String = MILESTONES
        .iter()
        .map(|(title, detail)| {
            format!(
                r#"<li><p class="font-medium text-white">{title}</p><p class="text-xs text-white/50">{detail}</p></li>"#
            )
        })
        .collect();

    let content = format!(
        r#"<div class="min-h-screen bg-black text-white">
    <header class="border-b border-white/10 px-8 py-6">
        <div class="mx-auto flex max-w-7xl items-center justify-between">
            <div>
                <p class="text-sm uppercase tracking-wide text-white/60">Control Center</p>
                <h1 class="mt-2 text-3xl font-semibold">Dashboard</h1>
            </div>
            <button class="rounded-full bg-white/10 px-4 py-2 text-sm font-medium text-white transition hover:bg-white/20">New Report</button>
        </div>
    </header>
    <main class="mx-auto flex max-w-7xl flex-col gap-8 px-8 py-10">
        <section class="grid gap-6 md:grid-cols-3">{stats}</section>
        <section class="grid gap-6 lg:grid-cols-3">
            <div class="{CARD} lg:col-span-2">
                <div class="flex items-center justify-between">
                    <h2 class="text-lg font-medium">Team Activity</h2>
                    <span class="text-xs uppercase tracking-wide text-white/40">Last 24h</span>
                </div>
                <div class="mt-6 grid gap-4">{activity}</div>
            </div>
            <div class="{CARD}">
                <h2 class="text-lg font-medium">Upcoming Milestones</h2>
                <ul class="mt-6 space-y-4 text-sm text-white/70">{milestones}</ul>
            </div>
        </section>
    </main>
</div>"#
    );
    document("Dashboard", theme, &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{OsSignal, ThemePreference};

    #[test]
    fn test_dashboard_content() {
        let theme = ThemeState::resolve(ThemePreference::Dark, OsSignal::Light);
        let html = dashboard_page(&theme);
        assert!(html.contains(">248<"));
        assert_eq!(html.matches(">In Progress<").count(), 4);
        assert!(html.contains("Next Wednesday • Production checklist"));
    }
}
