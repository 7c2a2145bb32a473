//! Class strings selected by the effective theme.

use serde::Serialize;

/// Tailwind class strings for themed page surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub background: &'static str,
    pub card: &'static str,
    pub card_border: &'static str,
    pub title: &'static str,
    pub text: &'static str,
    pub heading: &'static str,
    pub prose: &'static str,
}

impl Palette {
    const DARK: Self = Self {
        background: "bg-[#21252B]",
        card: "bg-[#282C34]",
        card_border: "border-[#3E4451]",
        title: "text-white",
        text: "text-[#ABB2BF]",
        heading: "text-white",
        prose: "prose-invert",
    };

    const LIGHT: Self = Self {
        background: "bg-gray-50",
        card: "bg-white",
        card_border: "border-gray-200",
        title: "text-white",
        text: "text-gray-800",
        heading: "text-white",
        prose: "",
    };

    #[must_use]
    pub fn for_theme(is_dark: bool) -> Self {
        if is_dark { Self::DARK } else { Self::LIGHT }
    }
}
