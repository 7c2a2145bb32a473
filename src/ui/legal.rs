//! Privacy policy and terms of service.
//!
//! Copy is static and trusted; paragraphs may contain inline markup.

use chrono::NaiveDate;

use crate::theme::ThemeState;

use super::html::{back_icon, classes};
use super::shell::document;

pub const CONTACT_EMAIL: &str = "example@email.com";

#[derive(Debug)]
enum Block {
    Para(&'static str),
    List(&'static [&'static str]),
}

#[derive(Debug)]
struct Section {
    heading: &'static str,
    blocks: &'static [Block],
}

#[derive(Debug)]
pub struct LegalDocument {
    title: &'static str,
    preamble: &'static [&'static str],
    sections: &'static [Section],
    contact_heading: &'static str,
    contact_lead: &'static str,
}

pub const PRIVACY_POLICY: LegalDocument = LegalDocument {
    title: "Privacy Policy for Course Craft",
    preamble: &[],
    sections: &[
        Section {
            heading: "Introduction",
            blocks: &[Block::Para(
                "Course Craft (\"we,\" \"us,\" or \"our\") values your privacy and is committed to protecting your personal information. This Privacy Policy explains how we collect, use, and share your data when you use our website and services.",
            )],
        },
        Section {
            heading: "1. Information We Collect",
            blocks: &[
                Block::Para("We collect the following types of information when you use Course Craft:"),
                Block::List(&[
                    "<strong>Account Information:</strong> When you register for an account, we collect your name, email address, and other details necessary for account management.",
                    "<strong>Uploaded Content:</strong> We collect any files or content you upload, including PDFs and any chat history generated during your interactions with the Gemini AI agent.",
                    "<strong>Usage Data:</strong> We collect information about how you interact with Course Craft, such as pages visited, features used, and timestamps.",
                ]),
            ],
        },
        Section {
            heading: "2. How We Use Your Information",
            blocks: &[
                Block::Para("We use the collected information to:"),
                Block::List(&[
                    "Provide and improve the Services.",
                    "Communicate with you about your account or any updates to our services.",
                    "Personalize your experience with Course Craft.",
                    "Process payments and manage billing (if applicable).",
                    "Comply with legal obligations and resolve disputes.",
                ]),
            ],
        },
        Section {
            heading: "3. Data Storage and Security",
            blocks: &[Block::Para(
                "Your information is stored on secure servers. We implement industry-standard security measures to protect your data, but please note that no data transmission over the internet can be guaranteed to be 100% secure.",
            )],
        },
        Section {
            heading: "4. Sharing Your Information",
            blocks: &[
                Block::Para("We do not share your personal information with third parties except in the following cases:"),
                Block::List(&[
                    "<strong>Service Providers:</strong> We may share your data with trusted third-party service providers who assist us in operating the Services, such as hosting providers and payment processors.",
                    "<strong>Legal Requirements:</strong> We may disclose your information if required by law or in response to legal processes such as subpoenas or court orders.",
                ]),
            ],
        },
        Section {
            heading: "5. Cookies and Tracking Technologies",
            blocks: &[Block::Para(
                "We use cookies and similar tracking technologies to enhance your experience on Course Craft. Cookies help us remember your preferences, analyze usage patterns, and improve our Services. You can control cookie settings through your browser settings.",
            )],
        },
        Section {
            heading: "6. Data Retention",
            blocks: &[Block::Para(
                "We retain your information for as long as necessary to provide the Services and comply with legal obligations. If you wish to delete your account or any personal information, please contact us at <a href=\"mailto:example@email.com\" class=\"text-blue-500 hover:underline\">example@email.com</a>.",
            )],
        },
        Section {
            heading: "7. Your Rights",
            blocks: &[Block::Para(
                "Depending on your jurisdiction, you may have the right to access, update, or delete your personal data. You may also have the right to object to certain processing activities or withdraw consent where applicable.",
            )],
        },
        Section {
            heading: "8. International Transfers",
            blocks: &[Block::Para(
                "Your information may be transferred to and stored on servers located outside your country of residence. By using the Services, you consent to this transfer.",
            )],
        },
        Section {
            heading: "9. Children's Privacy",
            blocks: &[Block::Para(
                "Course Craft is not intended for use by children under the age of 13. We do not knowingly collect or solicit personal information from anyone under 13 years of age. If we learn that we have inadvertently collected such information, we will take steps to delete it.",
            )],
        },
        Section {
            heading: "10. Changes to This Privacy Policy",
            blocks: &[Block::Para(
                "We may update this Privacy Policy from time to time. When we make significant changes, we will post the updated policy on this page and update the effective date. Please review this policy periodically for any updates.",
            )],
        },
    ],
    contact_heading: "11. Contact Us",
    contact_lead: "If you have any questions about this Privacy Policy or your data, please contact us at:",
};

pub const TERMS_OF_SERVICE: LegalDocument = LegalDocument {
    title: "Terms of Service for Course Craft",
    preamble: &[
        "Welcome to Course Craft!",
        "These Terms of Service (\"Terms\") govern your use of Course Craft's website and services (collectively, \"Services\"), which are provided by [Company Name] (\"we,\" \"us,\" or \"our\"). By accessing or using our Services, you agree to be bound by these Terms.",
    ],
    sections: &[
        Section {
            heading: "1. Acceptance of Terms",
            blocks: &[Block::Para(
                "By accessing or using Course Craft, you agree to comply with and be bound by these Terms, as well as our Privacy Policy, which is incorporated by reference. If you do not agree to these Terms, you should not use our Services.",
            )],
        },
        Section {
            heading: "2. Services Description",
            blocks: &[Block::Para(
                "Course Craft allows users to create course websites powered by artificial intelligence (AI). Users can upload PDF files, which the AI agent (Gemini) uses to generate a course outline. Users can interact with the agent via chat to refine the outline and build the website based on the outline. The chat history is stored in our database.",
            )],
        },
        Section {
            heading: "3. Account Registration",
            blocks: &[Block::Para(
                "To use Course Craft's services, you must create an account. You agree to provide accurate, current, and complete information during the registration process and to keep your account information up to date.",
            )],
        },
        Section {
            heading: "4. User Responsibilities",
            blocks: &[Block::List(&[
                "You are responsible for all content uploaded to the platform, including PDF files and chat history.",
                "You agree not to upload any content that is illegal, harmful, defamatory, or infringes the rights of others.",
                "You agree not to misuse the Services, including but not limited to attempting to gain unauthorized access to any systems, networks, or user accounts.",
            ])],
        },
        Section {
            heading: "5. Privacy and Data Collection",
            blocks: &[Block::Para(
                "Your use of Course Craft is governed by our <a href=\"/privacy\" class=\"text-blue-500 hover:underline\">[Privacy Policy]</a>. Please review it to understand how we collect, use, and protect your data.",
            )],
        },
        Section {
            heading: "6. Payment Terms",
            blocks: &[Block::Para(
                "If Course Craft offers paid services, you agree to provide accurate payment information and authorize us to charge your chosen payment method. Payments are non-refundable unless otherwise stated.",
            )],
        },
        Section {
            heading: "7. Ownership and Intellectual Property",
            blocks: &[Block::List(&[
                "You retain ownership of any content you upload to the platform.",
                "We retain all rights, titles, and interest in the technology and AI tools used to provide Course Craft, including but not limited to any software, algorithms, and databases.",
            ])],
        },
        Section {
            heading: "8. Limitation of Liability",
            blocks: &[Block::Para(
                "We are not liable for any direct, indirect, incidental, special, or consequential damages that result from your use of the Services or any content provided by the Services. Our liability is limited to the amount paid for the specific service in the transaction that gave rise to the claim.",
            )],
        },
        Section {
            heading: "9. Indemnification",
            blocks: &[Block::Para(
                "You agree to indemnify and hold harmless Course Craft, its affiliates, and employees from any claims, losses, damages, liabilities, or expenses (including attorneys' fees) arising from your use of the Services or violation of these Terms.",
            )],
        },
        Section {
            heading: "10. Termination",
            blocks: &[Block::Para(
                "We reserve the right to suspend or terminate your access to the Services at our sole discretion, including but not limited to any violation of these Terms.",
            )],
        },
        Section {
            heading: "11. Changes to Terms",
            blocks: &[Block::Para(
                "We reserve the right to modify or update these Terms at any time. Any changes will be posted on this page, and the effective date will be updated accordingly. Your continued use of the Services after such changes constitutes your acceptance of the revised Terms.",
            )],
        },
    ],
    contact_heading: "Contact Information",
    contact_lead: "If you have any questions about these Terms, please contact us at:",
};

/// Render a legal document themed for the effective theme.
pub fn legal_page(doc: &LegalDocument, theme: &ThemeState, effective: NaiveDate) -> String {
    let p = &theme.palette;
    let text = p.text;
    let heading = p.heading;
    let date = effective.format("%B %-d, %Y");

    let preamble: String = doc
        .preamble
        .iter()
        .enumerate()
        .map(|(i, para)| {
            let margin = if i + 1 == doc.preamble.len() { "mb-8" } else { "mb-6" };
            format!(
                r#"<p class="{margin} {text} transition-colors" data-theme-slot="text">{para}</p>"#
            )
        })
        .collect();

    let sections: String = doc
        .sections
        .iter()
        .map(|section| render_section(section, text, heading))
        .collect();

    let contact = format!(
        r#"<section class="mb-8 pt-8 border-t border-gray-300 dark:border-[#3E4451]">
    <h2 class="text-2xl font-semibold mb-4 {heading} transition-colors" data-theme-slot="heading">{contact_heading}</h2>
    <p class="mb-4 {text} transition-colors leading-relaxed" data-theme-slot="text">{contact_lead}</p>
    <p class="{text} transition-colors leading-relaxed" data-theme-slot="text">Email: <a href="mailto:{CONTACT_EMAIL}" class="text-blue-500 hover:underline">{CONTACT_EMAIL}</a></p>
</section>"#,
        contact_heading = doc.contact_heading,
        contact_lead = doc.contact_lead,
    );

    let prose = classes(&["prose prose-lg max-w-none", p.prose, text]);
    let back = back_icon("h-4 w-4");

    let content = format!(
        r#"<div class="min-h-screen {background} transition-colors" data-theme-slot="background">
    <div class="mx-auto max-w-4xl px-4 py-12 md:px-6 md:py-16">
        <button type="button" onclick="history.back()" class="mb-8 flex items-center gap-2 text-sm {text} hover:opacity-80 transition-opacity" data-theme-slot="text">
            {back}
            Back
        </button>
        <div class="rounded-lg border {card_border} {card} shadow-lg p-8 md:p-12 transition-colors" data-theme-slot="card_border card">
            <div class="mb-8">
                <h1 class="text-4xl font-bold mb-2 {title_class} transition-colors" data-theme-slot="title">{title}</h1>
                <p class="text-sm {text} transition-colors" data-theme-slot="text">Effective Date: {date}</p>
            </div>
            <div class="{prose}" data-theme-slot="prose text">
                {preamble}{sections}{contact}
            </div>
        </div>
    </div>
</div>"#,
        background = p.background,
        card_border = p.card_border,
        card = p.card,
        title_class = p.title,
        title = doc.title,
    );
    document(doc.title, theme, &content)
}

fn render_section(section: &Section, text: &str, heading: &str) -> String {
    let blocks: String = section
        .blocks
        .iter()
        .map(|block| match block {
            Block::Para(para) => format!(
                r#"<p class="mb-4 {text} transition-colors leading-relaxed" data-theme-slot="text">{para}</p>"#
            ),
            Block::List(items) => {
                let items: String = items.iter().map(|i| format!("<li>{i}</li>")).collect();
                format!(
                    r#"<ul class="list-disc list-inside mb-4 space-y-2 {text} transition-colors leading-relaxed ml-4" data-theme-slot="text">{items}</ul>"#
                )
            }
        })
        .collect();

    format!(
        r#"<section class="mb-8">
    <h2 class="text-2xl font-semibold mb-4 {heading} transition-colors" data-theme-slot="heading">{title}</h2>
    {blocks}
</section>"#,
        title = section.heading,
    )
}
