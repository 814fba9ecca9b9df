//! Reply cards rendered as Telegram HTML.
//!
//! Every reply is a [`Card`]: a bold title, an optional description, named
//! fields and a footer. Builders below take domain values and return cards
//! whose text is already escaped.

use std::fmt;

use trackmyclass_backend::Outcome;
use trackmyclass_core::{
    format_duration, format_history_time, format_xray_time, AvailabilityStatus, Reconstruction,
    XrayReport,
};
use trackmyclass_models::Subscription;

/// Footer on every card.
pub const FOOTER: &str = "TrackMyClass";

/// Subscriptions listed before the rest are summarized.
pub const MAX_LISTED_SUBSCRIPTIONS: usize = 10;

/// A titled field within a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub value: String,
}

/// A reply card. All text is HTML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub description: Option<String>,
    pub fields: Vec<Field>,
    /// Trailing italic lines shown above the footer.
    pub notes: Vec<String>,
    pub footer: String,
}

impl Card {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            fields: Vec::new(),
            notes: Vec::new(),
            footer: FOOTER.to_string(),
        }
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(Field {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn note(mut self, text: impl Into<String>) -> Self {
        self.notes.push(text.into());
        self
    }

    /// Render to a Telegram HTML message body.
    pub fn to_html(&self) -> String {
        let mut out = format!("<b>{}</b>", self.title);

        if let Some(description) = &self.description {
            out.push_str("\n\n");
            out.push_str(description);
        }

        for field in &self.fields {
            out.push_str(&format!("\n\n<b>{}</b>\n{}", field.name, field.value));
        }

        if !self.notes.is_empty() {
            out.push('\n');
            for note in &self.notes {
                out.push_str(&format!("\n<i>{}</i>", note));
            }
        }

        out.push_str(&format!("\n\n<i>{}</i>", self.footer));
        out
    }
}

/// Escape HTML special characters for Telegram HTML mode.
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escaped inline code span.
pub fn code(s: &str) -> String {
    format!("<code>{}</code>", html_escape(s))
}

/// Reply to `/start`.
pub fn registration(outcome: &Outcome) -> Card {
    match outcome {
        Outcome::Accepted => {
            Card::new("✅ Registered!").description("You've been registered successfully.")
        }
        Outcome::Rejected(reason) => {
            Card::new("❌ Registration failed").description(html_escape(reason))
        }
    }
}

/// Reply when `/subscribe` is used outside a private chat.
pub fn dm_only() -> Card {
    Card::new("❌ DM Only").description(
        "Please send /subscribe to me in a private chat so I can message you with updates later.\n\
         If you can't open a private chat, search for the bot and press Start.",
    )
}

pub fn class_not_found(class_number: &str) -> Card {
    Card::new("❌ Class Not Found").description(format!("Could not find class {}.", code(class_number)))
}

/// Reply for a command that needs a class number but got none.
pub fn usage(command: &str) -> Card {
    Card::new("ℹ️ Missing Class Number").description(format!(
        "<b>Usage:</b> <code>/{} &lt;class_number&gt;</code>\n\nExample: <code>/{} 12345</code>",
        command, command
    ))
}

pub fn subscribed(class_number: &str, outcome: &Outcome) -> Card {
    match outcome {
        Outcome::Accepted => Card::new("✅ Subscribed!")
            .description(format!("You are now tracking class {}.", code(class_number))),
        Outcome::Rejected(reason) => {
            Card::new("❌ Subscription Failed").description(html_escape(reason))
        }
    }
}

pub fn unsubscribed(class_number: &str, outcome: &Outcome) -> Card {
    match outcome {
        Outcome::Accepted => Card::new("✅ Unsubscribed!")
            .description(format!("You have stopped tracking class {}.", code(class_number))),
        Outcome::Rejected(reason) => {
            Card::new("❌ Unsubscribe Failed").description(html_escape(reason))
        }
    }
}

/// Reply to `/subscriptions`.
pub fn subscriptions(subs: &[Subscription]) -> Card {
    if subs.is_empty() {
        return Card::new("📭 No Subscriptions").description("You are not subscribed to any classes.");
    }

    let mut card = Card::new("📚 Your Subscriptions");
    for sub in subs.iter().take(MAX_LISTED_SUBSCRIPTIONS) {
        card = card.field(
            format!("{} ({})", html_escape(&sub.title), code(&sub.section_id.to_string())),
            format!("{} seats available", sub.available_seats),
        );
    }
    if subs.len() > MAX_LISTED_SUBSCRIPTIONS {
        card = card.note(format!("...and {} more", subs.len() - MAX_LISTED_SUBSCRIPTIONS));
    }
    card
}

/// Reply to `/xray`.
pub fn xray(class_number: &str, report: &XrayReport) -> Card {
    let status = format!(
        "{} <b>{}</b> ({})\n<b>Available Seats:</b> {}",
        report.status.emoji(),
        report.status.label(),
        report.status.detail(),
        report.current_availability
    );

    let (heading, empty) = match report.status {
        AvailabilityStatus::Impacted => (
            "📉 Last 5 Seat Reductions",
            "No recent impacted seat changes found.",
        ),
        AvailabilityStatus::Full | AvailabilityStatus::Open => {
            ("📜 Recent Seat Adjustments", "No recent seat changes found.")
        }
    };

    let listing = if report.entries.is_empty() {
        empty.to_string()
    } else {
        report
            .entries
            .iter()
            .map(|e| {
                format!(
                    "- <b>{}</b>: {} seats",
                    format_xray_time(&e.captured_at),
                    e.available_seats
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let mut card = Card::new(format!("🔍 X-Ray Insights for {}", code(class_number)))
        .field("📊 Current Status", status)
        .field(heading, listing);
    if report.skipped > 0 {
        card = card.note(skipped_note(report.skipped));
    }
    card
}

/// Reply to `/history`.
pub fn history(class_number: &str, reconstruction: &Reconstruction) -> Card {
    if reconstruction.is_empty() {
        let mut card = Card::new("🔍 No History")
            .description(format!("No open/close events for {}.", code(class_number)));
        if reconstruction.skipped_count() > 0 {
            card = card.note(skipped_note(reconstruction.skipped_count()));
        }
        return card;
    }

    let mut card = Card::new(format!("📜 Open/Close History for {}", code(class_number)));
    for interval in reconstruction.newest_first() {
        let closed = interval
            .closed_at
            .as_ref()
            .map(format_history_time)
            .unwrap_or_else(|| "Still open".to_string());
        card = card.field(
            format!("Opened: {}", format_history_time(&interval.opened_at)),
            format!("Closed: {}", closed),
        );
    }

    if let Some(average) = reconstruction.average_duration {
        card = card.field(
            "⏱️ Average Open Duration",
            format!(
                "{} over {} events",
                format_duration(average),
                reconstruction.intervals.len()
            ),
        );
    }

    if reconstruction.skipped_count() > 0 {
        card = card.note(skipped_note(reconstruction.skipped_count()));
    }
    card
}

/// Reply when a backend call fails. `action` completes "Could not ...".
pub fn error(action: &str, err: &dyn fmt::Display) -> Card {
    Card::new("⚠️ Error").description(html_escape(&format!("Could not {}: {}", action, err)))
}

fn skipped_note(count: usize) -> String {
    if count == 1 {
        "1 malformed record was skipped.".to_string()
    } else {
        format!("{} malformed records were skipped.", count)
    }
}
