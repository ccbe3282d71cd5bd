use serde::{Deserialize, Serialize};

use super::{format_price, Watch};

/// RGB color of a message, e.g. `0x2081e2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    /// Accepts `0x2081e2`, `#2081e2` or `2081e2`.
    pub fn parse_hex(s: &str) -> Option<Self> {
        let s = s.trim();
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .or_else(|| s.strip_prefix('#'))
            .unwrap_or(s);
        if digits.is_empty() || digits.len() > 6 {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Color)
    }
}

/// Normal vs error presentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Theme {
    pub primary: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: Color(0x2081e2),
            error: Color(0xe0245e),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub value: String,
}

/// Structured message handed to a dispatcher.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub color: Color,
    pub fields: Vec<Field>,
}

impl Notification {
    pub fn new(title: impl Into<String>, color: Color) -> Self {
        Self {
            title: title.into(),
            description: None,
            color,
            fields: vec![],
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(Field {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Direct message sent when a watch fires.
    pub fn price_alert(theme: &Theme, watch: &Watch, current_price: f64) -> Self {
        let current = format_price(current_price);
        Self::new("Notification", theme.primary)
            .with_description(format!(
                "The current floor price of {} is {} ETH which is below the floor price you set a notification for ({} ETH)",
                watch.collection, current, watch.target_price
            ))
            .with_field("Collection", watch.collection.clone())
            .with_field("Current floor price", format!("{} ETH", current))
            .with_field("Target floor price", format!("{} ETH", watch.target_price))
    }

    pub fn registered(theme: &Theme, watch: &Watch) -> Self {
        Self::new("Notify", theme.primary).with_field(
            "Success",
            format!(
                "We will send you a DM when the floor price goes below {} ETH!",
                watch.target_price
            ),
        )
    }

    pub fn already_satisfied(
        theme: &Theme,
        collection: &str,
        current_price: f64,
        target_price: f64,
    ) -> Self {
        Self::new("Notify", theme.primary)
            .with_field("Collection", collection)
            .with_field(
                "Current floor price",
                format!("{} ETH", format_price(current_price)),
            )
            .with_field(
                "Error",
                format!(
                    "The current floor price is already below {} ETH",
                    format_price(target_price)
                ),
            )
    }

    pub fn usage_error(theme: &Theme, prefix: &str, command: &str, args: &[&str]) -> Self {
        let mut how_to_use = format!("{}{}", prefix, command);
        for arg in args {
            how_to_use.push_str(&format!(" [{}]", arg));
        }
        Self::new("Error", theme.error)
            .with_description("You did not pass enough required arguments")
            .with_field("How to use this command", how_to_use)
            .with_field("Arguments required", args.len().to_string())
    }

    pub fn command_failed(theme: &Theme, reason: impl Into<String>) -> Self {
        Self::new("Error", theme.error)
            .with_description("An error occured when trying to execute your command.")
            .with_field("Reason", reason)
    }

    /// All user-facing text of the message, for logs and plain-text sinks.
    pub fn to_plain_text(&self) -> String {
        let mut lines = vec![self.title.clone()];
        if let Some(d) = &self.description {
            lines.push(d.clone());
        }
        for f in &self.fields {
            lines.push(format!("{}: {}", f.name, f.value));
        }
        lines.join("\n")
    }
}
