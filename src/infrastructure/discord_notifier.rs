use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};

use crate::application::{AppError, AppResult, Notifier};
use crate::domain::Notification;

pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

/// Sends each notification as an embed in the user's DM channel.
pub struct DiscordNotifier {
    client: reqwest::Client,
    api_base: String,
    bot_token: String,
}

impl DiscordNotifier {
    pub fn new(bot_token: String) -> Self {
        Self::with_api_base(DEFAULT_API_BASE, bot_token)
    }

    pub fn with_api_base(api_base: impl Into<String>, bot_token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            bot_token,
        }
    }

    async fn open_dm(&self, owner_id: &str) -> AppResult<String> {
        let channel: DmChannel = self
            .client
            .post(format!("{}/users/@me/channels", self.api_base))
            .header(AUTHORIZATION, format!("Bot {}", self.bot_token))
            .json(&CreateDm {
                recipient_id: owner_id,
            })
            .send()
            .await
            .map_err(|e| AppError::Dispatch(e.to_string()))?
            .error_for_status()
            .map_err(|e| AppError::Dispatch(e.to_string()))?
            .json()
            .await
            .map_err(|e| AppError::Dispatch(e.to_string()))?;
        Ok(channel.id)
    }
}

#[derive(Debug, Serialize)]
struct CreateDm<'a> {
    recipient_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct DmChannel {
    id: String,
}

#[derive(Debug, Serialize)]
struct MessageBody<'a> {
    embeds: [Embed<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Embed<'a> {
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    color: u32,
    fields: Vec<EmbedField<'a>>,
}

#[derive(Debug, Serialize)]
struct EmbedField<'a> {
    name: &'a str,
    value: &'a str,
    inline: bool,
}

fn to_embed(message: &Notification) -> Embed<'_> {
    Embed {
        title: &message.title,
        description: message.description.as_deref(),
        color: message.color.0,
        fields: message
            .fields
            .iter()
            .map(|f| EmbedField {
                name: &f.name,
                value: &f.value,
                inline: false,
            })
            .collect(),
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn send(&self, owner_id: &str, message: &Notification) -> AppResult<()> {
        let channel_id = self.open_dm(owner_id).await?;

        let body = MessageBody {
            embeds: [to_embed(message)],
        };

        self.client
            .post(format!("{}/channels/{}/messages", self.api_base, channel_id))
            .header(AUTHORIZATION, format!("Bot {}", self.bot_token))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Dispatch(e.to_string()))?
            .error_for_status()
            .map_err(|e| AppError::Dispatch(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Color;

    #[test]
    fn embed_keeps_field_order_and_color() {
        let n = Notification::new("Notify", Color(0xe0245e))
            .with_field("Collection", "cool-cats")
            .with_field("Current floor price", "2.0 ETH");

        let json = serde_json::to_value(MessageBody {
            embeds: [to_embed(&n)],
        })
        .unwrap();

        let embed = &json["embeds"][0];
        assert_eq!(embed["title"], "Notify");
        assert_eq!(embed["color"], 0xe0245e);
        assert!(embed.get("description").is_none());
        assert_eq!(embed["fields"][0]["name"], "Collection");
        assert_eq!(embed["fields"][1]["value"], "2.0 ETH");
        assert_eq!(embed["fields"][1]["inline"], false);
    }
}
