use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::error::MessagingError;

/// A sender observed in the provider's inbound-message log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundSender {
    pub handle: String,
    pub chat_id: i64,
}

/// Messaging provider seam: the directory pulls inbound senders through it,
/// the notifier pushes messages through it.
#[async_trait]
pub trait Messaging: Send + Sync {
    async fn list_inbound_senders(&self) -> Result<Vec<InboundSender>, MessagingError>;
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), MessagingError>;
}

#[derive(Clone)]
pub struct TelegramClient {
    http: Client,
    base_url: String,
    token: String,
}

impl TelegramClient {
    pub fn new(base_url: String, token: String) -> Self {
        Self {
            http: Client::new(),
            base_url,
            token,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }
}

#[async_trait]
impl Messaging for TelegramClient {
    async fn list_inbound_senders(&self) -> Result<Vec<InboundSender>, MessagingError> {
        let res = self
            .http
            .get(self.method_url("getUpdates"))
            .send()
            .await?
            .json::<UpdatesResponse>()
            .await?;

        if !res.ok {
            return Err(MessagingError::Api("getUpdates returned ok=false".into()));
        }

        Ok(senders_from_updates(&res.result))
    }

    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), MessagingError> {
        let res = self
            .http
            .post(self.method_url("sendMessage"))
            .form(&[("chat_id", chat_id.to_string()), ("text", text.to_string())])
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(MessagingError::Api(format!("sendMessage: {status} {body}")));
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct UpdatesResponse {
    ok: bool,
    #[serde(default)]
    result: Vec<Update>,
}

#[derive(Debug, Deserialize)]
struct Update {
    message: Option<Message>,
    edited_message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    from: Option<Sender>,
}

#[derive(Debug, Deserialize)]
struct Sender {
    id: i64,
    username: Option<String>,
}

fn senders_from_updates(updates: &[Update]) -> Vec<InboundSender> {
    let mut out = Vec::new();
    for u in updates {
        let msg = u.message.as_ref().or(u.edited_message.as_ref());
        let Some(from) = msg.and_then(|m| m.from.as_ref()) else {
            continue;
        };
        // Senders without a public username cannot be addressed by handle.
        if let Some(username) = &from.username {
            out.push(InboundSender {
                handle: format!("@{username}"),
                chat_id: from.id,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn senders_parsed_from_messages_and_edits() {
        let res: UpdatesResponse = serde_json::from_str(
            r#"{"ok":true,"result":[
                {"message":{"from":{"id":555,"username":"bob"}}},
                {"edited_message":{"from":{"id":777,"username":"alice"}}},
                {"message":{"from":{"id":999}}},
                {"message":{}}
            ]}"#,
        )
        .unwrap();

        let senders = senders_from_updates(&res.result);
        assert_eq!(
            senders,
            vec![
                InboundSender { handle: "@bob".into(), chat_id: 555 },
                InboundSender { handle: "@alice".into(), chat_id: 777 },
            ]
        );
    }
}
