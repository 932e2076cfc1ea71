//! Challenger-bot boundary.
//!
//! The transcript wire shape (`role`/`content`, camelCase envelope with the
//! case title) matches the original `/api/chat` endpoint, so an LLM-proxy
//! implementation is a thin HTTP client. [`ScriptedChallenger`] stands in
//! for it headlessly with deterministic replies.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Opening assistant message every new transcript starts with.
pub const WELCOME_MESSAGE: &str = "Welcome, Detective. Which piece of evidence is the most compelling cause of the outcome? Drag it onto the canvas to begin!";

/// Shown in place of a reply when the chat backend fails; the transcript
/// keeps the user's message either way.
pub const CHALLENGER_UNAVAILABLE: &str =
    "System error: Failed to get response from Challenger AI.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

pub trait ChatGateway {
    /// Sends the full transcript and receives the challenger's reply.
    async fn send_chat(&self, transcript: &[ChatMessage], case_title: &str) -> Result<String>;
}

impl<G: ChatGateway + ?Sized> ChatGateway for &G {
    async fn send_chat(&self, transcript: &[ChatMessage], case_title: &str) -> Result<String> {
        (**self).send_chat(transcript, case_title).await
    }
}

const CHALLENGES: &[&str] = &[
    "Interesting. What evidence ties that cause directly to the outcome?",
    "Could the order be reversed? Check the years on your timeline.",
    "Is that a cause, or just something that happened around the same time?",
    "Which of your causes would the outcome survive without? Remove it mentally and see.",
    "You have the pieces. Which link in your chain is the weakest?",
];

/// Deterministic challenger: cycles through probing questions keyed off how
/// many user turns the transcript holds, so the same transcript always draws
/// the same reply. Useful for the CLI and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptedChallenger;

impl ScriptedChallenger {
    pub fn new() -> Self {
        Self
    }
}

impl ChatGateway for ScriptedChallenger {
    async fn send_chat(&self, transcript: &[ChatMessage], case_title: &str) -> Result<String> {
        let user_turns = transcript
            .iter()
            .filter(|m| m.role == ChatRole::User)
            .count();
        if user_turns <= 1 {
            let latest = transcript
                .iter()
                .rev()
                .find(|m| m.role == ChatRole::User)
                .map(|m| m.content.as_str())
                .unwrap_or_default();
            return Ok(format!(
                "So your opening theory on \"{case_title}\" is: {latest}. Convince me."
            ));
        }
        Ok(CHALLENGES[(user_turns - 2) % CHALLENGES.len()].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn transcript_wire_shape_matches_api_payload() {
        let msg = ChatMessage::user("The drought started it.");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "The drought started it.");
    }

    #[test]
    fn scripted_challenger_is_keyed_off_the_transcript() {
        let bot = ScriptedChallenger::new();
        let mut transcript = vec![
            ChatMessage::assistant(WELCOME_MESSAGE),
            ChatMessage::user("The drought started it."),
        ];
        let first = block_on(bot.send_chat(&transcript, "The Grain Exchange Collapse")).unwrap();
        assert!(first.contains("The drought started it."));
        assert!(first.contains("The Grain Exchange Collapse"));

        // Same transcript, same reply: the bot carries no state of its own.
        let again = block_on(bot.send_chat(&transcript, "The Grain Exchange Collapse")).unwrap();
        assert_eq!(again, first);

        transcript.push(ChatMessage::assistant(&first));
        transcript.push(ChatMessage::user("Because prices spiked right after."));
        let second = block_on(bot.send_chat(&transcript, "The Grain Exchange Collapse")).unwrap();
        assert_eq!(second, CHALLENGES[0]);

        transcript.push(ChatMessage::assistant(&second));
        transcript.push(ChatMessage::user("No other shock fits the timing."));
        let third = block_on(bot.send_chat(&transcript, "The Grain Exchange Collapse")).unwrap();
        assert_eq!(third, CHALLENGES[1]);
    }
}
