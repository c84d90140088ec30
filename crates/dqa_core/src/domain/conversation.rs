use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorClass};

use super::{HistoryEntry, Message, Role};

/// Assistant text shown when a turn fails for any reason.
pub const TURN_ERROR_MESSAGE: &str = "Sorry, an error occurred. Please try again.";

/// Successful pipeline output for one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnAnswer {
    pub context: String,
    pub answer: String,
}

/// Per-turn state machine: `Pending -> Answered | Failed`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Turn {
    Pending {
        message_id: String,
        question: String,
    },
    Answered {
        message_id: String,
        question: String,
        context: String,
        answer: String,
    },
    Failed {
        message_id: String,
        question: String,
        error: ErrorClass,
    },
}

impl Turn {
    pub fn message_id(&self) -> &str {
        match self {
            Turn::Pending { message_id, .. }
            | Turn::Answered { message_id, .. }
            | Turn::Failed { message_id, .. } => message_id,
        }
    }

    pub fn question(&self) -> &str {
        match self {
            Turn::Pending { question, .. }
            | Turn::Answered { question, .. }
            | Turn::Failed { question, .. } => question,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Turn::Pending { .. })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn get(&self, message_id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == message_id)
    }

    pub fn reset(&mut self) {
        self.messages.clear();
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) -> &Message {
        self.push(Message::assistant(content))
    }

    fn push(&mut self, message: Message) -> &Message {
        self.messages.push(message);
        let last = self.messages.len() - 1;
        &self.messages[last]
    }

    /// Append the user's question with no context and return the pending turn.
    pub fn begin_turn(&mut self, question: impl Into<String>) -> Turn {
        let question = question.into();
        let message_id = self.push(Message::user(question.clone())).id.clone();
        Turn::Pending {
            message_id,
            question,
        }
    }

    /// Apply the pipeline result to a pending turn.
    ///
    /// On success the pending user message gets its context (same id, mutated in place) and the
    /// answer is appended. On failure a single error message is appended and the context stays
    /// unset.
    pub fn resolve(
        &mut self,
        turn: Turn,
        outcome: Result<TurnAnswer, AppError>,
    ) -> Result<Turn, AppError> {
        let (message_id, question) = match turn {
            Turn::Pending {
                message_id,
                question,
            } => (message_id, question),
            other => {
                return Err(AppError::new(
                    "CONVERSATION_TURN_NOT_PENDING",
                    "Only a pending turn can be resolved",
                )
                .with_details(format!("message_id={}", other.message_id())))
            }
        };
        if self.get(&message_id).is_none() {
            return Err(AppError::new(
                "CONVERSATION_MESSAGE_NOT_FOUND",
                "Pending message is no longer in the conversation",
            )
            .with_details(format!("message_id={message_id}")));
        }

        match outcome {
            Ok(TurnAnswer { context, answer }) => {
                self.set_context(&message_id, context.clone())?;
                self.push_assistant(answer.clone());
                Ok(Turn::Answered {
                    message_id,
                    question,
                    context,
                    answer,
                })
            }
            Err(e) => {
                self.push_assistant(TURN_ERROR_MESSAGE);
                Ok(Turn::Failed {
                    message_id,
                    question,
                    error: e.class(),
                })
            }
        }
    }

    /// Attach context to a user message. Context is write-once.
    pub fn set_context(&mut self, message_id: &str, context: String) -> Result<(), AppError> {
        let msg = self
            .messages
            .iter_mut()
            .find(|m| m.id == message_id)
            .ok_or_else(|| {
                AppError::new("CONVERSATION_MESSAGE_NOT_FOUND", "Message not found")
                    .with_details(format!("message_id={message_id}"))
            })?;
        if msg.role != Role::User {
            return Err(AppError::new(
                "CONVERSATION_CONTEXT_NOT_ALLOWED",
                "Only user messages carry context",
            )
            .with_details(format!("message_id={message_id}")));
        }
        if msg.context.is_some() {
            return Err(AppError::new(
                "CONVERSATION_CONTEXT_IMMUTABLE",
                "Message context is already set",
            )
            .with_details(format!("message_id={message_id}")));
        }
        msg.context = Some(context);
        Ok(())
    }

    /// The last `window` messages strictly before `message_id`, oldest first.
    pub fn history_before(
        &self,
        message_id: &str,
        window: usize,
    ) -> Result<Vec<HistoryEntry>, AppError> {
        let pos = self
            .messages
            .iter()
            .position(|m| m.id == message_id)
            .ok_or_else(|| {
                AppError::new("CONVERSATION_MESSAGE_NOT_FOUND", "Message not found")
                    .with_details(format!("message_id={message_id}"))
            })?;
        let start = pos.saturating_sub(window);
        Ok(self.messages[start..pos].iter().map(HistoryEntry::from).collect())
    }
}
