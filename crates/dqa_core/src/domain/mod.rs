use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

mod conversation;

pub use conversation::{Conversation, Turn, TurnAnswer, TURN_ERROR_MESSAGE};

/// An uploaded document. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub name: String,
    pub content: String,
    pub content_sha256: String,
}

impl Document {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let content_sha256 = hex::encode(Sha256::digest(content.as_bytes()));
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            content,
            content_sha256,
        }
    }
}

/// The session's active documents, in upload order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentSet {
    documents: Vec<Document>,
}

impl DocumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: impl Into<String>, content: impl Into<String>) -> &Document {
        self.documents.push(Document::new(name, content));
        let last = self.documents.len() - 1;
        &self.documents[last]
    }

    /// Returns false when no document has the given id.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.documents.len();
        self.documents.retain(|d| d.id != id);
        self.documents.len() != before
    }

    pub fn clear(&mut self) {
        self.documents.clear();
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// All document contents joined by a blank line, so every document boundary is also a
    /// chunk boundary.
    pub fn combined_content(&self) -> String {
        self.documents
            .iter()
            .map(|d| d.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Stable digest of the set's membership and order.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for d in self.documents.iter() {
            hasher.update(d.id.as_bytes());
            hasher.update(b":");
            hasher.update(d.content_sha256.as_bytes());
            hasher.update(b"\n");
        }
        hex::encode(hasher.finalize())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    /// Context that produced the answer to this message. User messages only, set at most once.
    pub context: Option<String>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(Role::Assistant, content)
    }

    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            context: None,
        }
    }
}

/// Prior message as sent alongside a question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

impl From<&Message> for HistoryEntry {
    fn from(m: &Message) -> Self {
        Self {
            role: m.role,
            content: m.content.clone(),
        }
    }
}

/// Documents plus the conversation about them. Any change to the document set empties the
/// conversation.
#[derive(Debug, Clone, Default)]
pub struct Session {
    documents: DocumentSet,
    conversation: Conversation,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents(&self) -> &DocumentSet {
        &self.documents
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn conversation_mut(&mut self) -> &mut Conversation {
        &mut self.conversation
    }

    pub fn add_document(&mut self, name: impl Into<String>, content: impl Into<String>) -> Document {
        let before = self.documents.fingerprint();
        let doc = self.documents.add(name, content).clone();
        self.reset_if_changed(&before);
        doc
    }

    pub fn remove_document(&mut self, id: &str) -> bool {
        let before = self.documents.fingerprint();
        let removed = self.documents.remove(id);
        self.reset_if_changed(&before);
        removed
    }

    pub fn clear_documents(&mut self) {
        let before = self.documents.fingerprint();
        self.documents.clear();
        self.reset_if_changed(&before);
    }

    fn reset_if_changed(&mut self, before: &str) {
        if self.documents.fingerprint() != before {
            tracing::debug!(
                documents = self.documents.len(),
                "document set changed; resetting conversation"
            );
            self.conversation.reset();
        }
    }
}
