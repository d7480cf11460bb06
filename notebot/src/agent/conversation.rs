use crate::ai::Message;

/// Messages exchanged during this run. Lives only as long as the process;
/// anything worth keeping has to be written to a note.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(Message::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(Message::assistant(content));
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// The system prompt followed by the whole history, ready to send
    pub fn with_system(&self, system_prompt: &str) -> Vec<Message> {
        let mut out = Vec::with_capacity(self.messages.len() + 1);
        out.push(Message::system(system_prompt));
        out.extend(self.messages.iter().cloned());
        out
    }
}
