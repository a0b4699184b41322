//! Append-only transcript of one session.

use super::message::Message;

/// The ordered messages of one session.
///
/// Individual messages cannot be edited or removed:
/// the transcript either grows at the end or is replaced wholesale when the
/// session is (re)loaded from the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole transcript with messages fetched from the store.
    pub fn replace(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }

    /// Appends a message at the end.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }

    /// Messages appended after the first `cursor` entries.
    ///
    /// Renderers keep a cursor so that each message is printed once.
    pub fn since(&self, cursor: usize) -> &[Message] {
        self.messages.get(cursor..).unwrap_or(&[])
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_keeps_insertion_order() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user("one", None));
        transcript.push(Message::bot("two", None));
        transcript.push(Message::user("three", Some("data.csv".into())));

        let texts: Vec<&str> = transcript.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_since_past_end_is_empty() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user("a", None));
        assert_eq!(transcript.since(0).len(), 1);
        assert!(transcript.since(1).is_empty());
        assert!(transcript.since(10).is_empty());
    }

    #[test]
    fn test_replace_discards_previous() {
        let mut transcript = Transcript::new();
        transcript.push(Message::user("old", None));
        transcript.replace(vec![Message::bot("new", None)]);
        assert_eq!(transcript.len(), 1);
        assert!(transcript.last().unwrap().is_bot());
    }
}
