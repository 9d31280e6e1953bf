//! Team chat.
//!
//! Contacts, one open conversation and the canned auto-reply. Replies are
//! queued on the chat's own scheduler and delivered when the UI loop polls.

use std::time::Instant;

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fields::*;
use crate::session::User;
use crate::timer::{Scheduler, REPLY_DELAY};

/// Text every contact answers with.
pub const AUTO_REPLY: &str = "Ok, recebi sua mensagem. Vou verificar e retornar em breve.";

/// A person reachable in the chat.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Contact {
    pub id: u64,
    pub name: String,
    pub role: Role,
    pub presence: Presence,
    #[serde(default)]
    pub last_seen: Option<String>,
}

/// Author of a message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sender {
    pub name: String,
    pub role: Role,
}

/// A line of the sample conversation shown when a contact is opened.
/// `sender: None` stands for the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SampleMessage {
    #[serde(default)]
    pub sender: Option<Sender>,
    pub text: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: u64,
    pub sender: Sender,
    pub text: String,
    pub timestamp: String,
    pub is_current_user: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingReply {
    contact_id: u64,
}

/// Chat state for one session.
#[derive(Debug, Default)]
pub struct TeamChat {
    pub contacts: Vec<Contact>,
    sample: Vec<SampleMessage>,
    pub messages: Vec<ChatMessage>,
    selected: Option<u64>,
    next_message_id: u64,
    replies: Scheduler<PendingReply>,
}

impl TeamChat {
    pub fn new(contacts: Vec<Contact>, sample: Vec<SampleMessage>) -> Self {
        TeamChat {
            contacts,
            sample,
            messages: Vec::new(),
            selected: None,
            next_message_id: 1,
            replies: Scheduler::new(),
        }
    }

    /// Contacts whose name contains `term`, ignoring case.
    pub fn filter_contacts(&self, term: &str) -> Vec<&Contact> {
        let lower = term.to_lowercase();
        self.contacts
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&lower))
            .collect()
    }

    pub fn selected_contact(&self) -> Option<&Contact> {
        self.selected.and_then(|id| self.contacts.iter().find(|c| c.id == id))
    }

    /// Open the conversation with contact `id`, replacing the message list
    /// with the sample conversation. A reply still pending from the previous
    /// contact is dropped.
    pub fn select_contact(&mut self, id: u64, user: &User) -> bool {
        if !self.contacts.iter().any(|c| c.id == id) {
            return false;
        }
        self.replies.clear();
        self.selected = Some(id);
        self.messages.clear();
        for line in self.sample.clone() {
            let (sender, is_current_user) = match line.sender {
                Some(sender) => (sender, false),
                None => (user.sender(), true),
            };
            self.push(sender, line.text, line.timestamp, is_current_user);
        }
        true
    }

    /// Send `text` to the open conversation and queue the contact's reply.
    /// Blank text or no open conversation is ignored.
    pub fn send_message(&mut self, user: &User, text: &str, now: Instant) -> Option<u64> {
        if text.trim().is_empty() {
            return None;
        }
        let contact_id = self.selected?;
        let id = self.push(user.sender(), text.to_string(), clock_time(), true);
        self.replies.schedule(now, REPLY_DELAY, PendingReply { contact_id });
        debug!(contact = contact_id, message = id, "chat message sent");
        Some(id)
    }

    /// Deliver replies that have come due. Returns how many arrived.
    pub fn poll(&mut self, now: Instant) -> usize {
        let due = self.replies.poll(now);
        let mut delivered = 0;
        for reply in due {
            let Some(contact) = self.contacts.iter().find(|c| c.id == reply.contact_id) else {
                continue;
            };
            let sender = Sender { name: contact.name.clone(), role: contact.role };
            self.push(sender, AUTO_REPLY.to_string(), clock_time(), false);
            delivered += 1;
        }
        delivered
    }

    pub fn has_pending_reply(&self) -> bool {
        !self.replies.is_empty()
    }

    /// Close the conversation and forget queued replies.
    pub fn close(&mut self) {
        self.replies.clear();
        self.selected = None;
        self.messages.clear();
    }

    fn push(&mut self, sender: Sender, text: String, timestamp: String, is_current_user: bool) -> u64 {
        let id = self.next_message_id;
        self.next_message_id += 1;
        self.messages.push(ChatMessage { id, sender, text, timestamp, is_current_user });
        id
    }
}

fn clock_time() -> String {
    Local::now().format("%H:%M").to_string()
}

/// Initials for an avatar, e.g. "João Mendes" -> "JM".
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn user() -> User {
        User { name: "Lucas".into(), email: "lucas@example.com".into(), role: Role::Operator }
    }

    fn chat() -> TeamChat {
        let contacts = vec![
            Contact { id: 1, name: "Rafael".into(), role: Role::Engineer, presence: Presence::Online, last_seen: None },
            Contact { id: 2, name: "João Mendes".into(), role: Role::Operator, presence: Presence::Offline, last_seen: Some("Hoje, 10:45".into()) },
        ];
        let sample = vec![
            SampleMessage {
                sender: Some(Sender { name: "Rafael".into(), role: Role::Engineer }),
                text: "Bom dia!".into(),
                timestamp: "09:32".into(),
            },
            SampleMessage { sender: None, text: "Vou verificar agora.".into(), timestamp: "09:35".into() },
        ];
        TeamChat::new(contacts, sample)
    }

    #[test]
    fn test_contact_filter_ignores_case() {
        let chat = chat();
        let found: Vec<u64> = chat.filter_contacts("joão").iter().map(|c| c.id).collect();
        assert_eq!(found, vec![2]);
        assert_eq!(chat.filter_contacts("").len(), 2);
    }

    #[test]
    fn test_selecting_contact_loads_sample_with_current_user() {
        let mut chat = chat();
        assert!(chat.select_contact(1, &user()));
        assert_eq!(chat.messages.len(), 2);
        assert!(!chat.messages[0].is_current_user);
        assert_eq!(chat.messages[1].sender.name, "Lucas");
        assert!(chat.messages[1].is_current_user);
        assert!(!chat.select_contact(9, &user()));
    }

    #[test]
    fn test_blank_message_rejected() {
        let mut chat = chat();
        chat.select_contact(1, &user());
        assert_eq!(chat.send_message(&user(), "  ", Instant::now()), None);
        assert_eq!(chat.messages.len(), 2);
        assert!(!chat.has_pending_reply());
    }

    #[test]
    fn test_message_without_contact_rejected() {
        let mut chat = chat();
        assert_eq!(chat.send_message(&user(), "olá", Instant::now()), None);
        assert!(chat.messages.is_empty());
    }

    #[test]
    fn test_reply_arrives_after_delay() {
        let mut chat = chat();
        let start = Instant::now();
        chat.select_contact(2, &user());
        assert!(chat.send_message(&user(), "Tanque 2 ajustado", start).is_some());
        assert_eq!(chat.poll(start + Duration::from_millis(1999)), 0);
        assert_eq!(chat.poll(start + REPLY_DELAY), 1);
        let last = chat.messages.last().unwrap();
        assert_eq!(last.text, AUTO_REPLY);
        assert_eq!(last.sender.name, "João Mendes");
        assert!(!last.is_current_user);
    }

    #[test]
    fn test_switching_contact_drops_pending_reply() {
        let mut chat = chat();
        let start = Instant::now();
        chat.select_contact(1, &user());
        chat.send_message(&user(), "oi", start);
        chat.select_contact(2, &user());
        assert_eq!(chat.poll(start + REPLY_DELAY), 0);
        assert!(chat.messages.iter().all(|m| m.text != AUTO_REPLY));
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("João Mendes"), "JM");
        assert_eq!(initials("rafael"), "R");
    }
}
