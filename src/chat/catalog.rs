pub type ChatId = u32;

/// Entry of the chat list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chat {
    pub id: ChatId,
    pub name: String,
    pub last_message: String,
    pub time: String,
    pub unread: u32,
    pub avatar: String,
    pub online: bool,
}

/// One message inside a conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: u32,
    pub text: String,
    pub time: String,
    pub is_mine: bool,
}

impl Message {
    fn new(id: u32, text: &str, time: &str, is_mine: bool) -> Self {
        Self {
            id,
            text: text.to_string(),
            time: time.to_string(),
            is_mine,
        }
    }
}

fn chat(id: ChatId, name: &str, last: &str, time: &str, unread: u32, avatar: &str, online: bool) -> Chat {
    Chat {
        id,
        name: name.to_string(),
        last_message: last.to_string(),
        time: time.to_string(),
        unread,
        avatar: avatar.to_string(),
        online,
    }
}

/// Built-in conversation list; there is no message backend
pub fn sample_chats() -> Vec<Chat> {
    vec![
        chat(1, "Anna Smirnova", "Great, let's call tomorrow!", "14:32", 3, "AS", true),
        chat(2, "Project Team", "New tasks were added", "12:15", 1, "PT", false),
        chat(3, "Maxim Petrov", "Thanks for the help 👍", "Yesterday", 0, "MP", true),
        chat(4, "Olga Ivanova", "I'll send the files today", "Yesterday", 0, "OI", false),
        chat(5, "Support", "Your issue is resolved", "Jan 15", 0, "SP", true),
    ]
}

/// Built-in thread shown for every conversation
pub fn sample_thread() -> Vec<Message> {
    vec![
        Message::new(1, "Hi! How is the project going?", "14:25", false),
        Message::new(2, "Hi! All good, I'll send the final version tomorrow", "14:28", true),
        Message::new(3, "Great! Shall we have a video call?", "14:30", false),
        Message::new(4, "Great, let's call tomorrow!", "14:32", true),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_ids_are_unique_and_ordered() {
        let ids: Vec<ChatId> = sample_chats().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_sample_thread_ends_with_last_message() {
        let thread = sample_thread();
        let first = &sample_chats()[0];
        assert_eq!(thread.last().map(|m| m.text.as_str()), Some(first.last_message.as_str()));
    }
}
