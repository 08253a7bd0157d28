use std::collections::HashMap;
use tracing::debug;

use super::catalog::{Chat, ChatId, Message};
use crate::app::GestureConfig;
use crate::gesture::{
    resolve, GestureEvent, GestureTranslator, HapticFeedback, HapticIntensity, Navigation,
    SwipeDirection,
};

/// Owns the chat list, the active selection and the swipe translator
pub struct ChatNavigator {
    chats: Vec<Chat>,
    threads: HashMap<ChatId, Vec<Message>>,
    active: Option<ChatId>,
    gesture: GestureTranslator,
    haptics: Box<dyn HapticFeedback>,
}

impl ChatNavigator {
    /// Every chat starts with a copy of `thread`
    pub fn new(
        chats: Vec<Chat>,
        thread: Vec<Message>,
        gesture: &GestureConfig,
        haptics: Box<dyn HapticFeedback>,
    ) -> Self {
        let threads = chats.iter().map(|c| (c.id, thread.clone())).collect();
        Self {
            chats,
            threads,
            active: None,
            gesture: GestureTranslator::new(gesture),
            haptics,
        }
    }

    pub fn chats(&self) -> &[Chat] {
        &self.chats
    }

    pub fn active(&self) -> Option<ChatId> {
        self.active
    }

    pub fn active_chat(&self) -> Option<&Chat> {
        self.active
            .and_then(|id| self.chats.iter().find(|c| c.id == id))
    }

    pub fn position_of(&self, id: ChatId) -> Option<usize> {
        self.chats.iter().position(|c| c.id == id)
    }

    /// Direct pick from the list. Unknown ids are ignored; picking the open
    /// chat again keeps it open without feedback.
    pub fn select(&mut self, id: ChatId) -> bool {
        if self.position_of(id).is_none() {
            return false;
        }
        if self.active == Some(id) {
            return true;
        }
        self.active = Some(id);
        self.haptics.pulse(HapticIntensity::Light);
        true
    }

    /// Back to the list view
    pub fn close(&mut self) {
        self.active = None;
    }

    pub fn touch_start(&mut self, x: f64) {
        self.gesture.start(x);
    }

    pub fn touch_move(&mut self, x: f64) {
        self.gesture.move_to(x);
    }

    /// Release: resolve the swipe against the list and apply it
    pub fn touch_end(&mut self) -> Navigation<ChatId> {
        let order = self.order();
        let navigation = self.gesture.end(&order, self.active.as_ref());
        self.apply(&navigation);
        navigation
    }

    /// Feed a pointer event from the conversation pane
    pub fn handle_gesture(&mut self, event: GestureEvent) -> Navigation<ChatId> {
        let order = self.order();
        let navigation = self.gesture.handle(event, &order, self.active.as_ref());
        self.apply(&navigation);
        navigation
    }

    /// Keyboard equivalent of a swipe
    pub fn step(&mut self, direction: SwipeDirection) -> Navigation<ChatId> {
        let order = self.order();
        let navigation = resolve(direction, &order, self.active.as_ref());
        self.apply(&navigation);
        navigation
    }

    fn order(&self) -> Vec<ChatId> {
        self.chats.iter().map(|c| c.id).collect()
    }

    fn apply(&mut self, navigation: &Navigation<ChatId>) {
        match navigation {
            Navigation::Stay => return,
            Navigation::Select(id) => self.active = Some(*id),
            Navigation::ClearSelection => self.active = None,
        }
        debug!(?navigation, "swipe navigation");
        self.haptics.pulse(HapticIntensity::Medium);
    }

    /// Damped drag offset for drawing the conversation pane
    pub fn visual_offset(&self) -> f64 {
        self.gesture.visual_offset()
    }

    pub fn is_dragging(&self) -> bool {
        self.gesture.is_active()
    }

    pub fn thread(&self, id: ChatId) -> &[Message] {
        self.threads.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Append an outgoing message to the active chat. Returns false when
    /// nothing is open or the text is blank.
    pub fn send_message(&mut self, text: &str) -> bool {
        let text = text.trim();
        let Some(id) = self.active else {
            return false;
        };
        if text.is_empty() {
            return false;
        }

        let time = chrono::Local::now().format("%H:%M").to_string();
        let thread = self.threads.entry(id).or_default();
        let next_id = thread.iter().map(|m| m.id).max().unwrap_or(0) + 1;
        thread.push(Message {
            id: next_id,
            text: text.to_string(),
            time: time.clone(),
            is_mine: true,
        });

        if let Some(chat) = self.chats.iter_mut().find(|c| c.id == id) {
            chat.last_message = text.to_string();
            chat.time = time;
        }
        true
    }

    pub fn total_unread(&self) -> u32 {
        self.chats.iter().map(|c| c.unread).sum()
    }
}
