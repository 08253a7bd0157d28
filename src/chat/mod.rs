// Gateway module for chats - follows the Train Station Pattern
// All external access must go through this gateway

mod catalog;
mod navigator;
mod section;

pub use catalog::{sample_chats, sample_thread, Chat, ChatId, Message};
pub use navigator::ChatNavigator;
pub use section::Section;
