/// Admin moderation panel - Gateway

mod panel;

pub use panel::AdminPanel;
