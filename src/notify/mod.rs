pub mod line;
pub mod message;
pub mod traits;

pub use line::{LineNotifier, LogNotifier};
pub use message::{render, Category, Notification, LINE_ENDING};
pub use traits::Notifier;
