pub mod notifier;
pub mod password;
pub mod tokens;
pub mod users;

pub use notifier::{LogNotificationSink, NotificationSink};
pub use users::UserService;
