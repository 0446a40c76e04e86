mod notification;
mod step;

pub use notification::{Notification, NotificationKind};
pub use step::WizardStep;
