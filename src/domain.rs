mod contact_message;
mod subscriber_email;

pub use contact_message::{CONTACT_SUBJECT, ContactForm, ContactMessage};
pub use subscriber_email::SubscriberEmail;
