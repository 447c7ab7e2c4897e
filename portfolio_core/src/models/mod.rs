pub mod message;
pub mod request;

pub use message::{
    ContactSubmission, InvalidMessageId, Message, MessageId, MessagePatch, NewMessage,
    StoredMessage,
};
pub use request::{ApiResponse, LoginForm, OAuthCallbackQuery, SubmittedMessage};
