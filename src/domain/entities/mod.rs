//! Domain entities - Core business objects with no external dependencies

pub mod user;
pub mod message;
pub mod command;
pub mod embed;

pub use user::User;
pub use message::{Message, MessageType, Content};
pub use command::{Command, CommandRegistry};
pub use embed::{Embed, EmbedKind, Reply};
