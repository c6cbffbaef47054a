pub mod adapter;
pub mod allow;
pub mod command;
pub mod error;
pub mod handler;
pub mod helper;
pub mod messenger;
pub mod roster;
pub mod settings;
pub mod status;

pub use adapter::TelegramAdapter;
pub use error::TelegramError;
