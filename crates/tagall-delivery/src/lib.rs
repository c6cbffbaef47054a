//! Batched mention delivery with cooperative cancellation.
//!
//! The [`TagAll`] service drives one invocation: it resolves the messaging
//! identity, opens the status message, groups members into batches and hands
//! them to the [`DeliveryLoop`]. Everything that talks to Telegram sits behind
//! the traits in [`identity`], [`members`] and [`status`].

pub mod batch;
pub mod delivery;
pub mod error;
pub mod identity;
pub mod members;
pub mod render;
pub mod status;
pub mod tagall;
pub mod token;
pub mod watcher;

pub use batch::batches;
pub use delivery::{DeliveryLoop, DeliveryReport, Outcome};
pub use error::DeliveryError;
pub use identity::{BotAccess, Identity, Messenger};
pub use members::MemberSource;
pub use status::{StatusFactory, StatusHandle};
pub use tagall::{TagAll, TagRequest};
pub use token::CancellationToken;
pub use watcher::CancellationWatcher;
