//! Remote collaborators an editing session calls out to.

use crate::error::Result;
use crate::types::{Fields, Item, ItemType};
use tracing::info;

/// Fetches items from the server.
pub trait ItemLoader {
    /// Loads an item by id and type.
    fn load(&mut self, item_id: &str, item_type: ItemType) -> Result<Item>;
}

/// Commits working copies to the server.
///
/// Each call returns the item as the server stored it.
pub trait Persistence {
    /// Saves a payload. `with_confirmation` asks the server side to confirm
    /// series-wide changes before applying them.
    fn save(&mut self, payload: &Fields, with_confirmation: bool) -> Result<Item>;

    /// Posts a working copy.
    fn post(&mut self, diff: &Fields) -> Result<Item>;

    /// Unposts a working copy.
    fn unpost(&mut self, diff: &Fields) -> Result<Item>;
}

/// Receives user-facing error messages. Fire-and-forget.
pub trait Notifier {
    /// Reports validation messages to the user.
    fn errors(&self, messages: &[String]);
}

impl<F> Notifier for F
where
    F: Fn(&[String]),
{
    fn errors(&self, messages: &[String]) {
        self(messages)
    }
}

/// Notifier that writes messages to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn errors(&self, messages: &[String]) {
        for message in messages {
            info!(message = %message, "validation error");
        }
    }
}
