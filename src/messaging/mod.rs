// Messages from the editor core to the UI

pub mod channels;
pub mod notification;

pub use channels::{FlagsConsumer, FlagsSender, create_flags_channel, latest_flags};
pub use notification::{HistoryFlags, HistoryListener};
