// Lock-free channel carrying history flags to a polling UI

use crate::messaging::notification::{HistoryFlags, HistoryListener};
use ringbuf::traits::{Consumer, Producer, Split};
use ringbuf::HeapRb;
use tracing::warn;

pub type FlagsProducer = ringbuf::HeapProd<HistoryFlags>;
pub type FlagsConsumer = ringbuf::HeapCons<HistoryFlags>;

/// Sending half installed as the history listener
pub struct FlagsSender {
    producer: FlagsProducer,
}

impl FlagsSender {
    pub fn new(producer: FlagsProducer) -> Self {
        Self { producer }
    }
}

impl HistoryListener for FlagsSender {
    fn history_changed(&mut self, flags: HistoryFlags) {
        if self.producer.try_push(flags).is_err() {
            // Consumer catches up on the next change
            warn!(?flags, "history flags channel full, update dropped");
        }
    }
}

pub fn create_flags_channel(capacity: usize) -> (FlagsSender, FlagsConsumer) {
    let rb = HeapRb::<HistoryFlags>::new(capacity);
    let (producer, consumer) = rb.split();
    (FlagsSender::new(producer), consumer)
}

/// Drain the channel and keep only the most recent flags
pub fn latest_flags(consumer: &mut FlagsConsumer) -> Option<HistoryFlags> {
    let mut latest = None;
    while let Some(flags) = consumer.try_pop() {
        latest = Some(flags);
    }
    latest
}
