use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use relay_api::{CloudEvent, now_ms};

use crate::message::MessageEntity;

struct LogInner {
    entries: VecDeque<MessageEntity>,
    next_offset: u64,
    /// Set once the log first reaches capacity, to warn only once.
    saturated: bool,
}

/// Append-only, offset-indexed log of one topic.
///
/// Offset assignment and storage happen under one lock, so concurrent
/// appenders never observe the same offset and the retained entries always
/// form a contiguous run `head_offset()..next_offset()`.
pub struct TopicLog {
    topic: String,
    capacity: usize,
    inner: Mutex<LogInner>,
}

impl std::fmt::Debug for TopicLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TopicLog")
            .field("topic", &self.topic)
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl TopicLog {
    pub fn new(topic: impl Into<String>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            topic: topic.into(),
            capacity,
            inner: Mutex::new(LogInner {
                entries: VecDeque::with_capacity(capacity.min(4096)),
                next_offset: 0,
                saturated: false,
            }),
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock(&self) -> MutexGuard<'_, LogInner> {
        match self.inner.lock() {
            Ok(g) => g,
            Err(poisoned) => {
                tracing::warn!(topic = %self.topic, "topic log lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    /// Store `payload` under the next offset and return the stored entry.
    pub fn append(&self, payload: CloudEvent) -> MessageEntity {
        let mut inner = self.lock();
        let offset = inner.next_offset;
        inner.next_offset += 1;

        let entry = MessageEntity::new(self.topic.clone(), offset, payload, now_ms());

        if inner.entries.len() >= self.capacity {
            if let Some(evicted) = inner.entries.pop_front() {
                tracing::debug!(topic = %self.topic, offset = evicted.offset(), "evicted oldest message");
            }
            if !inner.saturated {
                inner.saturated = true;
                tracing::warn!(
                    topic = %self.topic,
                    capacity = self.capacity,
                    "topic log reached capacity, oldest messages are now evicted"
                );
            }
        }
        inner.entries.push_back(entry.clone());

        tracing::debug!(topic = %self.topic, offset, "appended message");
        entry
    }

    /// Offset the next append will receive.
    pub fn next_offset(&self) -> u64 {
        self.lock().next_offset
    }

    /// Offset of the oldest retained entry, or `next_offset()` if empty.
    pub fn head_offset(&self) -> u64 {
        let inner = self.lock();
        inner
            .entries
            .front()
            .map_or(inner.next_offset, MessageEntity::offset)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Entry at `offset`, if it is still retained.
    pub fn get(&self, offset: u64) -> Option<MessageEntity> {
        let inner = self.lock();
        let head = inner.entries.front()?.offset();
        let index = usize::try_from(offset.checked_sub(head)?).ok()?;
        inner.entries.get(index).cloned()
    }

    pub fn first(&self) -> Option<MessageEntity> {
        self.lock().entries.front().cloned()
    }

    pub fn last(&self) -> Option<MessageEntity> {
        self.lock().entries.back().cloned()
    }

    /// Up to `limit` retained entries starting at `from` (clamped to the head),
    /// in offset order.
    pub fn read(&self, from: u64, limit: usize) -> Vec<MessageEntity> {
        let inner = self.lock();
        let Some(head) = inner.entries.front().map(MessageEntity::offset) else {
            return Vec::new();
        };
        let skip = usize::try_from(from.saturating_sub(head)).unwrap_or(usize::MAX);
        inner.entries.iter().skip(skip).take(limit).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str) -> CloudEvent {
        CloudEvent::new(id, "/test", "test.event").with_subject("t1")
    }

    #[test]
    fn offsets_start_at_zero_and_increase() {
        let log = TopicLog::new("t1", 16);
        assert!(log.is_empty());
        assert_eq!(log.next_offset(), 0);

        let offsets: Vec<u64> = (0..5).map(|i| log.append(event(&i.to_string())).offset()).collect();
        assert_eq!(offsets, vec![0, 1, 2, 3, 4]);
        assert_eq!(log.next_offset(), 5);
        assert_eq!(log.head_offset(), 0);
        assert_eq!(log.len(), 5);
    }

    #[test]
    fn entry_carries_topic_and_payload() {
        let log = TopicLog::new("t1", 16);
        let before = now_ms();
        let entry = log.append(event("e-1"));
        assert_eq!(entry.topic(), "t1");
        assert_eq!(entry.payload().id, "e-1");
        assert!(entry.created_at_ms() >= before);
        assert_eq!(log.get(0), Some(entry));
    }

    #[test]
    fn eviction_keeps_offsets_monotonic() {
        let log = TopicLog::new("t1", 3);
        for i in 0..5 {
            log.append(event(&i.to_string()));
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.head_offset(), 2);
        assert_eq!(log.next_offset(), 5);
        assert_eq!(log.get(1), None);
        assert_eq!(log.get(2).map(|e| e.payload().id.clone()).as_deref(), Some("2"));
        assert_eq!(log.get(5), None);

        assert_eq!(log.append(event("5")).offset(), 5);
    }

    #[test]
    fn zero_capacity_retains_one() {
        let log = TopicLog::new("t1", 0);
        assert_eq!(log.capacity(), 1);
        log.append(event("a"));
        log.append(event("b"));
        assert_eq!(log.len(), 1);
        assert_eq!(log.last().map(|e| e.offset()), Some(1));
    }

    #[test]
    fn read_clamps_to_head_and_limit() {
        let log = TopicLog::new("t1", 4);
        for i in 0..6 {
            log.append(event(&i.to_string()));
        }
        // retained: 2..6
        let offsets = |v: Vec<MessageEntity>| v.iter().map(MessageEntity::offset).collect::<Vec<_>>();
        assert_eq!(offsets(log.read(0, 10)), vec![2, 3, 4, 5]);
        assert_eq!(offsets(log.read(3, 2)), vec![3, 4]);
        assert_eq!(offsets(log.read(6, 10)), Vec::<u64>::new());
        assert_eq!(log.first().map(|e| e.offset()), Some(2));
    }

    #[test]
    fn read_on_empty_log() {
        let log = TopicLog::new("t1", 4);
        assert!(log.read(0, 10).is_empty());
        assert_eq!(log.get(0), None);
        assert_eq!(log.head_offset(), 0);
    }

    #[test]
    fn concurrent_appends_get_distinct_offsets() {
        let log = TopicLog::new("t1", 10_000);
        let threads = 8;
        let per_thread = 250;

        let mut offsets: Vec<u64> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..threads)
                .map(|t| {
                    let log = &log;
                    s.spawn(move || {
                        (0..per_thread)
                            .map(|i| log.append(event(&format!("{t}-{i}"))).offset())
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
        });

        offsets.sort_unstable();
        let expected: Vec<u64> = (0..(threads * per_thread) as u64).collect();
        assert_eq!(offsets, expected);
    }
}
