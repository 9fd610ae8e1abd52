//! In-process log with consumer-group semantics.
//!
//! Mirrors the delivery rules of a Redis-style stream: entries are never
//! removed by reading, each group tracks its own cursor and pending list,
//! and stale pending entries can be claimed by another consumer.

use std::collections::{BTreeMap, HashMap};
use std::pin::pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::sync::{Mutex, Notify};
use tokio::time::Instant;

use dv_types::{MessageId, StartCursor};

use crate::{Fields, GroupCreation, LogEntry, LogError, PendingEntry, StreamLog};

// ============================================================================
// State
// ============================================================================

#[derive(Debug)]
struct Pending {
    consumer: String,
    delivered_at: Instant,
    delivery_count: u32,
}

#[derive(Debug, Default)]
struct GroupState {
    /// Highest id ever delivered to this group.
    last_delivered: MessageId,
    pending: BTreeMap<MessageId, Pending>,
}

#[derive(Debug, Default)]
struct StreamState {
    entries: BTreeMap<MessageId, Fields>,
    last_id: MessageId,
    groups: HashMap<String, GroupState>,
}

impl StreamState {
    fn next_id(&self) -> MessageId {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0);

        if now_ms > self.last_id.millis() {
            MessageId::new(now_ms, 0)
        } else {
            self.last_id.successor()
        }
    }

    fn group_mut(&mut self, stream: &str, group: &str) -> Result<&mut GroupState, LogError> {
        self.groups.get_mut(group).ok_or_else(|| no_such_group(stream, group))
    }
}

fn no_such_group(stream: &str, group: &str) -> LogError {
    LogError::NoSuchGroup {
        stream: stream.to_string(),
        group: group.to_string(),
    }
}

// ============================================================================
// MemoryLog
// ============================================================================

/// A [`StreamLog`] held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryLog {
    streams: Mutex<HashMap<String, StreamState>>,
    appended: Notify,
    unavailable: AtomicBool,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulates an outage: while set, every call fails with
    /// [`LogError::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of entries ever appended to `stream`.
    pub async fn len(&self, stream: &str) -> usize {
        self.streams
            .lock()
            .await
            .get(stream)
            .map_or(0, |s| s.entries.len())
    }

    /// Every entry of `stream` in id order.
    pub async fn entries(&self, stream: &str) -> Vec<(MessageId, Fields)> {
        self.streams
            .lock()
            .await
            .get(stream)
            .map(|s| {
                s.entries
                    .iter()
                    .map(|(id, fields)| (*id, fields.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn check_available(&self) -> Result<(), LogError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(LogError::Unavailable("memory log offline".into()));
        }
        Ok(())
    }

    /// Delivers never-seen entries if any are ready. Never blocks.
    async fn try_deliver(
        &self,
        stream: &str,
        group: &str,
        consumer: &str,
        count: usize,
    ) -> Result<Vec<LogEntry>, LogError> {
        let mut streams = self.streams.lock().await;
        let state = streams
            .get_mut(stream)
            .ok_or_else(|| no_such_group(stream, group))?;

        let StreamState { entries, groups, .. } = state;
        let group_state = groups
            .get_mut(group)
            .ok_or_else(|| no_such_group(stream, group))?;

        let now = Instant::now();
        let mut batch = Vec::new();
        let start = group_state.last_delivered;

        for (id, fields) in entries.range(start..).filter(|(id, _)| **id > start).take(count) {
            group_state.pending.insert(
                *id,
                Pending {
                    consumer: consumer.to_string(),
                    delivered_at: now,
                    delivery_count: 1,
                },
            );
            batch.push(LogEntry {
                id: *id,
                fields: fields.clone(),
                delivery_count: 1,
            });
        }

        if let Some(last) = batch.last() {
            group_state.last_delivered = last.id;
        }
        Ok(batch)
    }
}

impl StreamLog for MemoryLog {
    async fn create_group(
        &self,
        stream: &str,
        group: &str,
        start: StartCursor,
    ) -> Result<GroupCreation, LogError> {
        self.check_available()?;

        let mut streams = self.streams.lock().await;
        let state = streams.entry(stream.to_string()).or_default();
        if state.groups.contains_key(group) {
            return Ok(GroupCreation::AlreadyExists);
        }

        let last_delivered = match start {
            StartCursor::Beginning => MessageId::ZERO,
            StartCursor::Latest => state.last_id,
        };
        state.groups.insert(
            group.to_string(),
            GroupState {
                last_delivered,
                pending: BTreeMap::new(),
            },
        );

        tracing::debug!(stream, group, %start, "consumer group created");
        Ok(GroupCreation::Created)
    }

    async fn publish(&self, stream: &str, fields: Fields) -> Result<MessageId, LogError> {
        self.check_available()?;
        if fields.is_empty() {
            return Err(LogError::InvalidMessage("entry has no fields".into()));
        }

        let id = {
            let mut streams = self.streams.lock().await;
            let state = streams.entry(stream.to_string()).or_default();
            let id = state.next_id();
            debug_assert!(id > state.last_id, "message ids must increase");

            state.entries.insert(id, fields);
            state.last_id = id;
            id
        };

        self.appended.notify_waiters();
        Ok(id)
    }

    async fn read_group(
        &self,
        stream: &str,
        group: &str,
        consumer: &str,
        count: usize,
        block: Duration,
    ) -> Result<Vec<LogEntry>, LogError> {
        self.check_available()?;
        if count == 0 {
            return Err(LogError::InvalidMessage("read count must be positive".into()));
        }

        let deadline = Instant::now() + block;
        loop {
            // Register for wakeups before checking, so a publish between the
            // check and the wait is not missed.
            let mut appended = pin!(self.appended.notified());
            appended.as_mut().enable();

            let batch = self.try_deliver(stream, group, consumer, count).await?;
            if !batch.is_empty() {
                return Ok(batch);
            }

            let now = Instant::now();
            if now >= deadline {
                return Ok(Vec::new());
            }
            if tokio::time::timeout(deadline - now, appended).await.is_err() {
                return Ok(Vec::new());
            }
            self.check_available()?;
        }
    }

    async fn ack(&self, stream: &str, group: &str, id: MessageId) -> Result<bool, LogError> {
        self.check_available()?;

        let mut streams = self.streams.lock().await;
        let state = streams
            .get_mut(stream)
            .ok_or_else(|| no_such_group(stream, group))?;
        Ok(state.group_mut(stream, group)?.pending.remove(&id).is_some())
    }

    async fn claim_stale(
        &self,
        stream: &str,
        group: &str,
        consumer: &str,
        min_idle: Duration,
        count: usize,
    ) -> Result<Vec<LogEntry>, LogError> {
        self.check_available()?;

        let mut streams = self.streams.lock().await;
        let state = streams
            .get_mut(stream)
            .ok_or_else(|| no_such_group(stream, group))?;
        let StreamState { entries, groups, .. } = state;
        let group_state = groups
            .get_mut(group)
            .ok_or_else(|| no_such_group(stream, group))?;

        let now = Instant::now();
        let mut claimed = Vec::new();
        for (id, pending) in group_state.pending.iter_mut() {
            if claimed.len() >= count {
                break;
            }
            if now.duration_since(pending.delivered_at) < min_idle {
                continue;
            }
            let Some(fields) = entries.get(id) else {
                continue;
            };

            pending.consumer = consumer.to_string();
            pending.delivered_at = now;
            pending.delivery_count += 1;

            claimed.push(LogEntry {
                id: *id,
                fields: fields.clone(),
                delivery_count: pending.delivery_count,
            });
        }

        if !claimed.is_empty() {
            tracing::debug!(stream, group, consumer, claimed = claimed.len(), "stale entries claimed");
        }
        Ok(claimed)
    }

    async fn pending(&self, stream: &str, group: &str) -> Result<Vec<PendingEntry>, LogError> {
        self.check_available()?;

        let mut streams = self.streams.lock().await;
        let state = streams
            .get_mut(stream)
            .ok_or_else(|| no_such_group(stream, group))?;
        let now = Instant::now();

        Ok(state
            .group_mut(stream, group)?
            .pending
            .iter()
            .map(|(id, p)| PendingEntry {
                id: *id,
                consumer: p.consumer.clone(),
                idle: now.duration_since(p.delivered_at),
                delivery_count: p.delivery_count,
            })
            .collect())
    }
}
