//! The stream consumer: the imperative shell around the message kernel.
//!
//! Each delivered entry is driven through [`dv_kernel::apply`]. The kernel
//! decides what happens next, this module performs the IO and reports back
//! what it observed.

use std::collections::VecDeque;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use dv_kernel::{Command, Effect, FailureKind, MessageState, TrackedMessage, apply};
use dv_log::{Fields, LogEntry, LogError, StreamLog};
use dv_store::{InsertOutcome, RecordStore, StoreError};
use dv_types::{IngestEnvelope, RecordId};

use crate::RuntimeError;
use crate::config::IdPolicy;
use crate::context::ConsumerContext;

/// Field names added to a message copied onto the dead-letter stream.
pub mod dead_letter_fields {
    /// Why the message was quarantined.
    pub const REASON: &str = "dead_letter_reason";
    /// Id of the message on the consumed stream.
    pub const SOURCE_ID: &str = "source_id";
    pub const DELIVERIES: &str = "deliveries";
}

/// What happened to one delivered message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOutcome {
    /// A new row was written and the message acknowledged.
    Stored(RecordId),
    /// The row was already written by an earlier delivery; acknowledged.
    Duplicate(RecordId),
    /// Left pending after a transient failure; it will be redelivered.
    Released,
    /// Quarantined and acknowledged.
    DeadLettered,
    /// Shutdown arrived before the acknowledgement; the message stays pending.
    Interrupted,
}

/// Counters for one run of the consumer loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumerStats {
    pub stored: u64,
    pub duplicates: u64,
    pub released: u64,
    pub dead_lettered: u64,
    pub interrupted: u64,
}

impl ConsumerStats {
    fn record(&mut self, outcome: MessageOutcome) {
        match outcome {
            MessageOutcome::Stored(_) => self.stored += 1,
            MessageOutcome::Duplicate(_) => self.duplicates += 1,
            MessageOutcome::Released => self.released += 1,
            MessageOutcome::DeadLettered => self.dead_lettered += 1,
            MessageOutcome::Interrupted => self.interrupted += 1,
        }
    }

    /// Messages that ended with an acknowledgement.
    pub fn acknowledged(&self) -> u64 {
        self.stored + self.duplicates + self.dead_lettered
    }
}

/// One consumer identity in the group.
///
/// Cheap to clone; clones share the context.
#[derive(Debug)]
pub struct Consumer<L, S> {
    ctx: Arc<ConsumerContext<L, S>>,
}

impl<L, S> Clone for Consumer<L, S> {
    fn clone(&self) -> Self {
        Self {
            ctx: Arc::clone(&self.ctx),
        }
    }
}

impl<L, S> Consumer<L, S>
where
    L: StreamLog,
    S: RecordStore,
{
    pub fn new(ctx: ConsumerContext<L, S>) -> Self {
        Self { ctx: Arc::new(ctx) }
    }

    pub fn context(&self) -> &ConsumerContext<L, S> {
        &self.ctx
    }

    // ========================================================================
    // Poll Loop
    // ========================================================================

    /// Runs the poll loop until `shutdown` turns `true` or its sender drops.
    ///
    /// Per-message failures never end the loop. Transient log errors are
    /// logged and retried after the configured backoff.
    ///
    /// # Errors
    ///
    /// Returns only on fatal errors: a misconfigured key, a kernel invariant
    /// violation, or a non-transient log error.
    pub async fn run(
        &self,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<ConsumerStats, RuntimeError> {
        let cfg = &self.ctx.config;
        let mut stats = ConsumerStats::default();

        if !self.ensure_group(&mut shutdown).await? {
            return Ok(stats);
        }

        info!(
            stream = %cfg.stream,
            group = %cfg.group,
            consumer = %cfg.consumer,
            "consumer started"
        );

        'poll: loop {
            if *shutdown.borrow() {
                break;
            }

            let batch = match self.next_batch(&mut shutdown).await {
                Ok(Some(batch)) => batch,
                Ok(None) => break,
                Err(LogError::NoSuchGroup { .. }) => {
                    warn!(group = %cfg.group, "consumer group vanished, recreating");
                    if !self.ensure_group(&mut shutdown).await? {
                        break;
                    }
                    continue;
                }
                Err(e) if e.is_transient() => {
                    warn!(error = %e, "log read failed, backing off");
                    if self.pause(&mut shutdown).await {
                        break;
                    }
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            for entry in batch {
                // Undelivered entries of the batch stay pending and are
                // reclaimed after the visibility timeout.
                if *shutdown.borrow() {
                    break 'poll;
                }

                let outcome = self.handle(entry, Some(&shutdown)).await?;
                stats.record(outcome);

                if outcome == MessageOutcome::Released && self.pause(&mut shutdown).await {
                    break 'poll;
                }
            }
        }

        info!(
            stored = stats.stored,
            duplicates = stats.duplicates,
            released = stats.released,
            dead_lettered = stats.dead_lettered,
            "consumer stopped"
        );
        Ok(stats)
    }

    /// Creates the group, retrying transient failures.
    ///
    /// Returns `false` if shutdown arrived first.
    async fn ensure_group(
        &self,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Result<bool, RuntimeError> {
        let cfg = &self.ctx.config;
        loop {
            match self
                .ctx
                .log
                .create_group(&cfg.stream, &cfg.group, cfg.start_cursor)
                .await
            {
                Ok(creation) => {
                    debug!(group = %cfg.group, ?creation, "consumer group ready");
                    return Ok(true);
                }
                Err(e) if e.is_transient() => {
                    warn!(error = %e, "creating consumer group failed, backing off");
                    if self.pause(shutdown).await {
                        return Ok(false);
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Reclaims stale entries first, otherwise blocks for new ones.
    ///
    /// Returns `None` if shutdown arrived while blocked. A signal that leaves
    /// the flag `false` yields an empty batch and the loop keeps polling.
    async fn next_batch(
        &self,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Result<Option<Vec<LogEntry>>, LogError> {
        let cfg = &self.ctx.config;

        let claimed = self
            .ctx
            .log
            .claim_stale(
                &cfg.stream,
                &cfg.group,
                &cfg.consumer,
                cfg.visibility_timeout,
                cfg.batch_size,
            )
            .await?;
        if !claimed.is_empty() {
            debug!(count = claimed.len(), "reclaimed stale entries");
            return Ok(Some(claimed));
        }

        tokio::select! {
            biased;
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    Ok(None)
                } else {
                    Ok(Some(Vec::new()))
                }
            }
            read = self.ctx.log.read_group(
                &cfg.stream,
                &cfg.group,
                &cfg.consumer,
                cfg.batch_size,
                cfg.block_timeout,
            ) => read.map(Some),
        }
    }

    /// Sleeps for the retry backoff. Returns `true` if shutdown arrived.
    async fn pause(&self, shutdown: &mut watch::Receiver<bool>) -> bool {
        tokio::select! {
            () = tokio::time::sleep(self.ctx.config.retry_backoff) => *shutdown.borrow(),
            changed = shutdown.changed() => changed.is_err() || *shutdown.borrow(),
        }
    }

    // ========================================================================
    // Per-Message Handling
    // ========================================================================

    /// Drives one delivered entry to its outcome.
    ///
    /// # Errors
    ///
    /// Returns only fatal errors. Per-message failures become
    /// [`MessageOutcome::Released`] or [`MessageOutcome::DeadLettered`].
    pub async fn handle_entry(&self, entry: LogEntry) -> Result<MessageOutcome, RuntimeError> {
        self.handle(entry, None).await
    }

    pub(crate) async fn handle(
        &self,
        entry: LogEntry,
        shutdown: Option<&watch::Receiver<bool>>,
    ) -> Result<MessageOutcome, RuntimeError> {
        let ctx = &*self.ctx;
        let cfg = &ctx.config;

        let msg = TrackedMessage::received(entry.id, entry.delivery_count.max(1));
        let (mut msg, effects) = apply(msg, Command::Begin, &ctx.policy)?;
        let mut queue: VecDeque<Effect> = effects.into();
        let mut written: Option<(RecordId, InsertOutcome)> = None;
        let mut quarantined = false;

        while let Some(effect) = queue.pop_front() {
            let cmd = match effect {
                Effect::Process => match self.process(&entry).await {
                    Ok(result) => {
                        written = Some(result);
                        Command::Persisted
                    }
                    Err(e) if e.is_fatal() => return Err(e),
                    Err(e) => {
                        warn!(
                            message_id = %entry.id,
                            deliveries = entry.delivery_count,
                            error = %e,
                            "processing failed"
                        );
                        classify(&e)
                    }
                },

                Effect::Acknowledge => {
                    // Once a dead-letter copy exists the ack must follow, or a
                    // redelivery would quarantine the message a second time.
                    if !quarantined && shutdown.is_some_and(|rx| *rx.borrow()) {
                        debug!(message_id = %entry.id, "shutdown before ack, leaving pending");
                        return Ok(MessageOutcome::Interrupted);
                    }
                    match ctx.log.ack(&cfg.stream, &cfg.group, entry.id).await {
                        Ok(_) => Command::Acked,
                        Err(e) if msg.state == MessageState::Stored => {
                            Command::retryable(format!("ack failed: {e}"))
                        }
                        Err(e) => {
                            warn!(message_id = %entry.id, error = %e, "ack of quarantined message failed");
                            return Ok(MessageOutcome::Released);
                        }
                    }
                }

                Effect::DeadLetter { reason } => {
                    if shutdown.is_some_and(|rx| *rx.borrow()) {
                        debug!(message_id = %entry.id, "shutdown before quarantine, leaving pending");
                        return Ok(MessageOutcome::Interrupted);
                    }
                    if let Err(e) = self.dead_letter(&entry, &reason).await {
                        // Not acknowledged either, so the message is redelivered.
                        warn!(message_id = %entry.id, error = %e, "dead-letter publish failed");
                        return Ok(MessageOutcome::Released);
                    }
                    quarantined = true;
                    continue;
                }

                Effect::Release => {
                    debug!(message_id = %entry.id, "released for redelivery");
                    continue;
                }
            };

            let (next, effects) = apply(msg, cmd, &ctx.policy)?;
            msg = next;
            queue.extend(effects);
        }

        let outcome = match (msg.state, written) {
            (MessageState::Acknowledged, Some((id, InsertOutcome::Inserted))) => {
                info!(message_id = %entry.id, record_id = %id, "record stored");
                MessageOutcome::Stored(id)
            }
            (MessageState::Acknowledged, Some((id, InsertOutcome::AlreadyPresent))) => {
                info!(message_id = %entry.id, record_id = %id, "record already stored by an earlier delivery");
                MessageOutcome::Duplicate(id)
            }
            (MessageState::Failed(FailureKind::Poison), _) => MessageOutcome::DeadLettered,
            _ => MessageOutcome::Released,
        };
        Ok(outcome)
    }

    /// Decode, anonymize, encrypt and store.
    async fn process(&self, entry: &LogEntry) -> Result<(RecordId, InsertOutcome), RuntimeError> {
        let ctx = &*self.ctx;
        let envelope = IngestEnvelope::from_fields(&entry.fields)?;

        // A caller-chosen id is a redelivery key only from the second delivery on.
        let (id, stable) = match (envelope.id, ctx.config.id_policy) {
            (Some(id), _) => (id, entry.delivery_count > 1),
            (None, IdPolicy::DerivedFromMessage) => {
                (RecordId::derived(&ctx.config.stream, &entry.id), true)
            }
            (None, IdPolicy::Random) => (RecordId::new_random(), false),
        };

        let row = ctx.pipeline.seal_envelope(id, &envelope)?;

        let outcome = if stable {
            ctx.store.insert_if_absent(row).await?
        } else {
            ctx.store.insert(row).await?;
            InsertOutcome::Inserted
        };

        if outcome == InsertOutcome::AlreadyPresent && envelope.id.is_some() {
            let existing = ctx.store.lookup(id).await?;
            if existing.data_type != envelope.data_type {
                return Err(StoreError::Conflict(id).into());
            }
        }
        Ok((id, outcome))
    }

    /// Copies a poison message to the dead-letter stream, if one is configured.
    async fn dead_letter(&self, entry: &LogEntry, reason: &str) -> Result<(), LogError> {
        let Some(stream) = self.ctx.config.dead_letter_stream.as_deref() else {
            warn!(message_id = %entry.id, reason, "dropping poison message");
            return Ok(());
        };

        let mut fields: Fields = entry.fields.clone();
        fields.insert(
            dead_letter_fields::REASON.to_string(),
            Bytes::from(reason.to_string()),
        );
        fields.insert(
            dead_letter_fields::SOURCE_ID.to_string(),
            Bytes::from(entry.id.to_string()),
        );
        fields.insert(
            dead_letter_fields::DELIVERIES.to_string(),
            Bytes::from(entry.delivery_count.to_string()),
        );

        let id = self.ctx.log.publish(stream, fields).await?;
        warn!(
            message_id = %entry.id,
            dead_letter_id = %id,
            deliveries = entry.delivery_count,
            reason,
            "message quarantined"
        );
        Ok(())
    }
}

/// Maps a per-message error onto the kernel's failure command.
///
/// Error text comes from parsers and backends, never from record values.
fn classify(error: &RuntimeError) -> Command {
    if error.is_retryable() {
        Command::retryable(error.to_string())
    } else {
        Command::poison(error.to_string())
    }
}
