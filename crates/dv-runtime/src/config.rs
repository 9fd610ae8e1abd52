//! Consumer configuration.

use std::time::Duration;

use dv_types::StartCursor;

use crate::RuntimeError;

/// How a consumed message is assigned its record id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdPolicy {
    /// A fresh random id per attempt. A message redelivered after a partial
    /// success is stored twice.
    Random,
    /// An id derived from `(stream, message id)`, written with an insert that
    /// skips existing rows. A redelivered message maps onto the same row.
    #[default]
    DerivedFromMessage,
}

/// Configuration for one stream consumer.
#[derive(Debug, Clone)]
pub struct ConsumerConfig {
    /// Stream to consume.
    pub stream: String,
    /// Consumer group name.
    pub group: String,
    /// Consumer identity. Must be unique per process instance.
    pub consumer: String,
    /// Maximum entries per read.
    pub batch_size: usize,
    /// How long one read blocks waiting for new entries.
    pub block_timeout: Duration,
    /// Where a newly created group starts.
    pub start_cursor: StartCursor,
    /// Pending entries idle this long are reclaimed from their consumer.
    pub visibility_timeout: Duration,
    /// Deliveries allowed before a message is dead-lettered.
    pub max_deliveries: u32,
    /// Pause after a transient failure.
    pub retry_backoff: Duration,
    /// Where poison messages are copied. `None` drops them after logging.
    pub dead_letter_stream: Option<String>,
    /// Deadline for each store operation.
    pub store_timeout: Duration,
    /// How record ids are assigned.
    pub id_policy: IdPolicy,
}

impl ConsumerConfig {
    /// Creates a configuration for `stream` / `group` with defaults for the rest.
    pub fn new(stream: impl Into<String>, group: impl Into<String>) -> Self {
        let stream = stream.into();
        Self {
            dead_letter_stream: Some(format!("{stream}:dead")),
            stream,
            group: group.into(),
            ..Self::default()
        }
    }

    pub fn with_consumer(mut self, consumer: impl Into<String>) -> Self {
        self.consumer = consumer.into();
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_block_timeout(mut self, timeout: Duration) -> Self {
        self.block_timeout = timeout;
        self
    }

    pub fn with_start_cursor(mut self, cursor: StartCursor) -> Self {
        self.start_cursor = cursor;
        self
    }

    pub fn with_visibility_timeout(mut self, timeout: Duration) -> Self {
        self.visibility_timeout = timeout;
        self
    }

    pub fn with_max_deliveries(mut self, max: u32) -> Self {
        self.max_deliveries = max;
        self
    }

    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    pub fn with_dead_letter_stream(mut self, stream: impl Into<String>) -> Self {
        self.dead_letter_stream = Some(stream.into());
        self
    }

    /// Poison messages are logged and acknowledged but not kept anywhere.
    pub fn without_dead_letter_stream(mut self) -> Self {
        self.dead_letter_stream = None;
        self
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    pub fn with_id_policy(mut self, policy: IdPolicy) -> Self {
        self.id_policy = policy;
        self
    }

    /// Rejects configurations the consumer cannot run with.
    pub fn validate(&self) -> Result<(), RuntimeError> {
        let invalid = |msg: &str| Err(RuntimeError::Config(msg.to_string()));

        if self.stream.is_empty() {
            return invalid("stream name is empty");
        }
        if self.group.is_empty() {
            return invalid("group name is empty");
        }
        if self.consumer.is_empty() {
            return invalid("consumer name is empty");
        }
        if self.batch_size == 0 {
            return invalid("batch size must be at least 1");
        }
        if self.max_deliveries == 0 {
            return invalid("max deliveries must be at least 1");
        }
        if self.store_timeout.is_zero() {
            return invalid("store timeout must be positive");
        }
        if self.dead_letter_stream.as_deref() == Some(self.stream.as_str()) {
            return invalid("dead-letter stream must differ from the consumed stream");
        }
        Ok(())
    }
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            stream: "ingestion_stream".to_string(),
            group: "processor_group".to_string(),
            consumer: format!("consumer-{}", std::process::id()),
            batch_size: 1,
            block_timeout: Duration::from_secs(5),
            start_cursor: StartCursor::Beginning,
            visibility_timeout: Duration::from_secs(60),
            max_deliveries: 5,
            retry_backoff: Duration::from_secs(1),
            dead_letter_stream: Some("ingestion_stream:dead".to_string()),
            store_timeout: Duration::from_secs(10),
            id_policy: IdPolicy::DerivedFromMessage,
        }
    }
}

/// Configuration for the ingestion gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Stream that asynchronous submissions are published to.
    pub stream: String,
    /// Deadline for each store operation.
    pub store_timeout: Duration,
}

impl GatewayConfig {
    pub fn new(stream: impl Into<String>) -> Self {
        Self {
            stream: stream.into(),
            ..Self::default()
        }
    }

    pub fn with_store_timeout(mut self, timeout: Duration) -> Self {
        self.store_timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<(), RuntimeError> {
        if self.stream.is_empty() {
            return Err(RuntimeError::Config("stream name is empty".into()));
        }
        if self.store_timeout.is_zero() {
            return Err(RuntimeError::Config("store timeout must be positive".into()));
        }
        Ok(())
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            stream: "ingestion_stream".to_string(),
            store_timeout: Duration::from_secs(10),
        }
    }
}
