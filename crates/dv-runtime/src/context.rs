//! Per-process consumer context.
//!
//! Built once at startup with the log client, store handle and key, then
//! handed to the polling task. There is no ambient global state.

use std::sync::Arc;

use dv_crypto::EncryptionKey;
use dv_kernel::DeliveryPolicy;
use dv_log::StreamLog;
use dv_store::{RecordStore, TimeoutStore};
use dv_transform::Anonymizer;

use crate::RuntimeError;
use crate::config::ConsumerConfig;
use crate::pipeline::Pipeline;

/// Everything one consumer needs, owned in one place.
#[derive(Debug)]
pub struct ConsumerContext<L, S> {
    pub(crate) log: L,
    pub(crate) store: TimeoutStore<S>,
    pub(crate) pipeline: Pipeline,
    pub(crate) config: ConsumerConfig,
    pub(crate) policy: DeliveryPolicy,
}

impl<L, S> ConsumerContext<L, S>
where
    L: StreamLog,
    S: RecordStore,
{
    /// Builds a context with the default anonymizer.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::Config`] if `config` fails validation.
    pub fn new(
        log: L,
        store: S,
        key: Arc<EncryptionKey>,
        config: ConsumerConfig,
    ) -> Result<Self, RuntimeError> {
        Self::with_anonymizer(log, store, key, config, Anonymizer::default())
    }

    pub fn with_anonymizer(
        log: L,
        store: S,
        key: Arc<EncryptionKey>,
        config: ConsumerConfig,
        anonymizer: Anonymizer,
    ) -> Result<Self, RuntimeError> {
        config.validate()?;

        Ok(Self {
            log,
            store: TimeoutStore::new(store, config.store_timeout),
            pipeline: Pipeline::new(anonymizer, key),
            policy: DeliveryPolicy::new(config.max_deliveries),
            config,
        })
    }

    pub fn config(&self) -> &ConsumerConfig {
        &self.config
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    pub fn store(&self) -> &S {
        self.store.inner()
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }
}
