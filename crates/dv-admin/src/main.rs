//! `DataVault` administration CLI.
//!
//! Key generation, offline anonymize/encrypt/decrypt of single records,
//! database schema setup, and an in-memory demo of the full pipeline.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use dv_crypto::{
    DEFAULT_KEY_VAR, EncryptedBlob, EncryptionKey, blob_hash, decrypt_record, encrypt_record,
};
use dv_log::MemoryLog;
use dv_runtime::{Consumer, ConsumerConfig, ConsumerContext, Gateway, GatewayConfig};
use dv_store::{MemoryStore, PgStore, PgStoreConfig};
use dv_transform::{Anonymizer, AnonymizerConfig, Sensitivity};
use dv_types::{AnonymizedRecord, DataType, RawRecord};

/// `DataVault` administration CLI.
#[derive(Parser)]
#[command(name = "dv-admin")]
#[command(about = "DataVault administration CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a fresh 256-bit encryption key (base64).
    GenKey,

    /// Anonymize one JSON record and print the result.
    Anonymize {
        /// Input file. Reads stdin if omitted.
        input: Option<PathBuf>,

        /// Noise magnitude for moderately sensitive fields such as `age`.
        #[arg(long)]
        noise: Option<f64>,
    },

    /// Encrypt one JSON record and print the blob and its hash.
    Encrypt {
        /// Input file. Reads stdin if omitted.
        input: Option<PathBuf>,

        /// Anonymize before encrypting, as the pipeline does.
        #[arg(long)]
        anonymize: bool,

        #[command(flatten)]
        key: KeyArg,
    },

    /// Decrypt a base64 blob and print the record.
    Decrypt {
        /// Base64-encoded blob.
        blob: String,

        #[command(flatten)]
        key: KeyArg,
    },

    /// Create the records table if it does not exist.
    InitDb {
        /// Postgres connection URL.
        #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
        database_url: String,
    },

    /// Run the whole pipeline in memory on synthetic records.
    Demo {
        /// Number of records to publish.
        #[arg(short, long, default_value = "6")]
        records: usize,

        /// Number of concurrent consumers in the group.
        #[arg(short, long, default_value = "2")]
        consumers: usize,
    },
}

#[derive(clap::Args)]
struct KeyArg {
    /// Base64-encoded 256-bit key.
    #[arg(long = "key", env = DEFAULT_KEY_VAR, hide_env_values = true)]
    key: String,
}

impl KeyArg {
    fn load(&self) -> Result<EncryptionKey> {
        EncryptionKey::from_base64(&self.key)
            .with_context(|| format!("Invalid encryption key (set --key or {DEFAULT_KEY_VAR})"))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::GenKey => {
            println!("{}", EncryptionKey::generate().to_base64());
        }

        Commands::Anonymize { input, noise } => {
            let raw = read_record(input.as_ref())?;
            let mut config = AnonymizerConfig::default();
            if let Some(noise) = noise {
                config = config.with_noise(Sensitivity::Moderate, noise);
            }
            let anonymizer = Anonymizer::new(config).context("Invalid noise configuration")?;

            println!("{}", to_pretty(&anonymizer.anonymize(&raw))?);
        }

        Commands::Encrypt {
            input,
            anonymize,
            key,
        } => {
            let key = key.load()?;
            let raw = read_record(input.as_ref())?;

            let out = encrypt_output(&key, &raw, anonymize)?;
            println!("{}", serde_json::to_string_pretty(&out)?);
        }

        Commands::Decrypt { blob, key } => {
            let key = key.load()?;
            let blob = EncryptedBlob::from_base64(blob.trim()).context("Malformed blob")?;
            let record: AnonymizedRecord =
                decrypt_record(&key, &blob).context("Decryption failed")?;

            println!("{}", to_pretty(&record)?);
        }

        Commands::InitDb { database_url } => {
            let store = PgStore::connect(&PgStoreConfig::new(database_url))
                .await
                .context("Failed to connect to database")?;
            store.ensure_schema().await.context("Failed to create schema")?;
            println!("Schema ready");
        }

        Commands::Demo { records, consumers } => {
            demo(records, consumers.max(1)).await?;
        }
    }

    Ok(())
}

fn read_record(input: Option<&PathBuf>) -> Result<RawRecord> {
    let bytes = match input {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?
        }
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };
    RawRecord::from_json_bytes(&bytes).context("Input is not a JSON object")
}

/// Seals a record and reports the blob with the same fingerprint a stored
/// row would carry.
fn encrypt_output(key: &EncryptionKey, raw: &RawRecord, anonymize: bool) -> Result<serde_json::Value> {
    let blob = if anonymize {
        encrypt_record(key, &Anonymizer::default().anonymize(raw))?
    } else {
        encrypt_record(key, raw)?
    };

    Ok(json!({
        "data": blob.to_base64(),
        "data_hash": blob_hash(&blob),
    }))
}

fn to_pretty(record: &AnonymizedRecord) -> Result<String> {
    Ok(serde_json::to_string_pretty(record.fields())?)
}

// ============================================================================
// Demo
// ============================================================================

async fn demo(records: usize, consumers: usize) -> Result<()> {
    let key = Arc::new(EncryptionKey::generate());
    let log = Arc::new(MemoryLog::new());
    let store = Arc::new(MemoryStore::new());

    let gateway = Gateway::new(
        Arc::clone(&log),
        Arc::clone(&store),
        Arc::clone(&key),
        GatewayConfig::default(),
    )?;

    let (stop, shutdown) = watch::channel(false);
    let mut tasks = Vec::with_capacity(consumers);
    for i in 0..consumers {
        let config = ConsumerConfig::default()
            .with_consumer(format!("demo-{i}"))
            .with_block_timeout(Duration::from_millis(100));
        let ctx = ConsumerContext::new(Arc::clone(&log), Arc::clone(&store), Arc::clone(&key), config)?;
        let consumer = Consumer::new(ctx);
        let shutdown = shutdown.clone();
        tasks.push(tokio::spawn(async move { consumer.run(shutdown).await }));
    }

    for i in 0..records {
        let (data_type, record) = sample_record(i);
        gateway
            .publish(data_type, serde_json::to_vec(&record)?)
            .await?;
    }

    tokio::time::timeout(Duration::from_secs(10), async {
        while store.len().await < records {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .context("Consumers did not store every record in time")?;

    stop.send(true)?;
    for task in tasks {
        let stats = task.await??;
        tracing::info!(stored = stats.stored, "consumer finished");
    }

    for row in store.rows().await {
        if let Some(summary) = gateway.summarize(row.id).await? {
            println!("{}  {}  {}", row.id, &row.data_hash[..12], summary);
        }
    }
    Ok(())
}

fn sample_record(i: usize) -> (DataType, serde_json::Value) {
    const FIRST: [&str; 4] = ["Alice", "Bruno", "Chidi", "Dana"];
    const LAST: [&str; 4] = ["Smith", "Okafor", "Larsen", "Ibarra"];

    let first = FIRST[i % FIRST.len()];
    let last = LAST[i % LAST.len()];

    if i % 2 == 0 {
        let record = json!({
            "first_name": first,
            "last_name": last,
            "age": 25 + (i * 7) % 50,
            "patient_id": format!("P{i:04}"),
            "diagnosis": "Hypertension",
            "treatment_plan": "Lifestyle changes",
        });
        (DataType::Healthcare, record)
    } else {
        let record = json!({
            "first_name": first,
            "last_name": last,
            "age": 30 + (i * 5) % 40,
            "account_hash": format!("acct-{i:04}"),
            "transaction_type": "transfer",
            "amount": 100 + i * 25,
        });
        (DataType::Finance, record)
    }
}
