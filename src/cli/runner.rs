//! CLI runner - executes commands

use crate::catalog::{validate_catalog, Catalog, Stream};
use crate::cli::commands::{Cli, Commands};
use crate::config::SourceConfig;
use crate::discover::{discover, DiscoverSettings};
use crate::error::{Error, Result};
use crate::metadata::{MysqlAccess, MysqlMetadata};
use crate::sink::{HttpBatchSink, Record, RecordSink, SingerSink};
use crate::state::{self, State, WrappedState};
use crate::sync::ShardReader;
use crate::upstream::{EdgeConnector, TabletType};
use serde::Deserialize;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Discover {
                auto_select,
                excluded_tables,
                treat_tiny_int_as_boolean,
                default_incremental,
            } => {
                self.discover(
                    *auto_select,
                    excluded_tables.as_deref(),
                    *treat_tiny_int_as_boolean,
                    *default_incremental,
                )
                .await
            }
            Commands::Sync {
                catalog,
                state,
                use_replica,
                use_rdonly,
                treat_tiny_int_as_boolean,
                buffer_size,
                api_url,
                api_token,
                batch_size,
                state_directory,
            } => {
                let tablet_type = if *use_replica {
                    TabletType::Replica
                } else if *use_rdonly {
                    TabletType::Rdonly
                } else {
                    TabletType::Primary
                };

                self.sync(SyncArgs {
                    catalog_path: catalog,
                    state_path: state.as_deref(),
                    tablet_type,
                    treat_tiny_int_as_boolean: *treat_tiny_int_as_boolean,
                    buffer_size: *buffer_size,
                    api_url: api_url.as_deref(),
                    api_token: api_token.as_deref(),
                    batch_size: *batch_size,
                    state_directory,
                })
                .await
            }
            Commands::Commit {
                api_url,
                api_token,
                batch_size,
                state_directory,
            } => {
                let mut sink =
                    HttpBatchSink::new(api_url.clone(), api_token, state_directory, *batch_size);
                let stdin = std::io::stdin();
                commit(stdin.lock(), &mut sink).await
            }
        }
    }

    /// Load the source configuration
    fn load_config(&self) -> Result<SourceConfig> {
        let path = self
            .cli
            .config
            .as_ref()
            .ok_or_else(|| Error::config("config file not specified (use --config)"))?;
        SourceConfig::from_file(path)
    }

    /// Discover the source's tables and print the catalog
    async fn discover(
        &self,
        auto_select: bool,
        excluded_tables: Option<&str>,
        treat_tiny_int_as_boolean: bool,
        default_incremental: bool,
    ) -> Result<()> {
        let source = self.load_config()?;
        info!("discovering schema for database {:?}", source.database);

        let settings = DiscoverSettings {
            auto_select_tables: auto_select,
            excluded_tables: excluded_tables
                .map(|tables| tables.split(',').map(|t| t.trim().to_string()).collect())
                .unwrap_or_default(),
            treat_tiny_int_as_boolean,
            default_incremental,
        };

        let mysql = MysqlMetadata::new(&source);
        let result = discover(&source, &mysql, &settings).await;
        mysql.close().await?;

        println!("{}", serde_json::to_string(&result?)?);
        Ok(())
    }

    /// Sync the selected catalog into the chosen sink
    async fn sync(&self, args: SyncArgs<'_>) -> Result<()> {
        let source = self.load_config()?;

        let catalog: Catalog = parse_json_file(args.catalog_path)
            .map_err(|e| Error::catalog(format!("catalog file is invalid: {e}")))?;
        validate_catalog(&catalog, args.treat_tiny_int_as_boolean)?;

        let loaded_state = match args.state_path {
            Some(path) => state::load(path)?,
            None => State::new(),
        };

        let connector = Arc::new(EdgeConnector::new(&source));
        let reader = ShardReader::new(connector);
        let mysql = MysqlMetadata::new(&source);

        let result = match (args.api_url, args.api_token) {
            (Some(api_url), Some(api_token)) => {
                let mut sink =
                    HttpBatchSink::new(api_url, api_token, args.state_directory, args.batch_size);
                crate::sync::sync(
                    &source,
                    &mysql,
                    &reader,
                    &catalog,
                    loaded_state,
                    &mut sink,
                    args.tablet_type,
                )
                .await
            }
            _ => {
                let mut sink = SingerSink::new(std::io::stdout(), args.buffer_size);
                crate::sync::sync(
                    &source,
                    &mysql,
                    &reader,
                    &catalog,
                    loaded_state,
                    &mut sink,
                    args.tablet_type,
                )
                .await
            }
        };
        mysql.close().await?;
        result.map(|_| ())
    }
}

/// Parse a JSON file into the requested type
fn parse_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

struct SyncArgs<'a> {
    catalog_path: &'a Path,
    state_path: Option<&'a Path>,
    tablet_type: TabletType,
    treat_tiny_int_as_boolean: bool,
    buffer_size: usize,
    api_url: Option<&'a str>,
    api_token: Option<&'a str>,
    batch_size: usize,
    state_directory: &'a PathBuf,
}

/// One line of a Singer NDJSON stream
#[derive(Debug)]
pub enum SingerMessage {
    /// A stream definition
    Schema(Box<Stream>),
    /// One data point
    Record(Box<Record>),
    /// A checkpoint to persist
    State(State),
}

/// Parse one NDJSON line into its Singer message
pub fn parse_message(line: &str) -> Result<SingerMessage> {
    #[derive(Deserialize)]
    struct MessageType {
        #[serde(rename = "type")]
        kind: String,
    }

    let message: MessageType = serde_json::from_str(line)?;
    match message.kind.as_str() {
        "SCHEMA" => Ok(SingerMessage::Schema(Box::new(serde_json::from_str(line)?))),
        "RECORD" => Ok(SingerMessage::Record(Box::new(serde_json::from_str(line)?))),
        "STATE" => {
            let wrapped: WrappedState = serde_json::from_str(line)?;
            Ok(SingerMessage::State(wrapped.value))
        }
        other => Err(Error::sink(format!("unknown message type: {other}"))),
    }
}

/// Route a Singer NDJSON stream into a sink
///
/// Records accumulate under the most recent schema; a schema change flushes
/// what came before it, and everything left is flushed at end of input.
pub async fn commit(input: impl BufRead, sink: &mut dyn RecordSink) -> Result<()> {
    let mut current: Option<Stream> = None;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match parse_message(&line)? {
            SingerMessage::Schema(stream) => {
                if let Some(previous) = current.take() {
                    if previous.name != stream.name {
                        sink.flush(&previous).await?;
                    }
                }
                sink.schema(&stream).await?;
                current = Some(*stream);
            }
            SingerMessage::Record(record) => {
                let stream = current
                    .as_ref()
                    .ok_or_else(|| Error::sink("RECORD arrived before any SCHEMA"))?;
                sink.record(*record, stream).await?;
            }
            SingerMessage::State(state) => {
                sink.state(&state).await?;
            }
        }
    }

    if let Some(stream) = current {
        sink.flush(&stream).await?;
    }

    Ok(())
}
