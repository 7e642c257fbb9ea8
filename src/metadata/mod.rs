//! MySQL metadata access
//!
//! Discovery and the sync driver need a small amount of schema information
//! from the source: table names, column types, primary keys, and the shard
//! list. That access lives behind the [`MysqlAccess`] trait so the cores can
//! be tested without a database; [`MysqlMetadata`] is the mysql_async-backed
//! implementation.

use crate::config::SourceConfig;
use crate::error::Result;
use async_trait::async_trait;
use mysql_async::prelude::*;
use mysql_async::{Opts, OptsBuilder, Pool};

/// One column of a source table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    /// Column name
    pub name: String,
    /// Raw MySQL column type, e.g. `varchar(255)` or `tinyint(1)`
    pub column_type: String,
}

/// Schema and topology lookups against the source database
#[async_trait]
pub trait MysqlAccess: Send + Sync {
    /// Verify the source is reachable with the configured credentials
    async fn ping(&self) -> Result<()>;

    /// List the tables of the source keyspace
    async fn table_names(&self) -> Result<Vec<String>>;

    /// List the columns of one table, in ordinal order
    async fn table_columns(&self, table: &str) -> Result<Vec<ColumnDefinition>>;

    /// List the primary key columns of one table, in ordinal order
    async fn table_primary_keys(&self, table: &str) -> Result<Vec<String>>;

    /// List the shards of the source keyspace
    async fn shard_names(&self) -> Result<Vec<String>>;

    /// Tear down the underlying connection pool
    async fn close(&self) -> Result<()>;
}

/// mysql_async-backed implementation of [`MysqlAccess`]
pub struct MysqlMetadata {
    pool: Pool,
    database: String,
}

impl MysqlMetadata {
    /// Open a connection pool against the source's MySQL endpoint
    pub fn new(source: &SourceConfig) -> Self {
        let opts: Opts = OptsBuilder::default()
            .ip_or_hostname(source.host.clone())
            .user(Some(source.username.clone()))
            .pass(Some(source.password.clone()))
            .db_name(Some(source.database.clone()))
            .into();

        Self {
            pool: Pool::new(opts),
            database: source.database.clone(),
        }
    }
}

#[async_trait]
impl MysqlAccess for MysqlMetadata {
    async fn ping(&self) -> Result<()> {
        let mut conn = self.pool.get_conn().await?;
        conn.ping().await?;
        Ok(())
    }

    async fn table_names(&self) -> Result<Vec<String>> {
        let mut conn = self.pool.get_conn().await?;
        let tables: Vec<String> = conn.query("SHOW TABLES").await?;
        Ok(tables)
    }

    async fn table_columns(&self, table: &str) -> Result<Vec<ColumnDefinition>> {
        let mut conn = self.pool.get_conn().await?;
        let rows: Vec<(String, String)> = conn
            .exec(
                "SELECT column_name, column_type FROM information_schema.columns \
                 WHERE table_name = ? AND table_schema = ? ORDER BY ordinal_position",
                (table, self.database.as_str()),
            )
            .await?;

        Ok(rows
            .into_iter()
            .map(|(name, column_type)| ColumnDefinition { name, column_type })
            .collect())
    }

    async fn table_primary_keys(&self, table: &str) -> Result<Vec<String>> {
        let mut conn = self.pool.get_conn().await?;
        let keys: Vec<String> = conn
            .exec(
                "SELECT column_name FROM information_schema.columns \
                 WHERE table_schema = ? AND table_name = ? AND column_key = 'PRI' \
                 ORDER BY ordinal_position",
                (self.database.as_str(), table),
            )
            .await?;
        Ok(keys)
    }

    async fn shard_names(&self) -> Result<Vec<String>> {
        let mut conn = self.pool.get_conn().await?;
        // rows come back as "keyspace/shard"
        let rows: Vec<String> = conn.query("SHOW VITESS_SHARDS").await?;

        let prefix = format!("{}/", self.database);
        Ok(rows
            .into_iter()
            .filter_map(|row| row.strip_prefix(&prefix).map(str::to_string))
            .collect())
    }

    async fn close(&self) -> Result<()> {
        self.pool.clone().disconnect().await?;
        Ok(())
    }
}
