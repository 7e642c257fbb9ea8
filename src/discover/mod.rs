//! Schema discovery
//!
//! Builds the Singer catalog for a source database: one stream per table,
//! column types mapped to JSON-schema properties, key columns marked for
//! automatic inclusion.

use crate::catalog::{Catalog, Stream, StreamProperty, StreamSchema};
use crate::config::SourceConfig;
use crate::error::{Error, Result};
use crate::metadata::MysqlAccess;
use std::collections::BTreeMap;
use tracing::debug;

/// Options controlling discovery output
#[derive(Debug, Clone, Default)]
pub struct DiscoverSettings {
    /// Mark discovered tables and columns as selected
    pub auto_select_tables: bool,

    /// Tables to leave out of the catalog
    pub excluded_tables: Vec<String>,

    /// Type tinyint(1) columns as boolean instead of integer
    pub treat_tiny_int_as_boolean: bool,

    /// Mark discovered streams for incremental replication
    pub default_incremental: bool,
}

/// Enumerate the source's tables into a catalog
pub async fn discover(
    source: &SourceConfig,
    mysql: &dyn MysqlAccess,
    settings: &DiscoverSettings,
) -> Result<Catalog> {
    mysql
        .ping()
        .await
        .map_err(|e| Error::metadata(format!("unable to access source database: {e}")))?;

    let table_names = mysql
        .table_names()
        .await
        .map_err(|e| Error::metadata(format!("unable to retrieve table names: {e}")))?;

    let mut catalog = Catalog::default();

    for name in table_names {
        if settings.excluded_tables.iter().any(|t| t == &name) {
            debug!("skipping excluded table {name:?}");
            continue;
        }

        let columns = mysql.table_columns(&name).await.map_err(|e| {
            Error::metadata(format!("unable to retrieve schema for table {name:?}: {e}"))
        })?;
        let keys = mysql.table_primary_keys(&name).await.map_err(|e| {
            Error::metadata(format!(
                "unable to retrieve primary keys for table {name:?}: {e}"
            ))
        })?;

        let mut properties = BTreeMap::new();
        let mut sql_types = BTreeMap::new();
        for column in &columns {
            properties.insert(
                column.name.clone(),
                json_schema_type(&column.column_type, settings.treat_tiny_int_as_boolean),
            );
            sql_types.insert(column.name.clone(), column.column_type.clone());
        }

        let mut stream = Stream {
            name: name.clone(),
            id: format!("{}:{}", source.database, name),
            table_name: name,
            schema: StreamSchema::object(properties),
            key_properties: keys.clone(),
            cursor_properties: keys.clone(),
            ..Stream::default()
        };
        stream.generate_metadata(
            &keys,
            &sql_types,
            &source.database,
            settings.auto_select_tables,
            settings.default_incremental,
        );

        catalog.streams.push(stream);
    }

    Ok(catalog)
}

/// Map a raw MySQL column type to its Singer property definition
fn json_schema_type(mysql_type: &str, treat_tiny_int_as_boolean: bool) -> StreamProperty {
    if mysql_type == "tinyint(1)" {
        return if treat_tiny_int_as_boolean {
            StreamProperty::of("boolean")
        } else {
            StreamProperty::of("integer")
        };
    }

    if mysql_type.starts_with("bigint") {
        return StreamProperty::of("number");
    }

    if mysql_type.starts_with("int")
        || mysql_type.starts_with("tinyint")
        || mysql_type.starts_with("smallint")
        || mysql_type.starts_with("mediumint")
    {
        return StreamProperty::of("integer");
    }

    if mysql_type.starts_with("float")
        || mysql_type.starts_with("double")
        || mysql_type.starts_with("decimal")
    {
        return StreamProperty::of("number");
    }

    if mysql_type.starts_with("datetime") || mysql_type.starts_with("timestamp") {
        return StreamProperty::with_format("string", "date-time");
    }

    StreamProperty::of("string")
}
