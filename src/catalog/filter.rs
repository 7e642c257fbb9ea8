//! Catalog selection filter
//!
//! Projects a user-supplied catalog down to the selected streams and
//! properties before a sync run. Key columns survive the projection no
//! matter how they are marked.

use super::types::{Catalog, Metadata, MetadataCollection};
use crate::error::{Error, Result};
use crate::types::Inclusion;

/// Return a catalog containing only the selected streams and properties
///
/// A stream is kept when its table-level metadata has `selected=true`. A
/// property is kept when its own metadata has `selected=true` or
/// `inclusion=automatic`, or when it is one of the stream's key properties.
/// Metadata entries for retained properties are preserved, as is the
/// stream-level entry.
pub fn filter_catalog(catalog: &Catalog) -> Result<Catalog> {
    let mut filtered = Catalog {
        kind: "CATALOG".to_string(),
        streams: Vec::new(),
    };

    for stream in &catalog.streams {
        let table_metadata = stream.metadata.table_metadata(&stream.name)?;
        if !table_metadata.metadata.selected {
            continue;
        }

        let property_map = stream.metadata.property_map();
        let mut kept = stream.clone();
        kept.schema.properties.clear();
        let mut kept_metadata: Vec<Metadata> = vec![table_metadata.clone()];

        for (name, property) in &stream.schema.properties {
            let node = property_map.get(name.as_str());
            let selected = node.is_some_and(|m| m.metadata.selected);
            let automatic =
                node.is_some_and(|m| m.metadata.inclusion == Some(Inclusion::Automatic));
            let is_key = stream.key_properties.contains(name);

            if selected || automatic || is_key {
                kept.schema.properties.insert(name.clone(), property.clone());
                if let Some(m) = node {
                    kept_metadata.push((*m).clone());
                }
            }
        }

        kept.metadata = MetadataCollection(kept_metadata);
        filtered.streams.push(kept);
    }

    Ok(filtered)
}

/// Reject catalogs whose tinyint(1) columns contradict the boolean setting
///
/// The tinyint-as-boolean choice is made at discovery time and is not
/// reversible through state; a catalog discovered under the other setting is
/// rejected here when the recorded `sql-datatype` makes that detectable.
pub fn validate_catalog(catalog: &Catalog, treat_tiny_int_as_boolean: bool) -> Result<()> {
    for stream in &catalog.streams {
        let property_map = stream.metadata.property_map();
        for (name, property) in &stream.schema.properties {
            let sql_datatype = property_map
                .get(name.as_str())
                .map(|m| m.metadata.sql_datatype.as_str())
                .unwrap_or_default();
            if sql_datatype != "tinyint(1)" {
                continue;
            }

            if treat_tiny_int_as_boolean && property.is_integer() {
                return Err(Error::catalog(format!(
                    "column {}.{name} was discovered as integer, but tinyint(1) \
                     columns are now treated as boolean; re-run discovery",
                    stream.name
                )));
            }
            if !treat_tiny_int_as_boolean && property.is_boolean() {
                return Err(Error::catalog(format!(
                    "column {}.{name} was discovered as boolean, but tinyint(1) \
                     columns are now treated as integer; re-run discovery",
                    stream.name
                )));
            }
        }
    }

    Ok(())
}
