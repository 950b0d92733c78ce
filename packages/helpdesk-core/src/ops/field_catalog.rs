//! Filterable field catalog of a doctype.

use crate::error::Result;
use crate::meta::FieldType;
use crate::permission::{check_permission, PermissionType, Session};
use crate::services::Services;
use crate::view::{FieldDescriptor, IDENTITY_FIELD};

/// Doctype the synthetic assignee field links to.
pub const AGENT_DOCTYPE: &str = "HD Agent";

/// Cache key of the catalog of `doctype`.
pub fn cache_key(doctype: &str) -> String {
    format!("get_filterable_fields::{}", doctype)
}

/// Lists the fields of `doctype` a caller can filter on.
///
/// Base schema fields come first, then custom fields, both restricted to
/// visible fields of filterable kinds, then the assignee and ID pseudo-fields.
/// The result is cached per doctype until the cache TTL runs out.
///
/// # Errors
/// `DocTypeNotFound` for unknown doctypes, `PermissionDenied` without read
/// access (checked before the cache lookup).
pub fn get_filterable_fields(
    services: &Services,
    session: &Session,
    doctype: &str,
) -> Result<Vec<FieldDescriptor>> {
    let meta = services.schema.get_meta(doctype)?;
    check_permission(
        services.permissions.as_ref(),
        session,
        doctype,
        PermissionType::Read,
    )?;

    let key = cache_key(doctype);
    if let Some(cached) = services.cache.get(&key) {
        match serde_json::from_value::<Vec<FieldDescriptor>>(cached) {
            Ok(fields) => {
                tracing::debug!("Field catalog of {} served from cache", doctype);
                return Ok(fields);
            }
            Err(e) => tracing::warn!("Discarding unreadable cached catalog {}: {}", key, e),
        }
    }

    let mut fields: Vec<FieldDescriptor> = meta
        .fields
        .iter()
        .chain(meta.custom_fields.iter())
        .filter(|field| !field.hidden && field.fieldtype.is_filterable())
        .map(FieldDescriptor::from)
        .collect();
    fields.extend(synthetic_fields());

    tracing::debug!("Resolved {} filterable fields for {}", fields.len(), doctype);
    services.cache.set(&key, serde_json::to_value(&fields)?);
    Ok(fields)
}

fn synthetic_fields() -> [FieldDescriptor; 2] {
    [
        FieldDescriptor {
            fieldname: "_assign".to_string(),
            fieldtype: FieldType::Link,
            label: "Assigned to".to_string(),
            name: "_assign".to_string(),
            options: Some(AGENT_DOCTYPE.to_string()),
        },
        FieldDescriptor {
            fieldname: IDENTITY_FIELD.to_string(),
            fieldtype: FieldType::Data,
            label: "ID".to_string(),
            name: IDENTITY_FIELD.to_string(),
            options: None,
        },
    ]
}
