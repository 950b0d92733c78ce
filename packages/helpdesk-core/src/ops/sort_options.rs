//! Sort keys offered by list views.

use crate::error::Result;
use crate::permission::{check_permission, PermissionType, Session};
use crate::services::Services;
use crate::view::{SortOption, IDENTITY_FIELD};

/// Lists the `{label, value}` sort keys of `doctype`: every labelled value
/// field of the full schema, then the standard bookkeeping keys.
///
/// # Errors
/// `PermissionDenied` without read access, `DocTypeNotFound` for unknown doctypes.
pub fn sort_options(
    services: &Services,
    session: &Session,
    doctype: &str,
) -> Result<Vec<SortOption>> {
    let meta = services.schema.get_meta(doctype)?;
    check_permission(
        services.permissions.as_ref(),
        session,
        doctype,
        PermissionType::Read,
    )?;

    let mut options: Vec<SortOption> = meta
        .all_fields()
        .into_iter()
        .filter(|field| !field.fieldtype.is_no_value())
        .filter_map(|field| {
            field
                .label()
                .filter(|_| !field.fieldname.is_empty())
                .map(|label| SortOption::new(label, &field.fieldname))
        })
        .collect();
    options.extend([
        SortOption::new("Name", IDENTITY_FIELD),
        SortOption::new("Created On", "creation"),
        SortOption::new("Last Modified", "modified"),
        SortOption::new("Modified By", "modified_by"),
        SortOption::new("Owner", "owner"),
    ]);
    Ok(options)
}
