//! Remotely callable list operations.

mod field_catalog;
mod list_view;
mod sort_options;

pub use field_catalog::{cache_key, get_filterable_fields, AGENT_DOCTYPE};
pub use list_view::{
    default_columns, get_list_data, get_tickets_list, standard_fields, ListRequest,
    DEFAULT_PAGE_LENGTH, EMPLOYEE_DOCTYPE, TODO_DOCTYPE,
};
pub use sort_options::sort_options;
