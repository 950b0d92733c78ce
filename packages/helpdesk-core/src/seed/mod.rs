//! Setup and migration routines run outside request handling.

mod ticket_type;

pub use ticket_type::{
    create_fallback_ticket_type, create_ootb_ticket_types, disable_ticket_types, DisableReport,
    DEFAULT_TICKET_TYPE, ENABLED_TICKET_TYPES, PARENT_TICKET_TYPE_DOCTYPE, TICKET_TYPES,
    TICKET_TYPE_DOCTYPE,
};
