//! Built-in helpdesk doctypes, their list controllers and default role grants.

use std::sync::Arc;

use crate::error::Result;
use crate::meta::{
    DefaultListData, DocField, DocMeta, FieldType, HasDefaultListData, InMemorySchemaRegistry,
};
use crate::permission::PermissionType;
use crate::services::Site;
use crate::view::ColumnSpec;

pub use crate::ops::AGENT_DOCTYPE;

pub const TICKET_DOCTYPE: &str = "HD Ticket";

/// Doctypes installed on a fresh site.
pub const HELPDESK_DOCTYPES: [&str; 6] = [
    TICKET_DOCTYPE,
    "HD Ticket Type",
    "HD Parent Ticket Type",
    AGENT_DOCTYPE,
    "Employee",
    "ToDo",
];

/// Roles allowed to read every helpdesk doctype.
pub const READER_ROLES: [&str; 2] = ["Agent", "System Manager"];

/// Schemas of [`HELPDESK_DOCTYPES`].
pub fn doctypes() -> Vec<DocMeta> {
    vec![
        DocMeta::new(
            TICKET_DOCTYPE,
            vec![
                DocField::new("subject", FieldType::Data, "Subject"),
                DocField::new("raised_by", FieldType::Data, "Raised By (Email)")
                    .with_options("Email"),
                DocField::new("status", FieldType::Select, "Status")
                    .with_options("Open\nReplied\nPaused\nResolved\nClosed"),
                DocField::new("priority", FieldType::Link, "Priority")
                    .with_options("HD Ticket Priority"),
                DocField::new("ticket_type", FieldType::Link, "Ticket Type")
                    .with_options("HD Ticket Type"),
                DocField::new("agent_group", FieldType::Link, "Team").with_options("HD Team"),
                DocField::new("customer", FieldType::Link, "Customer").with_options("HD Customer"),
                DocField::layout("sla_section", FieldType::SectionBreak),
                DocField::new("opening_date", FieldType::Date, "Opening Date"),
                DocField::new("response_by", FieldType::Datetime, "Response By"),
                DocField::new("resolution_by", FieldType::Datetime, "Resolution By"),
                DocField::layout("column_break_1", FieldType::ColumnBreak),
                DocField::new("first_responded_on", FieldType::Datetime, "First Responded On")
                    .hidden(),
                DocField::new("via_customer_portal", FieldType::Check, "Via Customer Portal")
                    .hidden(),
                DocField::layout("details_section", FieldType::SectionBreak),
                DocField::new("description", FieldType::TextEditor, "Description"),
                DocField::new("feedback_rating", FieldType::Rating, "Feedback Rating"),
                DocField::new("contact", FieldType::Link, "Contact").with_options("Contact"),
            ],
        ),
        DocMeta::new(
            "HD Ticket Type",
            vec![
                DocField::new("description", FieldType::SmallText, "Description"),
                DocField::new("parent_ticket_type", FieldType::Link, "Parent Ticket Type")
                    .with_options("HD Parent Ticket Type"),
                DocField::new("priority", FieldType::Link, "Priority")
                    .with_options("HD Ticket Priority"),
                DocField::new("is_system", FieldType::Check, "Is System"),
                DocField::new("disabled", FieldType::Check, "Disabled"),
            ],
        ),
        DocMeta::new(
            "HD Parent Ticket Type",
            vec![
                DocField::new("description", FieldType::SmallText, "Description"),
                DocField::new("disabled", FieldType::Check, "Disabled"),
            ],
        ),
        DocMeta::new(
            AGENT_DOCTYPE,
            vec![
                DocField::new("user", FieldType::Link, "User").with_options("User"),
                DocField::new("agent_name", FieldType::Data, "Agent Name"),
                DocField::new("user_image", FieldType::AttachImage, "User Image"),
                DocField::new("is_active", FieldType::Check, "Is Active"),
            ],
        ),
        DocMeta::new(
            "Employee",
            vec![
                DocField::new("employee_name", FieldType::Data, "Full Name"),
                DocField::new("user_id", FieldType::Link, "User ID").with_options("User"),
                DocField::new("department", FieldType::Link, "Department")
                    .with_options("Department"),
                DocField::new("reports_to", FieldType::Link, "Reports To")
                    .with_options("Employee"),
                DocField::new("reports_to_email", FieldType::Data, "Reports To Email")
                    .with_options("Email"),
            ],
        ),
        DocMeta::new(
            "ToDo",
            vec![
                DocField::new("status", FieldType::Select, "Status")
                    .with_options("Open\nClosed\nCancelled"),
                DocField::new("priority", FieldType::Select, "Priority")
                    .with_options("High\nMedium\nLow"),
                DocField::new("allocated_to", FieldType::Link, "Allocated To")
                    .with_options("User"),
                DocField::new("description", FieldType::TextEditor, "Description"),
                DocField::new("reference_type", FieldType::Link, "Reference Type")
                    .with_options("DocType"),
                DocField::new("reference_name", FieldType::DynamicLink, "Reference Name")
                    .with_options("reference_type"),
            ],
        ),
    ]
}

/// Default ticket list layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct TicketListLayout;

impl HasDefaultListData for TicketListLayout {
    fn default_list_data(&self) -> DefaultListData {
        DefaultListData {
            columns: vec![
                ColumnSpec::new("Subject", FieldType::Data, "subject", "25rem"),
                ColumnSpec::new("Status", FieldType::Select, "status", "8rem"),
                ColumnSpec::new("Priority", FieldType::Link, "priority", "10rem"),
                ColumnSpec::new("Type", FieldType::Link, "ticket_type", "10rem"),
                ColumnSpec::new("Team", FieldType::Link, "agent_group", "10rem"),
                ColumnSpec::new("First response", FieldType::Datetime, "response_by", "8rem"),
                ColumnSpec::new("Resolution", FieldType::Datetime, "resolution_by", "8rem"),
                ColumnSpec::new("Created", FieldType::Datetime, "creation", "8rem"),
            ],
            rows: [
                "name",
                "subject",
                "status",
                "priority",
                "ticket_type",
                "agent_group",
                "raised_by",
                "response_by",
                "resolution_by",
                "first_responded_on",
                "creation",
                "modified",
                "_assign",
            ]
            .iter()
            .map(|row| row.to_string())
            .collect(),
        }
    }
}

/// Default agent list layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct AgentListLayout;

impl HasDefaultListData for AgentListLayout {
    fn default_list_data(&self) -> DefaultListData {
        DefaultListData {
            columns: vec![
                ColumnSpec::new("Name", FieldType::Data, "agent_name", "16rem"),
                ColumnSpec::new("Email", FieldType::Data, "user", "16rem"),
                ColumnSpec::new("Active", FieldType::Check, "is_active", "6rem"),
                ColumnSpec::new("Created", FieldType::Datetime, "creation", "8rem"),
            ],
            rows: ["name", "agent_name", "user", "user_image", "is_active", "creation"]
                .iter()
                .map(|row| row.to_string())
                .collect(),
        }
    }
}

/// Attaches the built-in list controllers.
pub fn install_controllers(registry: &InMemorySchemaRegistry) -> Result<()> {
    registry.set_controller(TICKET_DOCTYPE, Arc::new(TicketListLayout))?;
    registry.set_controller(AGENT_DOCTYPE, Arc::new(AgentListLayout))?;
    Ok(())
}

/// Installs doctypes, controllers and default grants on a fresh site.
pub fn install(site: &Site) -> Result<()> {
    for meta in doctypes() {
        site.registry.register(meta)?;
    }
    install_controllers(&site.registry)?;
    for doctype in HELPDESK_DOCTYPES {
        for role in READER_ROLES {
            site.permissions
                .grant(doctype, role, &[PermissionType::Read])?;
        }
    }
    tracing::info!("Installed {} helpdesk doctypes", HELPDESK_DOCTYPES.len());
    Ok(())
}
