//! Contact form posted as JSON to the contact endpoint

use super::field::{FieldDescriptor, FieldKind};
use super::form_state::FormFields;
use super::validation::Rule;

pub static CONTACT_FIELDS: [FieldDescriptor; 3] = [
    FieldDescriptor {
        id: "name",
        label: "Name *",
        kind: FieldKind::Text,
        rules: &[Rule::Required("Please enter your name.")],
    },
    FieldDescriptor {
        id: "email",
        label: "Email *",
        kind: FieldKind::Text,
        rules: &[Rule::Email("Enter a valid email address.")],
    },
    FieldDescriptor {
        id: "message",
        label: "Message *",
        kind: FieldKind::Multiline,
        rules: &[Rule::Required("Please enter your message.")],
    },
];

/// State of the contact view
#[derive(Debug, Clone)]
pub struct ContactForm {
    pub fields: FormFields,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactForm {
    pub fn new() -> Self {
        Self {
            fields: FormFields::new(&CONTACT_FIELDS),
        }
    }

    /// Submit stays disabled until every field validates
    pub fn can_submit(&self) -> bool {
        self.fields.is_valid()
    }
}
