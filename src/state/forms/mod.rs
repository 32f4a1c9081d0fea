//! Form domain layer
//!
//! Generic field, validation and progression machinery, plus the concrete
//! forms of each view.

mod account;
mod contact;
mod field;
mod form_state;
mod id_request;
mod section_gate;
mod step;
mod ticket;
mod validation;

pub use account::{RegistrationForm, SignInForm};
pub use contact::ContactForm;
pub use field::{FieldKind, FieldValue, FormField};
pub use form_state::{Form, FormFields};
pub use id_request::{IdRequestForm, IdRequestStep};
pub use step::StepGroup;
pub use ticket::{priority_notice, TicketForm, TicketSection};

#[cfg(test)]
pub use field::{Attachment, FieldDescriptor};
#[cfg(test)]
pub use validation::Rule;
