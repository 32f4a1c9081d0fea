//! Sign-in and registration forms

use super::field::{FieldDescriptor, FieldKind};
use super::form_state::FormFields;
use super::validation::Rule;

pub static SIGN_IN_FIELDS: [FieldDescriptor; 2] = [
    FieldDescriptor {
        id: "email",
        label: "Email",
        kind: FieldKind::Text,
        rules: &[Rule::Required("Email is required")],
    },
    FieldDescriptor {
        id: "password",
        label: "Password",
        kind: FieldKind::Secret,
        rules: &[Rule::Required("Password is required")],
    },
];

pub static REGISTRATION_FIELDS: [FieldDescriptor; 5] = [
    FieldDescriptor {
        id: "fullName",
        label: "Full Name",
        kind: FieldKind::Text,
        rules: &[Rule::Required("Please fill in all required fields.")],
    },
    FieldDescriptor {
        id: "email",
        label: "Email Address",
        kind: FieldKind::Text,
        rules: &[Rule::Required("Please fill in all required fields.")],
    },
    FieldDescriptor {
        id: "password",
        label: "Password",
        kind: FieldKind::Secret,
        rules: &[Rule::Required("Please fill in all required fields.")],
    },
    FieldDescriptor {
        id: "confirmPassword",
        label: "Confirm Password",
        kind: FieldKind::Secret,
        rules: &[],
    },
    FieldDescriptor {
        id: "agreeToTerms",
        label: "I agree to the Terms and Conditions",
        kind: FieldKind::Checkbox,
        rules: &[Rule::Checked("You must agree to the terms and conditions.")],
    },
];

/// State of the sign-in view
#[derive(Debug, Clone)]
pub struct SignInForm {
    pub fields: FormFields,
    /// Message from the last failed attempt
    pub error: Option<String>,
    /// Informational banner, e.g. after registration
    pub notice: Option<String>,
}

impl Default for SignInForm {
    fn default() -> Self {
        Self::new()
    }
}

impl SignInForm {
    pub fn new() -> Self {
        Self {
            fields: FormFields::new(&SIGN_IN_FIELDS),
            error: None,
            notice: None,
        }
    }

    /// Credentials if both fields are filled, revealing messages otherwise
    pub fn credentials(&mut self) -> Option<(String, String)> {
        if !self.fields.is_valid() {
            self.fields.reveal_all();
            return None;
        }
        Some((
            self.fields.text("email").trim().to_string(),
            self.fields.text("password").to_string(),
        ))
    }
}

/// State of the registration view
#[derive(Debug, Clone)]
pub struct RegistrationForm {
    pub fields: FormFields,
    pub error: Option<String>,
}

impl Default for RegistrationForm {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationForm {
    pub fn new() -> Self {
        Self {
            fields: FormFields::new(&REGISTRATION_FIELDS),
            error: None,
        }
    }

    /// Check the form, recording the first problem in `error`.
    ///
    /// Terms are checked first, then the password confirmation, then the
    /// remaining required fields.
    pub fn check(&mut self) -> bool {
        self.error = self.first_problem().map(str::to_string);
        self.error.is_none()
    }

    fn first_problem(&self) -> Option<&'static str> {
        if !self.fields.all_valid(&["agreeToTerms"]) {
            return Some("You must agree to the terms and conditions.");
        }
        if self.fields.text("password") != self.fields.text("confirmPassword") {
            return Some("Passwords do not match.");
        }
        if !self.fields.all_valid(&["fullName", "email", "password"]) {
            return Some("Please fill in all required fields.");
        }
        None
    }
}
