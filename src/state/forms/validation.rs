//! Field validation rules

use super::field::{FieldDescriptor, FieldKind, FieldValue};
use once_cell::sync::Lazy;
use regex::Regex;

/// Local part, a single `@`, and a dotted domain with no whitespace.
static EMAIL_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+'-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$")
        .expect("email pattern is valid")
});

/// A single declarative constraint on a field value.
///
/// Rules are checked in declaration order; the first failure wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Text must contain something other than whitespace
    Required(&'static str),
    /// Text must be at least this many characters long
    MinLength(usize, &'static str),
    /// Text must look like an email address
    Email(&'static str),
    /// A file must be attached
    FileSelected(&'static str),
    /// Value must be one of the field's declared options
    OneOf(&'static str),
    /// Checkbox must be ticked
    Checked(&'static str),
}

impl Rule {
    fn message(&self) -> &'static str {
        match self {
            Rule::Required(m)
            | Rule::MinLength(_, m)
            | Rule::Email(m)
            | Rule::FileSelected(m)
            | Rule::OneOf(m)
            | Rule::Checked(m) => m,
        }
    }

    fn accepts(&self, kind: &FieldKind, value: &FieldValue) -> bool {
        match self {
            Rule::Required(_) => !value.submitted_text().trim().is_empty(),
            Rule::MinLength(min, _) => value.submitted_text().chars().count() >= *min,
            Rule::Email(_) => EMAIL_SHAPE.is_match(value.submitted_text().trim()),
            Rule::FileSelected(_) => matches!(value, FieldValue::File(Some(_))),
            Rule::OneOf(_) => match (kind, value) {
                (FieldKind::Choice { options, .. }, FieldValue::Choice(selected)) => {
                    options.iter().any(|o| o.value == selected.as_str())
                }
                (FieldKind::Choice { allow_other, .. }, FieldValue::Other(text)) => {
                    *allow_other && !text.trim().is_empty()
                }
                _ => false,
            },
            Rule::Checked(_) => matches!(value, FieldValue::Flag(true)),
        }
    }
}

/// Outcome of validating one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid: bool,
    pub message: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }
}

/// Validate a raw value against a field's declared rules
pub fn validate(descriptor: &FieldDescriptor, value: &FieldValue) -> ValidationResult {
    descriptor
        .rules
        .iter()
        .find(|rule| !rule.accepts(&descriptor.kind, value))
        .map(|rule| ValidationResult::invalid(rule.message()))
        .unwrap_or_else(ValidationResult::ok)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::field::{Attachment, ChoiceOption};
    use std::path::PathBuf;

    const NAME: FieldDescriptor = FieldDescriptor {
        id: "name",
        label: "Name",
        kind: FieldKind::Text,
        rules: &[Rule::Required("Name is required")],
    };

    const SUBJECT: FieldDescriptor = FieldDescriptor {
        id: "subject",
        label: "Subject",
        kind: FieldKind::Text,
        rules: &[Rule::MinLength(5, "Subject must be at least 5 characters")],
    };

    const EMAIL: FieldDescriptor = FieldDescriptor {
        id: "email",
        label: "Email",
        kind: FieldKind::Text,
        rules: &[Rule::Email("Please enter a valid email address")],
    };

    const PHOTO: FieldDescriptor = FieldDescriptor {
        id: "photo",
        label: "Photo",
        kind: FieldKind::File,
        rules: &[Rule::FileSelected("Photo is required")],
    };

    const KINDS: &[ChoiceOption] = &[
        ChoiceOption::new("Desktop", "Desktop"),
        ChoiceOption::new("Printer", "Printer"),
    ];

    const ISSUE_TYPE: FieldDescriptor = FieldDescriptor {
        id: "issueType",
        label: "Issue Type",
        kind: FieldKind::Choice {
            options: KINDS,
            allow_other: true,
        },
        rules: &[Rule::OneOf("Please select the issue type")],
    };

    const TERMS: FieldDescriptor = FieldDescriptor {
        id: "terms",
        label: "I agree",
        kind: FieldKind::Checkbox,
        rules: &[Rule::Checked("You must agree to the terms and conditions.")],
    };

    fn text(s: &str) -> FieldValue {
        FieldValue::Text(s.to_string())
    }

    #[test]
    fn test_required_rejects_empty() {
        let result = validate(&NAME, &text(""));
        assert!(!result.valid);
        assert_eq!(result.message.as_deref(), Some("Name is required"));
    }

    #[test]
    fn test_required_rejects_whitespace_only() {
        assert!(!validate(&NAME, &text("   ")).valid);
    }

    #[test]
    fn test_required_accepts_non_empty() {
        assert_eq!(validate(&NAME, &text("Jane Doe")), ValidationResult::ok());
    }

    #[test]
    fn test_min_length_boundary() {
        assert!(!validate(&SUBJECT, &text("abcd")).valid);
        assert!(validate(&SUBJECT, &text("abcde")).valid);
    }

    #[test]
    fn test_min_length_counts_chars_not_bytes() {
        assert!(validate(&SUBJECT, &text("ñañañ")).valid);
    }

    #[test]
    fn test_email_accepts_simple_address() {
        assert!(validate(&EMAIL, &text("a@b.com")).valid);
        assert!(validate(&EMAIL, &text("it.support+desk@citimax.ph")).valid);
    }

    #[test]
    fn test_email_rejects_malformed() {
        for bad in ["not-an-email", "a@b", "@b.com", "a b@c.com", "a@@b.com", "a@.com", ""] {
            assert!(!validate(&EMAIL, &text(bad)).valid, "{bad} should be invalid");
        }
    }

    #[test]
    fn test_first_failing_rule_wins() {
        const BOTH: FieldDescriptor = FieldDescriptor {
            id: "email",
            label: "Email",
            kind: FieldKind::Text,
            rules: &[Rule::Required("required"), Rule::Email("shape")],
        };
        assert_eq!(validate(&BOTH, &text("")).message.as_deref(), Some("required"));
        assert_eq!(validate(&BOTH, &text("x")).message.as_deref(), Some("shape"));
    }

    #[test]
    fn test_file_selected() {
        assert!(!validate(&PHOTO, &FieldValue::File(None)).valid);
        let attachment = Attachment::new(PathBuf::from("/tmp/photo.png"));
        assert!(validate(&PHOTO, &FieldValue::File(Some(attachment))).valid);
    }

    #[test]
    fn test_file_rule_rejects_text_value() {
        assert!(!validate(&PHOTO, &text("/tmp/photo.png")).valid);
    }

    #[test]
    fn test_one_of_accepts_declared_option() {
        assert!(validate(&ISSUE_TYPE, &FieldValue::Choice("Printer".into())).valid);
        assert!(!validate(&ISSUE_TYPE, &FieldValue::Choice(String::new())).valid);
        assert!(!validate(&ISSUE_TYPE, &FieldValue::Choice("Toaster".into())).valid);
    }

    #[test]
    fn test_one_of_other_requires_text() {
        assert!(!validate(&ISSUE_TYPE, &FieldValue::Other(" ".into())).valid);
        assert!(validate(&ISSUE_TYPE, &FieldValue::Other("Scanner".into())).valid);
    }

    #[test]
    fn test_checked() {
        assert!(!validate(&TERMS, &FieldValue::Flag(false)).valid);
        assert!(validate(&TERMS, &FieldValue::Flag(true)).valid);
    }

    #[test]
    fn test_no_rules_is_always_valid() {
        const FREE: FieldDescriptor = FieldDescriptor {
            id: "notes",
            label: "Notes",
            kind: FieldKind::Multiline,
            rules: &[],
        };
        assert!(validate(&FREE, &text("")).valid);
    }
}
