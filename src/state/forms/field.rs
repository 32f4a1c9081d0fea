//! Form field descriptors and value objects

use super::validation::{validate, Rule, ValidationResult};
use std::path::{Path, PathBuf};

/// One selectable option of a choice field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceOption {
    /// Value submitted to the backend
    pub value: &'static str,
    /// Text shown to the user
    pub label: &'static str,
}

impl ChoiceOption {
    pub const fn new(value: &'static str, label: &'static str) -> Self {
        Self { value, label }
    }
}

/// How a field is edited and rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Multiline,
    /// Masked input (passwords)
    Secret,
    /// Path to a local file that is attached on submit
    File,
    Choice {
        options: &'static [ChoiceOption],
        /// Whether an "Other" entry with free text follows the options
        allow_other: bool,
    },
    Checkbox,
}

/// Static definition of a single form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub rules: &'static [Rule],
}

impl FieldDescriptor {
    /// Initial value for this field's kind
    pub fn default_value(&self) -> FieldValue {
        match self.kind {
            FieldKind::Text | FieldKind::Multiline | FieldKind::Secret => {
                FieldValue::Text(String::new())
            }
            FieldKind::File => FieldValue::File(None),
            FieldKind::Choice { .. } => FieldValue::Choice(String::new()),
            FieldKind::Checkbox => FieldValue::Flag(false),
        }
    }
}

/// A local file selected for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub path: PathBuf,
    pub name: String,
}

impl Attachment {
    pub fn new(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { path, name }
    }

    /// MIME type guessed from the file extension
    pub fn mime_type(&self) -> &'static str {
        let ext = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            Some("bmp") => "image/bmp",
            Some("svg") => "image/svg+xml",
            Some("pdf") => "application/pdf",
            _ => "application/octet-stream",
        }
    }
}

/// Type-safe field values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    File(Option<Attachment>),
    /// Selected option value, empty when nothing is selected
    Choice(String),
    /// Free text entered after picking "Other"
    Other(String),
    Flag(bool),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl FieldValue {
    /// Text that would be submitted for this value
    pub fn submitted_text(&self) -> &str {
        match self {
            FieldValue::Text(s) | FieldValue::Choice(s) | FieldValue::Other(s) => s,
            FieldValue::File(_) => "",
            FieldValue::Flag(true) => "true",
            FieldValue::Flag(false) => "",
        }
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        match self {
            FieldValue::File(attachment) => attachment.as_ref(),
            _ => None,
        }
    }
}

/// Represents a single form field with its definition and current value
#[derive(Debug, Clone)]
pub struct FormField {
    pub descriptor: &'static FieldDescriptor,
    pub value: FieldValue,
    /// Validation messages are only shown once a field has been touched
    pub touched: bool,
    /// Path being typed into a file field before it is attached
    pub path_input: String,
}

impl FormField {
    pub fn new(descriptor: &'static FieldDescriptor) -> Self {
        Self {
            descriptor,
            value: descriptor.default_value(),
            touched: false,
            path_input: String::new(),
        }
    }

    pub fn id(&self) -> &'static str {
        self.descriptor.id
    }

    pub fn label(&self) -> &'static str {
        self.descriptor.label
    }

    pub fn is_multiline(&self) -> bool {
        matches!(self.descriptor.kind, FieldKind::Multiline)
    }

    pub fn validate(&self) -> ValidationResult {
        validate(self.descriptor, &self.value)
    }

    /// Message to display inline, if the field was touched and is invalid
    pub fn visible_error(&self) -> Option<String> {
        if self.touched {
            self.validate().message
        } else {
            None
        }
    }

    /// Get the text value (empty for files and flags)
    pub fn as_text(&self) -> &str {
        self.value.submitted_text()
    }

    #[cfg(test)]
    pub fn set_text(&mut self, value: impl Into<String>) {
        self.value = FieldValue::Text(value.into());
    }

    /// Push a character to the field value
    pub fn push_char(&mut self, c: char) {
        match &mut self.value {
            FieldValue::Text(s) | FieldValue::Other(s) => s.push(c),
            // Editing the path drops the attachment until it is confirmed again
            FieldValue::File(attached) => {
                *attached = None;
                self.path_input.push(c);
            }
            FieldValue::Flag(flag) => {
                if c == ' ' {
                    *flag = !*flag;
                }
            }
            // Choices are changed with the arrow keys
            FieldValue::Choice(_) => {}
        }
    }

    /// Remove the last character from the field value
    pub fn pop_char(&mut self) {
        match &mut self.value {
            FieldValue::Text(s) => {
                s.pop();
            }
            FieldValue::Other(s) => {
                // Backspacing an empty "Other" entry returns to the option list
                if s.pop().is_none() {
                    self.value = FieldValue::Choice(String::new());
                }
            }
            FieldValue::File(attached) => {
                *attached = None;
                self.path_input.pop();
            }
            FieldValue::Choice(_) | FieldValue::Flag(_) => {}
        }
    }

    /// Attach the file named by `path_input`, returning false if it isn't a file
    pub fn attach_typed_path(&mut self) -> bool {
        if !matches!(self.descriptor.kind, FieldKind::File) {
            return false;
        }
        let path = Path::new(self.path_input.trim());
        if path.is_file() {
            self.value = FieldValue::File(Some(Attachment::new(path.to_path_buf())));
            true
        } else {
            self.value = FieldValue::File(None);
            false
        }
    }

    #[cfg(test)]
    pub fn attach(&mut self, attachment: Attachment) {
        self.path_input = attachment.path.to_string_lossy().into_owned();
        self.value = FieldValue::File(Some(attachment));
    }

    /// Cycle a choice field forward (`step = 1`) or backward (`step = -1`).
    ///
    /// The cycle is: nothing selected, each option, then "Other" when allowed.
    pub fn cycle_choice(&mut self, step: isize) {
        let FieldKind::Choice {
            options,
            allow_other,
        } = self.descriptor.kind
        else {
            return;
        };
        let slots = options.len() + usize::from(allow_other) + 1;
        let current = match &self.value {
            FieldValue::Choice(v) => options
                .iter()
                .position(|o| o.value == v.as_str())
                .map(|i| i + 1)
                .unwrap_or(0),
            FieldValue::Other(_) => options.len() + 1,
            _ => 0,
        };
        let next = (current as isize + step).rem_euclid(slots as isize) as usize;
        self.value = match next {
            0 => FieldValue::Choice(String::new()),
            n if n <= options.len() => FieldValue::Choice(options[n - 1].value.to_string()),
            _ => FieldValue::Other(String::new()),
        };
    }

    /// Label of the selected choice, if any
    pub fn selected_label(&self) -> Option<&'static str> {
        let FieldKind::Choice { options, .. } = self.descriptor.kind else {
            return None;
        };
        match &self.value {
            FieldValue::Choice(v) => options.iter().find(|o| o.value == v.as_str()).map(|o| o.label),
            FieldValue::Other(_) => Some("Other"),
            _ => None,
        }
    }

    /// Restore the default value
    pub fn clear(&mut self) {
        self.value = self.descriptor.default_value();
        self.touched = false;
        self.path_input.clear();
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match (&self.descriptor.kind, &self.value) {
            (FieldKind::Secret, FieldValue::Text(s)) => "•".repeat(s.chars().count()),
            (_, FieldValue::Text(s)) => s.clone(),
            (_, FieldValue::File(Some(attachment))) => {
                format!("{} ({})", attachment.name, attachment.mime_type())
            }
            (_, FieldValue::File(None)) => self.path_input.clone(),
            (_, FieldValue::Choice(_)) => match self.selected_label() {
                Some(label) => format!("◂ {label} ▸"),
                None => "◂ Select ▸".to_string(),
            },
            (_, FieldValue::Other(s)) => format!("Other: {s}"),
            (_, FieldValue::Flag(checked)) => {
                let mark = if *checked { "[x]" } else { "[ ]" };
                format!("{mark} {}", self.descriptor.label)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static NAME: FieldDescriptor = FieldDescriptor {
        id: "name",
        label: "Name",
        kind: FieldKind::Text,
        rules: &[Rule::Required("Name is required")],
    };

    static PASSWORD: FieldDescriptor = FieldDescriptor {
        id: "password",
        label: "Password",
        kind: FieldKind::Secret,
        rules: &[],
    };

    static PHOTO: FieldDescriptor = FieldDescriptor {
        id: "photo",
        label: "Photo Upload",
        kind: FieldKind::File,
        rules: &[Rule::FileSelected("Photo is required")],
    };

    static PRIORITY: FieldDescriptor = FieldDescriptor {
        id: "priority",
        label: "Priority",
        kind: FieldKind::Choice {
            options: &[ChoiceOption::new("low", "Low"), ChoiceOption::new("high", "High")],
            allow_other: false,
        },
        rules: &[Rule::OneOf("Please select a priority level")],
    };

    static ISSUE_TYPE: FieldDescriptor = FieldDescriptor {
        id: "issueType",
        label: "Issue Type",
        kind: FieldKind::Choice {
            options: &[ChoiceOption::new("Desktop", "Desktop")],
            allow_other: true,
        },
        rules: &[Rule::OneOf("Please select the issue type")],
    };

    static TERMS: FieldDescriptor = FieldDescriptor {
        id: "terms",
        label: "I agree to the Terms",
        kind: FieldKind::Checkbox,
        rules: &[],
    };

    #[test]
    fn test_default_values_per_kind() {
        assert_eq!(NAME.default_value(), FieldValue::Text(String::new()));
        assert_eq!(PHOTO.default_value(), FieldValue::File(None));
        assert_eq!(PRIORITY.default_value(), FieldValue::Choice(String::new()));
        assert_eq!(TERMS.default_value(), FieldValue::Flag(false));
    }

    #[test]
    fn test_push_and_pop_text() {
        let mut field = FormField::new(&NAME);
        field.push_char('J');
        field.push_char('o');
        assert_eq!(field.as_text(), "Jo");
        field.pop_char();
        assert_eq!(field.as_text(), "J");
    }

    #[test]
    fn test_secret_is_masked() {
        let mut field = FormField::new(&PASSWORD);
        field.set_text("hunter2");
        assert_eq!(field.display_value(), "•••••••");
        assert_eq!(field.as_text(), "hunter2");
    }

    #[test]
    fn test_visible_error_only_after_touch() {
        let mut field = FormField::new(&NAME);
        assert!(field.visible_error().is_none());
        field.touched = true;
        assert_eq!(field.visible_error().as_deref(), Some("Name is required"));
    }

    #[test]
    fn test_attach_typed_path_missing_file() {
        let mut field = FormField::new(&PHOTO);
        for c in "/definitely/not/here.png".chars() {
            field.push_char(c);
        }
        assert!(!field.attach_typed_path());
        assert_eq!(field.value, FieldValue::File(None));
    }

    #[test]
    fn test_attach_typed_path_existing_file() {
        let file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        let mut field = FormField::new(&PHOTO);
        field.path_input = file.path().to_string_lossy().into_owned();
        assert!(field.attach_typed_path());
        let attachment = field.value.attachment().unwrap();
        assert_eq!(attachment.mime_type(), "image/png");
        assert!(field.validate().valid);
    }

    #[test]
    fn test_editing_path_drops_attachment() {
        let file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        let mut field = FormField::new(&PHOTO);
        field.path_input = file.path().to_string_lossy().into_owned();
        assert!(field.attach_typed_path());

        field.push_char('x');
        assert_eq!(field.value, FieldValue::File(None));
        assert!(!field.validate().valid);
        assert!(field.display_value().ends_with(".pngx"));

        field.pop_char();
        assert_eq!(field.value, FieldValue::File(None));
        assert!(field.attach_typed_path());
        assert!(field.value.attachment().is_some());
    }

    #[test]
    fn test_mime_type_from_extension() {
        assert_eq!(Attachment::new("a/B.JPG".into()).mime_type(), "image/jpeg");
        assert_eq!(Attachment::new("sig.webp".into()).mime_type(), "image/webp");
        assert_eq!(
            Attachment::new("blob".into()).mime_type(),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_cycle_choice_wraps_through_empty() {
        let mut field = FormField::new(&PRIORITY);
        field.cycle_choice(1);
        assert_eq!(field.value, FieldValue::Choice("low".into()));
        field.cycle_choice(1);
        assert_eq!(field.value, FieldValue::Choice("high".into()));
        field.cycle_choice(1);
        assert_eq!(field.value, FieldValue::Choice(String::new()));
        field.cycle_choice(-1);
        assert_eq!(field.value, FieldValue::Choice("high".into()));
    }

    #[test]
    fn test_cycle_choice_reaches_other() {
        let mut field = FormField::new(&ISSUE_TYPE);
        field.cycle_choice(-1);
        assert_eq!(field.value, FieldValue::Other(String::new()));
        field.push_char('S');
        assert_eq!(field.as_text(), "S");
        assert_eq!(field.selected_label(), Some("Other"));
    }

    #[test]
    fn test_backspace_on_empty_other_returns_to_options() {
        let mut field = FormField::new(&ISSUE_TYPE);
        field.value = FieldValue::Other(String::new());
        field.pop_char();
        assert_eq!(field.value, FieldValue::Choice(String::new()));
    }

    #[test]
    fn test_checkbox_toggles_on_space() {
        let mut field = FormField::new(&TERMS);
        field.push_char(' ');
        assert_eq!(field.value, FieldValue::Flag(true));
        assert_eq!(field.display_value(), "[x] I agree to the Terms");
    }

    #[test]
    fn test_clear_restores_default() {
        let mut field = FormField::new(&PRIORITY);
        field.cycle_choice(1);
        field.touched = true;
        field.clear();
        assert_eq!(field.value, FieldValue::Choice(String::new()));
        assert!(!field.touched);
    }
}
