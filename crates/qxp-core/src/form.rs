//! Lead-capture forms.
//!
//! A [`FormSession`] is the state of one visible form: it pre-fills from the
//! persisted draft once, writes the draft on every edit, and on submit
//! clears the draft *before* showing the confirmation. The visible fields
//! are only reset when the confirmation is dismissed, so the confirmation
//! never shows stale data and a reload during it does not resurrect the
//! submitted values.

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use crate::draft::{DraftStore, FormDraft};
use crate::error::FormError;

/// How long a lead form shows its confirmation before resetting.
pub const LEAD_CONFIRMATION_DELAY: Duration = Duration::from_secs(4);

/// How long the newsletter box shows its confirmation.
pub const NEWSLETTER_CONFIRMATION_DELAY: Duration = Duration::from_secs(3);

/// Options for the demo form's `role` field.
pub const DEMO_ROLES: [&str; 7] = [
    "director",
    "principal",
    "teacher",
    "admin",
    "parent",
    "group",
    "other",
];

/// What a field accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Email,
    Phone,
    LongText,
    Date,
    Time,
    Choice(&'static [&'static str]),
}

/// One input on a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

const fn field(
    name: &'static str,
    label: &'static str,
    kind: FieldKind,
    required: bool,
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind,
        required,
    }
}

const CONTACT_FIELDS: [FieldSpec; 5] = [
    field("name", "Full name", FieldKind::Text, true),
    field("email", "Email", FieldKind::Email, true),
    field("school", "School", FieldKind::Text, false),
    field("phone", "Phone", FieldKind::Phone, false),
    field("message", "Message", FieldKind::LongText, true),
];

const DEMO_FIELDS: [FieldSpec; 7] = [
    field("name", "Full name", FieldKind::Text, true),
    field("email", "Email", FieldKind::Email, true),
    field("school", "School", FieldKind::Text, false),
    field("role", "Your role", FieldKind::Choice(&DEMO_ROLES), true),
    field("date", "Preferred date", FieldKind::Date, false),
    field("time", "Preferred time", FieldKind::Time, false),
    field("notes", "Anything we should know?", FieldKind::LongText, false),
];

/// The forms whose drafts are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    Contact,
    Demo,
}

impl FormKind {
    /// Every persisted form.
    pub const ALL: [Self; 2] = [Self::Contact, Self::Demo];

    /// Identifier used in draft keys and URLs.
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::Demo => "demo",
        }
    }

    /// Look up a form by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownForm`] for anything but `contact` or `demo`.
    pub fn from_id(form_id: &str) -> Result<Self, FormError> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.id() == form_id)
            .ok_or_else(|| FormError::UnknownForm {
                form_id: form_id.to_owned(),
            })
    }

    /// Field definitions, in display order.
    #[must_use]
    pub fn fields(self) -> &'static [FieldSpec] {
        match self {
            Self::Contact => &CONTACT_FIELDS,
            Self::Demo => &DEMO_FIELDS,
        }
    }

    fn field(self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|f| f.name == name)
    }

    /// Every field set to the empty string.
    #[must_use]
    pub fn empty_values(self) -> FormDraft {
        self.fields()
            .iter()
            .map(|f| (f.name.to_owned(), String::new()))
            .collect()
    }

    /// Check `values` against the field definitions. Fields are checked in
    /// display order and the first problem is reported.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::MissingField`], [`FormError::InvalidEmail`] or
    /// [`FormError::InvalidChoice`].
    pub fn validate(self, values: &FormDraft) -> Result<(), FormError> {
        for spec in self.fields() {
            let value = values.get(spec.name).map_or("", |v| v.trim());
            if value.is_empty() {
                if spec.required {
                    return Err(FormError::MissingField {
                        field: spec.name.to_owned(),
                    });
                }
                continue;
            }
            match spec.kind {
                FieldKind::Email if !is_email(value) => {
                    return Err(FormError::InvalidEmail {
                        value: value.to_owned(),
                    });
                }
                FieldKind::Choice(options) if !options.contains(&value) => {
                    return Err(FormError::InvalidChoice {
                        field: spec.name.to_owned(),
                        value: value.to_owned(),
                    });
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// `local@domain.tld`, no whitespace, exactly one `@`.
#[must_use]
pub fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

/// The live state of one lead form.
#[derive(Debug)]
pub struct FormSession {
    kind: FormKind,
    drafts: DraftStore,
    values: FormDraft,
    submitted: bool,
}

impl FormSession {
    /// Open a form, pre-filling known fields from the persisted draft.
    /// Unknown fields in the draft are ignored.
    pub async fn open(drafts: DraftStore, kind: FormKind) -> Self {
        let mut values = kind.empty_values();
        if let Some(draft) = drafts.load(kind.id()).await {
            for (name, value) in draft {
                if let Some(slot) = values.get_mut(&name) {
                    *slot = value;
                }
            }
            debug!(form_id = kind.id(), "form pre-filled from draft");
        }
        Self {
            kind,
            drafts,
            values,
            submitted: false,
        }
    }

    #[must_use]
    pub fn kind(&self) -> FormKind {
        self.kind
    }

    #[must_use]
    pub fn values(&self) -> &FormDraft {
        &self.values
    }

    #[must_use]
    pub fn value(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    /// Whether the confirmation is showing.
    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Change one field and persist the whole form as the new draft.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::UnknownField`] for names the form does not have
    /// and [`FormError::AlreadySubmitted`] while the confirmation shows.
    pub async fn edit(&mut self, field: &str, value: impl Into<String>) -> Result<(), FormError> {
        if self.submitted {
            return Err(FormError::AlreadySubmitted);
        }
        if self.kind.field(field).is_none() {
            return Err(FormError::UnknownField {
                form_id: self.kind.id().to_owned(),
                field: field.to_owned(),
            });
        }
        self.values.insert(field.to_owned(), value.into());
        self.drafts.save(self.kind.id(), &self.values).await;
        Ok(())
    }

    /// Validate and submit. The persisted draft is cleared immediately; the
    /// visible values stay until [`complete_confirmation`](Self::complete_confirmation).
    ///
    /// # Errors
    ///
    /// Returns a validation error, or [`FormError::AlreadySubmitted`].
    pub async fn submit(&mut self) -> Result<(), FormError> {
        if self.submitted {
            return Err(FormError::AlreadySubmitted);
        }
        self.kind.validate(&self.values)?;
        self.drafts.clear(self.kind.id()).await;
        self.submitted = true;
        info!(form_id = self.kind.id(), "form submitted");
        Ok(())
    }

    /// Dismiss the confirmation and reset every field to empty.
    pub fn complete_confirmation(&mut self) {
        self.values = self.kind.empty_values();
        self.submitted = false;
    }

    /// Submit, hold the confirmation for `delay`, then reset.
    ///
    /// # Errors
    ///
    /// Same as [`submit`](Self::submit); on error nothing is reset.
    pub async fn submit_and_reset(&mut self, delay: Duration) -> Result<(), FormError> {
        self.submit().await?;
        tokio::time::sleep(delay).await;
        self.complete_confirmation();
        Ok(())
    }
}

/// The footer newsletter box. Nothing is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsletterSignup {
    email: String,
    subscribed: bool,
}

impl NewsletterSignup {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Subscribe the current email. Clears the input and shows the
    /// confirmation; returns the address that was subscribed.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::MissingField`] or [`FormError::InvalidEmail`].
    pub fn submit(&mut self) -> Result<String, FormError> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(FormError::MissingField {
                field: "email".to_owned(),
            });
        }
        if !is_email(email) {
            return Err(FormError::InvalidEmail {
                value: email.to_owned(),
            });
        }
        let email = email.to_owned();
        self.email.clear();
        self.subscribed = true;
        Ok(email)
    }

    /// Hide the confirmation.
    pub fn expire_confirmation(&mut self) {
        self.subscribed = false;
    }

    /// Submit, hold the confirmation for `delay`, then hide it.
    ///
    /// # Errors
    ///
    /// Same as [`submit`](Self::submit).
    pub async fn submit_and_expire(&mut self, delay: Duration) -> Result<String, FormError> {
        let email = self.submit()?;
        tokio::time::sleep(delay).await;
        self.expire_confirmation();
        Ok(email)
    }
}
