//! Confirmation prompts for destructive forms.
//!
//! A form carrying a confirm message is held back on submit and shown in
//! the page's single confirmation dialog. Only one form can be pending:
//! a second interception replaces the first.

/// Message shown when a form asks for confirmation without saying why.
pub const DEFAULT_CONFIRM_MESSAGE: &str = "Are you sure?";

/// Hidden field set to `true` on a confirmed form.
pub const CONFIRMED_FIELD: &str = "confirmed";

/// A submittable form as seen by the controller.
pub trait ConfirmForm {
    /// Value of the form's confirm attribute, `None` when absent.
    fn confirm_message(&self) -> Option<String>;

    /// Whether the form was already confirmed and may submit.
    fn is_confirmed(&self) -> bool;

    /// Set [`CONFIRMED_FIELD`] to `true` and flag the form as confirmed.
    fn mark_confirmed(&mut self);
}

/// Outcome of a submit event.
#[derive(Debug, PartialEq, Eq)]
pub enum Submit<F> {
    /// Let the submission through unchanged.
    Proceed(F),
    /// Default prevented; show the dialog with `message`.
    Prompt { message: String },
}

#[derive(Debug)]
pub struct ConfirmController<F> {
    pending: Option<F>,
}

impl<F: ConfirmForm> ConfirmController<F> {
    pub fn new() -> Self {
        Self { pending: None }
    }

    pub fn on_submit(&mut self, form: F) -> Submit<F> {
        if form.is_confirmed() {
            return Submit::Proceed(form);
        }
        let Some(message) = form.confirm_message() else {
            return Submit::Proceed(form);
        };

        let message = if message.is_empty() {
            DEFAULT_CONFIRM_MESSAGE.to_string()
        } else {
            message
        };
        if self.pending.replace(form).is_some() {
            tracing::debug!("Replaced pending confirmation");
        }
        Submit::Prompt { message }
    }

    /// The user confirmed. Returns the pending form marked confirmed, for
    /// the host to submit.
    pub fn confirm(&mut self) -> Option<F> {
        let mut form = self.pending.take()?;
        form.mark_confirmed();
        Some(form)
    }

    /// The user cancelled. The pending form is dropped.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn pending(&self) -> Option<&F> {
        self.pending.as_ref()
    }
}

impl<F: ConfirmForm> Default for ConfirmController<F> {
    fn default() -> Self {
        Self::new()
    }
}
