use std::{fmt, sync::Arc};

pub const DEFAULT_CONFIRM_TEXT: &str = "Confirm";
pub const DEFAULT_CANCEL_TEXT: &str = "Cancel";

/// Callback attached to a dialog button.
#[derive(Clone)]
pub struct DialogAction(Arc<dyn Fn() + Send + Sync>);

impl DialogAction {
    pub fn new(f: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn invoke(&self) {
        (self.0)()
    }
}

impl fmt::Debug for DialogAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DialogAction")
    }
}

/// Everything a confirm prompt needs. Built with [`ConfirmOptions::new`], which
/// fills in the default button labels.
#[derive(Debug, Clone)]
pub struct ConfirmOptions {
    pub title: String,
    pub content: String,
    pub icon: Option<String>,
    pub confirm_text: String,
    pub cancel_text: String,
    pub on_confirm: Option<DialogAction>,
    pub on_cancel: Option<DialogAction>,
}

impl Default for ConfirmOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            icon: None,
            confirm_text: DEFAULT_CONFIRM_TEXT.to_string(),
            cancel_text: DEFAULT_CANCEL_TEXT.to_string(),
            on_confirm: None,
            on_cancel: None,
        }
    }
}

impl ConfirmOptions {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn confirm_text(mut self, text: impl Into<String>) -> Self {
        self.confirm_text = text.into();
        self
    }

    pub fn cancel_text(mut self, text: impl Into<String>) -> Self {
        self.cancel_text = text.into();
        self
    }

    pub fn on_confirm(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_confirm = Some(DialogAction::new(f));
        self
    }

    pub fn on_cancel(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_cancel = Some(DialogAction::new(f));
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfirmDialogState {
    /// Identifies the prompt currently shown; 0 when nothing has been shown.
    pub id: u64,
    pub open: bool,
    pub options: ConfirmOptions,
}
