use crate::config::{non_blank, UploadConfig};
use crate::validate::{validate_messages, CandidateFile};

/// Neutral placeholder shown when there is neither a preview nor a default image.
pub const PLACEHOLDER_SRC: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' viewBox='0 0 64 64'%3E%3Crect width='64' height='64' fill='%23f2f2f2'/%3E%3Cpath d='M14 46l12-16 9 11 6-7 9 12z' fill='%23c8c8c8'/%3E%3Ccircle cx='44' cy='22' r='5' fill='%23c8c8c8'/%3E%3C/svg%3E";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickerState {
    Empty,
    Previewing,
    ErrorShown,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("failed to create preview: {0}")]
pub struct HostError(pub String);

/// Environment that owns preview handles (object URLs in the browser).
pub trait PreviewHost {
    type File: CandidateFile + ?Sized;

    fn create_preview(&mut self, file: &Self::File) -> Result<String, HostError>;
    fn release_preview(&mut self, handle: &str);
}

/// What the caller should do to the view after a transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub state: PickerState,
    pub host_error: Option<HostError>,
}

impl Outcome {
    fn settled(state: PickerState) -> Self {
        Self {
            state,
            host_error: None,
        }
    }
}

pub struct Picker<H: PreviewHost> {
    config: UploadConfig,
    host: H,
    default_src: Option<String>,
    shown_src: Option<String>,
    preview: Option<String>,
    changed: bool,
    errors: Vec<String>,
    state: PickerState,
}

impl<H: PreviewHost> Picker<H> {
    /// Builds a picker already cleared into the empty state. The initial
    /// clear counts as a change until [`Picker::settle`] is called.
    pub fn new(config: UploadConfig, host: H) -> Self {
        let default_src = config.default_src.clone();
        let mut picker = Self {
            config,
            host,
            default_src,
            shown_src: None,
            preview: None,
            changed: false,
            errors: Vec::new(),
            state: PickerState::Empty,
        };
        picker.clear();
        picker
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn state(&self) -> PickerState {
        self.state
    }

    pub fn changed(&self) -> bool {
        self.changed
    }

    /// String form of the changed flag for the hidden form field.
    pub fn changed_flag(&self) -> &'static str {
        if self.changed {
            "1"
        } else {
            "0"
        }
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn preview_handle(&self) -> Option<&str> {
        self.preview.as_deref()
    }

    pub fn default_src(&self) -> Option<&str> {
        self.default_src.as_deref()
    }

    /// Source the preview image should currently display.
    pub fn image_src(&self) -> &str {
        self.preview
            .as_deref()
            .or(self.shown_src.as_deref())
            .or(self.default_src.as_deref())
            .unwrap_or(PLACEHOLDER_SRC)
    }

    /// Marks the widget untouched. Called once after creation.
    pub fn settle(&mut self) {
        self.changed = false;
    }

    pub fn set_default_src(&mut self, src: &str) {
        self.default_src = non_blank(Some(src.to_string()));
    }

    /// Shows `src` without making it the default. Blank input is ignored.
    /// A live preview is dropped and the picker falls back to `Empty`.
    pub fn set_image_src(&mut self, src: &str) -> bool {
        let Some(src) = non_blank(Some(src.to_string())) else {
            return false;
        };
        self.release();
        if self.state == PickerState::Previewing {
            self.state = PickerState::Empty;
        }
        self.shown_src = Some(src);
        true
    }

    /// Handles a file-input change. `None` means the picker was cancelled.
    pub fn select(&mut self, file: Option<&H::File>) -> Outcome {
        self.errors.clear();
        let Some(file) = file else {
            self.clear();
            return Outcome::settled(self.state);
        };
        let errors = validate_messages(file, &self.config);
        if !errors.is_empty() {
            self.clear();
            self.errors = errors;
            self.state = PickerState::ErrorShown;
            return Outcome::settled(self.state);
        }
        self.release();
        match self.host.create_preview(file) {
            Ok(handle) => {
                self.preview = Some(handle);
                self.changed = true;
                self.state = PickerState::Previewing;
                Outcome::settled(self.state)
            }
            Err(err) => {
                self.clear();
                Outcome {
                    state: self.state,
                    host_error: Some(err),
                }
            }
        }
    }

    pub fn clear(&mut self) {
        self.release();
        self.shown_src = None;
        self.errors.clear();
        self.changed = true;
        self.state = PickerState::Empty;
    }

    fn release(&mut self) {
        if let Some(handle) = self.preview.take() {
            self.host.release_preview(&handle);
        }
    }
}

impl<H: PreviewHost> Drop for Picker<H> {
    fn drop(&mut self) {
        self.release();
    }
}
