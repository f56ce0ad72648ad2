pub mod config;
pub mod picker;
pub mod size;
pub mod validate;

pub use config::{
    AllowedTypes, ConfigWarning, RawMaxSize, RawTypes, RawUploadConfig, SizeLimit, UploadConfig,
    DEFAULT_CHANGED_FIELD, DEFAULT_PROMPT,
};
pub use picker::{HostError, Outcome, Picker, PickerState, PreviewHost, PLACEHOLDER_SRC};
pub use size::{format_size, parse_size};
pub use validate::{validate, validate_messages, CandidateFile, FileInfo, ValidationError};
