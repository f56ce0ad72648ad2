//! Browser image upload field: pick an image, preview it inline, validate
//! its size and type, and clear it again.

mod host;
mod js_api;
mod markup;
mod widget;
mod yew_field;

pub use imgupload_core::{
    format_size, validate, AllowedTypes, ConfigWarning, FileInfo, PickerState, RawMaxSize, RawTypes,
    RawUploadConfig, SizeLimit, UploadConfig, ValidationError, PLACEHOLDER_SRC,
};
pub use js_api::{create, ImageUploadHandle};
pub use widget::{ChangeHook, ImageUpload};
pub use yew_field::{ImageUploadField, ImageUploadFieldProps};
