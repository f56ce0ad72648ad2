use imgupload_core::{CandidateFile, HostError, PreviewHost};
use wasm_bindgen::JsValue;
use web_sys::{File, Url};

pub(crate) struct PickedFile(pub(crate) File);

impl CandidateFile for PickedFile {
    fn size(&self) -> u64 {
        self.0.size().max(0.0) as u64
    }

    fn mime_type(&self) -> String {
        self.0.type_()
    }
}

/// Object URLs as preview handles.
#[derive(Default)]
pub(crate) struct ObjectUrlHost;

impl PreviewHost for ObjectUrlHost {
    type File = PickedFile;

    fn create_preview(&mut self, file: &PickedFile) -> Result<String, HostError> {
        Url::create_object_url_with_blob(&file.0).map_err(|err| HostError(js_err(err)))
    }

    fn release_preview(&mut self, handle: &str) {
        let _ = Url::revoke_object_url(handle);
    }
}

pub(crate) fn js_err(error: JsValue) -> String {
    if let Some(value) = error.as_string() {
        return value;
    }
    if let Ok(json) = js_sys::JSON::stringify(&error) {
        if let Some(value) = json.as_string() {
            return value;
        }
    }
    "js error".to_string()
}
