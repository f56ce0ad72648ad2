use imgupload_core::{PickerState, RawUploadConfig};
use wasm_bindgen::prelude::*;

use crate::host::js_err;
use crate::widget::ImageUpload;

/// JS-facing handle. The host must keep it alive as long as the widget is in
/// use; `free()` detaches the widget's listeners.
#[wasm_bindgen(js_name = ImageUpload)]
pub struct ImageUploadHandle {
    widget: ImageUpload,
}

/// Builds a widget from a plain config object such as
/// `{ removeImageOnClear: true, maxSize: 1024, types: ["png", "jpeg"] }`.
#[wasm_bindgen]
pub fn create(config: JsValue) -> Result<ImageUploadHandle, JsValue> {
    let raw = parse_config(&config);
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document available"))?;
    let widget = ImageUpload::from_raw(&document, raw)?;
    Ok(ImageUploadHandle { widget })
}

/// Reads a JS config object. Anything unreadable falls back to the defaults
/// with a console warning; bad individual values are handled by
/// normalization.
pub(crate) fn parse_config(config: &JsValue) -> RawUploadConfig {
    if config.is_undefined() || config.is_null() {
        return RawUploadConfig::default();
    }
    let json = match js_sys::JSON::stringify(config) {
        Ok(json) => json.as_string(),
        Err(err) => {
            gloo::console::warn!("image upload: config not serializable", js_err(err));
            None
        }
    };
    let Some(json) = json else {
        return RawUploadConfig::default();
    };
    match serde_json::from_str(&json) {
        Ok(raw) => raw,
        Err(err) => {
            gloo::console::warn!("image upload: config ignored", err.to_string());
            RawUploadConfig::default()
        }
    }
}

#[wasm_bindgen(js_class = ImageUpload)]
impl ImageUploadHandle {
    #[wasm_bindgen(getter)]
    pub fn element(&self) -> web_sys::HtmlElement {
        self.widget.element().clone()
    }

    #[wasm_bindgen(getter)]
    pub fn changed(&self) -> bool {
        self.widget.changed()
    }

    #[wasm_bindgen(getter)]
    pub fn errors(&self) -> Vec<String> {
        self.widget.errors()
    }

    /// One of `"empty"`, `"previewing"`, `"error"`.
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        state_label(self.widget.state()).to_string()
    }

    #[wasm_bindgen(js_name = setDefaultSrc)]
    pub fn set_default_src(&self, src: &str) {
        self.widget.set_default_src(src);
    }

    #[wasm_bindgen(js_name = setImageSrc)]
    pub fn set_image_src(&self, src: &str) {
        self.widget.set_image_src(src);
    }

    /// Registers `callback(state)` for every selection or clear.
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&self, callback: Option<js_sys::Function>) {
        let hook = callback.map(|callback| {
            std::rc::Rc::new(move |state: PickerState| {
                if let Err(err) =
                    callback.call1(&JsValue::NULL, &JsValue::from_str(state_label(state)))
                {
                    gloo::console::warn!("image upload: change callback failed", js_err(err));
                }
            }) as crate::widget::ChangeHook
        });
        self.widget.set_on_change(hook);
    }

    pub fn clear(&self) {
        self.widget.clear();
    }

    pub fn remove(&self) {
        self.widget.remove();
    }
}

pub(crate) fn state_label(state: PickerState) -> &'static str {
    match state {
        PickerState::Empty => "empty",
        PickerState::Previewing => "previewing",
        PickerState::ErrorShown => "error",
    }
}
