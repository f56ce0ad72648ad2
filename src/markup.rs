use imgupload_core::UploadConfig;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement, HtmlImageElement, HtmlInputElement};

pub(crate) const ROOT_CLASS: &str = "img-upload-component";
pub(crate) const CLOSE_CLASS: &str = "close-btn";

const ROOT_STYLE: &str = "position: relative; display: inline-block; width: 100%; max-width: 250px; \
    border: 1px solid lightgrey; border-radius: 2px;";
const AREA_STYLE: &str = "position: relative; height: 200px; overflow: hidden;";
const CLOSE_STYLE: &str = "position: absolute; right: 5px; top: 5px; z-index: 2; border: 0; \
    border-radius: 3px; background-color: #e60000; color: white; font: bold 15px monospace; \
    line-height: 1em; width: 24px; height: 24px;";
const FRAME_STYLE: &str = "position: absolute; width: 100%; height: 200px; display: flex; \
    align-items: center; justify-content: center;";
const IMAGE_STYLE: &str = "width: 100%; height: 100%; object-fit: contain; padding: 10px; \
    box-sizing: border-box;";
const HOVER_STYLE: &str = "user-select: none; position: absolute; inset: 0; display: flex; \
    align-items: center; justify-content: center; text-align: center; \
    background-color: rgba(0, 0, 0, 0.5); color: white; text-shadow: 0 1px 1px black; \
    font-size: 12px; transition: opacity 0.35s; opacity: 0;";
const ERRORS_STYLE: &str = "display: none; list-style-type: none; margin: 0; padding: 10px; \
    color: tomato;";

/// Typed handles to one widget's DOM subtree.
#[derive(Clone)]
pub(crate) struct WidgetElements {
    pub(crate) root: HtmlElement,
    pub(crate) image: HtmlImageElement,
    pub(crate) file_input: HtmlInputElement,
    pub(crate) changed_input: HtmlInputElement,
    pub(crate) close_button: HtmlElement,
    pub(crate) hover_msg: HtmlElement,
    pub(crate) error_list: HtmlElement,
}

fn element<T: JsCast>(document: &Document, tag: &str, class: &str, style: &str) -> Result<T, JsValue> {
    let element = document.create_element(tag)?;
    if !class.is_empty() {
        element.set_class_name(class);
    }
    if !style.is_empty() {
        element.set_attribute("style", style)?;
    }
    element.dyn_into::<T>().map_err(JsValue::from)
}

pub(crate) fn build(document: &Document, config: &UploadConfig) -> Result<WidgetElements, JsValue> {
    let root: HtmlElement = element(document, "div", ROOT_CLASS, ROOT_STYLE)?;
    let area: HtmlElement = element(document, "div", "image-area", AREA_STYLE)?;

    let close_button: HtmlElement = element(document, "button", CLOSE_CLASS, CLOSE_STYLE)?;
    close_button.set_attribute("type", "button")?;
    close_button.set_attribute("aria-label", "Remove image")?;
    close_button.set_text_content(Some("\u{00d7}"));

    let frame: HtmlElement = element(document, "div", "image-container", FRAME_STYLE)?;
    let image: HtmlImageElement = element(document, "img", "img-preview", IMAGE_STYLE)?;
    image.set_alt("");
    frame.append_child(&image)?;

    let file_input: HtmlInputElement = element(document, "input", "", "display: none;")?;
    file_input.set_type("file");
    file_input.set_accept(&config.allowed.accept_attr());
    if let Some(name) = config.name.as_deref() {
        file_input.set_name(name);
    }

    let changed_input: HtmlInputElement = element(document, "input", "image-changed", "")?;
    changed_input.set_type("hidden");
    changed_input.set_name(&config.changed_field_name());
    changed_input.set_value("0");

    let hover_msg: HtmlElement = element(document, "div", "hover-msg", HOVER_STYLE)?;
    let prompt = document.create_element("span")?;
    prompt.set_text_content(Some(&config.prompt));
    hover_msg.append_child(&prompt)?;

    area.append_child(&close_button)?;
    area.append_child(&frame)?;
    area.append_child(&file_input)?;
    area.append_child(&changed_input)?;
    area.append_child(&hover_msg)?;

    let error_list: HtmlElement = element(document, "ul", "img-errors", ERRORS_STYLE)?;

    root.append_child(&area)?;
    root.append_child(&error_list)?;

    Ok(WidgetElements {
        root,
        image,
        file_input,
        changed_input,
        close_button,
        hover_msg,
        error_list,
    })
}

impl WidgetElements {
    pub(crate) fn hide_errors(&self) -> Result<(), JsValue> {
        self.error_list.style().set_property("display", "none")
    }

    /// Replaces the list with one item per message, as text, and shows it.
    pub(crate) fn show_errors(&self, document: &Document, errors: &[String]) -> Result<(), JsValue> {
        self.error_list.set_text_content(None);
        for error in errors {
            let item = document.create_element("li")?;
            item.set_text_content(Some(error));
            self.error_list.append_child(&item)?;
        }
        self.error_list.style().remove_property("display")?;
        Ok(())
    }

    pub(crate) fn set_hover(&self, visible: bool) -> Result<(), JsValue> {
        self.hover_msg
            .style()
            .set_property("opacity", if visible { "1" } else { "0" })
    }
}
