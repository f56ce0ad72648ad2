use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use imgupload_core::{Picker, PickerState, RawUploadConfig, UploadConfig};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, Node};

use crate::host::{js_err, ObjectUrlHost, PickedFile};
use crate::markup::{self, WidgetElements, CLOSE_CLASS};

pub type ChangeHook = Rc<dyn Fn(PickerState)>;

struct Inner {
    document: Document,
    elements: WidgetElements,
    picker: RefCell<Picker<ObjectUrlHost>>,
    on_change: RefCell<Option<ChangeHook>>,
}

/// One image upload widget. Dropping it detaches every listener and
/// releases the preview object URL; the DOM subtree stays where the host
/// put it.
pub struct ImageUpload {
    inner: Rc<Inner>,
    _listeners: Vec<EventListener>,
    _settle: Timeout,
}

impl ImageUpload {
    pub fn create(document: &Document, config: UploadConfig) -> Result<Self, JsValue> {
        let elements = markup::build(document, &config)?;
        let picker = Picker::new(config, ObjectUrlHost);
        let inner = Rc::new(Inner {
            document: document.clone(),
            elements,
            picker: RefCell::new(picker),
            on_change: RefCell::new(None),
        });
        inner.render();
        inner.reset_file_input();
        let listeners = bind(&inner);
        let settle_timer = {
            let weak = Rc::downgrade(&inner);
            Timeout::new(0, move || settle(&weak))
        };
        Ok(Self {
            inner,
            _listeners: listeners,
            _settle: settle_timer,
        })
    }

    /// Normalizes a host config record, logging every fallback it needed.
    pub fn from_raw(document: &Document, raw: RawUploadConfig) -> Result<Self, JsValue> {
        let (config, warnings) = UploadConfig::normalize(raw);
        for warning in &warnings {
            gloo::console::warn!("image upload: config", warning.to_string());
        }
        Self::create(document, config)
    }

    pub fn element(&self) -> &HtmlElement {
        &self.inner.elements.root
    }

    pub fn state(&self) -> PickerState {
        self.inner.picker.borrow().state()
    }

    pub fn changed(&self) -> bool {
        self.inner.picker.borrow().changed()
    }

    pub fn errors(&self) -> Vec<String> {
        self.inner.picker.borrow().errors().to_vec()
    }

    pub fn image_src(&self) -> String {
        self.inner.picker.borrow().image_src().to_string()
    }

    pub fn set_default_src(&self, src: &str) {
        self.inner.picker.borrow_mut().set_default_src(src);
        self.inner.render();
    }

    /// Shows `src` in place of the preview. A picked file is discarded, so
    /// the native input is reset and the change hook sees `Empty`.
    pub fn set_image_src(&self, src: &str) {
        let was_previewing = self.state() == PickerState::Previewing;
        if !self.inner.picker.borrow_mut().set_image_src(src) {
            return;
        }
        self.inner.render();
        if was_previewing {
            self.inner.reset_file_input();
            self.inner.notify(PickerState::Empty);
        }
    }

    pub fn set_on_change(&self, hook: Option<ChangeHook>) {
        *self.inner.on_change.borrow_mut() = hook;
    }

    pub fn clear(&self) {
        self.inner.clear();
    }

    pub fn remove(&self) {
        self.inner.elements.root.remove();
    }
}

fn bind(inner: &Rc<Inner>) -> Vec<EventListener> {
    let elements = &inner.elements;
    let on_click = {
        let inner = inner.clone();
        EventListener::new(&elements.root, "click", move |event: &Event| {
            let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            let on_close = target
                .closest(&format!("button.{CLOSE_CLASS}"))
                .ok()
                .flatten()
                .is_some();
            if on_close || is_node(&target, &inner.elements.file_input) {
                return;
            }
            inner.elements.file_input.click();
        })
    };
    let on_input = {
        let inner = inner.clone();
        EventListener::new(&elements.file_input, "input", move |_event| {
            inner.handle_selection();
        })
    };
    let on_close = {
        let inner = inner.clone();
        EventListener::new(&elements.close_button, "click", move |_event| {
            inner.clear();
            if inner.picker.borrow().config().remove_on_clear {
                inner.elements.root.remove();
            }
        })
    };
    let on_enter = hover_listener(inner, "mouseenter", true);
    let on_leave = hover_listener(inner, "mouseleave", false);
    vec![on_click, on_input, on_close, on_enter, on_leave]
}

fn hover_listener(inner: &Rc<Inner>, event_type: &'static str, visible: bool) -> EventListener {
    let inner = inner.clone();
    let root = inner.elements.root.clone();
    EventListener::new(&root, event_type, move |event: &Event| {
        let on_root = event
            .target()
            .is_some_and(|target| is_node(&target, &inner.elements.root));
        if on_root {
            report(inner.elements.set_hover(visible));
        }
    })
}

fn is_node(target: &EventTarget, node: &Node) -> bool {
    target
        .dyn_ref::<Node>()
        .is_some_and(|target| target.is_same_node(Some(node)))
}

fn settle(inner: &Weak<Inner>) {
    let Some(inner) = inner.upgrade() else {
        return;
    };
    inner.elements.file_input.set_value("");
    inner.picker.borrow_mut().settle();
    inner.render();
}

fn report(result: Result<(), JsValue>) {
    if let Err(err) = result {
        gloo::console::warn!("image upload: dom update failed", js_err(err));
    }
}

impl Inner {
    fn render(&self) {
        let picker = self.picker.borrow();
        self.elements.image.set_src(picker.image_src());
        self.elements.changed_input.set_value(picker.changed_flag());
    }

    /// Empties the native input and tells `change` listeners about it.
    fn reset_file_input(&self) {
        self.elements.file_input.set_value("");
        if let Ok(event) = Event::new("change") {
            let _ = self.elements.file_input.dispatch_event(&event);
        }
    }

    fn handle_selection(&self) {
        report(self.elements.hide_errors());
        let file = self
            .elements
            .file_input
            .files()
            .and_then(|files| files.get(0))
            .map(PickedFile);
        let outcome = self.picker.borrow_mut().select(file.as_ref());
        if let Some(err) = &outcome.host_error {
            gloo::console::warn!("image upload:", err.to_string());
        }
        match outcome.state {
            PickerState::Previewing => {
                if let Some(PickedFile(file)) = &file {
                    gloo::console::log!("image upload: previewing", file.name(), file.size());
                }
            }
            PickerState::ErrorShown => {
                let errors = self.picker.borrow().errors().to_vec();
                gloo::console::log!("image upload: rejected", errors.join(" "));
                report(self.elements.show_errors(&self.document, &errors));
            }
            PickerState::Empty => {
                gloo::console::log!("image upload: cleared");
            }
        }
        self.render();
        if outcome.state != PickerState::Previewing {
            self.reset_file_input();
        }
        self.notify(outcome.state);
    }

    fn clear(&self) {
        self.picker.borrow_mut().clear();
        gloo::console::log!("image upload: cleared");
        report(self.elements.hide_errors());
        self.render();
        self.reset_file_input();
        self.notify(PickerState::Empty);
    }

    fn notify(&self, state: PickerState) {
        let hook = self.on_change.borrow().clone();
        if let Some(hook) = hook {
            hook(state);
        }
    }
}
