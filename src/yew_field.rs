use std::rc::Rc;

use imgupload_core::{PickerState, RawUploadConfig};
use web_sys::Element;
use yew::prelude::*;

use crate::host::js_err;
use crate::widget::ImageUpload;

#[derive(Properties, PartialEq)]
pub struct ImageUploadFieldProps {
    pub config: RawUploadConfig,
    #[prop_or_default]
    pub default_src: Option<AttrValue>,
    #[prop_or_default]
    pub on_change: Callback<PickerState>,
    #[prop_or_default]
    pub class: Classes,
}

/// Mounts an [`ImageUpload`] inside a host `div`. A new config rebuilds the
/// widget; `default_src`, when set, overrides the config's default and is
/// applied to the live instance.
#[function_component(ImageUploadField)]
pub fn image_upload_field(props: &ImageUploadFieldProps) -> Html {
    let host_ref = use_node_ref();
    let widget = use_mut_ref(|| None::<ImageUpload>);
    let on_change = use_mut_ref(Callback::<PickerState>::noop);
    *on_change.borrow_mut() = props.on_change.clone();

    {
        let host_ref = host_ref.clone();
        let widget = widget.clone();
        let on_change = on_change.clone();
        let default_src = props.default_src.clone();
        use_effect_with(props.config.clone(), move |config| {
            if let Some(host) = host_ref.cast::<Element>() {
                let mut config = config.clone();
                if let Some(src) = default_src {
                    config.default_src = Some(src.to_string());
                }
                *widget.borrow_mut() = mount(&host, config, on_change);
            }
            move || {
                if let Some(widget) = widget.borrow_mut().take() {
                    widget.remove();
                }
            }
        });
    }

    {
        let widget = widget.clone();
        let applied = use_mut_ref(|| None::<AttrValue>);
        use_effect_with(props.default_src.clone(), move |default_src| {
            let previous = applied.borrow().clone();
            if let (Some(widget), Some(src)) = (
                widget.borrow().as_ref(),
                default_src_update(previous.as_deref(), default_src.as_deref()),
            ) {
                widget.set_default_src(src);
            }
            *applied.borrow_mut() = default_src.clone();
        });
    }

    html! {
        <div ref={host_ref} class={props.class.clone()}></div>
    }
}

/// The value to push to the live widget when the `default_src` prop moves
/// from `previous` to `next`. Dropping the prop removes the override.
fn default_src_update<'a>(previous: Option<&str>, next: Option<&'a str>) -> Option<&'a str> {
    match (previous, next) {
        (_, Some(src)) => Some(src),
        (Some(_), None) => Some(""),
        (None, None) => None,
    }
}

fn mount(
    host: &Element,
    config: RawUploadConfig,
    on_change: Rc<std::cell::RefCell<Callback<PickerState>>>,
) -> Option<ImageUpload> {
    let document = web_sys::window()?.document()?;
    let widget = match ImageUpload::from_raw(&document, config) {
        Ok(widget) => widget,
        Err(err) => {
            gloo::console::warn!("image upload: mount failed", js_err(err));
            return None;
        }
    };
    if let Err(err) = host.append_child(widget.element()) {
        gloo::console::warn!("image upload: mount failed", js_err(err));
        return None;
    }
    widget.set_on_change(Some(Rc::new(move |state: PickerState| {
        let callback = on_change.borrow().clone();
        callback.emit(state);
    })));
    Some(widget)
}

#[cfg(test)]
mod tests {
    use super::default_src_update;

    #[test]
    fn new_default_is_applied() {
        assert_eq!(default_src_update(None, Some("/a.png")), Some("/a.png"));
        assert_eq!(default_src_update(Some("/a.png"), Some("/b.png")), Some("/b.png"));
    }

    #[test]
    fn dropped_default_clears_the_override() {
        assert_eq!(default_src_update(Some("/a.png"), None), Some(""));
        assert_eq!(default_src_update(None, None), None);
    }
}
