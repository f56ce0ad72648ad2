use imgupload::{ImageUploadField, PickerState, RawTypes, RawUploadConfig};
use yew::prelude::*;

const AVATAR_SRC: &str = "avatar.svg";

fn avatar_config() -> RawUploadConfig {
    RawUploadConfig {
        max_size: Some(1024.0.into()),
        types: Some(RawTypes::List(vec!["png".to_string(), "jpeg".to_string()])),
        name: Some("avatar".to_string()),
        prompt: Some("Click to change your avatar".to_string()),
        ..RawUploadConfig::default()
    }
}

fn gallery_config() -> RawUploadConfig {
    RawUploadConfig {
        remove_image_on_clear: true,
        max_size: Some((5.0 * 1024.0).into()),
        name: Some("gallery".to_string()),
        ..RawUploadConfig::default()
    }
}

fn state_text(state: Option<PickerState>) -> &'static str {
    match state {
        None => "untouched",
        Some(PickerState::Empty) => "cleared",
        Some(PickerState::Previewing) => "image selected",
        Some(PickerState::ErrorShown) => "rejected",
    }
}

#[function_component(App)]
fn app() -> Html {
    let avatar_state = use_state(|| None::<PickerState>);
    let gallery_state = use_state(|| None::<PickerState>);

    let on_avatar = {
        let avatar_state = avatar_state.clone();
        Callback::from(move |state: PickerState| avatar_state.set(Some(state)))
    };
    let on_gallery = {
        let gallery_state = gallery_state.clone();
        Callback::from(move |state: PickerState| {
            gloo::console::log!("demo: gallery", state_text(Some(state)));
            gallery_state.set(Some(state));
        })
    };
    let on_submit = Callback::from(|event: SubmitEvent| {
        event.prevent_default();
        gloo::console::log!("demo: submit suppressed, no upload transport");
    });

    html! {
        <main class="demo">
            <h1>{ "imgupload" }</h1>
            <form onsubmit={on_submit}>
                <section>
                    <h2>{ "Avatar" }</h2>
                    <p>{ "PNG or JPEG, up to 1MB." }</p>
                    <ImageUploadField
                        config={avatar_config()}
                        default_src={AttrValue::from(AVATAR_SRC)}
                        on_change={on_avatar}
                    />
                    <p class="status">{ state_text(*avatar_state) }</p>
                </section>
                <section>
                    <h2>{ "Gallery image" }</h2>
                    <p>{ "Any image up to 5MB. Clearing removes the field." }</p>
                    <ImageUploadField config={gallery_config()} on_change={on_gallery} />
                    <p class="status">{ state_text(*gallery_state) }</p>
                </section>
                <button type="submit">{ "Save" }</button>
            </form>
        </main>
    }
}

fn main() {
    console_error_panic_hook::set_once();
    yew::Renderer::<App>::new().render();
}
