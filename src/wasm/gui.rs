use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{Document, HtmlElement, HtmlInputElement};

use crate::debug::ProgressControl;
use crate::error::DemoError;

const PANEL_STYLE: &str = "position:fixed;top:0;right:15px;min-width:245px;padding:6px 8px;\
    background:#1f1f1f;color:#ebebeb;font:11px/1.4 -apple-system,system-ui,sans-serif;\
    display:flex;align-items:center;gap:8px;z-index:1000";

/// Mounts a slider bound to `control` in the top-right corner of the page
/// and returns the panel element.
pub fn mount(
    document: &Document,
    control: Rc<RefCell<ProgressControl>>,
) -> Result<HtmlElement, DemoError> {
    let body = document.body().ok_or(DemoError::Missing("document body"))?;
    let panel = create::<HtmlElement>(document, "div")?;
    panel.set_attribute("style", PANEL_STYLE)?;

    let label = create::<HtmlElement>(document, "label")?;
    label.set_text_content(Some("progress"));

    let current = *control.borrow();
    let slider = create::<HtmlInputElement>(document, "input")?;
    slider.set_type("range");
    slider.set_min(&current.min().to_string());
    slider.set_max(&current.max().to_string());
    slider.set_step(&current.step().to_string());
    slider.set_value(&current.value().to_string());
    slider.style().set_property("flex", "1")?;

    let readout = create::<HtmlElement>(document, "span")?;
    readout.set_text_content(Some(&format!("{:.1}", current.value())));

    let on_input = {
        let slider = slider.clone();
        let readout = readout.clone();
        Closure::<dyn FnMut()>::new(move || {
            let value = control.borrow_mut().set(slider.value_as_number() as f32);
            readout.set_text_content(Some(&format!("{value:.1}")));
            log::debug!("progress -> {value}");
        })
    };
    slider.add_event_listener_with_callback("input", on_input.as_ref().unchecked_ref())?;
    on_input.forget();

    panel.append_child(&label)?;
    panel.append_child(&slider)?;
    panel.append_child(&readout)?;
    body.append_child(&panel)?;
    Ok(panel)
}

fn create<T: JsCast>(document: &Document, tag: &str) -> Result<T, DemoError> {
    document
        .create_element(tag)?
        .dyn_into::<T>()
        .map_err(|_| DemoError::Js(format!("<{tag}> has unexpected type")))
}
