use crate::dom::DomController;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

thread_local! {
    static NAVBAR_CONTROLLER: RefCell<Option<Rc<DomController>>> = const { RefCell::new(None) };
}

pub fn store_controller(controller: Rc<DomController>) {
    NAVBAR_CONTROLLER.with(|cell| {
        *cell.borrow_mut() = Some(controller);
    });
}

fn with_controller<F, R>(f: F) -> Option<R>
where
    F: FnOnce(&DomController) -> R,
{
    NAVBAR_CONTROLLER.with(|cell| cell.borrow().as_deref().map(f))
}

/// Installs `window.navbarVisibility` for browser tests.
#[wasm_bindgen]
pub fn expose_navbar_test_api() {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return,
    };

    let api = js_sys::Object::new();

    let get_state_closure = Closure::wrap(Box::new(get_state_impl) as Box<dyn Fn() -> JsValue>);
    js_sys::Reflect::set(&api, &"getState".into(), get_state_closure.as_ref().unchecked_ref()).ok();
    get_state_closure.forget();

    let evaluate_intersection_closure =
        Closure::wrap(Box::new(evaluate_intersection_impl) as Box<dyn Fn() -> JsValue>);
    js_sys::Reflect::set(
        &api,
        &"evaluateIntersection".into(),
        evaluate_intersection_closure.as_ref().unchecked_ref(),
    )
    .ok();
    evaluate_intersection_closure.forget();

    let evaluate_scroll_probe_closure =
        Closure::wrap(Box::new(evaluate_scroll_probe_impl) as Box<dyn Fn() -> JsValue>);
    js_sys::Reflect::set(
        &api,
        &"evaluateScrollProbe".into(),
        evaluate_scroll_probe_closure.as_ref().unchecked_ref(),
    )
    .ok();
    evaluate_scroll_probe_closure.forget();

    if js_sys::Reflect::set(&window, &"navbarVisibility".into(), &api).is_err() {
        zoon::eprintln!("[Test API] Failed to install window.navbarVisibility");
    }
}

fn get_state_impl() -> JsValue {
    with_controller(|controller| controller.state())
        .flatten()
        .map(|state| JsValue::from_str(state.as_str()))
        .unwrap_or(JsValue::NULL)
}

fn evaluate_intersection_impl() -> JsValue {
    with_controller(|controller| controller.evaluate_by_intersection())
        .map(|state| JsValue::from_str(state.as_str()))
        .unwrap_or(JsValue::NULL)
}

fn evaluate_scroll_probe_impl() -> JsValue {
    with_controller(|controller| controller.evaluate_by_scroll_probe())
        .map(|state| JsValue::from_str(state.as_str()))
        .unwrap_or(JsValue::NULL)
}
