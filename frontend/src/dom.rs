//! Browser host for the navbar visibility controller
//!
//! Wraps `web-sys` handles in the controller's host traits and wires the two signals:
//! an `IntersectionObserver` over the trigger sections, and passive `scroll` plus `resize`
//! listeners on the window that go through `requestAnimationFrame`.

use shared::{
    FrameScheduler, NavbarConfig, NavbarElement, NavbarVisibilityController, SectionRect,
    TriggerSection, ViewportMetrics,
};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, Document, Element, IntersectionObserver, IntersectionObserverInit,
    Window,
};

pub type DomController = NavbarVisibilityController<NavbarDomElement, SectionElement, WindowViewport>;

pub struct NavbarDomElement(Element);

impl NavbarElement for NavbarDomElement {
    fn has_marker(&self, marker: &str) -> bool {
        self.0.class_list().contains(marker)
    }

    fn add_marker(&self, marker: &str) {
        if let Err(error) = self.0.class_list().add_1(marker) {
            zoon::eprintln!("🚨 Failed to add navbar class '{marker}': {error:?}");
        }
    }

    fn remove_marker(&self, marker: &str) {
        if let Err(error) = self.0.class_list().remove_1(marker) {
            zoon::eprintln!("🚨 Failed to remove navbar class '{marker}': {error:?}");
        }
    }
}

pub struct SectionElement(Element);

impl TriggerSection for SectionElement {
    fn bounding_rect(&self) -> SectionRect {
        let rect = self.0.get_bounding_client_rect();
        SectionRect::new(rect.top(), rect.bottom())
    }
}

pub struct WindowViewport(Window);

impl ViewportMetrics for WindowViewport {
    fn viewport_height(&self) -> f64 {
        self.0
            .inner_height()
            .ok()
            .and_then(|height| height.as_f64())
            .unwrap_or(0.0)
    }
}

pub struct AnimationFrameScheduler(Window);

impl FrameScheduler for AnimationFrameScheduler {
    fn request_frame(&self, callback: Box<dyn FnOnce()>) -> Result<(), String> {
        let frame_callback = Closure::once_into_js(move || callback());
        self.0
            .request_animation_frame(frame_callback.unchecked_ref())
            .map(|_| ())
            .map_err(|error| format!("requestAnimationFrame failed: {error:?}"))
    }
}

/// Find the bar and trigger sections, wire both signals and apply the initial state.
///
/// `Ok(None)` when the page has no bar or no sections; nothing is touched in that case.
pub fn attach_to_document(config: &NavbarConfig) -> Result<Option<Rc<DomController>>, String> {
    let Some(window) = web_sys::window() else {
        return Ok(None);
    };
    let Some(document) = window.document() else {
        return Ok(None);
    };

    let navbar = document
        .get_element_by_id(&config.dom.navbar_id)
        .map(NavbarDomElement);
    let sections = collect_sections(&document, &config.dom.section_class);

    let Some(controller) = DomController::new(
        navbar,
        sections,
        WindowViewport(window.clone()),
        config.visibility.clone(),
    ) else {
        return Ok(None);
    };

    observe_sections(&controller)?;
    listen_scroll_and_resize(&controller, &window)?;
    controller.start();

    Ok(Some(controller))
}

// Snapshot in render order; sections added later are not tracked
fn collect_sections(document: &Document, section_class: &str) -> Vec<SectionElement> {
    let collection = document.get_elements_by_class_name(section_class);
    (0..collection.length())
        .filter_map(|index| collection.item(index))
        .map(SectionElement)
        .collect()
}

fn observe_sections(controller: &Rc<DomController>) -> Result<(), String> {
    let intersection_closure = Closure::wrap(Box::new({
        let controller = Rc::clone(controller);
        move |_entries: js_sys::Array, _observer: IntersectionObserver| {
            controller.evaluate_by_intersection();
        }
    }) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(controller.config().visible_fraction));
    options.set_root_margin(&controller.config().root_margin());

    let observer = IntersectionObserver::new_with_options(
        intersection_closure.as_ref().unchecked_ref(),
        &options,
    )
    .map_err(|error| format!("IntersectionObserver construction failed: {error:?}"))?;

    for section in controller.sections() {
        observer.observe(&section.0);
    }

    // Observer and callback live for the page's lifetime
    intersection_closure.forget();
    Ok(())
}

fn listen_scroll_and_resize(controller: &Rc<DomController>, window: &Window) -> Result<(), String> {
    let scroll_closure = Closure::wrap(Box::new({
        let controller = Rc::clone(controller);
        let scheduler = AnimationFrameScheduler(window.clone());
        move |_event: web_sys::Event| {
            if let Err(error) = controller.schedule_scroll_probe(&scheduler) {
                zoon::eprintln!("🚨 Navbar scroll probe not scheduled: {error}");
            }
        }
    }) as Box<dyn FnMut(web_sys::Event)>);

    let passive = AddEventListenerOptions::new();
    passive.set_passive(true);

    window
        .add_event_listener_with_callback_and_add_event_listener_options(
            "scroll",
            scroll_closure.as_ref().unchecked_ref(),
            &passive,
        )
        .map_err(|error| format!("Failed to listen for scroll: {error:?}"))?;
    window
        .add_event_listener_with_callback("resize", scroll_closure.as_ref().unchecked_ref())
        .map_err(|error| format!("Failed to listen for resize: {error:?}"))?;

    scroll_closure.forget();
    Ok(())
}
