//! DOM listener wiring for `TableView`.
//!
//! Every handler holds a weak reference to the shared state and skips the
//! event if the state is already borrowed: programmatic scroll writes raise
//! their events asynchronously, and the scroll lock drops them anyway.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use web_sys::{Element, EventTarget, MouseEvent, ResizeObserver};

use super::dom::{sticky_geometry, DomPane, PANE_ATTR};
use super::{invoke_render_callback, SharedState};
use crate::scroll::{PaneId, ScrollEvent};

type Handler = Closure<dyn FnMut(web_sys::Event)>;

/// A registered event listener, removed again on drop.
pub(crate) struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Handler,
}

impl Listener {
    fn add(target: &EventTarget, event: &'static str, closure: Handler) -> Option<Self> {
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .ok()?;
        Some(Self {
            target: target.clone(),
            event,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

/// A resize observer, disconnected on drop.
pub(crate) struct Observer {
    observer: ResizeObserver,
    #[allow(dead_code)] // must outlive the observer
    closure: Closure<dyn FnMut(js_sys::Array)>,
}

impl Drop for Observer {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Run `f` against the shared state when it is still alive and not borrowed,
/// then request a render if `f` asks for one.
fn with_state(weak: &Weak<RefCell<SharedState>>, f: impl FnOnce(&mut SharedState) -> bool) {
    let Some(state) = weak.upgrade() else {
        return;
    };
    let callback = {
        let Ok(mut s) = state.try_borrow_mut() else {
            return;
        };
        if f(&mut s) {
            s.render_callback.clone()
        } else {
            None
        }
    };
    invoke_render_callback(callback);
}

/// Attach every `[data-tablesync-pane]` element below `root` to the scroll hub
/// and listen to its scroll events.
pub(crate) fn wire_panes(state: &Rc<RefCell<SharedState>>, root: &Element) -> Vec<Listener> {
    let mut listeners = Vec::new();
    let Ok(nodes) = root.query_selector_all(&format!("[{PANE_ATTR}]")) else {
        return listeners;
    };
    for node in (0..nodes.length()).filter_map(|i| nodes.item(i)) {
        let Ok(element) = node.dyn_into::<Element>() else {
            continue;
        };
        let Some(pane) = element
            .get_attribute(PANE_ATTR)
            .and_then(|name| name.parse::<PaneId>().ok())
        else {
            log::warn!("ignoring element with unknown {PANE_ATTR}");
            continue;
        };

        if pane == PaneId::StickyScrollBar {
            listeners.extend(wire_sticky_thumb(state, &element));
            continue;
        }

        state
            .borrow_mut()
            .table
            .attach_pane(pane, Box::new(DomPane::new(element.clone())));

        let weak = Rc::downgrade(state);
        let closure = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            with_state(&weak, |s| {
                let before = s.table.ping();
                let outcome = s.table.on_scroll(ScrollEvent::native(pane));
                outcome.ping.is_some_and(|ping| ping != before)
            });
        }) as Box<dyn FnMut(web_sys::Event)>);
        listeners.extend(Listener::add(element.as_ref(), "scroll", closure));
    }
    listeners
}

fn page_x(event: &web_sys::Event) -> Option<(f64, bool)> {
    let mouse = event.dyn_ref::<MouseEvent>()?;
    Some((f64::from(mouse.page_x()), mouse.buttons() & 1 == 1))
}

/// Drag handling for the sticky scrollbar thumb. Move and up are tracked on
/// the document so a drag continues outside the thumb.
fn wire_sticky_thumb(state: &Rc<RefCell<SharedState>>, thumb: &Element) -> Vec<Listener> {
    let mut listeners = Vec::new();

    let weak = Rc::downgrade(state);
    let down = Closure::wrap(Box::new(move |event: web_sys::Event| {
        let Some((x, _)) = page_x(&event) else {
            return;
        };
        event.prevent_default();
        with_state(&weak, |s| {
            s.table.on_sticky_pointer_down(x);
            false
        });
    }) as Box<dyn FnMut(web_sys::Event)>);
    listeners.extend(Listener::add(thumb.as_ref(), "mousedown", down));

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return listeners;
    };

    let weak = Rc::downgrade(state);
    let moved = Closure::wrap(Box::new(move |event: web_sys::Event| {
        let Some((x, pressed)) = page_x(&event) else {
            return;
        };
        with_state(&weak, |s| s.table.on_sticky_pointer_move(x, pressed).is_some());
    }) as Box<dyn FnMut(web_sys::Event)>);
    listeners.extend(Listener::add(document.as_ref(), "mousemove", moved));

    let weak = Rc::downgrade(state);
    let up = Closure::wrap(Box::new(move |_event: web_sys::Event| {
        with_state(&weak, |s| {
            s.table.on_sticky_pointer_up();
            false
        });
    }) as Box<dyn FnMut(web_sys::Event)>);
    listeners.extend(Listener::add(document.as_ref(), "mouseup", up));

    listeners
}

/// Scroll and resize of the scrolling ancestor (the window when none is
/// found) drive the sticky scrollbar and sticky header offsets.
pub(crate) fn wire_scroll_parent(
    state: &Rc<RefCell<SharedState>>,
    container: Option<Element>,
) -> Vec<Listener> {
    let mut listeners = Vec::new();
    let Some(window) = web_sys::window() else {
        return listeners;
    };
    let target: EventTarget = match &container {
        Some(el) => el.clone().into(),
        None => window.clone().into(),
    };

    let make = |weak: Weak<RefCell<SharedState>>, container: Option<Element>| {
        Closure::wrap(Box::new(move |_event: web_sys::Event| {
            with_state(&weak, |s| refresh_sticky(s, container.as_ref()));
        }) as Box<dyn FnMut(web_sys::Event)>)
    };

    listeners.extend(Listener::add(
        &target,
        "scroll",
        make(Rc::downgrade(state), container.clone()),
    ));
    listeners.extend(Listener::add(
        window.as_ref(),
        "resize",
        make(Rc::downgrade(state), container),
    ));
    listeners
}

/// Recompute sticky scrollbar visibility and header/summary offsets.
pub(crate) fn refresh_sticky(s: &mut SharedState, container: Option<&Element>) -> bool {
    let Some(body) = s.pane_element(PaneId::Body) else {
        return false;
    };
    let geometry = match container {
        Some(el) => sticky_geometry(&body, el, false),
        None => sticky_geometry(&body, &s.root, true),
    };
    let flipped = s.table.on_container_scroll(geometry);

    let scroll_top = match container {
        Some(el) => f64::from(el.scroll_top()),
        None => web_sys::window()
            .and_then(|w| w.scroll_y().ok())
            .unwrap_or_default(),
    };
    let before = s.table.sticky_offsets();
    let after = s.table.on_parent_scroll(scroll_top, s.header_top, s.foot_top);
    flipped || before != after
}

/// Observe `root` and run the full-table resize path on every size change.
pub(crate) fn observe_resize(state: &Rc<RefCell<SharedState>>, root: &Element) -> Option<Observer> {
    let weak = Rc::downgrade(state);
    let target = root.clone();
    let closure = Closure::wrap(Box::new(move |_entries: js_sys::Array| {
        let width = target.get_bounding_client_rect().width();
        with_state(&weak, |s| {
            s.table.on_full_table_resize(width);
            true
        });
    }) as Box<dyn FnMut(js_sys::Array)>);
    let observer = ResizeObserver::new(closure.as_ref().unchecked_ref()).ok()?;
    observer.observe(root);
    Some(Observer { observer, closure })
}
