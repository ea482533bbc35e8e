use crate::interaction::{InteractionAction, InteractionState};
use crate::{Category, EntityId};
use log::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, ResizeObserver, ResizeObserverEntry};
use yew::prelude::*;

/// Interaction state owned by a page, plus the intents views may emit.
#[derive(Clone)]
pub struct InteractionHandle {
    /// Snapshot handed down to the chart and the table.
    pub state: InteractionState,
    pub on_hover_entity: Callback<Option<EntityId>>,
    pub on_toggle_entity: Callback<EntityId>,
    pub on_reset_selection: Callback<()>,
    pub on_hover_category: Callback<Option<Category>>,
    /// Pointer left the plot: drop entity and category hover together.
    pub on_clear_hover: Callback<()>,
    /// Prune selection and hover down to the given entity ids.
    pub retain_known: Callback<Vec<EntityId>>,
}

/// Custom hook holding one linked chart/table interaction state.
#[hook]
pub fn use_interaction() -> InteractionHandle {
    let reducer = use_reducer(InteractionState::default);

    let on_hover_entity = {
        let reducer = reducer.clone();
        Callback::from(move |id: Option<EntityId>| {
            reducer.dispatch(InteractionAction::HoverEntity(id));
        })
    };

    let on_toggle_entity = {
        let reducer = reducer.clone();
        Callback::from(move |id: EntityId| {
            reducer.dispatch(InteractionAction::ToggleEntity(id));
        })
    };

    let on_reset_selection = {
        let reducer = reducer.clone();
        Callback::from(move |_: ()| reducer.dispatch(InteractionAction::ResetSelection))
    };

    let on_hover_category = {
        let reducer = reducer.clone();
        Callback::from(move |category: Option<Category>| {
            reducer.dispatch(InteractionAction::HoverCategory(category));
        })
    };

    let on_clear_hover = {
        let reducer = reducer.clone();
        Callback::from(move |_: ()| reducer.dispatch(InteractionAction::ClearHover))
    };

    let retain_known = {
        let reducer = reducer.clone();
        Callback::from(move |ids: Vec<EntityId>| {
            reducer.dispatch(InteractionAction::RetainKnown(ids));
        })
    };

    InteractionHandle {
        state: (*reducer).clone(),
        on_hover_entity,
        on_toggle_entity,
        on_reset_selection,
        on_hover_category,
        on_clear_hover,
        retain_known,
    }
}

/// Width of the referenced element in px, tracked with a `ResizeObserver`.
///
/// Returns `fallback` until the element has been laid out. Only the pixel
/// width changes here; data and interaction state are untouched by resizes.
#[hook]
pub fn use_element_width(node: NodeRef, fallback: f64) -> f64 {
    let width = use_state(|| fallback);

    {
        let width = width.clone();
        use_effect_with(node, move |node| {
            let observer = node.cast::<Element>().and_then(|element| {
                let initial = element.client_width() as f64;
                if initial > 0.0 {
                    width.set(initial);
                }

                let setter = width.clone();
                let on_resize = Closure::<dyn FnMut(js_sys::Array)>::new(move |entries: js_sys::Array| {
                    let Ok(entry) = entries.get(0).dyn_into::<ResizeObserverEntry>() else {
                        return;
                    };
                    let observed = entry.content_rect().width();
                    if observed > 0.0 {
                        setter.set(observed);
                    }
                });

                match ResizeObserver::new(on_resize.as_ref().unchecked_ref()) {
                    Ok(observer) => {
                        observer.observe(&element);
                        Some((observer, on_resize))
                    }
                    Err(err) => {
                        warn!("ResizeObserver unavailable, keeping width {}: {:?}", initial, err);
                        None
                    }
                }
            });

            // Disconnect before the closure is dropped.
            move || {
                if let Some((observer, _on_resize)) = observer {
                    observer.disconnect();
                }
            }
        });
    }

    *width
}
