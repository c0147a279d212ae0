use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent};

use super::config::LayoutConfig;
use super::highlight::HighlightState;
use super::render;
use super::sidebar::DetailSidebar;
use super::state::RiverCanvasState;
use super::types::{LayoutNode, LayoutResult};

const FRAME_DT: f64 = 0.016;

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok().flatten()?.dyn_into().ok()
}

fn pointer_position(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get_untracked()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn cursor_for(over_node: bool) -> &'static str {
	if over_node { "pointer" } else { "default" }
}

/// Canvas view of a layout. Pointer input is translated into highlight events;
/// the painter reads the highlight state on every animation frame.
#[component]
pub fn NarrativeRiverCanvas(
	/// Layout to paint; a new value replaces the previous one wholesale.
	#[prop(into)]
	layout: Signal<LayoutResult>,
	/// Shared hover and selection state.
	highlight: RwSignal<HighlightState>,
	/// Grid geometry the layout was computed with.
	#[prop(default = LayoutConfig::default())]
	config: LayoutConfig,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let over_node = RwSignal::new(false);
	let state: Rc<RefCell<Option<RiverCanvasState>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init) = (state.clone(), animate.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let snapshot = layout.get();

		{
			let mut slot = state_init.borrow_mut();
			if let Some(s) = slot.as_mut() {
				s.replace_layout(snapshot);
			} else {
				*slot = Some(RiverCanvasState::new(snapshot, config));
			}
			if let Some(s) = slot.as_ref() {
				canvas.set_width(s.width as u32);
				canvas.set_height(s.height as u32);
			}
		}

		if animate_init.borrow().is_some() {
			return;
		}
		let Some(ctx) = context_2d(&canvas) else {
			warn!("canvas has no 2d context");
			return;
		};

		let (state_anim, animate_inner) = (state_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				highlight.with_untracked(|h| {
					s.tick(FRAME_DT, h);
					render::render(s, h, &ctx);
				});
			}
			if let (Some(window), Some(cb)) = (web_sys::window(), animate_inner.borrow().as_ref()) {
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let (Some(window), Some(cb)) = (web_sys::window(), animate_init.borrow().as_ref()) {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer_position(canvas_ref, &ev) else {
			return;
		};
		let (left, entered) = {
			let mut guard = state_mm.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			let hit = s.node_at_position(x, y);
			if hit == s.pointer_node {
				return;
			}
			let left = s.pointer_node.and_then(|i| s.node(i)).cloned();
			let entered = hit.and_then(|i| s.node(i)).cloned();
			s.pointer_node = hit;
			(left, entered)
		};

		highlight.update(|h| {
			if let Some(node) = &left {
				h.pointer_leave(node);
			}
			if let Some(node) = &entered {
				h.pointer_enter(node);
			}
		});
		over_node.set(entered.is_some());
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		let left = state_ml
			.borrow_mut()
			.as_mut()
			.and_then(|s| s.pointer_node.take().and_then(|i| s.node(i)).cloned());
		if let Some(node) = left {
			highlight.update(|h| h.pointer_leave(&node));
		}
		over_node.set(false);
	};

	let state_ck = state.clone();
	let on_click = move |ev: MouseEvent| {
		ev.stop_propagation();
		let hit: Option<LayoutNode> = pointer_position(canvas_ref, &ev).and_then(|(x, y)| {
			let guard = state_ck.borrow();
			let s = guard.as_ref()?;
			s.node_at_position(x, y).and_then(|i| s.node(i)).cloned()
		});
		highlight.update(|h| match &hit {
			Some(node) => h.click(node),
			None => h.click_background(),
		});
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="narrative-river-canvas"
			on:mousemove=on_mousemove
			on:mouseleave=on_mouseleave
			on:click=on_click
			style:display="block"
			style:cursor=move || cursor_for(over_node.get())
		/>
	}
}

/// Scrollable river with its detail sidebar.
#[component]
pub fn NarrativeRiver(
	/// Layout to show.
	#[prop(into)]
	layout: Signal<LayoutResult>,
	/// Grid geometry the layout was computed with.
	#[prop(default = LayoutConfig::default())]
	config: LayoutConfig,
) -> impl IntoView {
	let highlight = RwSignal::new(HighlightState::new());

	view! {
		<div class="river-frame">
			<div class="river-scroll" on:click=move |_| highlight.update(HighlightState::click_background)>
				<NarrativeRiverCanvas layout=layout highlight=highlight config=config />
			</div>
			<DetailSidebar layout=layout highlight=highlight />
		</div>
	}
}
