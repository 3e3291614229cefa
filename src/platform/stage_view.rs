//! Ragdoll canvas
//!
//! A `StageView` exists only while the ragdoll is attached: creating one
//! adds the canvas and subscribes to pointer/resize events, dropping it
//! removes both.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, MouseEvent};

use super::{Listener, document, window};
use crate::renderer::{Frame, Viewport, canvas};

pub struct StageView {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    _listeners: Vec<Listener>,
}

fn fit(canvas: &HtmlCanvasElement, container: &Element) -> (f32, f32) {
    let width = container.client_width().max(1) as u32;
    let height = container.client_height().max(1) as u32;
    canvas.set_width(width);
    canvas.set_height(height);
    (width as f32, height as f32)
}

impl StageView {
    /// Add a canvas to `container` and start forwarding input
    pub fn create<P, R>(container: &Element, mut on_pointer: P, mut on_resize: R) -> Result<Self, JsValue>
    where
        P: FnMut(f32, f32) + 'static,
        R: FnMut(f32, f32) + 'static,
    {
        if container.query_selector("canvas")?.is_some() {
            return Err(JsValue::from_str("ragdoll canvas already present"));
        }

        let document = document()?;
        let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
        fit(&canvas, container);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;

        let pointer = Listener::new(&document, "mousemove", move |event| {
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                on_pointer(event.client_x() as f32, event.client_y() as f32);
            }
        })?;

        let resize = {
            let canvas = canvas.clone();
            let container = container.clone();
            Listener::new(&window()?, "resize", move |_event| {
                let (width, height) = fit(&canvas, &container);
                on_resize(width, height);
            })?
        };

        // Only joins the page once nothing else can fail
        container.append_child(&canvas)?;

        Ok(Self {
            canvas,
            ctx,
            _listeners: vec![pointer, resize],
        })
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.canvas.width() as f32, self.canvas.height() as f32)
    }

    pub fn draw(&self, view: &Viewport, frame: &Frame) {
        if let Err(e) = canvas::draw(&self.ctx, view, frame) {
            log::warn!("Ragdoll draw failed: {:?}", e);
        }
    }
}

impl Drop for StageView {
    fn drop(&mut self) {
        self.canvas.remove();
    }
}
