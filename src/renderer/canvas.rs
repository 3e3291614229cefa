//! Canvas 2D backend

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::{Frame, Shape, Viewport};

const BACKGROUND: &str = "#14151f";
const ANGLE_INDICATOR: &str = "rgba(255, 255, 255, 0.4)";

fn trace_shape(ctx: &CanvasRenderingContext2d, view: &Viewport, shape: &Shape) -> Result<(), JsValue> {
    let scale = view.scale() as f64;
    let corners = shape.corners.map(|c| view.to_canvas(c));
    let start = (corners[3] + corners[0]) / 2.0;

    ctx.begin_path();
    ctx.move_to(start.x as f64, start.y as f64);
    for (i, corner) in corners.iter().enumerate() {
        let next = corners[(i + 1) % 4];
        ctx.arc_to(
            corner.x as f64,
            corner.y as f64,
            next.x as f64,
            next.y as f64,
            shape.chamfer[i] as f64 * scale,
        )?;
    }
    ctx.close_path();
    Ok(())
}

/// Clear and paint one frame
pub fn draw(ctx: &CanvasRenderingContext2d, view: &Viewport, frame: &Frame) -> Result<(), JsValue> {
    ctx.set_fill_style_str(BACKGROUND);
    ctx.fill_rect(0.0, 0.0, view.width as f64, view.height as f64);

    for shape in &frame.shapes {
        trace_shape(ctx, view, shape)?;
        ctx.set_fill_style_str(&shape.fill);
        ctx.fill();

        let (from, to) = shape.angle_indicator;
        let from = view.to_canvas(from);
        let to = view.to_canvas(to);
        ctx.begin_path();
        ctx.move_to(from.x as f64, from.y as f64);
        ctx.line_to(to.x as f64, to.y as f64);
        ctx.set_stroke_style_str(ANGLE_INDICATOR);
        ctx.stroke();
    }
    Ok(())
}
