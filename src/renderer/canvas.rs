//! Canvas 2D painter (browser only)

use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::shapes::{Shape, Stroke};

fn apply_stroke(ctx: &CanvasRenderingContext2d, stroke: &Stroke) {
    ctx.set_stroke_style_str(stroke.color);
    ctx.set_line_width(stroke.width as f64);
}

/// Clear the canvas and draw `shapes` in order
pub fn paint(
    ctx: &CanvasRenderingContext2d,
    width: f64,
    height: f64,
    shapes: &[Shape],
) -> Result<(), JsValue> {
    ctx.clear_rect(0.0, 0.0, width, height);

    for shape in shapes {
        match shape {
            Shape::Rect {
                min,
                size,
                fill,
                stroke,
            } => {
                let (x, y, w, h) = (min.x as f64, min.y as f64, size.x as f64, size.y as f64);
                if let Some(fill) = fill {
                    ctx.set_fill_style_str(fill);
                    ctx.fill_rect(x, y, w, h);
                }
                if let Some(stroke) = stroke {
                    apply_stroke(ctx, stroke);
                    ctx.stroke_rect(x, y, w, h);
                }
            }
            Shape::Circle {
                center,
                radius,
                fill,
                stroke,
            } => {
                ctx.set_fill_style_str(fill);
                ctx.begin_path();
                ctx.arc(center.x as f64, center.y as f64, *radius as f64, 0.0, TAU)?;
                ctx.fill();
                if let Some(stroke) = stroke {
                    apply_stroke(ctx, stroke);
                    ctx.stroke();
                }
            }
            Shape::Triangle { points, fill } => {
                ctx.set_fill_style_str(fill);
                ctx.begin_path();
                ctx.move_to(points[0].x as f64, points[0].y as f64);
                ctx.line_to(points[1].x as f64, points[1].y as f64);
                ctx.line_to(points[2].x as f64, points[2].y as f64);
                ctx.close_path();
                ctx.fill();
            }
            Shape::Orb {
                center,
                inner_radius,
                radius,
                inner,
                outer,
                stroke,
            } => {
                let (cx, cy) = (center.x as f64, center.y as f64);
                let gradient = ctx.create_radial_gradient(
                    cx,
                    cy,
                    *inner_radius as f64,
                    cx,
                    cy,
                    *radius as f64,
                )?;
                gradient.add_color_stop(0.0, inner)?;
                gradient.add_color_stop(1.0, outer)?;
                ctx.set_fill_style_canvas_gradient(&gradient);
                ctx.begin_path();
                ctx.arc(cx, cy, *radius as f64, 0.0, TAU)?;
                ctx.fill();
                apply_stroke(ctx, stroke);
                ctx.stroke();
            }
        }
    }
    Ok(())
}
