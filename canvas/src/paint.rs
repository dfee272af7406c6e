//! Painting: replays a draw list onto a 2D context.
//!
//! This module is the only place that touches [`web_sys::CanvasRenderingContext2d`].
//! All fallible `Canvas2D` calls propagate errors via `Result<(), JsValue>`;
//! the caller ([`crate::engine::Engine::render`]) decides what to do with them.

#[cfg(test)]
#[path = "paint_test.rs"]
mod paint_test;

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

use crate::geom::{Point, Size};
use crate::render::{DrawCmd, NodeShape};

/// Marquee dash segment length in screen pixels.
const MARQUEE_DASH_PX: f64 = 4.0;

/// Padding around label backgrounds, as a fraction of the font height.
const LABEL_PADDING: f64 = 0.2;

/// The context's save/restore stack.
trait StateStack {
    fn save(&self);
    fn restore(&self);
}

impl StateStack for CanvasRenderingContext2d {
    fn save(&self) {
        CanvasRenderingContext2d::save(self);
    }

    fn restore(&self) {
        CanvasRenderingContext2d::restore(self);
    }
}

/// Run `f` between a save and a restore. The restore runs on both the `Ok`
/// and `Err` paths.
fn with_saved<S, T, E>(ctx: &S, f: impl FnOnce(&S) -> Result<T, E>) -> Result<T, E>
where
    S: StateStack + ?Sized,
{
    StateStack::save(ctx);
    let result = f(ctx);
    StateStack::restore(ctx);
    result
}

/// Paint `cmds` in order. `dpr` is the device pixel ratio; `image` is drawn
/// for [`DrawCmd::Image`] when present.
///
/// # Errors
///
/// Returns `Err` if any `Canvas2D` call fails.
pub fn paint(
    ctx: &CanvasRenderingContext2d,
    cmds: &[DrawCmd],
    image: Option<&HtmlImageElement>,
    dpr: f64,
) -> Result<(), JsValue> {
    with_saved(ctx, |ctx| cmds.iter().try_for_each(|cmd| paint_one(ctx, cmd, image, dpr)))
}

fn paint_one(
    ctx: &CanvasRenderingContext2d,
    cmd: &DrawCmd,
    image: Option<&HtmlImageElement>,
    dpr: f64,
) -> Result<(), JsValue> {
    match cmd {
        DrawCmd::Clear { size } => {
            ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
            ctx.clear_rect(0.0, 0.0, size.width, size.height);
        }
        DrawCmd::Transform { zoom, pan } => {
            ctx.set_transform(dpr * zoom, 0.0, 0.0, dpr * zoom, dpr * pan.x, dpr * pan.y)?;
        }
        DrawCmd::Image { size } => {
            if let Some(img) = image {
                ctx.draw_image_with_html_image_element_and_dw_and_dh(img, 0.0, 0.0, size.width, size.height)?;
            }
        }
        DrawCmd::FillPolygon { points, color } => fill_polygon(ctx, points, color),
        DrawCmd::Segment { from, to, width, color } => {
            ctx.set_stroke_style_str(color);
            ctx.set_line_width(*width);
            ctx.begin_path();
            ctx.move_to(from.x, from.y);
            ctx.line_to(to.x, to.y);
            ctx.stroke();
        }
        DrawCmd::Node { center, diameter, shape, color } => draw_node(ctx, *center, *diameter, *shape, color)?,
        DrawCmd::Label { at, text, font, color, background } => {
            draw_label(ctx, *at, text, font, color, *background)?;
        }
        DrawCmd::Marquee { origin, size, line_width, stroke, fill } => {
            draw_marquee(ctx, *origin, *size, *line_width, stroke, fill)?;
        }
    }
    Ok(())
}

fn fill_polygon(ctx: &CanvasRenderingContext2d, points: &[Point], color: &str) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    ctx.set_fill_style_str(color);
    ctx.begin_path();
    ctx.move_to(first.x, first.y);
    for p in rest {
        ctx.line_to(p.x, p.y);
    }
    ctx.close_path();
    ctx.fill();
}

fn draw_node(
    ctx: &CanvasRenderingContext2d,
    center: Point,
    diameter: f64,
    shape: NodeShape,
    color: &str,
) -> Result<(), JsValue> {
    ctx.set_fill_style_str(color);
    let r = diameter / 2.0;
    match shape {
        NodeShape::Ellipse => {
            ctx.begin_path();
            ctx.arc(center.x, center.y, r, 0.0, 2.0 * PI)?;
            ctx.fill();
        }
        NodeShape::Square => ctx.fill_rect(center.x - r, center.y - r, diameter, diameter),
    }
    Ok(())
}

fn draw_label(
    ctx: &CanvasRenderingContext2d,
    at: Point,
    text: &str,
    font: &str,
    color: &str,
    background: Option<&str>,
) -> Result<(), JsValue> {
    ctx.set_font(font);
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");

    if let Some(bg) = background {
        let metrics = ctx.measure_text(text)?;
        let height = metrics.actual_bounding_box_ascent() + metrics.actual_bounding_box_descent();
        let pad = height * LABEL_PADDING;
        let width = metrics.width() + 2.0 * pad;
        ctx.set_fill_style_str(bg);
        ctx.fill_rect(at.x - width / 2.0, at.y - height / 2.0 - pad, width, height + 2.0 * pad);
    }

    ctx.set_fill_style_str(color);
    ctx.fill_text(text, at.x, at.y)?;
    Ok(())
}

fn draw_marquee(
    ctx: &CanvasRenderingContext2d,
    origin: Point,
    size: Size,
    line_width: f64,
    stroke: &str,
    fill: &str,
) -> Result<(), JsValue> {
    // The dash pattern is part of the saved state; restore clears it.
    with_saved(ctx, |ctx| {
        let dash_world = MARQUEE_DASH_PX * line_width;
        let dash_array = js_sys::Array::new();
        dash_array.push(&dash_world.into());
        dash_array.push(&dash_world.into());
        ctx.set_line_dash(&dash_array)?;
        ctx.set_stroke_style_str(stroke);
        ctx.set_fill_style_str(fill);
        ctx.set_line_width(line_width);
        ctx.fill_rect(origin.x, origin.y, size.width, size.height);
        ctx.stroke_rect(origin.x, origin.y, size.width, size.height);
        Ok(())
    })
}
