//! `Surface` over a 2D canvas context.

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, Window};

use crate::error::PageError;
use crate::surface::{Rgb, Shape, Surface};

#[derive(Clone)]
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn from_id(doc: &Document, id: &'static str) -> Result<Self, PageError> {
        let canvas: HtmlCanvasElement = doc
            .get_element_by_id(id)
            .ok_or(PageError::MissingElement(id))?
            .dyn_into()
            .map_err(|_| PageError::MissingElement(id))?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or(PageError::NoContext(id))?
            .dyn_into()
            .map_err(|_| PageError::NoContext(id))?;
        Ok(Self { canvas, ctx })
    }

    /// Match the backing store to the element's layout size.
    pub fn fit_to_element(&self) {
        self.canvas.set_width(self.canvas.offset_width().max(0) as u32);
        self.canvas.set_height(self.canvas.offset_height().max(0) as u32);
    }

    pub fn fit_to_window(&self, win: &Window) {
        let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        self.canvas.set_width(dim(win.inner_width()) as u32);
        self.canvas.set_height(dim(win.inner_height()) as u32);
    }
}

#[allow(deprecated)] // set_fill_style / set_stroke_style take JsValue on older web-sys
impl Surface for CanvasSurface {
    fn size(&self) -> (f64, f64) {
        (self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn clear(&mut self) {
        let (w, h) = self.size();
        self.ctx.clear_rect(0.0, 0.0, w, h);
    }

    fn fade(&mut self, color: Rgb, alpha: f64) {
        let (w, h) = self.size();
        self.ctx.set_fill_style(&JsValue::from_str(&color.css(alpha)));
        self.ctx.fill_rect(0.0, 0.0, w, h);
    }

    fn glow(&mut self, x: f64, y: f64, radius: f64, color: Rgb, alpha: f64) {
        let Ok(gradient) = self.ctx.create_radial_gradient(x, y, 0.0, x, y, radius) else {
            return;
        };
        let _ = gradient.add_color_stop(0.0, &color.css(1.0));
        let _ = gradient.add_color_stop(1.0, "transparent");
        self.ctx.save();
        self.ctx.set_global_alpha(alpha);
        self.ctx.set_fill_style(&gradient);
        self.ctx.begin_path();
        let _ = self.ctx.arc(x, y, radius, 0.0, TAU);
        self.ctx.fill();
        self.ctx.restore();
    }

    fn dot(&mut self, x: f64, y: f64, radius: f64, color: Rgb, alpha: f64) {
        self.ctx.set_fill_style(&JsValue::from_str(&color.css(alpha)));
        self.ctx.begin_path();
        let _ = self.ctx.arc(x, y, radius, 0.0, TAU);
        self.ctx.fill();
    }

    fn segment(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: Rgb, alpha: f64) {
        self.ctx.set_stroke_style(&JsValue::from_str(&color.css(alpha)));
        self.ctx.set_line_width(width);
        self.ctx.set_line_cap("round");
        self.ctx.begin_path();
        self.ctx.move_to(from.0, from.1);
        self.ctx.line_to(to.0, to.1);
        self.ctx.stroke();
    }

    fn shape(&mut self, x: f64, y: f64, angle: f64, shape: Shape, color: Rgb, alpha: f64) {
        self.ctx.save();
        self.ctx.set_global_alpha(alpha);
        let _ = self.ctx.translate(x, y);
        let _ = self.ctx.rotate(angle);
        self.ctx.set_fill_style(&JsValue::from_str(&color.css(1.0)));
        match shape {
            Shape::Rect { w, h } => self.ctx.fill_rect(-w / 2.0, -h / 2.0, w, h),
            Shape::Circle { r } => {
                self.ctx.begin_path();
                let _ = self.ctx.arc(0.0, 0.0, r, 0.0, TAU);
                self.ctx.fill();
            }
            Shape::Glyph { text, px } => {
                self.ctx.set_font(&format!("{px:.0}px serif"));
                self.ctx.set_text_align("center");
                self.ctx.set_text_baseline("middle");
                let _ = self.ctx.fill_text(text, 0.0, 0.0);
            }
        }
        self.ctx.restore();
    }

    fn set_visible(&mut self, visible: bool) {
        let display = if visible { "block" } else { "none" };
        let _ = self.canvas.style().set_property("display", display);
    }
}
