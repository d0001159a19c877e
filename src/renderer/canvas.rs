//! Canvas 2D surface

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::{Rect, Sprite, Surface};

/// Bullet image path, relative to the page
const BULLET_IMAGE: &str = "bullet.png";

/// Surface drawing onto an HTML canvas
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    bullet: Option<HtmlImageElement>,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;

        let bullet = HtmlImageElement::new().ok();
        if let Some(img) = &bullet {
            img.set_src(BULLET_IMAGE);
        }

        Some(Self {
            canvas,
            ctx,
            bullet,
        })
    }

    /// Match the backing store to the displayed size
    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn loaded_bullet(&self) -> Option<HtmlImageElement> {
        self.bullet
            .as_ref()
            .filter(|img| img.complete() && img.natural_width() > 0)
            .cloned()
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (f32, f32) {
        (self.canvas.width() as f32, self.canvas.height() as f32)
    }

    fn clear(&mut self, color: &str) {
        let (w, h) = self.size();
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(0.0, 0.0, w as f64, h as f64);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &str, alpha: f32) {
        self.ctx.set_global_alpha(alpha as f64);
        self.ctx.set_fill_style_str(color);
        self.ctx.begin_path();
        let _ = self.ctx.arc(
            center.x as f64,
            center.y as f64,
            radius.max(0.0) as f64,
            0.0,
            std::f64::consts::TAU,
        );
        self.ctx.fill();
        self.ctx.set_global_alpha(1.0);
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx
            .fill_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
    }

    fn stroke_rect(&mut self, rect: Rect, color: &str) {
        self.ctx.set_stroke_style_str(color);
        self.ctx
            .stroke_rect(rect.x as f64, rect.y as f64, rect.w as f64, rect.h as f64);
    }

    fn draw_sprite(&mut self, sprite: Sprite, rect: Rect) {
        match sprite {
            Sprite::Bullet => match self.loaded_bullet() {
                Some(img) => {
                    let _ = self.ctx.draw_image_with_html_image_element_and_dw_and_dh(
                        &img,
                        rect.x as f64,
                        rect.y as f64,
                        rect.w as f64,
                        rect.h as f64,
                    );
                }
                // Image not loaded yet
                None => {
                    let center = Vec2::new(rect.x + rect.w / 2.0, rect.y + rect.h / 2.0);
                    self.fill_circle(center, rect.w / 6.0, "#f1c40f", 1.0);
                }
            },
        }
    }
}
