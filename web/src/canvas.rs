use memory_core::{Color, Px, Px2, Rect, Sprite, Surface, TextAnchor};
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

use crate::utils::js_reason;

const FONT: &str = "18px sans-serif";

/// [`Surface`] over the 2D context of a `<canvas>`.
pub(crate) struct CanvasSurface {
    context: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl CanvasSurface {
    pub(crate) fn from_canvas(canvas: &HtmlCanvasElement) -> Option<Self> {
        let context = canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        context.set_font(FONT);
        Some(Self {
            context,
            width: canvas.width().into(),
            height: canvas.height().into(),
        })
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self, color: Color) {
        self.context.set_fill_style_str(&color.css());
        self.context.fill_rect(0., 0., self.width, self.height);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.context.set_fill_style_str(&color.css());
        self.context.fill_rect(
            rect.x.into(),
            rect.y.into(),
            rect.width.into(),
            rect.height.into(),
        );
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, width: Px) {
        // canvas strokes straddle the path, keep the border inside the rect
        let line = f64::from(width);
        self.context.set_stroke_style_str(&color.css());
        self.context.set_line_width(line);
        self.context.stroke_rect(
            f64::from(rect.x) + line / 2.,
            f64::from(rect.y) + line / 2.,
            f64::from(rect.width) - line,
            f64::from(rect.height) - line,
        );
    }

    fn draw_text(&mut self, text: &str, (x, y): Px2, anchor: TextAnchor, color: Color) {
        let (align, baseline) = match anchor {
            TextAnchor::TopLeft => ("left", "top"),
            TextAnchor::Center => ("center", "middle"),
        };
        self.context.set_text_align(align);
        self.context.set_text_baseline(baseline);
        self.context.set_fill_style_str(&color.css());
        if let Err(err) = self.context.fill_text(text, x.into(), y.into()) {
            log::error!("failed to draw text {:?}: {}", text, js_reason(err));
        }
    }

    fn blit(&mut self, sprite: &Sprite, (x, y): Px2) {
        let image = ImageData::new_with_u8_clamped_array_and_sh(
            Clamped(sprite.rgba()),
            sprite.width(),
            sprite.height(),
        );
        let drawn = image.and_then(|image| self.context.put_image_data(&image, x.into(), y.into()));
        if let Err(err) = drawn {
            log::error!("failed to blit sprite: {}", js_reason(err));
        }
    }

    fn present(&mut self) {}
}
