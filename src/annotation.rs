use kurbo::{Affine, Point, Rect, RoundedRect, Stroke, Vec2};
use peniko::{Brush, Color};

use crate::{
  Bounds, Figure,
  render::{Align, DrawText, Render},
};

/// Free text placed in axes-relative coordinates: (0, 0) is the bottom-left
/// corner of the plot area and (1, 1) the top-right.
#[derive(Debug, Clone)]
pub struct Annotation {
  text:                String,
  anchor:              Point,
  pub(crate) h_align:  Align,
  pub(crate) v_align:  Align,
  pub(crate) text_box: Option<TextBox>,
}

/// Background drawn behind an annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBox {
  pub fill:          Color,
  pub border:        Option<Color>,
  pub corner_radius: f64,
  pub padding:       f64,
}

impl TextBox {
  /// A rounded box with a thin border tinted like the fill's opacity.
  pub fn rounded(fill: Color) -> Self {
    TextBox {
      fill,
      border: Some(Color::BLACK.with_alpha(fill.components[3])),
      corner_radius: 6.0,
      padding: 8.0,
    }
  }
}

impl Annotation {
  pub(crate) fn new(text: &str, anchor: Point) -> Self {
    Annotation {
      text: text.to_string(),
      anchor,
      h_align: Align::Start,
      v_align: Align::Start,
      text_box: None,
    }
  }

  pub fn text(&self) -> &str { &self.text }
  pub fn anchor(&self) -> Point { self.anchor }
  pub fn text_box(&self) -> Option<&TextBox> { self.text_box.as_ref() }

  /// `Start` keeps the text right of the anchor.
  pub fn horizontal_align(&mut self, align: Align) -> &mut Self {
    self.h_align = align;
    self
  }

  /// `Start` hangs the text below the anchor, so the anchor marks its top edge.
  pub fn vertical_align(&mut self, align: Align) -> &mut Self {
    self.v_align = align;
    self
  }

  pub fn boxed(&mut self, text_box: TextBox) -> &mut Self {
    self.text_box = Some(text_box);
    self
  }

  pub(crate) fn draw(&self, render: &mut Render, viewport: Bounds, size: f32, color: Color) {
    let position = viewport.relative(self.anchor.x, self.anchor.y);
    let text = DrawText {
      text: &self.text,
      size,
      brush: Brush::Solid(color),
      position,
      horizontal_align: self.h_align,
      vertical_align: self.v_align,
      ..Default::default()
    };
    let layout = render.layout_text(&text);

    if let Some(text_box) = &self.text_box {
      let width = f64::from(layout.width());
      let height = f64::from(layout.height());
      let origin = position + Vec2::new(self.h_align.offset(width), self.v_align.offset(height));
      let rect = Rect::from_origin_size(origin, (width, height))
        .inflate(text_box.padding, text_box.padding);
      let background = RoundedRect::from_rect(rect, text_box.corner_radius);

      render.fill(&background, Affine::IDENTITY, text_box.fill);
      if let Some(border) = text_box.border {
        render.stroke(&background, Affine::IDENTITY, border, &Stroke::new(1.0));
      }
    }

    render.draw_text_layout(layout, text);
  }
}

impl Figure {
  /// Adds text at axes-relative `(x, y)`.
  pub fn annotate(&mut self, text: &str, x: f64, y: f64) -> &mut Annotation {
    self.annotations.push(Annotation::new(text, Point::new(x, y)));
    match self.annotations.last_mut() {
      Some(a) => a,
      None => unreachable!(),
    }
  }

  pub(crate) fn draw_annotations(&self, render: &mut Render, viewport: Bounds) {
    for annotation in &self.annotations {
      annotation.draw(render, viewport, self.theme.annotation_size, self.theme.text);
    }
  }
}
