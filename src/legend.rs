use kurbo::{Affine, Circle, Point, Rect, RoundedRect, Size, Stroke, Vec2};
use peniko::{Brush, Color};

use crate::{
  Bounds, Figure, Layer,
  render::{Align, DrawText, Render},
};

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
  pub label:  String,
  pub marker: LegendMarker,
  pub color:  Color,
}

/// The swatch drawn next to a legend label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendMarker {
  Line,
  Patch,
  Point,
}

impl Figure {
  /// Entries for every labelled layer, in drawing order.
  pub fn legend_entries(&self) -> Vec<LegendEntry> {
    self
      .layers
      .iter()
      .filter_map(|layer| {
        let marker = match layer {
          Layer::Scatter(_) => LegendMarker::Point,
          Layer::Line(_) => LegendMarker::Line,
          Layer::Band(_) => LegendMarker::Patch,
        };
        Some(LegendEntry { label: layer.label()?.to_string(), marker, color: layer.color() })
      })
      .collect()
  }

  pub(crate) fn draw_legend(&self, render: &mut Render, viewport: Bounds) {
    let entries = self.legend_entries();
    if entries.is_empty() {
      return;
    }

    const MARGIN: f64 = 12.0;
    const PADDING: f64 = 10.0;
    const LINE_HEIGHT: f64 = 24.0;
    const MARKER_WIDTH: f64 = 40.0;

    let mut inner_width = 0.0_f64;
    let mut layouts = vec![];
    for entry in &entries {
      let text = DrawText {
        text: &entry.label,
        size: self.theme.legend_size,
        brush: Brush::Solid(self.theme.text),
        vertical_align: Align::Center,
        ..Default::default()
      };
      let layout = render.layout_text(&text);
      inner_width = inner_width.max(f64::from(layout.width()));
      layouts.push((layout, text));
    }

    inner_width += MARKER_WIDTH;
    let inner_height = entries.len() as f64 * LINE_HEIGHT;

    // Top-right corner of the plot area. The viewport's y range is flipped,
    // so `max` is the top edge in pixels.
    let rect = Rect::new(
      viewport.x.max - inner_width - MARGIN - PADDING * 2.0,
      viewport.y.max + MARGIN,
      viewport.x.max - MARGIN,
      viewport.y.max + MARGIN + inner_height + PADDING * 2.0,
    );
    let background = RoundedRect::from_rect(rect, 5.0);
    render.fill(&background, Affine::IDENTITY, Color::WHITE.with_alpha(0.8));
    render.stroke(&background, Affine::IDENTITY, self.theme.spine, &Stroke::new(1.0));

    for (i, (layout, mut text)) in layouts.into_iter().enumerate() {
      let pos = Point::new(
        rect.x0 + PADDING,
        rect.y0 + i as f64 * LINE_HEIGHT + PADDING + LINE_HEIGHT / 2.0,
      );

      let entry = &entries[i];
      match entry.marker {
        LegendMarker::Line => {
          let swatch =
            Rect::from_origin_size(pos - Vec2::new(0.0, 1.0), Size::new(MARKER_WIDTH - 8.0, 2.0));
          render.fill(&swatch, Affine::IDENTITY, entry.color);
        }
        LegendMarker::Patch => {
          let swatch =
            Rect::from_origin_size(pos - Vec2::new(0.0, 7.0), Size::new(MARKER_WIDTH - 8.0, 14.0));
          render.fill(&swatch, Affine::IDENTITY, entry.color);
        }
        LegendMarker::Point => {
          let center = pos + Vec2::new((MARKER_WIDTH - 8.0) / 2.0, 0.0);
          render.fill(&Circle::new(center, 5.0), Affine::IDENTITY, entry.color);
        }
      }

      text.position = pos + Vec2::new(MARKER_WIDTH, 0.0);
      render.draw_text_layout(layout, text);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_labelled_layers_are_listed() {
    let mut figure = Figure::new();
    figure.scatter(vec![1.0, 2.0], vec![1.0, 2.0]);
    figure.line(vec![1.0, 2.0], vec![1.0, 2.0]).label("fit").color(Color::from_rgb8(255, 0, 0));
    figure.fill_between(vec![1.0, 2.0], vec![0.0, 1.0], vec![2.0, 3.0]).label("band");

    let entries = figure.legend_entries();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].label, "fit");
    assert_eq!(entries[0].marker, LegendMarker::Line);
    assert_eq!(entries[0].color, Color::from_rgb8(255, 0, 0));
    assert_eq!(entries[1].marker, LegendMarker::Patch);
  }
}
