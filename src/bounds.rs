use kurbo::{Affine, Point};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
  pub x: Range,
  pub y: Range,
}

/// A closed interval. `min` may be greater than `max` for flipped pixel
/// ranges, where y grows downwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
  pub min: f64,
  pub max: f64,
}

impl Bounds {
  pub const fn empty() -> Self { Bounds { x: Range::empty(), y: Range::empty() } }
  pub const fn new(x: Range, y: Range) -> Self { Bounds { x, y } }

  pub fn width(&self) -> f64 { self.x.size().abs() }
  pub fn height(&self) -> f64 { self.y.size().abs() }

  pub const fn expand_by(self, fract: f64) -> Self {
    Bounds { x: self.x.expand_by(fract), y: self.y.expand_by(fract) }
  }

  pub fn union(&self, other: Bounds) -> Bounds {
    Bounds { x: self.x.union(other.x), y: self.y.union(other.y) }
  }

  /// Widens any zero-sized axis so a transform onto it stays invertible.
  pub fn non_degenerate(self) -> Bounds {
    Bounds { x: self.x.non_degenerate(), y: self.y.non_degenerate() }
  }

  /// Maps a point in axes-relative coordinates, (0, 0) at the start of both
  /// ranges and (1, 1) at the end, into these bounds.
  pub fn relative(&self, fx: f64, fy: f64) -> Point {
    Point::new(self.x.lerp(fx), self.y.lerp(fy))
  }

  pub(crate) fn transform_to(&self, viewport: Bounds) -> Affine {
    let scale_x = viewport.x.size() / self.x.size();
    let scale_y = viewport.y.size() / self.y.size();
    let translate_x = viewport.x.min - self.x.min * scale_x;
    let translate_y = viewport.y.min - self.y.min * scale_y;

    Affine::new([scale_x, 0.0, 0.0, scale_y, translate_x, translate_y])
  }
}

impl Default for Range {
  fn default() -> Self { Range::empty() }
}

impl Range {
  pub const fn empty() -> Self { Range { min: 0.0, max: 0.0 } }
  pub const fn new(min: f64, max: f64) -> Self { Range { min, max } }
  pub const fn size(&self) -> f64 { self.max - self.min }

  /// The smallest range covering every finite value, or `None` if there are none.
  pub fn from_values(values: impl IntoIterator<Item = f64>) -> Option<Range> {
    values.into_iter().filter(|v| v.is_finite()).fold(None, |acc, v| match acc {
      None => Some(Range::new(v, v)),
      Some(r) => Some(Range::new(r.min.min(v), r.max.max(v))),
    })
  }

  pub const fn expand(self, amount: f64) -> Self {
    Range {
      min: self.min - amount * self.size().signum(),
      max: self.max + amount * self.size().signum(),
    }
  }
  pub const fn expand_by(self, fract: f64) -> Self { self.expand(self.size().abs() * fract) }

  pub const fn contains(&self, value: &f64) -> bool {
    (*value >= self.min && *value <= self.max) || (*value <= self.min && *value >= self.max)
  }

  pub fn lerp(&self, t: f64) -> f64 { self.min + self.size() * t }

  pub fn non_degenerate(self) -> Range {
    if self.size() == 0.0 { Range::new(self.min - 0.5, self.max + 0.5) } else { self }
  }

  pub fn union(&self, other: Range) -> Range {
    Range { min: self.min.min(other.min), max: self.max.max(other.max) }
  }

  /// `count` evenly spaced values from `min` to `max`, both ends included exactly.
  pub fn linspace(&self, count: usize) -> Vec<f64> {
    match count {
      0 => vec![],
      1 => vec![self.min],
      _ => {
        let step = self.size() / (count - 1) as f64;
        (0..count)
          .map(|i| if i == count - 1 { self.max } else { self.min + step * i as f64 })
          .collect()
      }
    }
  }

  pub fn nice_ticks(&self, count: u32) -> NiceTicksIter {
    let step = (self.max - self.min) / f64::from(count);
    let k = step.log10().floor();
    let base = step / 10f64.powf(k);

    let nice_base = match base {
      b if b < 1.0 => 1.0,
      b if b < 2.0 => 2.0,
      b if b < 2.5 => 2.5,
      b if b < 5.0 => 5.0,
      _ => 10.0,
    };

    let step = nice_base * 10f64.powf(k);
    let lo = (self.min / step).floor() * step;
    let hi = (self.max / step).ceil() * step;

    let precision = (4.0 - k).clamp(0.0, 32.0) as usize;
    NiceTicksIter::new(lo, hi, step, precision)
  }
}

pub struct NiceTicksIter {
  current:   f64,
  step:      f64,
  hi:        f64,
  precision: usize,
}

impl NiceTicksIter {
  fn new(lo: f64, hi: f64, step: f64, precision: usize) -> Self {
    NiceTicksIter { current: lo, step, hi, precision }
  }

  /// Number of decimals needed to print the ticks without noise.
  pub fn label_precision(&self) -> usize { self.precision.saturating_sub(3) }
}

impl Iterator for NiceTicksIter {
  type Item = f64;
  fn next(&mut self) -> Option<Self::Item> {
    if self.step.is_finite() && self.step > 0.0 && self.current < self.hi + self.step * 0.5 {
      let p = 10f64.powi(self.precision as i32);
      let result = (self.current * p).round() / p;
      self.current += self.step;
      Some(result)
    } else {
      None
    }
  }
}
