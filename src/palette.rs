//! Colors, named palettes, and the triangular regions strokes take their color from.

use {
  crate::{
    error::ConfigError,
    geometry::{Rectangle, RectangleExt, Triangle, P2},
  },
  rand::{
    distributions::{Distribution, WeightedIndex},
    Rng,
  },
  serde::{Deserialize, Serialize},
  std::fmt::{self, Display},
};

/// 8 bit RGBA, serialized as `#rrggbb` or `#rrggbbaa`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub [u8; 4]);

impl Color {
  pub const fn rgb(r: u8, g: u8, b: u8) -> Self { Self([r, g, b, 255]) }

  /// Accepts `#rgb`, `#rrggbb` and `#rrggbbaa`, the `#` is optional.
  pub fn from_hex(hex: &str) -> Result<Self, ConfigError> {
    let invalid = || ConfigError::InvalidColor(hex.to_string());
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if !digits.is_ascii() {
      return Err(invalid());
    }
    let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
    let nibble = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16)
      .map(|n| n * 17)
      .map_err(|_| invalid());

    match digits.len() {
      3 => Ok(Self([nibble(0)?, nibble(1)?, nibble(2)?, 255])),
      6 => Ok(Self([byte(0)?, byte(2)?, byte(4)?, 255])),
      8 => Ok(Self([byte(0)?, byte(2)?, byte(4)?, byte(6)?])),
      _ => Err(invalid())
    }
  }

  /// Opaque colors print as `#rrggbb`.
  pub fn to_hex(&self) -> String {
    let [r, g, b, a] = self.0;
    if a == 255 {
      format!("#{r:02x}{g:02x}{b:02x}")
    } else {
      format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
  }

  /// `hue` in degrees, `saturation` and `lightness` in `[0, 1]`.
  pub fn hsl(hue: f64, saturation: f64, lightness: f64) -> Self {
    let (s, l) = (saturation.clamp(0.0, 1.0), lightness.clamp(0.0, 1.0));
    let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let h = hue.rem_euclid(360.0) / 60.0;
    let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h as u32 {
      0 => (chroma, x, 0.0),
      1 => (x, chroma, 0.0),
      2 => (0.0, chroma, x),
      3 => (0.0, x, chroma),
      4 => (x, 0.0, chroma),
      _ => (chroma, 0.0, x),
    };
    let m = l - chroma / 2.0;
    let channel = |c: f64| ((c + m) * 255.0).round() as u8;
    Self([channel(r), channel(g), channel(b), 255])
  }
}

impl Display for Color {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.write_str(&self.to_hex())
  }
}

impl TryFrom<String> for Color {
  type Error = ConfigError;
  fn try_from(hex: String) -> Result<Self, Self::Error> { Self::from_hex(&hex) }
}

impl From<Color> for String {
  fn from(color: Color) -> Self { color.to_hex() }
}

/// A background and a weighted list of stroke colors.
#[derive(Debug, Clone)]
pub struct Palette {
  name: String,
  background: Color,
  colors: Vec<(Color, u32)>,
  weights: WeightedIndex<u32>,
}

impl Palette {
  pub const NAMES: &'static [&'static str] = &[
    "orange_autumn",
    "peaches_and_cream",
    "spring_break",
    "red_white_black",
  ];

  /// Fails when there are no colors, or every weight is zero.
  pub fn new(name: impl Into<String>, background: Color, colors: Vec<(Color, u32)>) -> Result<Self, ConfigError> {
    let name = name.into();
    let weights = WeightedIndex::new(colors.iter().map(|(_, weight)| *weight))
      .map_err(|_| ConfigError::EmptyPalette(name.clone()))?;
    Ok(Self { name, background, colors, weights })
  }

  /// One of the built-in palettes, by case-insensitive name.
  pub fn named(name: &str) -> Result<Self, ConfigError> {
    let hex = |h: &str| Color::from_hex(h);
    let (background, colors) = match name.to_ascii_lowercase().as_str() {
      // vibrant orange, red, off-white against a dark background
      "orange_autumn" => ("#181D31", vec![
        ("#E1B31E", 3), ("#678983", 1), ("#FB5252", 1), ("#F0E9D2", 2), ("#E6DDC4", 2),
      ]),
      // pastel pinks, orange, red
      "peaches_and_cream" => ("#EAA984", vec![
        ("#CBCBE5", 1), ("#EAD5C9", 1), ("#C4594A", 1), ("#8786BF", 1),
      ]),
      "spring_break" => ("#F9F9F9", vec![
        ("#ABD2EB", 1), ("#5AA9E6", 1), ("#DFC232", 1), ("#BE2C58", 1),
      ]),
      "red_white_black" => ("#EC0000", vec![
        ("#ffffff", 2), ("#000231", 1), ("#002214", 1),
      ]),
      _ => return Err(ConfigError::UnknownPalette(name.to_string()))
    };
    let colors = colors.into_iter()
      .map(|(h, weight)| Ok((hex(h)?, weight)))
      .collect::<Result<Vec<_>, ConfigError>>()?;
    Self::new(name.to_ascii_lowercase(), hex(background)?, colors)
  }

  pub fn all() -> impl Iterator<Item = Palette> {
    Self::NAMES.iter().filter_map(|name| Self::named(name).ok())
  }

  /// Name of a uniformly chosen built-in palette.
  pub fn random_name(rng: &mut impl Rng) -> &'static str {
    Self::NAMES[rng.gen_range(0..Self::NAMES.len())]
  }

  pub fn random(rng: &mut impl Rng) -> Result<Self, ConfigError> {
    Self::named(Self::random_name(rng))
  }

  pub fn name(&self) -> &str { &self.name }
  pub fn background(&self) -> Color { self.background }
  pub fn colors(&self) -> &[(Color, u32)] { &self.colors }

  /// Weight-proportional pick.
  pub fn pick(&self, rng: &mut impl Rng) -> Color {
    self.colors[self.weights.sample(rng)].0
  }

  pub fn first(&self) -> Color {
    self.colors[0].0
  }
}

/// Triangles of color laid over the canvas. A stroke takes the color of the first
/// region containing its start point.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRegions {
  regions: Vec<(Triangle, Color)>,
  fallback: Color,
}

impl ColorRegions {
  pub fn new(regions: Vec<(Triangle, Color)>, fallback: Color) -> Self {
    Self { regions, fallback }
  }

  /// `count` triangles with vertices uniform in `bounds`, colored from `palette`.
  /// Points covered by none of them get the palette's first color.
  pub fn random(bounds: Rectangle, palette: &Palette, count: usize, rng: &mut impl Rng) -> Self {
    let regions = (0..count)
      .map(|_| {
        let triangle = Triangle::new(
          bounds.random_point(rng),
          bounds.random_point(rng),
          bounds.random_point(rng),
        );
        (triangle, palette.pick(rng))
      })
      .collect();
    Self::new(regions, palette.first())
  }

  pub fn color_at(&self, point: P2) -> Color {
    self.regions.iter()
      .find(|(triangle, _)| triangle.contains(point))
      .map_or(self.fallback, |(_, color)| *color)
  }

  pub fn regions(&self) -> &[(Triangle, Color)] { &self.regions }
}

#[cfg(test)] mod tests {
  use {
    super::*,
    crate::geometry::canvas,
    anyhow::Result,
    rand::prelude::*,
  };

  #[test] fn hex_forms() -> Result<()> {
    assert_eq!(Color::from_hex("#f00")?, Color::rgb(255, 0, 0));
    assert_eq!(Color::from_hex("E1B31E")?, Color::rgb(0xe1, 0xb3, 0x1e));
    assert_eq!(Color::from_hex("#00000080")?, Color([0, 0, 0, 128]));
    assert_eq!(Color::from_hex("#E1B31E")?.to_hex(), "#e1b31e");
    assert_eq!(Color([1, 2, 3, 4]).to_string(), "#01020304");
    for bad in ["", "#", "#12", "#ggg", "#12345", "#ü12"] {
      assert_eq!(Color::from_hex(bad), Err(ConfigError::InvalidColor(bad.to_string())));
    }
    Ok(())
  }

  #[test] fn hsl() {
    assert_eq!(Color::hsl(0.0, 1.0, 0.5), Color::rgb(255, 0, 0));
    assert_eq!(Color::hsl(120.0, 1.0, 0.5), Color::rgb(0, 255, 0));
    assert_eq!(Color::hsl(600.0, 1.0, 0.5), Color::rgb(0, 0, 255));
    assert_eq!(Color::hsl(42.0, 0.0, 1.0), Color::rgb(255, 255, 255));
  }

  #[test] fn serde_as_hex() -> Result<()> {
    let json = serde_json::to_string(&Color::rgb(0x18, 0x1d, 0x31))?;
    assert_eq!(json, "\"#181d31\"");
    assert_eq!(serde_json::from_str::<Color>("\"#EC0000\"")?, Color::rgb(0xec, 0, 0));
    assert!(serde_json::from_str::<Color>("\"red\"").is_err());
    Ok(())
  }

  #[test] fn named_palettes() -> Result<()> {
    assert_eq!(Palette::all().count(), Palette::NAMES.len());
    let palette = Palette::named("Orange_Autumn")?;
    assert_eq!(palette.name(), "orange_autumn");
    assert_eq!(palette.background(), Color::from_hex("#181D31")?);
    assert_eq!(palette.first(), Color::from_hex("#E1B31E")?);

    let err = Palette::named("mauve").unwrap_err();
    assert_eq!(err, ConfigError::UnknownPalette("mauve".into()));
    assert!(err.to_string().contains("spring_break"));
    Ok(())
  }

  #[test] fn empty_palette() {
    assert!(Palette::new("none", Color::rgb(0, 0, 0), vec![]).is_err());
    assert!(Palette::new("zero", Color::rgb(0, 0, 0), vec![(Color::rgb(1, 1, 1), 0)]).is_err());
  }

  #[test] fn pick_follows_weights() -> Result<()> {
    let mut rng = rand_pcg::Pcg64::seed_from_u64(0);
    let palette = Palette::named("red_white_black")?;
    let white = Color::from_hex("#ffffff")?;
    let n = 10000;
    let whites = (0..n).filter(|_| palette.pick(&mut rng) == white).count();
    // weight 2 of 4
    assert!((whites as f64 / n as f64 - 0.5).abs() < 0.03, "{whites}");
    Ok(())
  }

  #[test] fn regions() -> Result<()> {
    let palette = Palette::named("spring_break")?;
    let (red, blue) = (Color::rgb(255, 0, 0), Color::rgb(0, 0, 255));
    let regions = ColorRegions::new(vec![
      (Triangle::new(P2::new(0.0, 0.0), P2::new(10.0, 0.0), P2::new(0.0, 10.0)), red),
      (Triangle::new(P2::new(0.0, 0.0), P2::new(10.0, 0.0), P2::new(10.0, 10.0)), blue),
    ], palette.first());
    // the first containing region wins
    assert_eq!(regions.color_at(P2::new(2.0, 1.0)), red);
    assert_eq!(regions.color_at(P2::new(9.0, 5.0)), blue);
    assert_eq!(regions.color_at(P2::new(20.0, 20.0)), palette.first());

    let mut rng = rand_pcg::Pcg64::seed_from_u64(1);
    let bounds = canvas(100.0, 140.0);
    let random = ColorRegions::random(bounds, &palette, 10, &mut rng);
    assert_eq!(random.regions().len(), 10);
    for (triangle, color) in random.regions() {
      assert!([triangle.a, triangle.b, triangle.c].iter().all(|p| bounds.contains(*p)));
      assert!(palette.colors().iter().any(|(c, _)| c == color));
    }
    let none = ColorRegions::random(bounds, &palette, 0, &mut rng);
    assert_eq!(none.color_at(bounds.center()), palette.first());
    Ok(())
  }
}
