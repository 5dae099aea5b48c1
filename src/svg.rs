//! Vector export.

use {
  crate::{
    composition::StrokeSink,
    geometry::Rectangle,
    palette::Color,
    solver::Stroke,
  },
  anyhow::{Context, Result},
  itertools::Itertools,
  std::{fmt::Write, path::Path},
};

/// Accepted strokes as round-capped SVG polylines, over a background rectangle.
#[derive(Debug, Clone, Default)]
pub struct SvgDocument {
  canvas: Option<Rectangle>,
  background: Option<Color>,
  comment: Option<String>,
  title: Option<String>,
  paths: Vec<String>,
}

impl SvgDocument {
  pub fn new() -> Self { Self::default() }

  /// Embed `comment` in the document, e.g. the run config needed to recreate it.
  pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
    // "--" may not appear inside an XML comment
    self.comment = Some(comment.into().replace("--", "- -"));
    self
  }

  /// Number of strokes recorded.
  pub fn len(&self) -> usize { self.paths.len() }
  pub fn is_empty(&self) -> bool { self.paths.is_empty() }

  pub fn render(&self) -> String {
    let (x, y, width, height) = match self.canvas {
      Some(canvas) => (canvas.min.x, canvas.min.y, canvas.width(), canvas.height()),
      None => (0.0, 0.0, 0.0, 0.0)
    };
    let mut svg = String::new();
    // writing to a String cannot fail
    let _ = writeln!(
      svg,
      r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="{x} {y} {width} {height}">"#
    );
    if let Some(title) = &self.title {
      let _ = writeln!(svg, "<title>{}</title>", escape(title));
    }
    if let Some(comment) = &self.comment {
      let _ = writeln!(svg, "<!--\n{comment}\n-->");
    }
    if let Some(background) = self.background {
      let _ = writeln!(
        svg,
        r#"<rect x="{x}" y="{y}" width="{width}" height="{height}" fill="{background}"/>"#
      );
    }
    self.paths.iter().for_each(|path| svg.push_str(path));
    svg.push_str("</svg>\n");
    svg
  }

  pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, self.render())
      .with_context(|| format!("unable to write {}", path.display()))
  }
}

fn escape(text: &str) -> String {
  text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

impl StrokeSink for SvgDocument {
  fn begin(&mut self, canvas: Rectangle, background: Color) -> Result<()> {
    self.canvas = Some(canvas);
    self.background = Some(background);
    Ok(())
  }

  fn stroke(&mut self, stroke: &Stroke, color: Color) -> Result<()> {
    let d = stroke.centers()
      .enumerate()
      .map(|(i, p)| format!("{}{:.2} {:.2}", if i == 0 { 'M' } else { 'L' }, p.x, p.y))
      .join(" ");
    self.paths.push(format!(
      "<path d=\"{d}\" stroke=\"{color}\" stroke-width=\"{:.2}\" fill=\"none\" stroke-linecap=\"round\" stroke-linejoin=\"round\"/>\n",
      stroke.radius
    ));
    Ok(())
  }

  fn finish(&mut self, label: &str) -> Result<()> {
    self.title = Some(label.to_string());
    Ok(())
  }
}

#[cfg(test)] mod tests {
  use {
    super::*,
    crate::{
      composition::{generate, RunConfig},
      geometry::{canvas, Circle, P2},
      solver::LengthMetric,
    },
    regex::Regex,
  };

  #[test] fn one_path_per_stroke() -> Result<()> {
    let config = RunConfig { density: 150, ..RunConfig::from_seed(9, 500.0) };
    let mut svg = SvgDocument::new();
    let summary = generate(&config, &mut svg)?;
    let text = svg.render();

    let paths = Regex::new(r"<path d=.M[0-9.\-]+ [0-9.\-]+( L[0-9.\-]+ [0-9.\-]+)+. stroke=.#[0-9a-f]{6}.")?;
    assert_eq!(paths.find_iter(&text).count(), summary.accepted);
    assert_eq!(svg.len(), summary.accepted);
    assert!(text.contains(r#"viewBox="0 0 500 700""#));
    assert!(text.contains("<title>Forces-9</title>"));
    assert!(Regex::new(r##"<rect [^>]* fill="#[0-9a-f]{6}"/>"##)?.is_match(&text));
    assert!(text.trim_end().ends_with("</svg>"));
    Ok(())
  }

  #[test] fn path_data() -> Result<()> {
    let mut svg = SvgDocument::new();
    svg.begin(canvas(10.0, 10.0), Color::rgb(255, 255, 255))?;
    let mut stroke = Stroke::new(0, P2::new(0.0, 0.0), 1.5, LengthMetric::Consecutive);
    stroke.push(Circle::new(P2::new(1.0, 2.0), 1.5));
    stroke.push(Circle::new(P2::new(3.25, 4.0), 1.5));
    svg.stroke(&stroke, Color::rgb(0, 0, 0))?;

    let text = svg.render();
    assert!(text.contains(r##"d="M1.00 2.00 L3.25 4.00" stroke="#000000" stroke-width="1.50""##));
    Ok(())
  }

  #[test] fn comment_stays_a_comment() {
    let svg = SvgDocument::new().with_comment("{\"a\": \"-->\"}");
    let text = svg.render();
    assert_eq!(text.matches("-->").count(), 1);
    assert!(text.contains("<!--"));
  }
}
