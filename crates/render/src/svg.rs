use pixelswarm_common::Dimensions;

use crate::canvas::{Canvas, Circle};

/// Canvas that accumulates an SVG document in memory.
#[derive(Debug, Clone)]
pub struct SvgCanvas {
    dimensions: Dimensions,
    background: String,
    body: String,
}

impl SvgCanvas {
    pub fn new(dimensions: Dimensions, background: impl Into<String>) -> Self {
        Self {
            dimensions,
            background: background.into(),
            body: String::new(),
        }
    }

    /// The complete SVG document for everything drawn since the last clear.
    pub fn document(&self) -> String {
        let Dimensions { width, height } = self.dimensions;
        let mut out = String::new();
        out.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">\n"
        ));
        out.push_str(&format!(
            "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>\n",
            escape(&self.background)
        ));
        out.push_str(&self.body);
        out.push_str("</svg>\n");
        out
    }
}

impl Canvas for SvgCanvas {
    fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    fn clear(&mut self) {
        self.body.clear();
    }

    fn fill_circles(&mut self, color: &str, circles: &[Circle]) {
        // Zero-radius circles draw nothing.
        let visible: Vec<&Circle> = circles.iter().filter(|c| c.radius > 0.0).collect();
        if visible.is_empty() {
            return;
        }
        self.body.push_str(&format!("<g fill=\"{}\">\n", escape(color)));
        for c in visible {
            self.body.push_str(&format!(
                "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{:.2}\"/>\n",
                c.center.x, c.center.y, c.radius
            ));
        }
        self.body.push_str("</g>\n");
    }
}

fn escape(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
