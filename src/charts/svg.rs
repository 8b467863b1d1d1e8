//! Minimal SVG document frame shared by the charts.

/// Outer size and plot margins of a chart.
pub(super) struct Frame {
    pub width: f64,
    pub height: f64,
    pub left: f64,
    pub top: f64,
    margin_right: f64,
    margin_bottom: f64,
}

impl Frame {
    pub fn new(width: f64, height: f64, left: f64) -> Self {
        Self {
            width,
            height,
            left,
            top: 40.0,
            margin_right: 30.0,
            margin_bottom: 50.0,
        }
    }

    pub fn right(&self) -> f64 {
        self.width - self.margin_right
    }

    pub fn bottom(&self) -> f64 {
        self.height - self.margin_bottom
    }

    pub fn plot_width(&self) -> f64 {
        self.right() - self.left
    }

    pub fn plot_height(&self) -> f64 {
        self.bottom() - self.top
    }

    /// Document header, background and title.
    pub fn open(&self, title: &str) -> String {
        let mut doc = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"sans-serif\">\n",
            w = self.width,
            h = self.height
        );
        doc.push_str(&format!(
            "<rect width=\"{}\" height=\"{}\" fill=\"white\"/>\n",
            self.width, self.height
        ));
        doc.push_str(&format!(
            "<text x=\"{:.1}\" y=\"24\" font-size=\"16\" text-anchor=\"middle\">{}</text>\n",
            self.width / 2.0,
            escape(title)
        ));
        doc
    }

    /// Both axis lines plus their labels.
    pub fn axes(&self, x_label: &str, y_label: &str) -> String {
        let mut out = format!(
            "<line x1=\"{l:.1}\" y1=\"{b:.1}\" x2=\"{r:.1}\" y2=\"{b:.1}\" stroke=\"black\"/>\n\
             <line x1=\"{l:.1}\" y1=\"{t:.1}\" x2=\"{l:.1}\" y2=\"{b:.1}\" stroke=\"black\"/>\n",
            l = self.left,
            r = self.right(),
            t = self.top,
            b = self.bottom()
        );
        out.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"12\" text-anchor=\"middle\">{}</text>\n",
            self.left + self.plot_width() / 2.0,
            self.height - 12.0,
            escape(x_label)
        ));
        out.push_str(&format!(
            "<text x=\"14\" y=\"{:.1}\" font-size=\"12\" text-anchor=\"middle\" transform=\"rotate(-90 14 {:.1})\">{}</text>\n",
            self.top + self.plot_height() / 2.0,
            self.top + self.plot_height() / 2.0,
            escape(y_label)
        ));
        out
    }

    pub fn close(&self) -> String {
        "</svg>\n".to_string()
    }
}

/// Escape text for use inside SVG elements.
pub(super) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
