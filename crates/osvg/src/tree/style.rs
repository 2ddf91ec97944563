// Copyright 2026 the Osvg Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// A stylesheet-carrying element.
///
/// Accumulates raw character data while the tree is built. A single
/// [`parse_stylesheet`](Style::parse_stylesheet) call hands the joined text
/// over for selector matching; requesting the stylesheet before that call
/// is a usage error.
#[derive(Clone, Debug, Default)]
pub struct Style {
    /// Element id.
    pub id: String,
    data: Vec<String>,
    source: Option<String>,
}

impl Style {
    /// Creates an empty style element.
    pub fn new() -> Style {
        Style::default()
    }

    /// Appends raw character data.
    pub fn add_content(&mut self, content: &str) {
        self.data.push(content.to_string());
    }

    /// Joins the accumulated character data into the stylesheet source.
    ///
    /// The raw chunks are consumed; the joined source is kept for the
    /// lifetime of the element.
    pub fn parse_stylesheet(&mut self) {
        let source = self.data.concat();
        self.data.clear();
        log::debug!("parsed a stylesheet of {} bytes", source.len());
        self.source = Some(source);
    }

    /// The parsed stylesheet.
    ///
    /// The returned value is a cheap view borrowed from the stored source.
    ///
    /// # Panics
    ///
    /// Panics when called before [`parse_stylesheet`](Style::parse_stylesheet).
    pub fn stylesheet(&self) -> simplecss::StyleSheet<'_> {
        let source = self
            .source
            .as_deref()
            .expect("stylesheet requested before parse_stylesheet");
        simplecss::StyleSheet::parse(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_and_parses() {
        let mut style = Style::new();
        style.add_content(".a { fill: red; }\n");
        style.add_content(".b { stroke: blue; }");
        style.parse_stylesheet();

        let sheet = style.stylesheet();
        assert_eq!(sheet.rules.len(), 2);
    }

    #[test]
    #[should_panic(expected = "stylesheet requested before parse_stylesheet")]
    fn early_access_is_a_usage_error() {
        let style = Style::new();
        let _ = style.stylesheet();
    }
}
