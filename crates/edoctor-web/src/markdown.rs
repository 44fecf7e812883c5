use pulldown_cmark::{CowStr, Event, Options, Parser, html};

/// Render explanatory markdown. Raw HTML in the source is shown as text.
pub fn render_markdown_html(content: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(content, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(CowStr::from(raw.into_string())),
        other => other,
    });
    let mut output = String::new();
    html::push_html(&mut output, parser);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use edoctor_core::charts::{BUBBLE_EXPLANATION, PIE_EXPLANATION};

    #[test]
    fn bubble_explanation_renders_one_heading_per_encoding() {
        let html = render_markdown_html(BUBBLE_EXPLANATION);
        assert_eq!(html.matches("<h4>").count(), 5);
        assert!(html.contains("<h4>4: Color: State/UT</h4>"));
        assert!(html.contains("calculated as % Achvt = (B/A) * 100."));
        assert!(html.contains("Hovering over a bubble reveals additional information"));
        assert!(!html.contains("<em>"));
    }

    #[test]
    fn pie_explanation_keeps_key_components() {
        let html = render_markdown_html(PIE_EXPLANATION);
        assert!(html.contains("<strong>Key Components:</strong>"));
        assert_eq!(html.matches("<h4>").count(), 3);
        assert!(html.contains("<h4>Hover Information:</h4>"));
        assert!(html.contains("the exact proportion of institutional deliveries."));
    }

    #[test]
    fn raw_html_is_escaped() {
        let html = render_markdown_html("before <script>alert(1)</script> after");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
