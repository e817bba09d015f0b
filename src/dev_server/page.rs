//! HTML document wrapping a rendered view.

use crate::app::views::escape_html;
use crate::app::{RenderOutcome, Rendered};

const TITLE: &str = "Stock Board";

/// Attribute for the mount element derived from a selector: `#app` becomes
/// `id="app"`, `.root` becomes `class="root"`, anything else is used as an id.
pub fn mount_attribute(selector: &str) -> String {
    let selector = selector.trim();
    if let Some(id) = selector.strip_prefix('#') {
        format!("id=\"{}\"", escape_html(id))
    } else if let Some(class) = selector.strip_prefix('.') {
        format!("class=\"{}\"", escape_html(class))
    } else {
        format!("id=\"{}\"", escape_html(selector))
    }
}

/// Full page for a render cycle. A failed render leaves the mount element empty.
pub fn render_document(selector: &str, rendered: &Rendered) -> String {
    let body = match rendered.outcome {
        RenderOutcome::Failed => "",
        RenderOutcome::Rendered | RenderOutcome::NotFound => rendered.html.as_str(),
    };
    let route = rendered.route.as_deref().unwrap_or("NotFound");
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{TITLE}</title>\n</head>\n<body>\n<div {} data-route=\"{}\">{}</div>\n</body>\n</html>\n",
        mount_attribute(selector),
        escape_html(route),
        body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(outcome: RenderOutcome, html: &str) -> Rendered {
        Rendered {
            path: "/stock/AAPL".into(),
            route: Some("StockDetail".into()),
            html: html.into(),
            outcome,
        }
    }

    #[test]
    fn test_mount_attribute() {
        assert_eq!(mount_attribute("#app"), "id=\"app\"");
        assert_eq!(mount_attribute(".shell"), "class=\"shell\"");
        assert_eq!(mount_attribute("root"), "id=\"root\"");
    }

    #[test]
    fn test_document_contains_view() {
        let doc = render_document("#app", &rendered(RenderOutcome::Rendered, "<section>AAPL</section>"));
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<div id=\"app\" data-route=\"StockDetail\"><section>AAPL</section></div>"));
    }

    #[test]
    fn test_failed_render_leaves_mount_empty() {
        let doc = render_document("#app", &rendered(RenderOutcome::Failed, "partial"));
        assert!(doc.contains("<div id=\"app\" data-route=\"StockDetail\"></div>"));
        assert!(!doc.contains("partial"));
    }
}
