//! Placeholder views for the stock routes.
//!
//! The real page components live outside this crate; these render the minimal
//! markup needed to show that a route resolved with the right parameters.

use crate::app::view::{RenderError, View, ViewContext};

/// Landing page at `/`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HomeView;

impl View for HomeView {
    fn render(&self, _ctx: &ViewContext<'_>) -> Result<String, RenderError> {
        Ok(r#"<section class="home" data-view="Home"></section>"#.to_string())
    }
}

/// Detail page at `/stock/:code`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StockDetailView;

impl View for StockDetailView {
    fn render(&self, ctx: &ViewContext<'_>) -> Result<String, RenderError> {
        let code = ctx.require_param("code")?;
        Ok(format!(
            r#"<section class="stock-detail" data-view="StockDetail" data-code="{}"></section>"#,
            escape_html(code)
        ))
    }
}

/// Rendered for locations no route matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotFoundView;

impl View for NotFoundView {
    fn render(&self, ctx: &ViewContext<'_>) -> Result<String, RenderError> {
        Ok(format!(
            r#"<section class="not-found" data-view="NotFound" data-path="{}"></section>"#,
            escape_html(ctx.path)
        ))
    }
}

/// Escape text for use inside HTML attributes and text nodes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::HttpClient;
    use crate::config::RequestConfig;
    use crate::routing::RouteParams;
    use std::sync::Arc;

    #[test]
    fn test_stock_detail_escapes_code() {
        let client = Arc::new(HttpClient::new(RequestConfig::default()));
        let mut params = RouteParams::new();
        params.insert("code".into(), "<b>\"x\"".into());
        let ctx = ViewContext {
            route_name: "StockDetail",
            path: "/stock/%3Cb%3E",
            params: &params,
            client: &client,
        };
        let html = StockDetailView.render(&ctx).unwrap();
        assert!(html.contains(r#"data-code="&lt;b&gt;&quot;x&quot;""#));
    }

    #[test]
    fn test_stock_detail_requires_code() {
        let client = Arc::new(HttpClient::new(RequestConfig::default()));
        let params = RouteParams::new();
        let ctx = ViewContext {
            route_name: "StockDetail",
            path: "/stock",
            params: &params,
            client: &client,
        };
        assert_eq!(
            StockDetailView.render(&ctx),
            Err(RenderError::MissingParam("code".into()))
        );
    }
}
