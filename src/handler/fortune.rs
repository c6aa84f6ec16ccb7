//! Fortune route
//!
//! Asks the fortune teller for an answer and renders it as an answer list item.

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};
use url::form_urlencoded;

/// Query parameter carrying the money spent
const MONEY_PARAM: &str = "money";

/// Serve `/fortune?money=<amount>`
pub fn serve_fortune(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    let money = match parse_money(ctx.query) {
        Ok(money) => money,
        Err(reason) => {
            logger::log_warning(&format!("Rejected fortune request: {reason}"));
            return http::build_400_response(&reason, ctx.is_head);
        }
    };

    match state.fortune_teller.answer(money) {
        Ok(text) => {
            let id = state.next_answer_id();
            logger::log_debug(&format!(
                "Fortune #{id}: money={money:?}, answered={}",
                !text.is_empty()
            ));
            http::build_html_response(StatusCode::OK, render_page(id, &text), ctx.is_head)
        }
        Err(e) => {
            logger::log_error(&format!("Fortune failed for money={money:?}: {e}"));
            http::build_500_response(&e.to_string(), ctx.is_head)
        }
    }
}

/// Extract the amount of money from a query string.
///
/// Keys and values are percent-decoded. A missing or empty `money`
/// parameter yields `None`. Any other value must parse as a number; the
/// amount itself is not validated.
fn parse_money(query: Option<&str>) -> Result<Option<f64>, String> {
    let Some(raw) = query.and_then(|q| {
        form_urlencoded::parse(q.as_bytes())
            .find_map(|(key, value)| (key == MONEY_PARAM).then_some(value))
    }) else {
        return Ok(None);
    };

    if raw.is_empty() {
        return Ok(None);
    }

    raw.parse::<f64>()
        .map(Some)
        .map_err(|_| format!("'{raw}' is not a valid amount of money"))
}

/// Render one answer as a list item
pub fn render_answer(id: u64, text: &str) -> String {
    format!(
        r#"<li class="oracle__answer">Answer {id}: <em>{}</em></li>"#,
        escape_html(text)
    )
}

fn render_page(id: u64, text: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>Oracle</title></head>
<body>
<ul class="oracle">
{}
</ul>
</body>
</html>"#,
        render_answer(id, text)
    )
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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
