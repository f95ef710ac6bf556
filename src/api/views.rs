//! HTML screens
//!
//! Every response renders a complete page; there is no client-side state.

use crate::models::{display_value, DisplayRow, SearchField};

const PAGE_STYLE: &str = "\
body{font-family:sans-serif;background:#f8f9fa;margin:0}\
h1{text-align:center;color:rgb(241 6 201)}\
.panel{background:#fff;padding:20px;border-radius:10px;box-shadow:0 0 10px rgba(0,0,0,.1);margin:20px auto;max-width:600px}\
label{display:block;font-weight:bold;color:rgb(241 6 201);margin-top:12px}\
input,select{width:100%;padding:6px;border:1px solid #ced4da;border-radius:5px;box-sizing:border-box}\
button{background:rgb(241 6 201);color:#fff;border:none;border-radius:5px;padding:10px 20px;margin-top:16px}\
table{border-collapse:collapse;width:100%}\
th{background:#007bff;color:#fff}\
th,td{padding:10px;border:1px solid #ddd;text-align:left}\
.error{color:red}\
.session{text-align:right;max-width:600px;margin:10px auto}";

/// Heading shown on the search screen
pub const SEARCH_TITLE: &str = "BSL Township Occupancy Status";

/// Message shown when a search finds nothing
pub const NOT_FOUND_MESSAGE: &str = "No document found with the given criteria.";

/// What to show below the search form
#[derive(Debug, Clone, PartialEq)]
pub enum ResultPanel {
    /// Nothing searched yet, or blank input
    Empty,
    Table(DisplayRow),
    NotFound,
    /// Recoverable failure, e.g. the store is unreachable
    Error(String),
}

/// Escape text for inclusion in HTML element content or quoted attributes
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
    }
    out
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n<style>{style}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        title = escape_html(title),
        style = PAGE_STYLE,
        body = body,
    )
}

/// Credential form, with an optional inline error
pub fn login_page(error: Option<&str>, username: &str) -> String {
    let error_html = error
        .map(|message| format!("<p class=\"error\" role=\"alert\">{}</p>\n", escape_html(message)))
        .unwrap_or_default();

    let body = format!(
        "<h1>Login</h1>\n\
         <form class=\"panel\" method=\"post\" action=\"/login\">\n\
         {error_html}\
         <label for=\"username\">Username</label>\n\
         <input id=\"username\" name=\"username\" type=\"text\" value=\"{username}\" autocomplete=\"username\">\n\
         <label for=\"password\">Password</label>\n\
         <input id=\"password\" name=\"password\" type=\"password\" autocomplete=\"current-password\">\n\
         <button type=\"submit\">Login</button>\n\
         </form>",
        error_html = error_html,
        username = escape_html(username),
    );

    page("Login", &body)
}

/// Everything the search screen needs to render
#[derive(Debug, Clone)]
pub struct SearchView<'a> {
    pub username: &'a str,
    pub field: SearchField,
    pub value: &'a str,
    pub result: ResultPanel,
}

/// Field selector, value input, and the current result
pub fn search_page(view: &SearchView<'_>) -> String {
    let options: String = SearchField::all()
        .map(|field| {
            format!(
                "<option value=\"{key}\"{selected}>{label}</option>",
                key = field.key(),
                selected = if field == view.field { " selected" } else { "" },
                label = escape_html(field.label()),
            )
        })
        .collect();

    let body = format!(
        "<h1>{title}</h1>\n\
         <form class=\"session\" method=\"post\" action=\"/logout\">\
         Signed in as <strong>{username}</strong> <button type=\"submit\">Logout</button></form>\n\
         <form class=\"panel\" method=\"post\" action=\"/search\">\n\
         <label for=\"field\">Select the criteria</label>\n\
         <select id=\"field\" name=\"field\">{options}</select>\n\
         <label for=\"value\">Enter the value for {field_label}</label>\n\
         <input id=\"value\" name=\"value\" type=\"text\" value=\"{value}\">\n\
         <button type=\"submit\">Search</button>\n\
         </form>\n\
         {result}",
        title = escape_html(SEARCH_TITLE),
        username = escape_html(view.username),
        options = options,
        field_label = escape_html(view.field.label()),
        value = escape_html(view.value),
        result = result_panel(&view.result),
    );

    page(SEARCH_TITLE, &body)
}

fn result_panel(result: &ResultPanel) -> String {
    match result {
        ResultPanel::Empty => String::new(),
        ResultPanel::Table(row) => record_table(row),
        ResultPanel::NotFound => {
            format!("<p class=\"error panel\">{}</p>", escape_html(NOT_FOUND_MESSAGE))
        }
        ResultPanel::Error(message) => format!(
            "<p class=\"error panel\" role=\"alert\">{}</p>",
            escape_html(message)
        ),
    }
}

/// One-row table with a header per column
pub fn record_table(row: &DisplayRow) -> String {
    let headers: String = row
        .columns
        .iter()
        .map(|(label, _)| format!("<th>{}</th>", escape_html(label)))
        .collect();
    let cells: String = row
        .columns
        .iter()
        .map(|(_, value)| format!("<td>{}</td>", escape_html(&display_value(value))))
        .collect();

    format!(
        "<div class=\"panel\"><table class=\"record\">\
         <thead><tr>{}</tr></thead><tbody><tr>{}</tr></tbody></table></div>",
        headers, cells
    )
}
