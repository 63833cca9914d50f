//! Minimal server-rendered pages for the cookie flow. Just enough
//! markup to exercise the form contract; styling lives elsewhere.

use time::{format_description::well_known::Rfc3339, OffsetDateTime};

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n{body}\n</body>\n</html>\n"
    )
}

fn error_banner(error: Option<&str>) -> String {
    match error {
        Some(message) => format!("<p class=\"error\">{}</p>\n", escape(message)),
        None => String::new(),
    }
}

pub fn signup_page(error: Option<&str>) -> String {
    let body = format!(
        concat!(
            "<h1>Create your account</h1>\n",
            "{}",
            "<form method=\"post\" action=\"/signup\">\n",
            "<label>Email <input name=\"email\" type=\"email\"></label>\n",
            "<label>Username <input name=\"username\"></label>\n",
            "<label>Password <input name=\"password\" type=\"password\"></label>\n",
            "<label>Confirm password <input name=\"confirm_password\" type=\"password\"></label>\n",
            "<button type=\"submit\">Create account</button>\n",
            "</form>\n",
            "<p>Already have an account? <a href=\"/login\">Log in</a></p>"
        ),
        error_banner(error)
    );
    layout("Sign up", &body)
}

pub fn login_page(error: Option<&str>) -> String {
    let body = format!(
        concat!(
            "<h1>Welcome back</h1>\n",
            "{}",
            "<form method=\"post\" action=\"/login\">\n",
            "<label>Username <input name=\"username\"></label>\n",
            "<label>Password <input name=\"password\" type=\"password\"></label>\n",
            "<button type=\"submit\">Log in</button>\n",
            "</form>\n",
            "<p>New here? <a href=\"/signup\">Create an account</a></p>"
        ),
        error_banner(error)
    );
    layout("Log in", &body)
}

pub fn dashboard_page(username: &str, email: &str, created_at: OffsetDateTime) -> String {
    let created = created_at.format(&Rfc3339).unwrap_or_default();
    let body = format!(
        concat!(
            "<h1>Dashboard</h1>\n",
            "<p>Signed in as <strong>{}</strong></p>\n",
            "<ul>\n",
            "<li>Email: {}</li>\n",
            "<li>Member since: {}</li>\n",
            "</ul>\n",
            "<form method=\"post\" action=\"/logout\">\n",
            "<button type=\"submit\">Log out</button>\n",
            "</form>"
        ),
        escape(username),
        escape(email),
        created
    );
    layout("Dashboard", &body)
}
