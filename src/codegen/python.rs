//! Python (`requests`) rendering of a [`ClientSpec`].

use std::fmt::Write;

use chrono::SecondsFormat;

use super::{AuthSetup, ClientMethod, ClientSpec};

const INDENT: &str = "    ";

/// Python string literal for arbitrary text.
pub fn string_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Text that is safe inside a `"""` docstring.
fn docstring_text(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>()
        .replace('\\', "\\\\")
        .replace("\"\"\"", "\\\"\\\"\\\"")
}

pub fn render(spec: &ClientSpec) -> String {
    let mut out = String::new();
    let base_url = string_literal(&spec.base_url);

    // `write!` into a String cannot fail
    let _ = writeln!(out, "#!/usr/bin/env python3");
    let _ = writeln!(out, "\"\"\"");
    let _ = writeln!(out, "Auto-generated API client from HAR capture");
    let _ = writeln!(
        out,
        "Generated: {}",
        spec.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    let _ = writeln!(out, "Base URL: {}", docstring_text(&spec.base_url));
    let _ = writeln!(out, "Auth Type: {}", spec.auth_type);
    if !spec.base_url_inferred {
        let _ = writeln!(
            out,
            "\nNOTE: no API endpoints were found in the capture; the base URL is a placeholder."
        );
    }
    let _ = writeln!(out, "\"\"\"");
    out.push('\n');
    out.push_str("import requests\n");
    out.push_str("from typing import Any, Dict, Optional\n");
    out.push_str("\n\n");

    out.push_str("class APIClient:\n");
    let _ = writeln!(out, "{INDENT}\"\"\"Auto-generated API client\"\"\"");
    out.push('\n');
    let _ = writeln!(out, "{INDENT}def __init__(self):");
    let _ = writeln!(out, "{INDENT}{INDENT}self.base_url = {}", base_url);
    let _ = writeln!(out, "{INDENT}{INDENT}self.session = requests.Session()");
    let _ = writeln!(out, "{INDENT}{INDENT}self._setup_auth()");
    out.push('\n');

    render_auth_setup(&mut out, &spec.auth_setup);

    if spec.methods.is_empty() {
        out.push('\n');
        let _ = writeln!(out, "{INDENT}# No API endpoints were found in the capture.");
    }
    for method in &spec.methods {
        out.push('\n');
        render_method(&mut out, method);
    }

    out.push_str("\n\n");
    out.push_str("if __name__ == \"__main__\":\n");
    let _ = writeln!(out, "{INDENT}client = APIClient()");
    match spec.sample_get() {
        Some(method) => {
            let _ = writeln!(out, "{INDENT}# Try the first GET endpoint:");
            let _ = writeln!(out, "{INDENT}# result = client.{}()", method.name);
            let _ = writeln!(out, "{INDENT}# print(result)");
        }
        None => {
            let _ = writeln!(out, "{INDENT}# No GET endpoints captured; call a method on `client`.");
        }
    }

    out
}

fn render_auth_setup(out: &mut String, steps: &[AuthSetup]) {
    let body = format!("{INDENT}{INDENT}");
    let _ = writeln!(out, "{INDENT}def _setup_auth(self):");
    let _ = writeln!(out, "{body}\"\"\"Configure authentication headers\"\"\"");

    if steps.is_empty() {
        let _ = writeln!(out, "{body}pass  # No auth detected");
        return;
    }

    for step in steps {
        match step {
            AuthSetup::Cookies(cookies) => {
                let _ = writeln!(out, "{body}self.session.cookies.update({{");
                for (name, value) in cookies {
                    let _ = writeln!(
                        out,
                        "{body}{INDENT}{}: {},",
                        string_literal(name),
                        string_literal(value)
                    );
                }
                let _ = writeln!(out, "{body}}})");
            }
            AuthSetup::Header { name, value } => {
                let _ = writeln!(
                    out,
                    "{body}self.session.headers[{}] = {}",
                    string_literal(name),
                    string_literal(value)
                );
            }
        }
    }
}

fn render_method(out: &mut String, method: &ClientMethod) {
    let body = format!("{INDENT}{INDENT}");

    let mut args = vec!["self".to_string()];
    for param in &method.params {
        args.push(format!(
            "{}: Optional[str] = {}",
            param.ident,
            string_literal(&param.default)
        ));
    }
    if method.takes_body {
        args.push("body: Optional[Dict[str, Any]] = None".to_string());
    }

    if let Some(original) = &method.renamed_from {
        let _ = writeln!(
            out,
            "{INDENT}# NOTE: renamed from {} to avoid a name collision",
            original
        );
    }
    let _ = writeln!(out, "{INDENT}def {}({}) -> Any:", method.name, args.join(", "));
    let _ = writeln!(out, "{body}\"\"\"");
    let _ = writeln!(
        out,
        "{body}{} {}",
        docstring_text(&method.http_method),
        docstring_text(&method.path)
    );
    out.push('\n');
    let _ = writeln!(out, "{body}Status: {}", method.status);
    let _ = writeln!(out, "{body}Response: {}", docstring_text(&method.content_type));
    if !method.params.is_empty() || method.takes_body {
        out.push('\n');
        let _ = writeln!(out, "{body}Args:");
        for param in &method.params {
            let _ = writeln!(
                out,
                "{body}{INDENT}{}: Query parameter `{}`",
                param.ident,
                docstring_text(&param.name)
            );
        }
        if method.takes_body {
            let _ = writeln!(out, "{body}{INDENT}body: Request body (sent as JSON)");
        }
    }
    let _ = writeln!(out, "{body}\"\"\"");

    let _ = writeln!(out, "{body}url = self.base_url + {}", string_literal(&method.path));
    if method.params.is_empty() {
        let _ = writeln!(out, "{body}params = {{}}");
    } else {
        let _ = writeln!(out, "{body}params = {{");
        for param in &method.params {
            let _ = writeln!(
                out,
                "{body}{INDENT}{}: {},",
                string_literal(&param.name),
                param.ident
            );
        }
        let _ = writeln!(out, "{body}}}");
    }

    let verb = string_literal(&method.http_method);
    if method.takes_body {
        let _ = writeln!(
            out,
            "{body}response = self.session.request({}, url, params=params, json=body)",
            verb
        );
    } else {
        let _ = writeln!(
            out,
            "{body}response = self.session.request({}, url, params=params)",
            verb
        );
    }
    let _ = writeln!(out, "{body}response.raise_for_status()");
    let _ = writeln!(out, "{body}return response.json() if response.content else {{}}");
}
