pub mod middleware;
pub mod server;
pub mod tools;

use minijinja::Environment;

const TEMPLATES: &[(&str, &str)] = &[
    ("module.py.j2", include_str!("../../templates/module.py.j2")),
    ("tool.py.j2", include_str!("../../templates/tool.py.j2")),
    ("resource.py.j2", include_str!("../../templates/resource.py.j2")),
    ("server.py.j2", include_str!("../../templates/server.py.j2")),
    (
        "middleware/__init__.py.j2",
        include_str!("../../templates/middleware/__init__.py.j2"),
    ),
    (
        "middleware/authentication.py.j2",
        include_str!("../../templates/middleware/authentication.py.j2"),
    ),
    (
        "middleware/oauth_provider.py.j2",
        include_str!("../../templates/middleware/oauth_provider.py.j2"),
    ),
    (
        "middleware/event_store.py.j2",
        include_str!("../../templates/middleware/event_store.py.j2"),
    ),
    (
        "tests/conftest.py.j2",
        include_str!("../../templates/tests/conftest.py.j2"),
    ),
    (
        "tests/test_tools_generated.py.j2",
        include_str!("../../templates/tests/test_tools_generated.py.j2"),
    ),
    (
        "tests/test_auth_flows.py.j2",
        include_str!("../../templates/tests/test_auth_flows.py.j2"),
    ),
];

/// Template environment shared by every emitter.
///
/// Templates never interpolate document text directly: anything that comes
/// from the description goes through `pystr`, `pydoc` or `pycomment`.
pub fn environment() -> Result<Environment<'static>, minijinja::Error> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);
    env.add_filter("pystr", pystr);
    env.add_filter("pydoc", pydoc);
    env.add_filter("pycomment", pycomment);
    for (name, source) in TEMPLATES {
        env.add_template(name, source)?;
    }
    Ok(env)
}

/// Quote a value as a double-quoted Python string literal.
pub fn pystr(value: String) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Escape text placed inside a triple-quoted docstring.
pub fn pydoc(value: String) -> String {
    value
        .replace('\\', "\\\\")
        .replace("\"\"\"", "\\\"\\\"\\\"")
        .replace('\r', "")
}

/// Collapse text onto one line so it can follow a `#`.
pub fn pycomment(value: String) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_templates_load() {
        let env = environment().unwrap();
        for (name, _) in TEMPLATES {
            assert!(env.get_template(name).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_pystr_escapes() {
        assert_eq!(pystr("plain".to_string()), r#""plain""#);
        assert_eq!(
            pystr(r#"say "hi" {now}"#.to_string()),
            r#""say \"hi\" {now}""#
        );
        assert_eq!(pystr("a\\b\nc".to_string()), r#""a\\b\nc""#);
        assert_eq!(pystr("bell\u{7}".to_string()), r#""bell\x07""#);
        assert_eq!(pystr("🏥 Clinic".to_string()), "\"🏥 Clinic\"");
    }

    #[test]
    fn test_pydoc_escapes() {
        assert_eq!(
            pydoc(r#"Ends with """ and \d"#.to_string()),
            r#"Ends with \"\"\" and \\d"#
        );
        assert_eq!(pydoc("keeps \"quotes\"".to_string()), "keeps \"quotes\"");
    }

    #[test]
    fn test_pycomment_is_single_line() {
        assert_eq!(pycomment("two\nlines\r\n  here".to_string()), "two lines here");
    }
}
