//! Parsing of freedesktop `.desktop` files.

use std::path::{Path, PathBuf};

use super::Application;

/// Field codes that expand to file/URL arguments or metadata. The launcher
/// never passes arguments, so they are dropped from the command line.
const FIELD_CODES: &[char] = &['f', 'F', 'u', 'U', 'd', 'D', 'n', 'N', 'i', 'c', 'k', 'v', 'm'];

/// Parse the `[Desktop Entry]` group of a desktop file.
///
/// Returns `None` for entries that should not be listed: non-applications,
/// `NoDisplay`/`Hidden` entries, and entries missing `Name` or `Exec`.
pub fn parse_desktop_entry(id: &str, path: &Path, content: &str) -> Option<Application> {
    let mut name = None;
    let mut exec = None;
    let mut icon = None;
    let mut comment = None;
    let mut generic_name = None;
    let mut keywords = Vec::new();
    let mut terminal = false;
    let mut is_application = true;
    let mut no_display = false;
    let mut hidden = false;
    let mut in_desktop_entry = false;

    for line in content.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            in_desktop_entry = line == "[Desktop Entry]";
            continue;
        }

        if !in_desktop_entry {
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim();

        // Localized keys (`Name[de]`) are not used.
        match key.trim() {
            "Type" => is_application = value == "Application",
            "Name" => name = Some(unescape(value)),
            "Exec" => exec = Some(value.to_string()),
            "Icon" if !value.is_empty() => icon = Some(value.to_string()),
            "Comment" => comment = Some(unescape(value)),
            "GenericName" => generic_name = Some(unescape(value)),
            "Keywords" => {
                keywords = value
                    .split(';')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(unescape)
                    .collect();
            }
            "Terminal" => terminal = value == "true",
            "NoDisplay" => no_display = value == "true",
            "Hidden" => hidden = value == "true",
            _ => {}
        }
    }

    if !is_application || no_display || hidden {
        return None;
    }

    let name = name.filter(|n| !n.is_empty())?;
    let exec = exec.filter(|e| !e.is_empty())?;

    Some(Application {
        id: id.to_string(),
        name,
        description: comment.or(generic_name),
        icon,
        icon_path: None,
        exec,
        keywords,
        terminal,
        desktop_file: PathBuf::from(path),
    })
}

/// Remove field codes from an `Exec` value and collapse `%%` to `%`.
pub fn strip_field_codes(exec: &str) -> String {
    let mut out = String::with_capacity(exec.len());
    let mut chars = exec.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('%') => {
                out.push('%');
                chars.next();
            }
            Some(code) if FIELD_CODES.contains(code) => {
                chars.next();
                // A standalone code leaves a double separator behind.
                if out.is_empty() || out.ends_with(char::is_whitespace) {
                    while chars.next_if(|c| c.is_whitespace()).is_some() {}
                }
            }
            _ => out.push(c),
        }
    }

    out.trim().to_string()
}

/// Expand the escape sequences allowed in string values.
fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => out.push(' '),
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}
