//! Parsing of remote directory listings
//!
//! `ls` output comes in two shapes depending on the server: Unix long
//! format (`-rw-r--r-- 1 user group 1234 Jan 01 12:00 name`) and the DOS
//! format some Windows servers use (`01-31-24  09:15AM  <DIR>  name`).
//! Anything else is taken as a bare name per line.

/// Extract the entry name from one listing line.
///
/// Returns `None` for blank lines and the `.` / `..` pseudo-entries.
pub fn entry_name(line: &str) -> Option<&str> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() || is_total_line(line) {
        return None;
    }

    let name = if is_unix_long_format(line) {
        let name = skip_fields(line, 8)?;
        if line.trim_start().starts_with('l') {
            name.split(" -> ").next().unwrap_or(name)
        } else {
            name
        }
    } else if is_dos_format(line) {
        skip_fields(line, 3)?
    } else {
        line.trim()
    };

    match name {
        "." | ".." | "" => None,
        name => Some(name),
    }
}

/// Parse a whole listing into entry names.
pub fn parse_listing(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(entry_name)
        .map(str::to_string)
        .collect()
}

/// Return what follows the first `count` whitespace-separated fields,
/// preserving inner spacing of the remainder.
fn skip_fields(line: &str, count: usize) -> Option<&str> {
    let mut rest = line.trim_start();
    for _ in 0..count {
        let end = rest.find(char::is_whitespace)?;
        rest = rest[end..].trim_start();
    }
    (!rest.is_empty()).then_some(rest)
}

fn is_unix_long_format(line: &str) -> bool {
    let Some(mode) = line.split_whitespace().next() else {
        return false;
    };
    let mode: Vec<char> = mode.chars().collect();
    mode.len() >= 10
        && matches!(mode[0], '-' | 'd' | 'l' | 'b' | 'c' | 'p' | 's')
        && mode[1..10]
            .iter()
            .all(|c| matches!(c, 'r' | 'w' | 'x' | 's' | 'S' | 't' | 'T' | '-'))
}

fn is_total_line(line: &str) -> bool {
    line.trim()
        .strip_prefix("total ")
        .is_some_and(|n| n.trim().chars().all(|c| c.is_ascii_digit()))
}

fn is_dos_format(line: &str) -> bool {
    let Some(date) = line.split_whitespace().next() else {
        return false;
    };
    let parts: Vec<&str> = date.split('-').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit()))
}
