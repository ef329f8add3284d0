//! `exportpub glob` — show how an export pattern compiles and what it selects.

use anyhow::{Context, Result};
use exportpub_glob::GlobMatcher;

/// Names from `names` selected by `matcher`, in input order.
pub fn matching<'a>(matcher: &GlobMatcher, names: &'a [String]) -> Vec<&'a str> {
    names
        .iter()
        .map(String::as_str)
        .filter(|name| matcher.matches(name))
        .collect()
}

pub fn run(pattern: &str, names: &[String], separator: char) -> Result<()> {
    let matcher = GlobMatcher::compile(pattern, separator)
        .with_context(|| format!("compiling pattern '{pattern}'"))?;

    println!("pattern:   {pattern}");
    println!("separator: {separator}");
    println!("regex:     {}", matcher.regex());

    if names.is_empty() {
        return Ok(());
    }

    let selected = matching(&matcher, names);
    println!();
    for name in names {
        let mark = if selected.contains(&name.as_str()) {
            "match"
        } else {
            "-"
        };
        println!("  {mark:<5} {name}");
    }
    println!();
    println!("{} of {} name(s) match", selected.len(), names.len());
    Ok(())
}
