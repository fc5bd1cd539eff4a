//! CLI `inspect` command: display one concept and its neighbors.

use anyhow::{bail, Result};

use crate::config::MnemosConfig;

/// Print a concept's parents, children and attached engrams.
pub fn inspect(config: &MnemosConfig, label: &str) -> Result<()> {
    let memory = crate::server::open_memory(config)?;

    let Some(view) = memory.inspect(label)? else {
        bail!("concept not found: {label}");
    };

    println!("Concept: {}", view.label);
    println!("{}", "=".repeat(50));
    println!("  Parents:   {}", list_or_none(&view.parents));
    println!("  Children:  {}", list_or_none(&view.children));
    println!();

    if view.engram_ids.is_empty() {
        println!("No engrams attached.");
        return Ok(());
    }

    println!("Engrams ({}):", view.engram_ids.len());
    for engram in memory.fetch(&view.engram_ids)? {
        println!("  {} [{}] {}", engram.id(), engram.engram_type(), preview(engram.content(), 60));
    }

    Ok(())
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}

fn preview(content: &str, max_chars: usize) -> String {
    let first_line = content.lines().next().unwrap_or("");
    if first_line.chars().count() <= max_chars {
        first_line.to_string()
    } else {
        let cut: String = first_line.chars().take(max_chars).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_truncates_on_char_boundary() {
        assert_eq!(preview("工作关系很重要", 4), "工作关系...");
        assert_eq!(preview("short", 60), "short");
        assert_eq!(preview("first\nsecond", 60), "first");
    }

    #[test]
    fn list_or_none_placeholder() {
        assert_eq!(list_or_none(&[]), "(none)");
        assert_eq!(list_or_none(&["A".into(), "B".into()]), "A, B");
    }
}
