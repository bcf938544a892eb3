use anyhow::Result;
use clap::Args;

use hkmm_pm::game::is_installed;
use hkmm_pm::ModRecord;

use crate::session::Session;

const DESCRIPTION_WIDTH: usize = 60;

#[derive(Args, Debug)]
pub struct AvailableArgs {
    /// Only show mods whose name contains this text (case-insensitive)
    pub filter: Option<String>,
}

fn matches(record: &ModRecord, filter: Option<&str>) -> bool {
    match filter {
        Some(f) => record.name.to_lowercase().contains(&f.to_lowercase()),
        None => true,
    }
}

fn truncate_description(description: &str, max_len: usize) -> String {
    let line = description.lines().next().unwrap_or("").trim();
    if line.chars().count() > max_len {
        let cut: String = line.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        line.to_string()
    }
}

pub fn execute(args: AvailableArgs, session: &mut Session) -> Result<i32> {
    let manifest = session.config.manifest_store().load()?;

    // Marking installed mods is best effort; the listing works without a game
    let mods_dir = session.game().ok().map(|game| game.mods_dir());

    let records: Vec<&ModRecord> = manifest
        .iter()
        .filter(|r| matches(r, args.filter.as_deref()))
        .collect();

    if records.is_empty() {
        session.output.info("No matching mods in the index");
        return Ok(0);
    }

    let name_width = records.iter().map(|r| r.name.len()).max().unwrap_or(0) + 2;
    let version_width = records
        .iter()
        .map(|r| r.version.as_deref().unwrap_or("").len())
        .max()
        .unwrap_or(0)
        + 2;

    for record in records {
        let installed = mods_dir
            .as_deref()
            .is_some_and(|dir| is_installed(dir, &record.name));
        let marker = if installed { "*" } else { " " };
        let description = record
            .description
            .as_deref()
            .map(|d| truncate_description(d, DESCRIPTION_WIDTH))
            .unwrap_or_default();
        session.output.table_row(
            &[
                marker,
                record.name.as_str(),
                record.version.as_deref().unwrap_or(""),
                description.as_str(),
            ],
            &[2, name_width, version_width],
        );
    }

    Ok(0)
}
