//! binfbx command implementation
//!
//! Decodes a mesh container, applies mesh removals, optionally dumps it and
//! re-encodes it to a new file.

use anyhow::{Context, Result};
use binfbx_format::{report, Container, ContainerSummary, MeshId, RemovalOutcome, Verbosity};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::process::ExitCode;

/// Options for one binfbx invocation.
#[derive(Debug, Clone, Default)]
pub struct BinfbxOptions<'a> {
    pub input: &'a str,
    pub output: Option<&'a str>,
    pub removals: &'a [MeshId],
    pub dump: Option<Verbosity>,
    pub json: bool,
}

/// Machine-readable result printed with `--json`.
#[derive(Debug, Serialize)]
pub struct BinfbxOutput {
    pub input: String,
    pub input_hash: String,
    pub removed: Vec<MeshId>,
    pub not_found: Vec<MeshId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<ContainerSummary>,
}

/// Run the binfbx command
///
/// # Arguments
/// * `options` - Input and output paths, removals and report settings
///
/// # Returns
/// Exit code: 0 on success. Decode, encode and I/O failures are returned as
/// errors; nothing is written unless every step before encoding succeeded.
pub fn run(options: &BinfbxOptions<'_>) -> Result<ExitCode> {
    let data = fs::read(options.input)
        .with_context(|| format!("Failed to read input file: {}", options.input))?;
    let input_hash = blake3::hash(&data).to_hex().to_string();
    let mut container = Container::decode(&data)
        .with_context(|| format!("Failed to decode {}", options.input))?;

    // Without a dump or an output file the command is silent.
    let announce = !options.json && (options.dump.is_some() || options.output.is_some());
    if announce {
        println!("{} {}", "Input:".dimmed(), options.input);
        println!("{} {}", "Hash:".dimmed(), &input_hash[..16]);
    }

    let (removed, not_found) = apply_removals(&mut container, options.removals);
    if announce {
        for id in &removed {
            println!("{} {}", "Removed".green(), id);
        }
        for id in &not_found {
            println!("{} {}", "Not found".yellow(), id);
        }
    }

    if let Some(verbosity) = options.dump {
        if !options.json {
            println!();
            print!("{}", report(&container, verbosity));
        }
    }

    let mut output_hash = None;
    if let Some(path) = options.output {
        let bytes = container.to_bytes().context("Failed to encode container")?;
        fs::write(path, &bytes).with_context(|| format!("Failed to write output file: {}", path))?;
        let hash = blake3::hash(&bytes).to_hex().to_string();
        if announce {
            println!(
                "{} {} ({} bytes)",
                "Wrote".green().bold(),
                path,
                bytes.len()
            );
            println!("{} {}", "Hash:".dimmed(), &hash[..16]);
            if hash == input_hash {
                println!("{}", "Output is byte-identical to input".green());
            }
        }
        output_hash = Some(hash);
    }

    if options.json {
        let output = BinfbxOutput {
            input: options.input.to_string(),
            input_hash,
            removed,
            not_found,
            output: options.output.map(str::to_string),
            output_hash,
            summary: options.dump.map(|_| ContainerSummary::new(&container)),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    Ok(ExitCode::SUCCESS)
}

/// Apply `removals` in order, returning the removed and the missing
/// identities. A missing mesh does not stop the batch.
pub fn apply_removals(container: &mut Container, removals: &[MeshId]) -> (Vec<MeshId>, Vec<MeshId>) {
    let mut removed = Vec::new();
    let mut not_found = Vec::new();
    for &id in removals {
        match container.remove_mesh(id) {
            RemovalOutcome::Removed(_) => removed.push(id),
            RemovalOutcome::NotFound(_) => not_found.push(id),
        }
    }
    (removed, not_found)
}

/// Group a flat `--remove` value list into mesh identities.
pub fn parse_removals(values: &[u32]) -> Result<Vec<MeshId>> {
    if values.len() % 3 != 0 {
        anyhow::bail!(
            "--remove takes exactly three values (group, lod, index), got {} value(s)",
            values.len()
        );
    }
    Ok(values
        .chunks_exact(3)
        .map(|v| MeshId::new(v[0], v[1], v[2]))
        .collect())
}

/// Map a `--detail` value to a report verbosity.
pub fn parse_verbosity(value: &str) -> Result<Verbosity> {
    match value {
        "summary" => Ok(Verbosity::Summary),
        "detailed" => Ok(Verbosity::Detailed),
        "full" => Ok(Verbosity::Full),
        other => anyhow::bail!("Unknown detail level: {}", other),
    }
}
