//! Output file writing
//!
//! This module materializes parsed node records into the output directory:
//! - `nodes.json` with the full structured records and a timestamp
//! - `all_nodes.txt` with every raw descriptor line
//! - one `<scheme>_nodes.txt` per scheme present in the batch
//! - `subscription_base64.txt`, the Base64 subscription form of the batch

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::parser::{NodeRecord, group_by_scheme};

/// JSON report written to `nodes.json`
#[derive(Serialize)]
struct NodeReport<'a> {
    update_time: String,
    total_count: usize,
    nodes: &'a [NodeRecord],
}

/// Write all output files for a batch of records
pub async fn write_outputs(output_dir: &str, records: &[NodeRecord]) -> Result<()> {
    let dir = Path::new(output_dir);
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create output directory: {}", output_dir))?;

    write_report(dir, records).await?;
    write_raw_lists(dir, records).await?;
    write_subscription(dir, records).await?;

    info!("Wrote {} node records to {}", records.len(), output_dir);
    Ok(())
}

async fn write_report(dir: &Path, records: &[NodeRecord]) -> Result<()> {
    let report = NodeReport {
        update_time: chrono::Local::now().to_rfc3339(),
        total_count: records.len(),
        nodes: records,
    };
    let json = serde_json::to_string_pretty(&report).context("Failed to serialize node report")?;

    let path = dir.join("nodes.json");
    tokio::fs::write(&path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    debug!("Wrote {}", path.display());
    Ok(())
}

async fn write_raw_lists(dir: &Path, records: &[NodeRecord]) -> Result<()> {
    let all_path = dir.join("all_nodes.txt");
    tokio::fs::write(&all_path, join_raw_lines(records.iter().collect()))
        .await
        .with_context(|| format!("Failed to write {}", all_path.display()))?;
    debug!("Wrote {}", all_path.display());

    for (scheme, group) in group_by_scheme(records) {
        let path = dir.join(format!("{}_nodes.txt", scheme.tag()));
        let count = group.len();
        tokio::fs::write(&path, join_raw_lines(group))
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!("Wrote {} ({} nodes)", path.display(), count);
    }
    Ok(())
}

async fn write_subscription(dir: &Path, records: &[NodeRecord]) -> Result<()> {
    let joined: Vec<&str> = records.iter().map(|r| r.raw.as_str()).collect();
    let encoded = STANDARD.encode(joined.join("\n"));

    let path = dir.join("subscription_base64.txt");
    tokio::fs::write(&path, encoded)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    debug!("Wrote {}", path.display());
    Ok(())
}

fn join_raw_lines(records: Vec<&NodeRecord>) -> String {
    let mut out = records
        .iter()
        .map(|r| r.raw.as_str())
        .collect::<Vec<_>>()
        .join("\n");
    out.push('\n');
    out
}
