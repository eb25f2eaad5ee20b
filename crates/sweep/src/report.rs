#![forbid(unsafe_code)]

use crate::case::CaseResult;
use crate::plan::Param;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

const CSV_HEADER: &str = "vary,value,M,Ns,assigns,transfers,t_create_stickers_s,t_assign_s,t_transfer_s,db_mb,total_stickers";

pub fn csv_path(out_dir: &Path, param: Param) -> PathBuf {
    out_dir.join(format!("sweep_{}.csv", param.as_str()))
}

pub fn render_csv(rows: &[CaseResult]) -> String {
    let mut lines = vec![CSV_HEADER.to_string()];
    for row in rows {
        lines.push(format!(
            "{},{},{},{},{},{},{:.4},{:.4},{:.4},{:.3},{}",
            row.vary.as_str(),
            row.value,
            row.materials,
            row.stickers_per_material,
            row.assigns,
            row.transfers,
            row.t_create_stickers_s,
            row.t_assign_s,
            row.t_transfer_s,
            row.db_mb,
            row.total_stickers
        ));
    }
    lines.join("\n") + "\n"
}

pub fn write_csv(out_dir: &Path, param: Param, rows: &[CaseResult]) -> Result<PathBuf> {
    let path = csv_path(out_dir, param);
    std::fs::write(&path, render_csv(rows))
        .with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}

#[derive(Debug, Serialize)]
struct Summary<'a> {
    seed: u64,
    quick: bool,
    fast_pragmas: bool,
    rows: &'a [CaseResult],
}

pub fn write_summary(
    out_dir: &Path,
    seed: u64,
    quick: bool,
    fast_pragmas: bool,
    rows: &[CaseResult],
) -> Result<PathBuf> {
    let path = out_dir.join("sweep_summary.json");
    let summary = Summary {
        seed,
        quick,
        fast_pragmas,
        rows,
    };
    let json = serde_json::to_string_pretty(&summary).context("serialize summary")?;
    std::fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(path)
}
