#![forbid(unsafe_code)]

//! Sweep plan: a baseline case plus the values each parameter is swept over.
//! Only one parameter departs from the baseline per case.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Serialize)]
pub enum Param {
    /// Number of material types.
    #[value(name = "M")]
    #[serde(rename = "M")]
    Materials,
    /// Stickers minted per material type.
    #[value(name = "Ns")]
    #[serde(rename = "Ns")]
    StickersPerMaterial,
    #[value(name = "assigns")]
    #[serde(rename = "assigns")]
    Assigns,
    #[value(name = "transfers")]
    #[serde(rename = "transfers")]
    Transfers,
}

impl Param {
    pub const ALL: [Param; 4] = [
        Param::Materials,
        Param::StickersPerMaterial,
        Param::Assigns,
        Param::Transfers,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Materials => "M",
            Self::StickersPerMaterial => "Ns",
            Self::Assigns => "assigns",
            Self::Transfers => "transfers",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaseConfig {
    pub materials: usize,
    pub stickers_per_material: usize,
    pub assigns: usize,
    pub transfers: usize,
}

impl CaseConfig {
    pub fn get(&self, param: Param) -> usize {
        match param {
            Param::Materials => self.materials,
            Param::StickersPerMaterial => self.stickers_per_material,
            Param::Assigns => self.assigns,
            Param::Transfers => self.transfers,
        }
    }

    pub fn with(mut self, param: Param, value: usize) -> Self {
        match param {
            Param::Materials => self.materials = value,
            Param::StickersPerMaterial => self.stickers_per_material = value,
            Param::Assigns => self.assigns = value,
            Param::Transfers => self.transfers = value,
        }
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SweepPlan {
    pub baseline: CaseConfig,
    pub materials: Vec<usize>,
    pub stickers_per_material: Vec<usize>,
    pub assigns: Vec<usize>,
    pub transfers: Vec<usize>,
}

const BASELINE: CaseConfig = CaseConfig {
    materials: 50,
    stickers_per_material: 5000,
    assigns: 2000,
    transfers: 500,
};

impl SweepPlan {
    pub fn full() -> Self {
        Self {
            baseline: BASELINE,
            materials: vec![10, 50, 100, 200],
            stickers_per_material: vec![500, 2000, 5000, 10000],
            assigns: vec![500, 2000, 5000, 10000],
            transfers: vec![100, 500, 1000, 2000],
        }
    }

    pub fn quick() -> Self {
        Self {
            baseline: BASELINE,
            materials: vec![10, 30],
            stickers_per_material: vec![300, 1200],
            assigns: vec![200, 800],
            transfers: vec![80, 200],
        }
    }

    pub fn values(&self, param: Param) -> &[usize] {
        match param {
            Param::Materials => &self.materials,
            Param::StickersPerMaterial => &self.stickers_per_material,
            Param::Assigns => &self.assigns,
            Param::Transfers => &self.transfers,
        }
    }

    /// Cases of one sweep, in the order they run.
    pub fn cases(&self, param: Param) -> Vec<CaseConfig> {
        self.values(param)
            .iter()
            .map(|value| self.baseline.with(param, *value))
            .collect()
    }

    pub fn load_overlay(self, path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read plan {}", path.display()))?;
        self.apply_yaml(&raw)
            .with_context(|| format!("parse plan {}", path.display()))
    }

    /// Values present in the YAML replace the current ones; absent keys are kept.
    pub fn apply_yaml(mut self, raw: &str) -> Result<Self> {
        let overlay: PlanOverlay = serde_yaml::from_str(raw)?;
        if let Some(baseline) = overlay.baseline {
            for (param, value) in baseline.entries() {
                if let Some(value) = value {
                    self.baseline = self.baseline.with(param, value);
                }
            }
        }
        if let Some(sweeps) = overlay.sweeps {
            for (param, values) in [
                (Param::Materials, sweeps.materials),
                (Param::StickersPerMaterial, sweeps.stickers_per_material),
                (Param::Assigns, sweeps.assigns),
                (Param::Transfers, sweeps.transfers),
            ] {
                if let Some(values) = values {
                    anyhow::ensure!(!values.is_empty(), "sweep {} has no values", param.as_str());
                    *self.values_mut(param) = values;
                }
            }
        }
        Ok(self)
    }

    fn values_mut(&mut self, param: Param) -> &mut Vec<usize> {
        match param {
            Param::Materials => &mut self.materials,
            Param::StickersPerMaterial => &mut self.stickers_per_material,
            Param::Assigns => &mut self.assigns,
            Param::Transfers => &mut self.transfers,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PlanOverlay {
    baseline: Option<ParamValues<usize>>,
    sweeps: Option<ParamValues<Vec<usize>>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ParamValues<T> {
    #[serde(rename = "M")]
    materials: Option<T>,
    #[serde(rename = "Ns")]
    stickers_per_material: Option<T>,
    assigns: Option<T>,
    transfers: Option<T>,
}

impl ParamValues<usize> {
    fn entries(&self) -> [(Param, Option<usize>); 4] {
        [
            (Param::Materials, self.materials),
            (Param::StickersPerMaterial, self.stickers_per_material),
            (Param::Assigns, self.assigns),
            (Param::Transfers, self.transfers),
        ]
    }
}
