#![forbid(unsafe_code)]

use crate::plan::{CaseConfig, Param};
use anyhow::{Context, Result, bail};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use sr_core::clock::now_ms;
use sr_core::model::KNOWN_BRANCHES;
use sr_core::sticker::StickerCode;
use sr_storage::{
    AddPersonRequest, AssignRequest, MintStickersRequest, RegisterMaterialRequest, SqliteStore,
    StoreConfig, StoreError, TransferRequest,
};
use std::time::Instant;
use tracing::{debug, info};

const PEOPLE: usize = 100;
const MAX_CODE_ATTEMPTS: usize = 1_000;
/// Extra stickers drawn per material before shuffling down to the assign count.
const SAMPLE_SLACK: usize = 10;

/// One measured case. Field names are the CSV/JSON column names.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CaseResult {
    pub vary: Param,
    pub value: usize,
    #[serde(rename = "M")]
    pub materials: usize,
    #[serde(rename = "Ns")]
    pub stickers_per_material: usize,
    pub assigns: usize,
    pub transfers: usize,
    pub t_create_stickers_s: f64,
    pub t_assign_s: f64,
    pub t_transfer_s: f64,
    pub db_mb: f64,
    pub total_stickers: usize,
}

/// Runs one case against a freshly reset store.
///
/// `assigns` is capped by the number of minted stickers and `transfers` by
/// the effective assign count; the result reports the capped values.
pub fn run_case<R: Rng>(
    store_config: &StoreConfig,
    vary: Param,
    case: CaseConfig,
    rng: &mut R,
) -> Result<CaseResult> {
    SqliteStore::destroy(&store_config.storage_dir).context("reset store")?;
    let mut store = SqliteStore::open_with(store_config.clone()).context("open store")?;

    let people = provision_people(&mut store, rng)?;
    let materials = register_materials(&mut store, case.materials, rng)?;

    let total_stickers = case.materials * case.stickers_per_material;
    let assigns = case.assigns.min(total_stickers);
    let transfers = case.transfers.min(assigns);
    let per_code_need = assigns.div_ceil(case.materials.max(1)).max(1) + SAMPLE_SLACK;

    let started = Instant::now();
    let mut pool = Vec::with_capacity(per_code_need * materials.len());
    for code in &materials {
        let minted = store
            .mint_stickers(MintStickersRequest {
                code: code.clone(),
                count: case.stickers_per_material,
                created_at_ms: now_ms(),
            })
            .with_context(|| format!("mint {code}"))?;
        pool.extend(minted.into_iter().take(per_code_need));
    }
    let t_create = started.elapsed().as_secs_f64();

    pool.shuffle(rng);
    pool.truncate(assigns);

    let started = Instant::now();
    for sticker in &pool {
        let person = pick(&people, rng)?;
        store
            .assign(AssignRequest {
                person_name: person.clone(),
                sticker_code: sticker.to_string(),
                name: Some(material_name(sticker.stock_code())),
                created_at_ms: now_ms(),
            })
            .with_context(|| format!("assign {sticker}"))?;
    }
    let t_assign = started.elapsed().as_secs_f64();

    let moved: Vec<&StickerCode> = pool.choose_multiple(rng, transfers).collect();
    let started = Instant::now();
    for sticker in moved {
        let person = pick(&people, rng)?;
        store
            .transfer(TransferRequest {
                sticker_code: sticker.to_string(),
                new_owner: person.clone(),
                created_at_ms: now_ms(),
            })
            .with_context(|| format!("transfer {sticker}"))?;
    }
    let t_transfer = started.elapsed().as_secs_f64();

    let db_bytes = store.db_size_bytes().context("measure db size")?;
    let result = CaseResult {
        vary,
        value: case.get(vary),
        materials: case.materials,
        stickers_per_material: case.stickers_per_material,
        assigns,
        transfers,
        t_create_stickers_s: round_to(t_create, 4),
        t_assign_s: round_to(t_assign, 4),
        t_transfer_s: round_to(t_transfer, 4),
        db_mb: round_to(db_bytes as f64 / 1_000_000.0, 3),
        total_stickers,
    };
    info!(
        vary = vary.as_str(),
        value = result.value,
        t_create_stickers_s = result.t_create_stickers_s,
        t_assign_s = result.t_assign_s,
        t_transfer_s = result.t_transfer_s,
        db_mb = result.db_mb,
        "case finished"
    );
    Ok(result)
}

fn provision_people<R: Rng>(store: &mut SqliteStore, rng: &mut R) -> Result<Vec<String>> {
    let mut names = Vec::with_capacity(PEOPLE);
    for i in 0..PEOPLE {
        let branch = KNOWN_BRANCHES
            .choose(rng)
            .map(|branch| branch.to_string());
        let person = store
            .add_person(AddPersonRequest {
                name: format!("Person_{i}"),
                floor: Some(rng.gen_range(1..=10)),
                branch,
                created_at_ms: now_ms(),
            })
            .context("add person")?;
        names.push(person.name);
    }
    Ok(names)
}

/// Registers `count` random `IT####` codes, drawing again on collision.
fn register_materials<R: Rng>(
    store: &mut SqliteStore,
    count: usize,
    rng: &mut R,
) -> Result<Vec<String>> {
    let mut codes = Vec::with_capacity(count);
    let mut attempts = 0usize;
    while codes.len() < count {
        attempts += 1;
        if attempts > count + MAX_CODE_ATTEMPTS {
            bail!("could not draw {count} distinct material codes");
        }
        let code = format!("IT{:04}", rng.gen_range(0..10_000));
        match store.register_material(RegisterMaterialRequest {
            code: code.clone(),
            name: material_name(&code),
            category: Some("genel".to_string()),
            photo: None,
            created_at_ms: now_ms(),
        }) {
            Ok(_) => codes.push(code),
            Err(StoreError::AlreadyExists { .. }) => {
                debug!(stock_code = code.as_str(), "material code collision, drawing again");
            }
            Err(err) => return Err(err).context("register material"),
        }
    }
    Ok(codes)
}

/// Display name registered for a material code, and the one passed on assign.
fn material_name(code: impl std::fmt::Display) -> String {
    format!("Name_{code}")
}

fn pick<'a, R: Rng>(people: &'a [String], rng: &mut R) -> Result<&'a String> {
    people.choose(rng).context("no people provisioned")
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
