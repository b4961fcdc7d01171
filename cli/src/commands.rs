use std::path::Path;
use std::time::Duration;

use volley_core::config::to_toml;
use volley_core::{
    ConfigExt, IntervalDriver, SlotPhase, VolleyConfig, WeaponProfile, format_countdown,
};

use crate::simulate::{SimulatedCombat, SimulationSession};

/// Options for a simulated auto-fire session
#[derive(Debug, Clone)]
pub struct SimulateOptions {
    /// Weapons from the command line; falls back to config weapons flagged `auto_fire`
    pub weapons: Vec<(String, f64)>,
    pub seconds: f64,
    pub target_after: f64,
    pub target_lost_at: Option<f64>,
    pub realtime: bool,
}

pub fn load_config(path: Option<&Path>) -> Result<VolleyConfig, String> {
    match path {
        Some(path) => VolleyConfig::load_from_path(path).map_err(|e| error_chain(&e)),
        None => Ok(VolleyConfig::load()),
    }
}

pub async fn simulate(config: &VolleyConfig, opts: SimulateOptions) -> Result<(), String> {
    let weapons = resolve_weapons(config, &opts.weapons)?;
    if weapons.is_empty() {
        return Err("no weapons: pass --weapon NAME=RATE or flag weapons with auto_fire in config".into());
    }

    let total = secs(opts.seconds, "--seconds")?;
    let target_after = secs(opts.target_after, "--target-after")?;
    let target_lost_at = opts
        .target_lost_at
        .map(|s| secs(s, "--target-lost-at"))
        .transpose()?;

    let combat = SimulatedCombat::new(target_after, target_lost_at);
    let mut session = SimulationSession::new(combat, config.auto_fire.clone(), weapons)?;

    for slot in session.controller.enabled_slots() {
        let interval = session.controller.remaining_for(slot).unwrap_or_default();
        println!(
            "slot {slot} ({}) auto-fire every {:.3}s",
            session.weapon_name(slot),
            interval.as_secs_f64()
        );
    }

    let driver = IntervalDriver::from_config(&config.scheduler);
    if opts.realtime {
        driver.run_for(&mut session, total).await;
    } else {
        session.run_accelerated(total, driver.period());
    }

    for shot in session.combat.shots() {
        println!(
            "[{:>7.2}s] slot {} ({}) -> target {}",
            shot.at.as_secs_f64(),
            shot.slot,
            session.weapon_name(shot.slot),
            shot.target
        );
    }

    println!();
    for slot in session.controller.enabled_slots() {
        let stats = session.controller.stats(slot).unwrap_or_default();
        let phase = match session.controller.phase(slot) {
            SlotPhase::Disabled => "disabled",
            SlotPhase::Waiting => "waiting",
            SlotPhase::Fired => "fired",
        };
        let next = session.controller.remaining_for(slot).unwrap_or_default();
        println!(
            "slot {slot} ({}): {} shots, {} skipped (no target), {} skipped (not ready), {} failed, {phase}, next in {}",
            session.weapon_name(slot),
            stats.shots,
            stats.skipped_no_target,
            stats.skipped_not_ready,
            stats.failures,
            format_countdown(next),
        );
    }

    session.controller.disable_all();
    Ok(())
}

pub fn show_config(config: &VolleyConfig) -> Result<(), String> {
    let text = to_toml(config).map_err(|e| error_chain(&e))?;
    print!("{text}");
    Ok(())
}

pub fn save_config(config: &VolleyConfig, path: Option<&Path>) -> Result<(), String> {
    match path {
        Some(path) => {
            config.save_to_path(path).map_err(|e| error_chain(&e))?;
            println!("saved {}", path.display());
        }
        None => {
            config.save().map_err(|e| error_chain(&e))?;
            if let Ok(path) = VolleyConfig::default_path() {
                println!("saved {}", path.display());
            }
        }
    }
    Ok(())
}

pub fn show_config_path() -> Result<(), String> {
    let path = VolleyConfig::default_path().map_err(|e| error_chain(&e))?;
    println!("{}", path.display());
    Ok(())
}

/// Command-line weapons get slots 1, 2, 3... in the order given
fn resolve_weapons(config: &VolleyConfig, cli_weapons: &[(String, f64)]) -> Result<Vec<WeaponProfile>, String> {
    if cli_weapons.is_empty() {
        return Ok(config.auto_fire_weapons().cloned().collect());
    }
    if cli_weapons.len() > usize::from(u8::MAX) {
        return Err(format!(
            "at most {} --weapon arguments are supported, got {}",
            u8::MAX,
            cli_weapons.len()
        ));
    }
    Ok(cli_weapons
        .iter()
        .zip(1..=u8::MAX)
        .map(|((name, fire_rate), slot)| WeaponProfile {
            slot,
            name: name.clone(),
            fire_rate: *fire_rate,
            auto_fire: true,
        })
        .collect())
}

fn secs(value: f64, flag: &str) -> Result<Duration, String> {
    Duration::try_from_secs_f64(value).map_err(|_| format!("{flag} must be a non-negative number of seconds"))
}

/// Render an error with its source chain on one line
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

/// Parse `NAME=RATE`
pub fn parse_weapon(arg: &str) -> Result<(String, f64), String> {
    let (name, rate) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=RATE, got '{arg}'"))?;
    let rate: f64 = rate
        .trim()
        .parse()
        .map_err(|_| format!("invalid fire rate '{rate}'"))?;
    Ok((name.trim().to_string(), rate))
}
