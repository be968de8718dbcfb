//! Top-down office viewer.
//!
//! ```bash
//! cargo run --release -- --avatar assets/avatar.glb
//! cargo run --release -- --headless 600      # no window, scripted input
//! ```
//!
//! WASD / arrows move, Shift runs, Space jumps.  Click to capture the mouse
//! (and wake the yeller), Esc releases it, Esc again quits.  M mutes,
//! Tab toggles the overview.

use anyhow::Context;
use clap::Parser;
use glam::Vec2;
use log::info;
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::time::Instant;

use office_parkour::{
    anim::{AssetStatus, AvatarLoader},
    config::GameConfig,
    renderer::{RendererExt, Software, TopDownView, scene_calls, software::fit_view},
    sim::{InputFlags, InputSnapshot, Simulation},
    ui::{InputSampler, LogAnnouncer, MouseLook, Yeller},
    world::{LayoutSpec, OFFICE_LAYOUT, office::DESK_SIZE},
};

const W: usize = 1280;
const H: usize = 800;
const FOLLOW_ZOOM: f32 = 28.0;
const HEADLESS_DT: f32 = 1.0 / 60.0;

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Desk columns
    #[arg(long, default_value_t = OFFICE_LAYOUT.columns)]
    columns: usize,

    /// Desk rows
    #[arg(long, default_value_t = OFFICE_LAYOUT.rows)]
    rows: usize,

    /// glTF/GLB avatar with Idle / Run / Jump clips
    #[arg(long, value_name = "FILE")]
    avatar: Option<PathBuf>,

    /// Run N ticks with scripted input and no window
    #[arg(long, value_name = "N")]
    headless: Option<usize>,

    /// Start with the yeller muted
    #[arg(long)]
    mute: bool,

    /// Walking speed override (m/s)
    #[arg(long)]
    walk_speed: Option<f32>,

    /// Running speed override (m/s)
    #[arg(long)]
    run_speed: Option<f32>,

    /// Seed for the yeller's timing
    #[arg(long)]
    seed: Option<u64>,
}

impl Opts {
    fn layout(&self) -> LayoutSpec {
        LayoutSpec {
            columns: self.columns,
            rows: self.rows,
            ..OFFICE_LAYOUT
        }
    }

    fn config(&self) -> GameConfig {
        let mut cfg = GameConfig::default();
        if let Some(v) = self.walk_speed {
            cfg.locomotion.walk_speed = v;
        }
        if let Some(v) = self.run_speed {
            cfg.locomotion.run_speed = v;
        }
        cfg
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opts = Opts::parse();

    let mut sim = Simulation::new(opts.config(), &opts.layout()).context("building the office")?;
    let mut loader = opts.avatar.clone().map(AvatarLoader::spawn);

    match opts.headless {
        Some(ticks) => run_headless(&mut sim, &mut loader, ticks),
        None => run_window(&mut sim, &mut loader, &opts),
    }
}

/// Swap in the animated avatar once its clips are available.
fn poll_avatar(sim: &mut Simulation, loader: &mut Option<AvatarLoader>) {
    let Some(l) = loader else {
        return;
    };
    match l.poll() {
        AssetStatus::Loading => {}
        AssetStatus::Ready(library) => {
            info!("avatar ready ({} clips)", library.len());
            sim.attach_clips(library);
            *loader = None;
        }
        AssetStatus::Failed(_) => *loader = None,
    }
}

/* ---------------------------------------------------------------- */
/* headless                                                          */
/* ---------------------------------------------------------------- */

/// Settle, walk, run, jump, then idle again; loops every 8 s.
fn scripted_input(tick: usize) -> InputSnapshot {
    let phase = tick % 480;
    let held = match phase {
        0..60 => InputFlags::empty(),
        60..180 => InputFlags::FORWARD,
        180..300 => InputFlags::FORWARD | InputFlags::RUN,
        300..330 => InputFlags::FORWARD | InputFlags::JUMP,
        330..420 => InputFlags::BACKWARD | InputFlags::LEFT,
        _ => InputFlags::empty(),
    };
    InputSnapshot {
        held,
        jump_pressed: phase == 300,
    }
}

fn run_headless(
    sim: &mut Simulation,
    loader: &mut Option<AvatarLoader>,
    ticks: usize,
) -> anyhow::Result<()> {
    let mut jumps = 0usize;
    let mut vaults = 0usize;
    for tick in 0..ticks {
        poll_avatar(sim, loader);
        let report = sim.tick(HEADLESS_DT, &scripted_input(tick))?;
        if let Some(t) = report.transition {
            info!("tick {tick}: {:?} -> {:?}", t.from, t.to);
        }
        jumps += report.jumped as usize;
        vaults += report.vaulted.is_some() as usize;
    }
    sim.shutdown();

    let s = sim.agent_state();
    println!(
        "{ticks} ticks: pos=({:.2}, {:.2}, {:.2}) state={:?} grounded={} jumps={jumps} vaults={vaults}",
        s.position.x, s.position.y, s.position.z, s.movement, s.grounded
    );
    Ok(())
}

/* ---------------------------------------------------------------- */
/* windowed                                                          */
/* ---------------------------------------------------------------- */

fn run_window(
    sim: &mut Simulation,
    loader: &mut Option<AvatarLoader>,
    opts: &Opts,
) -> anyhow::Result<()> {
    let mut win = Window::new("Office Parkour", W, H, WindowOptions::default())?;
    win.set_target_fps(60);

    let rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut yeller = Yeller::new(LogAnnouncer, rng);
    let start = Instant::now();
    if opts.mute {
        yeller.toggle_mute(start.elapsed());
    }

    let mut sampler = InputSampler::default();
    let mut look = MouseLook::default();
    let mut renderer = Software::default();
    let mut overview = false;
    let sensitivity = sim.config().camera.mouse_sensitivity;
    let radius = sim.config().body.radius;

    let (lo, hi) = sim.placement().bounds();
    let margin = Vec2::new(DESK_SIZE.x, DESK_SIZE.z) * 2.0;
    let overview_view = fit_view(lo - margin, hi + margin, W, H);

    let mut last = Instant::now();
    while win.is_open() {
        let frame_dt = last.elapsed().as_secs_f32();
        last = Instant::now();
        let now = start.elapsed();

        /* -- window-level keys ---------------------------------------- */
        if win.is_key_pressed(Key::Escape, KeyRepeat::No) {
            if look.engaged() {
                look.release();
            } else {
                break;
            }
        }
        if win.is_key_pressed(Key::M, KeyRepeat::No) {
            let muted = yeller.toggle_mute(now);
            info!("yeller {}", if muted { "muted" } else { "unmuted" });
        }
        if win.is_key_pressed(Key::Tab, KeyRepeat::No) {
            overview = !overview;
        }

        /* -- input ---------------------------------------------------- */
        let (engaged_now, (dx, dy)) = look.poll(&win);
        if engaged_now {
            yeller.activate(now);
        }
        sim.camera_mut().look(dx, dy, sensitivity);
        let input = sampler.sample(&win);

        /* -- simulate ------------------------------------------------- */
        poll_avatar(sim, loader);
        sim.tick(frame_dt, &input)?;
        yeller.update(now);

        /* -- draw ----------------------------------------------------- */
        let state = *sim.agent_state();
        let camera = *sim.camera();
        let view = if overview {
            overview_view
        } else {
            TopDownView {
                centre: Vec2::new(camera.pos().x, camera.pos().z),
                pixels_per_metre: FOLLOW_ZOOM,
            }
        };
        let calls = scene_calls(
            sim.scene(),
            &state,
            radius,
            sim.avatar_view(),
            camera.basis().forward,
        );

        win.set_title(&format!(
            "Office Parkour | {:?}{} | {:.1} m/s | cooldown {:.2}s | {}",
            state.movement,
            if state.grounded { "" } else { " (air)" },
            state.horizontal_speed(),
            state.vault_cooldown,
            if yeller.muted() { "muted" } else { "yelling" },
        ));

        let mut shown = Ok(());
        renderer.draw_frame(W, H, view, &calls, |fb, w, h| {
            shown = win.update_with_buffer(fb, w, h);
        });
        shown?;
    }

    yeller.stop();
    sim.shutdown();
    Ok(())
}
