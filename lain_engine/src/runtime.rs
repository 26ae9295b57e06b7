use anyhow::{Context, Result};
use lain_engine::{
    ClockedMediaPlayer, Engine, EngineConfig, InputScript, JsonSaveStore, MemorySaveStore,
    SaveStore, TraceRecorder,
};
use lain_site::SiteContent;

use crate::cli::RunArgs;

pub fn execute(args: RunArgs) -> Result<()> {
    let RunArgs {
        site_data,
        config,
        script,
        frames,
        fps,
        time_multiplier,
        save_path,
        trace_json,
        verbose: _,
    } = args;

    let content = match site_data.as_deref() {
        Some(path) => SiteContent::from_json_file(path)?,
        None => SiteContent::demo().context("loading bundled demo site")?,
    };
    log::info!("site content with {} nodes", content.node_count());
    let mut config = EngineConfig::from_json_file(config.as_deref())?;
    if let Some(fps) = fps {
        config.fps = fps;
    }
    if let Some(multiplier) = time_multiplier {
        config.time_multiplier = multiplier;
    }

    let script = match script.as_deref() {
        Some(path) => InputScript::from_json_file(path)?,
        None => InputScript::default(),
    };
    let frames = frames
        .or_else(|| script.last_frame().map(|last| last + 1))
        .unwrap_or_default();

    let saves: Box<dyn SaveStore> = match save_path {
        Some(path) => Box::new(JsonSaveStore::new(path)),
        None => Box::<MemorySaveStore>::default(),
    };
    let media = ClockedMediaPlayer::new(config.media_duration_secs);
    let mut engine = Engine::new(content, config, Box::new(media), saves);

    let mut recorder = TraceRecorder::new();
    let summary = engine.run_script(&script, frames, &mut recorder);

    println!(
        "ran {} frames: {} scene changes, {} errors",
        summary.frames, summary.scene_changes, summary.errors
    );
    let sequence: Vec<String> = recorder
        .scene_sequence()
        .iter()
        .map(|kind| format!("{kind:?}"))
        .collect();
    println!("scenes: {}", sequence.join(" -> "));
    let game = engine.game();
    println!(
        "final: site {} cursor {:?} gate {} sskn {} viewed {}",
        game.site,
        game.cursor(),
        game.gate_level,
        game.sskn_level,
        game.viewed_nodes.len()
    );

    if let Some(path) = trace_json {
        recorder.write_json(&path)?;
        println!("trace written to {}", path.display());
    }
    Ok(())
}
