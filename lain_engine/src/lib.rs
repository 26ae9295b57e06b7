//! Frame-stepped scene runtime for the reconstructed site browser.
//!
//! The host calls [`Engine::update`] once per frame with its clock. The
//! engine hands that time to the active [`Scene`], which reads input, drives
//! its sprites' animation queues, fires its deferred events and may request
//! the next scene. Rendering, media playback and persistence sit behind the
//! [`Renderer`], [`MediaPlayer`] and [`SaveStore`] traits.

pub mod animation;
pub mod config;
pub mod driver;
pub mod error;
pub mod events;
pub mod input;
pub mod media;
pub mod resources;
pub mod save;
pub mod scene;
pub mod script;
pub mod state;
pub mod time;
pub mod trace;

pub use animation::{AnimationQueue, AnimationStep, Sprite, Transform};
pub use config::{EngineConfig, KeyBindings};
pub use driver::{Engine, FrameView, Renderer, RunSummary};
pub use error::{EngineError, EngineResult};
pub use events::{process_events, DeferredQueue, EventOwner};
pub use input::{Button, InputState};
pub use media::{ClockedMediaPlayer, MediaPlayer};
pub use resources::ResourceRegistry;
pub use save::{JsonSaveStore, MemorySaveStore, SaveStore};
pub use scene::{FrameContext, Scene, SceneKind};
pub use script::{InputScript, ScriptEntry};
pub use state::GameState;
pub use time::TimeContext;
pub use trace::{FrameTrace, TraceRecorder};
