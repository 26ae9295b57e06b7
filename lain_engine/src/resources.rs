use std::collections::BTreeMap;

use crate::error::{EngineError, EngineResult};

/// Textures the scenes bind by key; the loader behind them is external.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TextureKey {
    BootBackground,
    SiteBackground,
    NodeIcons,
    PauseLetters,
    MediaOverlay,
    GateMirror,
    PolytanBody,
    SsknIcon,
    LoadingSpinner,
    EndScreen,
    DebugFont,
}

impl TextureKey {
    pub const ALL: [TextureKey; 11] = [
        TextureKey::BootBackground,
        TextureKey::SiteBackground,
        TextureKey::NodeIcons,
        TextureKey::PauseLetters,
        TextureKey::MediaOverlay,
        TextureKey::GateMirror,
        TextureKey::PolytanBody,
        TextureKey::SsknIcon,
        TextureKey::LoadingSpinner,
        TextureKey::EndScreen,
        TextureKey::DebugFont,
    ];
}

/// Opaque handle returned by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureHandle {
    pub key: TextureKey,
    pub id: u32,
    pub size: [u32; 2],
}

/// Atlas cell for one character of the UI font.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    pub ch: char,
    pub uv: [f32; 4],
    pub advance: f32,
}

impl Glyph {
    fn placeholder() -> Self {
        Glyph {
            ch: ' ',
            uv: [0.0; 4],
            advance: 1.0,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.uv == [0.0; 4]
    }
}

const FONT_COLUMNS: u32 = 16;

/// Loaded textures and glyphs, passed explicitly through the frame context.
#[derive(Debug, Clone)]
pub struct ResourceRegistry {
    textures: BTreeMap<TextureKey, TextureHandle>,
    glyphs: BTreeMap<char, Glyph>,
    placeholder: Glyph,
}

impl Default for ResourceRegistry {
    fn default() -> Self {
        Self {
            textures: BTreeMap::new(),
            glyphs: BTreeMap::new(),
            placeholder: Glyph::placeholder(),
        }
    }
}

impl ResourceRegistry {
    /// Registry with every texture marked loaded and a printable-ASCII font,
    /// for runs without a real loader.
    pub fn headless() -> Self {
        let mut registry = Self::default();
        for (id, key) in TextureKey::ALL.into_iter().enumerate() {
            registry.register_texture(TextureHandle {
                key,
                id: id as u32,
                size: [256, 256],
            });
        }
        for (index, ch) in (' '..='~').enumerate() {
            let index = index as u32;
            let cell = 1.0 / FONT_COLUMNS as f32;
            let u = (index % FONT_COLUMNS) as f32 * cell;
            let v = (index / FONT_COLUMNS) as f32 * cell;
            registry.register_glyph(Glyph {
                ch,
                uv: [u, v, u + cell, v + cell],
                advance: 1.0,
            });
        }
        registry
    }

    pub fn register_texture(&mut self, handle: TextureHandle) {
        self.textures.insert(handle.key, handle);
    }

    pub fn register_glyph(&mut self, glyph: Glyph) {
        self.glyphs.insert(glyph.ch, glyph);
    }

    pub fn texture(&self, key: TextureKey) -> EngineResult<&TextureHandle> {
        self.textures
            .get(&key)
            .ok_or(EngineError::TextureNotLoaded(key))
    }

    /// Missing glyphs degrade to a blank cell rather than failing the frame.
    pub fn glyph(&self, ch: char) -> Glyph {
        match self.glyphs.get(&ch) {
            Some(glyph) => *glyph,
            None => {
                log::warn!("no glyph for {ch:?}; drawing placeholder");
                Glyph { ch, ..self.placeholder }
            }
        }
    }

    pub fn layout_text(&self, text: &str) -> Vec<Glyph> {
        text.chars().map(|ch| self.glyph(ch)).collect()
    }
}
