use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::systems::vector::VectorColor;

/// Caller-supplied identifier of a note's paper ball.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BallId(pub String);

impl BallId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BallId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for BallId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A ball's fill color: the caller's original string (handed back in
/// selection events) plus the parsed RGBA used for painting.
#[derive(Debug, Clone, PartialEq)]
pub struct PaperColor {
    css: String,
    rgba: VectorColor,
}

impl PaperColor {
    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`. Anything else paints white.
    pub fn parse(css: &str) -> Self {
        let rgba = parse_hex(css).unwrap_or_else(|| {
            log::warn!("unrecognised paper color {:?}, painting white", css);
            VectorColor::WHITE
        });
        Self {
            css: css.to_string(),
            rgba,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.css
    }

    pub fn rgba(&self) -> VectorColor {
        self.rgba
    }
}

fn parse_hex(css: &str) -> Option<VectorColor> {
    let hex = css.trim().strip_prefix('#')?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok();
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some(VectorColor::rgb8(nibble(0)? * 17, nibble(1)? * 17, nibble(2)? * 17)),
        6 => Some(VectorColor::rgb8(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(VectorColor::rgba8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

/// The note carried by a ball. Opaque to the physics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BallPayload {
    pub text: String,
    pub annotation: Option<String>,
}

/// Request to throw one ball into the bin.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBall {
    pub id: BallId,
    pub color: String,
    pub text: String,
    pub annotation: Option<String>,
    /// Spawn point; `None` picks a random spot in the bin's spawn band.
    pub position: Option<Vec2>,
}

impl NewBall {
    pub fn new(id: impl Into<BallId>, color: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            color: color.into(),
            text: text.into(),
            annotation: None,
            position: None,
        }
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }
}

/// One entry of a bulk restore.
///
/// Accepts the journal's own field names (`content`, `aiReply`) as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallSnapshot {
    pub id: BallId,
    pub color: String,
    #[serde(alias = "content")]
    pub text: String,
    #[serde(default, alias = "aiReply", skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

/// Semantic event produced by a completed pointer gesture.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BinEvent {
    /// A ball was tapped. `position` is where the ball is now.
    BallSelected {
        id: BallId,
        text: String,
        color: String,
        position: Vec2,
        annotation: Option<String>,
    },
    /// The pointer was tapped where no ball was.
    EmptySpaceSelected,
}

/// Cursor affordance for the host to apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CursorHint {
    #[default]
    Default,
    /// Over a ball: it can be grabbed.
    Grab,
    /// Over empty space.
    Pointer,
}

impl CursorHint {
    /// CSS cursor name.
    pub fn as_str(self) -> &'static str {
        match self {
            CursorHint::Default => "default",
            CursorHint::Grab => "grab",
            CursorHint::Pointer => "pointer",
        }
    }
}
