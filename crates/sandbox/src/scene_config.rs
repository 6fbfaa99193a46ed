//! Scene config loader.
//!
//! Reads a JSON document describing cube actors (size, mass, color, position) and
//! validates every field before anything is spawned. Validation stops at the
//! first violation; a partially valid scene is never returned.

use glam::Vec3;
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_CUBE_MASS: f32 = 1.0;
pub const DEFAULT_CUBE_COLOR: [f32; 4] = [0.9, 0.3, 0.2, 1.0];

/// Where the single synthetic cube spawns when no scene is supplied.
pub const FALLBACK_CUBE_POSITION: Vec3 = Vec3::new(0.0, 0.0, 8.0);

/// One validated cube entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ActorSpec {
    pub name: String,
    /// Edge length, > 0.
    pub size: f32,
    /// 0 makes the actor static.
    pub mass: f32,
    /// RGBA, each component in [0, 1].
    pub color: [f32; 4],
    pub position: Vec3,
}

/// A validated scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDocument {
    pub version: u32,
    pub cubes: Vec<ActorSpec>,
}

impl SceneDocument {
    /// Scene used when no config is given: one unit cube dropped from (0, 0, 8).
    pub fn fallback() -> Self {
        Self {
            version: 1,
            cubes: vec![ActorSpec {
                name: default_name(0),
                size: 1.0,
                mass: DEFAULT_CUBE_MASS,
                color: DEFAULT_CUBE_COLOR,
                position: FALLBACK_CUBE_POSITION,
            }],
        }
    }
}

/// Per-cube fields, in validation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubeField {
    Name,
    Size,
    Mass,
    Color,
    Pos,
}

impl fmt::Display for CubeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CubeField::Name => "name",
            CubeField::Size => "size",
            CubeField::Mass => "mass",
            CubeField::Color => "color",
            CubeField::Pos => "pos",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read scene config {path:?}: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("malformed scene config: {0}")]
    Malformed(String),

    #[error("\"cubes\" must be a list")]
    MissingCubes,

    #[error("\"version\" must be an integer >= 1")]
    InvalidVersion,

    #[error("cubes[{index}] must be an object")]
    InvalidEntry { index: usize },

    #[error("cubes[{index}].name {reason}")]
    InvalidName { index: usize, reason: String },

    #[error("cubes[{index}].size {reason}")]
    InvalidSize { index: usize, reason: String },

    #[error("cubes[{index}].mass {reason}")]
    InvalidMass { index: usize, reason: String },

    #[error("cubes[{index}].color {reason}")]
    InvalidColor { index: usize, reason: String },

    #[error("cubes[{index}].pos {reason}")]
    InvalidPosition { index: usize, reason: String },
}

impl ConfigError {
    /// Index of the offending cube entry, for entry-level errors.
    pub fn index(&self) -> Option<usize> {
        match self {
            ConfigError::InvalidEntry { index }
            | ConfigError::InvalidName { index, .. }
            | ConfigError::InvalidSize { index, .. }
            | ConfigError::InvalidMass { index, .. }
            | ConfigError::InvalidColor { index, .. }
            | ConfigError::InvalidPosition { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// The cube field that failed validation, for field-level errors.
    pub fn field(&self) -> Option<CubeField> {
        match self {
            ConfigError::InvalidName { .. } => Some(CubeField::Name),
            ConfigError::InvalidSize { .. } => Some(CubeField::Size),
            ConfigError::InvalidMass { .. } => Some(CubeField::Mass),
            ConfigError::InvalidColor { .. } => Some(CubeField::Color),
            ConfigError::InvalidPosition { .. } => Some(CubeField::Pos),
            _ => None,
        }
    }

    fn for_field(field: CubeField, index: usize, reason: String) -> Self {
        match field {
            CubeField::Name => ConfigError::InvalidName { index, reason },
            CubeField::Size => ConfigError::InvalidSize { index, reason },
            CubeField::Mass => ConfigError::InvalidMass { index, reason },
            CubeField::Color => ConfigError::InvalidColor { index, reason },
            CubeField::Pos => ConfigError::InvalidPosition { index, reason },
        }
    }
}

/// Read and validate a scene file.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<SceneDocument, ConfigError> {
    let path = path.as_ref();
    let unreadable = |reason: String| ConfigError::Unreadable {
        path: path.to_path_buf(),
        reason,
    };

    if !path.exists() {
        return Err(unreadable("file not found".to_string()));
    }
    if !path.is_file() {
        return Err(unreadable("not a file".to_string()));
    }
    let text = std::fs::read_to_string(path).map_err(|e| unreadable(e.to_string()))?;
    let document = parse_str(&text)?;
    log::info!(
        "Loaded scene config {:?}: version {}, {} cube(s)",
        path,
        document.version,
        document.cubes.len()
    );
    Ok(document)
}

/// Deserialize JSON text and validate it.
pub fn parse_str(text: &str) -> Result<SceneDocument, ConfigError> {
    let raw: Value =
        serde_json::from_str(text).map_err(|e| ConfigError::Malformed(e.to_string()))?;
    parse(&raw)
}

/// Validate an already deserialized document.
pub fn parse(raw: &Value) -> Result<SceneDocument, ConfigError> {
    let root = raw
        .as_object()
        .ok_or_else(|| ConfigError::Malformed("root must be a JSON object".to_string()))?;

    let version = match root.get("version") {
        None => 1,
        Some(v) => v
            .as_u64()
            .filter(|&v| v >= 1)
            .and_then(|v| u32::try_from(v).ok())
            .ok_or(ConfigError::InvalidVersion)?,
    };

    let entries = root
        .get("cubes")
        .and_then(Value::as_array)
        .ok_or(ConfigError::MissingCubes)?;

    let cubes = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let entry = entry
                .as_object()
                .ok_or(ConfigError::InvalidEntry { index })?;
            parse_cube(index, entry)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SceneDocument { version, cubes })
}

fn default_name(index: usize) -> String {
    format!("cube_{}", index)
}

fn parse_cube(index: usize, entry: &Map<String, Value>) -> Result<ActorSpec, ConfigError> {
    let fail = |field: CubeField| move |reason: String| ConfigError::for_field(field, index, reason);

    let name = match entry.get("name") {
        None => default_name(index),
        Some(v) => non_empty_str(v).map_err(fail(CubeField::Name))?,
    };

    let size = entry
        .get("size")
        .ok_or_else(|| "is required".to_string())
        .and_then(number)
        .and_then(|size| {
            if size > 0.0 {
                Ok(size)
            } else {
                Err("must be > 0".to_string())
            }
        })
        .map_err(fail(CubeField::Size))?;

    let mass = match entry.get("mass") {
        None => DEFAULT_CUBE_MASS,
        Some(v) => number(v)
            .and_then(|mass| {
                if mass >= 0.0 {
                    Ok(mass)
                } else {
                    Err("must be >= 0".to_string())
                }
            })
            .map_err(fail(CubeField::Mass))?,
    };

    let color = match entry.get("color") {
        None => DEFAULT_CUBE_COLOR,
        Some(v) => float_array::<4>(v)
            .and_then(|color| {
                match color.iter().position(|c| !(0.0..=1.0).contains(c)) {
                    Some(i) => Err(format!("[{}] must be in range [0..1]", i)),
                    None => Ok(color),
                }
            })
            .map_err(fail(CubeField::Color))?,
    };

    let position = entry
        .get("pos")
        .ok_or_else(|| "is required".to_string())
        .and_then(float_array::<3>)
        .map(Vec3::from_array)
        .map_err(fail(CubeField::Pos))?;

    Ok(ActorSpec {
        name,
        size,
        mass,
        color,
        position,
    })
}

fn non_empty_str(v: &Value) -> Result<String, String> {
    match v.as_str() {
        Some(s) if !s.trim().is_empty() => Ok(s.to_string()),
        _ => Err("must be a non-empty string".to_string()),
    }
}

fn number(v: &Value) -> Result<f32, String> {
    let n = v.as_f64().ok_or_else(|| "must be a number".to_string())? as f32;
    if n.is_finite() {
        Ok(n)
    } else {
        Err("is out of range".to_string())
    }
}

fn float_array<const N: usize>(v: &Value) -> Result<[f32; N], String> {
    let items = v
        .as_array()
        .ok_or_else(|| format!("must be a list of {} numbers", N))?;
    if items.len() != N {
        return Err(format!("must have exactly {} elements", N));
    }
    let mut out = [0.0; N];
    for (i, item) in items.iter().enumerate() {
        out[i] = number(item).map_err(|reason| format!("[{}] {}", i, reason))?;
    }
    Ok(out)
}
