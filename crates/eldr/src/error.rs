//! Error taxonomy for the engine.
//!
//! Every fallible operation returns a typed error; nothing is recovered
//! silently. Errors propagate with `?` to the nearest caller — usually the
//! game loop or scene construction code — which decides whether to log and
//! halt or abort construction. There is no crash isolation between systems:
//! a failing system aborts the remainder of its tick (fail-fast, see
//! [`World::tick`](crate::ecs::World::tick)).

use std::fmt;

use thiserror::Error;

use crate::ecs::EntityId;

/// A system asked for a component the entity does not hold.
///
/// Raised by `component_required` lookups, which systems use for their
/// preconditions. The plain `component` lookup returns `None` instead.
#[derive(Debug, Error)]
#[error("entity \"{entity}\" is missing required component `{component}`")]
pub struct MissingComponentError {
    /// Diagnostic name of the entity (names are not unique).
    pub entity: String,
    /// Type name of the missing component.
    pub component: &'static str,
}

/// An entity handle that is despawned or from a recycled slot.
#[derive(Debug, Error)]
#[error("entity {0} is stale or despawned")]
pub struct StaleEntityError(pub EntityId);

/// A render layer name that was never registered with the layer service.
#[derive(Debug, Error)]
#[error("Layer {0} not found")]
pub struct LayerNotFoundError(pub String);

/// Strict [`ObjectPool::get`](crate::pooling::ObjectPool::get) on an empty
/// pool. `get_or_create` creates instead of failing.
#[derive(Debug, Error)]
#[error("Pool is empty")]
pub struct PoolEmptyError;

/// Shader `#include` preprocessing failure. Positions are 1-based.
#[derive(Debug, Error)]
pub enum IncludeError {
    #[error("missing include \"{name}\" at line {line}:{column}")]
    MissingInclude {
        name: String,
        line: usize,
        column: usize,
    },
    #[error(
        "invalid include syntax at line {line}:{column}: expected #include <name> but got \"{text}\""
    )]
    MalformedDirective {
        line: usize,
        column: usize,
        text: String,
    },
}

/// GPU bring-up failure. Fatal at construction time — a renderer cannot be
/// used in a broken state.
#[derive(Debug, Error)]
pub enum RenderInitError {
    #[error("no suitable GPU adapter found")]
    NoAdapter,
    #[error("failed to create GPU device: {0}")]
    Device(String),
    #[error("failed to create rendering surface: {0}")]
    Surface(String),
}

/// Asset cache failure. Load errors propagate to the caller; the cache has no
/// built-in retry policy.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read asset \"{path}\": {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to decode asset \"{path}\": {source}")]
    Decode {
        path: String,
        source: image::ImageError,
    },
    #[error("asset \"{0}\" is not cached")]
    NotCached(String),
}

/// Bounding-box computation over a degenerate path.
#[derive(Debug, Error)]
pub enum BoundsError {
    #[error("at least 2 points are required to calculate a bounding box (got {0})")]
    TooFewPoints(usize),
}

/// Aggregate failure from one frame of [`Game::run`](crate::game::Game::run).
///
/// Every scene gets its update for the frame even when an earlier scene
/// fails; all failures are collected and surfaced together so none is
/// silently swallowed.
#[derive(Debug)]
pub struct SceneUpdateError {
    /// (scene name, underlying error) for each scene that failed this frame.
    pub failures: Vec<(String, Error)>,
}

impl fmt::Display for SceneUpdateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} scene update(s) failed:", self.failures.len())?;
        for (name, err) in &self.failures {
            write!(f, " [{name}: {err}]")?;
        }
        Ok(())
    }
}

impl std::error::Error for SceneUpdateError {}

/// Umbrella error for the whole engine.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    MissingComponent(#[from] MissingComponentError),
    #[error(transparent)]
    StaleEntity(#[from] StaleEntityError),
    #[error(transparent)]
    LayerNotFound(#[from] LayerNotFoundError),
    #[error(transparent)]
    PoolEmpty(#[from] PoolEmptyError),
    #[error(transparent)]
    Include(#[from] IncludeError),
    #[error(transparent)]
    RenderInit(#[from] RenderInitError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error(transparent)]
    Bounds(#[from] BoundsError),
    #[error(transparent)]
    SceneUpdate(#[from] SceneUpdateError),
    /// Miscellaneous render backend failure (surface acquisition mid-frame,
    /// draw outside a frame, and similar).
    #[error("{0}")]
    Render(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_empty_message() {
        assert_eq!(PoolEmptyError.to_string(), "Pool is empty");
    }

    #[test]
    fn layer_not_found_names_layer() {
        let err = LayerNotFoundError("background".to_string());
        assert_eq!(err.to_string(), "Layer background not found");
    }

    #[test]
    fn scene_update_error_lists_all_failures() {
        let err = SceneUpdateError {
            failures: vec![
                ("title".to_string(), Error::from(PoolEmptyError)),
                (
                    "gameplay".to_string(),
                    Error::from(LayerNotFoundError("fg".to_string())),
                ),
            ],
        };
        let text = err.to_string();
        assert!(text.starts_with("2 scene update(s) failed"));
        assert!(text.contains("title"));
        assert!(text.contains("gameplay"));
    }
}
