use crate::Entity;

/// Errors that can occur when addressing scene objects.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    #[error("entity {0} is not alive")]
    DeadEntity(Entity),
}
