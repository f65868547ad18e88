// Canvas - contract with the retained-mode scene graph that renders the image
//
// The editor core never draws pixels itself. It holds a handle to whatever
// display list the host application uses and asks it to re-attach objects
// or to redraw. Everything behind this trait is owned by the host.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors reported by the rendering collaborator
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CanvasError {
    /// The display list has been torn down (e.g. the stage was unmounted)
    #[error("canvas is detached")]
    Detached,

    /// The collaborator refused or failed to draw
    #[error("draw failed: {0}")]
    DrawFailed(String),
}

/// Reference to a raster produced outside the core (object URL, blob key, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(location: impl Into<String>) -> Self {
        Self(location.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a node in the host display list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(Uuid);

impl ObjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

/// Kind of node living on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    /// The edited raster itself
    Image,
    /// Text annotation
    Text,
    /// Free-hand drawing stroke
    Drawing,
    /// Any other overlay shape
    Shape,
}

/// Back-reference to a node of the host display list
///
/// Commands keep these only to re-attach nodes after an undo; the node
/// itself stays owned by the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayObject {
    pub id: ObjectId,
    pub kind: ObjectKind,
}

impl DisplayObject {
    pub fn new(kind: ObjectKind) -> Self {
        Self {
            id: ObjectId::new(),
            kind,
        }
    }

    /// Whether this node is the edited raster rather than an annotation
    pub fn is_image(&self) -> bool {
        self.kind == ObjectKind::Image
    }
}

/// Rendering collaborator driven by the editor core
///
/// Implementations wrap the host scene graph. All calls happen on the UI
/// thread; `Send` is required so a session can be handed to whichever thread
/// owns the event loop.
pub trait Canvas: Send {
    /// Draw the whole stage once
    fn batch_draw(&mut self) -> Result<(), CanvasError>;

    /// Add a node to the first layer; adding a node that is already present
    /// must not duplicate it
    fn attach(&mut self, object: DisplayObject) -> Result<(), CanvasError>;

    /// Snapshot of the nodes currently on the stage
    fn objects(&self) -> Vec<DisplayObject>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_ref_display() {
        let image = ImageRef::new("blob:cropped-1");
        assert_eq!(image.as_str(), "blob:cropped-1");
        assert_eq!(image.to_string(), "blob:cropped-1");
    }

    #[test]
    fn test_object_ids_are_unique() {
        let a = DisplayObject::new(ObjectKind::Text);
        let b = DisplayObject::new(ObjectKind::Text);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_is_image() {
        assert!(DisplayObject::new(ObjectKind::Image).is_image());
        assert!(!DisplayObject::new(ObjectKind::Drawing).is_image());
    }
}
