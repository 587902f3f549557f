use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};
use crate::render::{MarkerPrimitive, PathPrimitive};
use crate::scene::{NodeId, NodeKind, Scene};

/// Backend-agnostic draw list for one chart frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub paths: Vec<PathPrimitive>,
    pub markers: Vec<MarkerPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            paths: Vec::new(),
            markers: Vec::new(),
        }
    }

    /// Flattens the visible part of `scene` depth first, in child order,
    /// accumulating group translations into absolute coordinates.
    pub fn from_scene(scene: &Scene, viewport: Viewport) -> ChartResult<Self> {
        let mut frame = Self::new(viewport);
        frame.collect(scene, scene.root(), 0.0, 0.0)?;
        Ok(frame)
    }

    fn collect(&mut self, scene: &Scene, id: NodeId, origin_x: f64, origin_y: f64) -> ChartResult<()> {
        let node = scene.get(id)?;
        if !node.visible {
            return Ok(());
        }
        let x = origin_x + node.translation_x;
        let y = origin_y + node.translation_y;

        match &node.kind {
            NodeKind::Group => {
                for child in node.children() {
                    self.collect(scene, *child, x, y)?;
                }
            }
            NodeKind::Path(path) => {
                if !path.path.is_empty() {
                    self.paths.push(PathPrimitive {
                        commands: path
                            .path
                            .commands()
                            .iter()
                            .map(|command| command.translated(x, y))
                            .collect(),
                        fill: path.style.fill,
                        stroke: path.style.stroke,
                        stroke_width: path.style.stroke_width,
                        opacity: node.opacity,
                    });
                }
            }
            NodeKind::Marker(marker) => {
                if marker.size > 0.0 {
                    self.markers.push(MarkerPrimitive {
                        shape: marker.shape,
                        x,
                        y,
                        size: marker.size,
                        fill: marker.style.fill,
                        stroke: marker.style.stroke,
                        stroke_width: marker.style.stroke_width,
                        fill_opacity: marker.style.fill_opacity * node.opacity,
                        stroke_opacity: marker.style.stroke_opacity * node.opacity,
                    });
                }
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty() && self.markers.is_empty()
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        for path in &self.paths {
            path.validate()?;
        }
        for marker in &self.markers {
            marker.validate()?;
        }
        Ok(())
    }
}
