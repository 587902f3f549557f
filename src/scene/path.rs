use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    Close,
}

impl PathCommand {
    #[must_use]
    pub fn is_finite(self) -> bool {
        match self {
            Self::MoveTo { x, y } | Self::LineTo { x, y } => x.is_finite() && y.is_finite(),
            Self::Close => true,
        }
    }

    #[must_use]
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        match self {
            Self::MoveTo { x, y } => Self::MoveTo { x: x + dx, y: y + dy },
            Self::LineTo { x, y } => Self::LineTo { x: x + dx, y: y + dy },
            Self::Close => Self::Close,
        }
    }
}

/// Imperatively built polyline geometry.
///
/// Paths are retained across render passes, so builders must `clear` before
/// re-emitting commands.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PathData {
    commands: Vec<PathCommand>,
}

impl PathData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(PathCommand::MoveTo { x, y });
    }

    /// Appends a segment. Starts a new sub-path when nothing precedes it.
    pub fn line_to(&mut self, x: f64, y: f64) {
        if self.commands.is_empty() {
            self.move_to(x, y);
        } else {
            self.commands.push(PathCommand::LineTo { x, y });
        }
    }

    pub fn close_path(&mut self) {
        if !self.commands.is_empty() {
            self.commands.push(PathCommand::Close);
        }
    }

    /// Drops all commands while keeping the allocation for the next pass.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    #[must_use]
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::{PathCommand, PathData};

    #[test]
    fn clear_resets_commands_between_passes() {
        let mut path = PathData::new();
        path.move_to(0.0, 0.0);
        path.line_to(10.0, 5.0);
        assert_eq!(path.len(), 2);

        path.clear();
        assert!(path.is_empty());
        path.move_to(1.0, 1.0);
        assert_eq!(path.commands(), &[PathCommand::MoveTo { x: 1.0, y: 1.0 }]);
    }

    #[test]
    fn leading_line_to_starts_a_sub_path() {
        let mut path = PathData::new();
        path.line_to(3.0, 4.0);
        path.close_path();
        assert_eq!(
            path.commands(),
            &[PathCommand::MoveTo { x: 3.0, y: 4.0 }, PathCommand::Close]
        );
    }
}
