//! Configuration for the view tree host

/// Which physical edge leading and trailing map to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

/// Configuration options for a [`super::ViewTree`]
#[derive(Debug, Clone)]
pub struct TreeConfig {
    /// Size of the root view (width, height)
    pub root_size: (f64, f64),

    /// Layout direction used to place leading and trailing anchors
    pub direction: LayoutDirection,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            root_size: (320.0, 480.0),
            direction: LayoutDirection::LeftToRight,
        }
    }
}

impl TreeConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the root view size
    pub fn with_root_size(mut self, width: f64, height: f64) -> Self {
        self.root_size = (width, height);
        self
    }

    /// Set the layout direction
    pub fn with_direction(mut self, direction: LayoutDirection) -> Self {
        self.direction = direction;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TreeConfig::default();
        assert_eq!(config.root_size, (320.0, 480.0));
        assert_eq!(config.direction, LayoutDirection::LeftToRight);
    }

    #[test]
    fn test_builder_pattern() {
        let config = TreeConfig::new()
            .with_root_size(800.0, 600.0)
            .with_direction(LayoutDirection::RightToLeft);

        assert_eq!(config.root_size, (800.0, 600.0));
        assert_eq!(config.direction, LayoutDirection::RightToLeft);
    }
}
