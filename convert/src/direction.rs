/// Which representation an entity currently uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dimension {
    #[default]
    Volume,
    Planar,
}

/// Direction of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// 3D → 2D.
    ToPlanar,
    /// 2D → 3D.
    ToVolume,
}

impl Direction {
    /// Dimension an entity ends up in.
    pub fn target(self) -> Dimension {
        match self {
            Direction::ToPlanar => Dimension::Planar,
            Direction::ToVolume => Dimension::Volume,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::ToPlanar => f.write_str("3D→2D"),
            Direction::ToVolume => f.write_str("2D→3D"),
        }
    }
}
