use serde::{Deserialize, Serialize};

/// Geographic regions recognized in catalog and file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    /// USA / North America
    Usa,
    /// Europe (PAL regions)
    Europe,
    /// Japan
    Japan,
    /// World / Region-free
    World,
}

/// Parenthesized name tags and the region they denote, checked in order.
const NAME_TAGS: &[(&str, Region)] = &[
    ("(usa)", Region::Usa),
    ("(us)", Region::Usa),
    ("(europe)", Region::Europe),
    ("(eur)", Region::Europe),
    ("(japan)", Region::Japan),
    ("(jpn)", Region::Japan),
    ("(world)", Region::World),
];

impl Region {
    /// Returns the full name of this region.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Usa => "USA",
            Self::Europe => "Europe",
            Self::Japan => "Japan",
            Self::World => "World",
        }
    }

    /// Infer a region from a game or file name.
    ///
    /// Looks for the literal tags `(USA)`, `(US)`, `(Europe)`, `(EUR)`,
    /// `(Japan)`, `(JPN)` and `(World)` case-insensitively. The first tag in
    /// that order that occurs anywhere in the name wins. Multi-region tags
    /// such as `(USA, Europe)` are not split.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_lowercase();
        NAME_TAGS
            .iter()
            .find(|(tag, _)| lower.contains(tag))
            .map(|&(_, region)| region)
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_from_name() {
        assert_eq!(Region::from_name("Super Mario (USA).smc"), Some(Region::Usa));
        assert_eq!(Region::from_name("Zelda (Europe)"), Some(Region::Europe));
        assert_eq!(Region::from_name("Zelda (eur)"), Some(Region::Europe));
        assert_eq!(Region::from_name("Mother (JAPAN)"), Some(Region::Japan));
        assert_eq!(Region::from_name("Tetris (World)"), Some(Region::World));
    }

    #[test]
    fn test_region_first_tag_in_table_order_wins() {
        // "(Japan)" appears first in the string, but USA is checked first
        assert_eq!(Region::from_name("Foo (Japan) (USA)"), Some(Region::Usa));
    }

    #[test]
    fn test_region_requires_parenthesized_tag() {
        assert_eq!(Region::from_name("USA Racer"), None);
        assert_eq!(Region::from_name("Foo (USA, Europe)"), None);
        assert_eq!(Region::from_name(""), None);
    }
}
