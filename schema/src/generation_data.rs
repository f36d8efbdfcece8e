use serde::{Deserialize, Serialize};
use std::fmt;

/// An inclusive range of Pokemon IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdRange {
    pub start_id: u32,
    pub end_id: u32,
}

impl IdRange {
    pub fn new(start_id: u32, end_id: u32) -> Self {
        Self { start_id, end_id }
    }

    pub fn contains(&self, pokemon_id: u32) -> bool {
        self.start_id <= pokemon_id && pokemon_id <= self.end_id
    }

    pub fn overlaps(&self, other: &IdRange) -> bool {
        self.start_id <= other.end_id && other.start_id <= self.end_id
    }

    /// Number of IDs covered; zero for an inverted range.
    pub fn span(&self) -> u32 {
        if self.end_id < self.start_id {
            0
        } else {
            self.end_id - self.start_id + 1
        }
    }
}

impl fmt::Display for IdRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:03}-#{:03}", self.start_id, self.end_id)
    }
}

/// Static description of one generation. Only `start_id`/`end_id` take part
/// in filtering; the rest is display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationDescriptor {
    pub generation: u32,
    pub name: String,
    pub region: String,
    pub start_id: u32,
    pub end_id: u32,
    pub year: u16,
    pub games: Vec<String>,
    pub color: String,
    #[serde(default)]
    pub description: String,
    /// Image file name shown next to the generation, e.g. `kanto-icon.png`.
    #[serde(default)]
    pub icon: String,
}

impl GenerationDescriptor {
    pub fn range(&self) -> IdRange {
        IdRange::new(self.start_id, self.end_id)
    }

    pub fn contains(&self, pokemon_id: u32) -> bool {
        self.range().contains(pokemon_id)
    }

    /// How many Pokemon the generation defines, independent of what is seeded.
    pub fn span(&self) -> u32 {
        self.range().span()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_bounds_are_inclusive() {
        let kanto = IdRange::new(1, 151);
        assert!(kanto.contains(1));
        assert!(kanto.contains(151));
        assert!(!kanto.contains(0));
        assert!(!kanto.contains(152));
        assert_eq!(kanto.span(), 151);
    }

    #[test]
    fn overlap_detection() {
        let kanto = IdRange::new(1, 151);
        assert!(kanto.overlaps(&IdRange::new(151, 200)));
        assert!(!kanto.overlaps(&IdRange::new(152, 251)));
        assert_eq!(IdRange::new(10, 5).span(), 0);
    }

    #[test]
    fn descriptor_parses_from_ron() {
        let source = r##"(
            generation: 4,
            name: "Sinnoh",
            region: "Sinnoh",
            start_id: 387,
            end_id: 493,
            year: 2006,
            games: ["Diamond", "Pearl", "Platinum"],
            color: "#9b59b6",
        )"##;
        let descriptor: GenerationDescriptor = ron::from_str(source).unwrap();
        assert_eq!(descriptor.span(), 107);
        assert!(descriptor.contains(493));
        assert!(descriptor.description.is_empty());
        assert!(descriptor.icon.is_empty());
    }

    #[test]
    fn descriptor_keeps_icon_from_ron() {
        let source = r##"(
            generation: 1,
            name: "Kanto",
            region: "Kanto",
            start_id: 1,
            end_id: 151,
            year: 1996,
            games: ["Red", "Blue", "Yellow"],
            color: "#ff6b6b",
            icon: "kanto-icon.png",
        )"##;
        let descriptor: GenerationDescriptor = ron::from_str(source).unwrap();
        assert_eq!(descriptor.icon, "kanto-icon.png");
    }
}
