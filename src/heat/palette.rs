use clap::ValueEnum;
use serde::Deserialize;

/// Six xterm-256 color indices, one per contribution level 0..=5.
pub type ColorScale = [u8; 6];

pub const COLORS_GRASS: ColorScale = [0, 22, 28, 34, 40, 46];
pub const COLORS_FIRE: ColorScale = [0, 220, 214, 208, 202, 196];
pub const COLORS_SKY: ColorScale = [0, 24, 31, 38, 45, 51];

#[derive(ValueEnum, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaletteName {
    #[default]
    Grass,
    Fire,
    Sky,
}

impl PaletteName {
    pub fn colors(self) -> ColorScale {
        match self {
            PaletteName::Grass => COLORS_GRASS,
            PaletteName::Fire => COLORS_FIRE,
            PaletteName::Sky => COLORS_SKY,
        }
    }
}

#[derive(ValueEnum, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BlockWidth {
    Thick,
    #[default]
    Reg,
    Thin,
}

impl BlockWidth {
    /// Terminal columns occupied by one day cell.
    pub fn columns(self) -> usize {
        match self {
            BlockWidth::Thick => 3,
            BlockWidth::Reg => 2,
            BlockWidth::Thin => 1,
        }
    }
}

/// Cyclic list of palettes; switching wraps around to the first entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteCycle {
    palettes: Vec<ColorScale>,
    current: usize,
}

impl PaletteCycle {
    /// Built-in grass, fire, sky cycle positioned at `start`.
    pub fn builtin(start: PaletteName) -> Self {
        let current = match start {
            PaletteName::Grass => 0,
            PaletteName::Fire => 1,
            PaletteName::Sky => 2,
        };
        Self {
            palettes: vec![COLORS_GRASS, COLORS_FIRE, COLORS_SKY],
            current,
        }
    }

    /// Caller-supplied palettes; falls back to the built-in cycle when empty.
    pub fn custom(palettes: Vec<ColorScale>) -> Self {
        if palettes.is_empty() {
            return Self::builtin(PaletteName::Grass);
        }
        Self {
            palettes,
            current: 0,
        }
    }

    pub fn current(&self) -> &ColorScale {
        &self.palettes[self.current]
    }

    pub fn index(&self) -> usize {
        self.current
    }

    pub fn advance(&mut self) -> &ColorScale {
        self.current = (self.current + 1) % self.palettes.len();
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_wraps_in_order() {
        let mut cycle = PaletteCycle::builtin(PaletteName::Fire);
        assert_eq!(cycle.current(), &COLORS_FIRE);
        assert_eq!(cycle.advance(), &COLORS_SKY);
        assert_eq!(cycle.advance(), &COLORS_GRASS);
        assert_eq!(cycle.advance(), &COLORS_FIRE);
    }

    #[test]
    fn custom_cycle_replaces_builtin() {
        let mine = [1, 2, 3, 4, 5, 6];
        let mut cycle = PaletteCycle::custom(vec![mine]);
        assert_eq!(cycle.current(), &mine);
        assert_eq!(cycle.advance(), &mine);
        assert_eq!(PaletteCycle::custom(Vec::new()).current(), &COLORS_GRASS);
    }

    #[test]
    fn block_widths() {
        assert_eq!(BlockWidth::Thick.columns(), 3);
        assert_eq!(BlockWidth::Reg.columns(), 2);
        assert_eq!(BlockWidth::Thin.columns(), 1);
    }
}
