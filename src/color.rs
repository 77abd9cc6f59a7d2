//! Edge colors: which of the three channels an edge contributes to.

bitflags::bitflags! {
    /// Represents the color channels affected by the edge
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct EdgeColor: u8 {
        const BLACK = 0b000;
        const RED = 0b001;
        const GREEN = 0b010;
        const YELLOW = 0b011;
        const BLUE = 0b100;
        const MAGENTA = 0b101;
        const CYAN = 0b110;
        const WHITE = 0b111;
    }
}

impl Default for EdgeColor {
    fn default() -> Self {
        EdgeColor::WHITE
    }
}

impl EdgeColor {
    const START: [EdgeColor; 3] = [EdgeColor::CYAN, EdgeColor::MAGENTA, EdgeColor::YELLOW];

    /// Picks a different color, advancing `seed`.
    ///
    /// If `self & banned` is a single primary, the result is its complement.
    /// Black and white become one of cyan, magenta or yellow. Anything else
    /// has its bits rotated by one or two places.
    pub fn switch_color(self, seed: &mut u64, banned: EdgeColor) -> Self {
        let combined = self & banned;
        if combined == EdgeColor::RED || combined == EdgeColor::GREEN || combined == EdgeColor::BLUE
        {
            return combined ^ EdgeColor::WHITE;
        }

        if self == EdgeColor::BLACK || self == EdgeColor::WHITE {
            let tr = Self::START[(*seed % 3) as usize];
            *seed /= 3;
            return tr;
        }

        let shifted = (self.bits() as u32) << (1 + (*seed & 1));
        *seed >>= 1;
        Self::from_bits_truncate(((shifted | (shifted >> 3)) & 0b111) as u8)
    }

    /// [`switch_color`](Self::switch_color) without a banned color.
    pub fn switch(self, seed: &mut u64) -> Self {
        self.switch_color(seed, EdgeColor::BLACK)
    }

    /// Whether this color feeds the given channel (0 = red, 1 = green, 2 = blue).
    #[inline]
    pub fn has_channel(self, channel: usize) -> bool {
        self.bits() & (1 << channel) != 0
    }

    pub fn float_color(self) -> [f32; 3] {
        [
            self.has_channel(0) as u8 as f32,
            self.has_channel(1) as u8 as f32,
            self.has_channel(2) as u8 as f32,
        ]
    }
}
