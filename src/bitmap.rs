//! Output buffers for generated distance fields.

/// Which distance a field stores, and hence how many channels it needs.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum DistanceMode {
    /// True signed distance, one channel.
    True,
    /// Signed pseudo-distance, one channel.
    Pseudo,
    /// Per-channel pseudo-distances of the colored edges.
    #[default]
    Multi,
    /// [`DistanceMode::Multi`] plus the true distance in a fourth channel.
    MultiAndTrue,
}

impl DistanceMode {
    pub fn channels(self) -> usize {
        match self {
            DistanceMode::True | DistanceMode::Pseudo => 1,
            DistanceMode::Multi => 3,
            DistanceMode::MultiAndTrue => 4,
        }
    }
}

/// A row-major grid of `f32` samples, `channels` per pixel. Row 0 is the
/// bottom row unless the shape has an inverted y axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<f32>,
}

impl Bitmap {
    pub fn new(width: usize, height: usize, channels: usize) -> Self {
        Self {
            width,
            height,
            channels,
            data: vec![0.0; width * height * channels],
        }
    }

    /// A bitmap with as many channels as `mode` fills.
    pub fn for_mode(width: usize, height: usize, mode: DistanceMode) -> Self {
        Self::new(width, height, mode.channels())
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// The samples of pixel (`x`, `y`).
    ///
    /// Panics when the pixel is out of bounds.
    pub fn pixel(&self, x: usize, y: usize) -> &[f32] {
        let start = self.offset(x, y);
        &self.data[start..start + self.channels]
    }

    pub fn pixel_mut(&mut self, x: usize, y: usize) -> &mut [f32] {
        let start = self.offset(x, y);
        &mut self.data[start..start + self.channels]
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        assert!(x < self.width && y < self.height, "pixel ({}, {}) out of bounds", x, y);
        (y * self.width + x) * self.channels
    }

    /// Converts every sample to a byte, clamping `map(sample) * 255`.
    pub fn to_bytes(&self, map: impl Fn(f32) -> f32) -> Vec<u8> {
        self.data
            .iter()
            .map(|&v| (map(v) * 255.0).round().clamp(0.0, 255.0) as u8)
            .collect()
    }
}

/// Maps distances in `-range / 2 ..= range / 2` onto `0..=1`, so the edge
/// lands on one half.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceMapping {
    pub range: f32,
}

impl DistanceMapping {
    pub fn new(range: f32) -> Self {
        Self { range }
    }

    pub fn map(&self, distance: f32) -> f32 {
        distance / self.range + 0.5
    }
}
