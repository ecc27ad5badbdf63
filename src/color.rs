//! Mapping of the 32-bit color integrals to 8-bit channels

/// Linear, saturating scale from a color integral to a `u8` channel.
///
/// An integral of `0` maps to `0`, an integral at or above `full_scale` maps
/// to `255`, everything in between is scaled linearly and rounded to nearest.
/// The right full scale depends on gain, integration time and the lighting
/// setup, so it is part of [`Config`](crate::Config) rather than fixed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub struct ColorScaling {
    full_scale: u32,
}

impl ColorScaling {
    /// Scale with `full_scale` mapped to 255. A full scale of 0 is treated as 1.
    pub const fn new(full_scale: u32) -> Self {
        let full_scale = if full_scale == 0 { 1 } else { full_scale };
        Self { full_scale }
    }

    /// Integral value mapped to 255
    pub const fn full_scale(&self) -> u32 {
        self.full_scale
    }

    /// Scale one integral to a channel value
    pub fn scale(&self, integral: u32) -> u8 {
        let full_scale = self.full_scale as u64;
        let clamped = core::cmp::min(integral as u64, full_scale);
        ((clamped * 255 + full_scale / 2) / full_scale) as u8
    }
}

impl Default for ColorScaling {
    /// Full 16-bit ADC range
    fn default() -> Self {
        Self::new(u16::MAX as u32)
    }
}
