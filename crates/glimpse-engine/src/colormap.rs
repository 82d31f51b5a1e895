//! Color lookup tables.
//!
//! A [`Colormap`] is the CPU side of a slice's LUT texture: an ordered list of
//! linear RGB entries in `[0, 1]`, uploaded as a 1D three-channel texture.

use crate::array::Array;
use crate::error::{InvalidInput, Result};

/// Entry count of the default grayscale ramp.
pub const DEFAULT_LUT_SIZE: usize = 512;

/// Ordered RGB lookup table with at least two entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    entries: Vec<[f32; 3]>,
}

impl Colormap {
    /// Linear black-to-white ramp with `n` entries.
    pub fn grayscale(n: usize) -> Result<Self> {
        check_len(n)?;
        Ok(Self { entries: gray_ramp(n) })
    }

    /// Uses `entries` as-is. Components must be finite.
    pub fn from_rgb(entries: Vec<[f32; 3]>) -> Result<Self> {
        check_len(entries.len())?;
        if entries.iter().flatten().any(|c| !c.is_finite()) {
            return Err(InvalidInput::Colormap("non-finite component".to_string()));
        }
        Ok(Self { entries })
    }

    /// Resamples evenly spaced 8-bit `colors` into `n` linearly interpolated entries.
    pub fn from_colors(colors: &[[u8; 3]], n: usize) -> Result<Self> {
        check_len(n)?;
        if colors.len() < 2 {
            return Err(InvalidInput::Colormap(format!(
                "{} color stops given, at least 2 required",
                colors.len()
            )));
        }

        let segments = colors.len() - 1;
        let entries = (0..n)
            .map(|i| {
                let t = i as f32 / (n - 1) as f32;
                let segment = ((t * segments as f32).floor() as usize).min(segments - 1);
                let local = t * segments as f32 - segment as f32;
                lerp_u8(colors[segment], colors[segment + 1], local)
            })
            .collect();
        Ok(Self { entries })
    }

    /// Black, dark red, red, orange, yellow, white.
    pub fn heat() -> Self {
        Self::preset(&[
            [0, 0, 0],
            [128, 0, 0],
            [255, 0, 0],
            [255, 128, 0],
            [255, 255, 0],
            [255, 255, 255],
        ])
    }

    /// Perceptually uniform purple-to-yellow.
    pub fn viridis() -> Self {
        Self::preset(&[
            [68, 1, 84],
            [59, 82, 139],
            [33, 145, 140],
            [94, 201, 98],
            [253, 231, 37],
        ])
    }

    /// Perceptually uniform black-to-cream.
    pub fn magma() -> Self {
        Self::preset(&[
            [0, 0, 4],
            [81, 18, 124],
            [183, 55, 121],
            [252, 137, 97],
            [252, 253, 191],
        ])
    }

    fn preset(colors: &[[u8; 3]]) -> Self {
        Self::from_colors(colors, DEFAULT_LUT_SIZE).expect("presets have at least two stops")
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; a colormap has at least two entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn entries(&self) -> &[[f32; 3]] {
        &self.entries
    }

    /// The `(n, 3)` float array uploaded as the LUT texture.
    pub fn to_array(&self) -> Array {
        let data: Vec<f32> = self.entries.iter().flatten().copied().collect();
        Array::new(vec![self.entries.len(), 3], data)
            .expect("entry count matches shape by construction")
    }
}

impl Default for Colormap {
    fn default() -> Self {
        Self { entries: gray_ramp(DEFAULT_LUT_SIZE) }
    }
}

fn check_len(n: usize) -> Result<()> {
    if n < 2 {
        return Err(InvalidInput::Colormap(format!(
            "{n} entries given, at least 2 required"
        )));
    }
    Ok(())
}

fn gray_ramp(n: usize) -> Vec<[f32; 3]> {
    (0..n)
        .map(|i| {
            let v = i as f32 / (n - 1) as f32;
            [v, v, v]
        })
        .collect()
}

fn lerp_u8(a: [u8; 3], b: [u8; 3], t: f32) -> [f32; 3] {
    let mut out = [0.0; 3];
    for (o, (&x, &y)) in out.iter_mut().zip(a.iter().zip(b.iter())) {
        let (x, y) = (x as f32 / 255.0, y as f32 / 255.0);
        *o = x + (y - x) * t;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::{resolve, TextureKind};

    #[test]
    fn default_is_512_entry_gray_ramp() {
        let map = Colormap::default();
        assert_eq!(map.len(), 512);
        assert_eq!(map.entries()[0], [0.0, 0.0, 0.0]);
        assert_eq!(map.entries()[511], [1.0, 1.0, 1.0]);
        let mid = map.entries()[256][0];
        assert!((mid - 256.0 / 511.0).abs() < 1e-6);
        assert_eq!(map, Colormap::grayscale(512).unwrap());
    }

    #[test]
    fn too_short_is_rejected() {
        assert!(Colormap::grayscale(1).is_err());
        assert!(Colormap::from_rgb(vec![[0.0; 3]]).is_err());
        assert!(Colormap::from_colors(&[[0, 0, 0]], 16).is_err());
    }

    #[test]
    fn non_finite_entries_are_rejected() {
        let err = Colormap::from_rgb(vec![[0.0; 3], [f32::NAN, 0.0, 0.0]]).unwrap_err();
        assert!(matches!(err, InvalidInput::Colormap(_)));
    }

    #[test]
    fn from_colors_hits_stops_at_ends() {
        let map = Colormap::from_colors(&[[0, 0, 0], [255, 0, 255]], 3).unwrap();
        assert_eq!(map.entries()[0], [0.0, 0.0, 0.0]);
        assert_eq!(map.entries()[1], [0.5, 0.0, 0.5]);
        assert_eq!(map.entries()[2], [1.0, 0.0, 1.0]);
    }

    #[test]
    fn presets_are_full_size() {
        for map in [Colormap::heat(), Colormap::viridis(), Colormap::magma()] {
            assert_eq!(map.len(), DEFAULT_LUT_SIZE);
        }
        assert_eq!(Colormap::heat().entries()[511], [1.0, 1.0, 1.0]);
    }

    #[test]
    fn lut_array_resolves_to_rgb_strip() {
        let array = Colormap::default().to_array();
        assert_eq!(array.shape(), &[512, 3]);
        let f = resolve(array.shape(), None, Some(TextureKind::OneD)).unwrap();
        assert_eq!((f.width, f.channels), (512, 3));
    }
}
