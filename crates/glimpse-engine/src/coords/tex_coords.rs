/// Texture coordinate ranges spanned by a quad.
///
/// `s` runs left to right across the quad, `t` top to bottom. `t` is ignored
/// for 1D textures.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TexCoords {
    pub s: (f32, f32),
    pub t: (f32, f32),
}

impl TexCoords {
    /// Whole texture, row 0 at the top.
    pub const FULL: Self = Self { s: (0.0, 1.0), t: (0.0, 1.0) };

    #[inline]
    pub const fn new(s: (f32, f32), t: (f32, f32)) -> Self {
        Self { s, t }
    }

    /// `[s0, s1, t0, t1]`, the layout used by quad uniforms.
    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.s.0, self.s.1, self.t.0, self.t.1]
    }
}

impl Default for TexCoords {
    fn default() -> Self {
        Self::FULL
    }
}
