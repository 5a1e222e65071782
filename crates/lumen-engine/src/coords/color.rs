/// Linear RGBA color.
///
/// Values are in linear space; sRGB encoding happens in the render target view
/// when the back buffer uses an sRGB format.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ColorRgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl ColorRgba {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn black() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    /// Classic "nothing drawn yet" clear color.
    #[inline]
    pub const fn cornflower_blue() -> Self {
        Self::new(0.392, 0.584, 0.929, 1.0)
    }

    /// Component-wise interpolation; `t` is clamped to `[0, 1]`.
    #[inline]
    pub fn lerp(self, other: ColorRgba, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }
}
