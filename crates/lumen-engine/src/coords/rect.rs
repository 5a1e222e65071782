/// Axis-aligned rectangle in desktop pixels (top-left origin).
///
/// `right` and `bottom` are exclusive, so a rect spans `right - left` columns.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct ScreenRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ScreenRect {
    #[inline]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    #[inline]
    pub const fn from_origin_size(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self::new(
            x,
            y,
            x.saturating_add(saturating_extent(width)),
            y.saturating_add(saturating_extent(height)),
        )
    }

    #[inline]
    pub fn width(self) -> i64 {
        (self.right as i64 - self.left as i64).max(0)
    }

    #[inline]
    pub fn height(self) -> i64 {
        (self.bottom as i64 - self.top as i64).max(0)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Area shared with `other`; zero when disjoint or only touching.
    #[inline]
    pub fn intersection_area(self, other: ScreenRect) -> i64 {
        let w = self.right.min(other.right) as i64 - self.left.max(other.left) as i64;
        let h = self.bottom.min(other.bottom) as i64 - self.top.max(other.top) as i64;
        w.max(0) * h.max(0)
    }
}

/// `len` as a signed extent, pinned at `i32::MAX`.
const fn saturating_extent(len: u32) -> i32 {
    if len > i32::MAX as u32 {
        i32::MAX
    } else {
        len as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: i32, y: i32, w: u32, h: u32) -> ScreenRect {
        ScreenRect::from_origin_size(x, y, w, h)
    }

    #[test]
    fn from_origin_size_sets_exclusive_edges() {
        let rect = r(10, 20, 30, 40);
        assert_eq!(rect, ScreenRect::new(10, 20, 40, 60));
        assert_eq!(rect.width(), 30);
        assert_eq!(rect.height(), 40);
    }

    #[test]
    fn huge_sizes_saturate_instead_of_wrapping() {
        let rect = r(0, 0, u32::MAX, 1);
        assert_eq!(rect.right, i32::MAX);
        assert_eq!(rect.width(), i32::MAX as i64);
        assert!(!rect.is_empty());

        let shifted = r(100, -5, 3_000_000_000, 10);
        assert_eq!(shifted.right, i32::MAX);
        assert_eq!(shifted.bottom, 5);
    }

    #[test]
    fn inverted_rect_is_empty() {
        assert!(ScreenRect::new(10, 0, 5, 10).is_empty());
        assert!(!r(0, 0, 1, 1).is_empty());
    }

    #[test]
    fn intersection_of_overlapping_rects() {
        assert_eq!(r(0, 0, 10, 10).intersection_area(r(5, 5, 10, 10)), 25);
    }

    #[test]
    fn intersection_of_contained_rect_is_its_area() {
        assert_eq!(r(0, 0, 100, 100).intersection_area(r(10, 10, 20, 20)), 400);
    }

    #[test]
    fn touching_edges_share_no_area() {
        assert_eq!(r(0, 0, 10, 10).intersection_area(r(10, 0, 10, 10)), 0);
    }

    #[test]
    fn disjoint_rects_share_no_area() {
        assert_eq!(r(0, 0, 5, 5).intersection_area(r(20, 20, 5, 5)), 0);
    }

    #[test]
    fn negative_desktop_coordinates() {
        // Monitor left of the primary display.
        let left_monitor = r(-1920, 0, 1920, 1080);
        let window = r(-100, 100, 300, 200);
        assert_eq!(left_monitor.intersection_area(window), 100 * 200);
    }
}
