use crate::coords::ScreenRect;

use super::backend::OutputDesc;
use super::format::{ColorSpace, PixelFormat};
use super::init::DeviceOptions;

/// Output with the largest overlap with `window`. Ties keep the first seen.
pub(crate) fn containing_output(outputs: &[OutputDesc], window: ScreenRect) -> Option<&OutputDesc> {
    let mut best = None;
    let mut best_area = -1_i64;

    for output in outputs {
        let area = window.intersection_area(output.bounds);
        if area > best_area {
            best = Some(output);
            best_area = area;
        }
    }

    best
}

/// Picks the swap chain color space for the given display and format.
pub(crate) fn choose_color_space(
    options: DeviceOptions,
    display_hdr: bool,
    back_buffer_format: PixelFormat,
) -> ColorSpace {
    if !options.contains(DeviceOptions::ENABLE_HDR) || !display_hdr {
        return ColorSpace::Srgb;
    }

    match back_buffer_format {
        PixelFormat::Rgb10a2Unorm => ColorSpace::Hdr10,
        PixelFormat::Rgba16Float => ColorSpace::ScRgbLinear,
        _ => ColorSpace::Srgb,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(name: &str, x: i32, w: u32, hdr: bool) -> OutputDesc {
        OutputDesc {
            name: name.into(),
            bounds: ScreenRect::from_origin_size(x, 0, w, 1080),
            hdr,
        }
    }

    #[test]
    fn picks_output_with_largest_overlap() {
        let outputs = [output("left", 0, 1920, false), output("right", 1920, 1920, true)];
        // 100 px on the left monitor, 700 px on the right one.
        let window = ScreenRect::from_origin_size(1820, 100, 800, 600);

        assert_eq!(containing_output(&outputs, window).map(|o| o.name.as_str()), Some("right"));
    }

    #[test]
    fn ties_keep_first_seen() {
        let outputs = [output("a", 0, 1000, false), output("b", 1000, 1000, true)];
        let window = ScreenRect::from_origin_size(900, 0, 200, 100);

        assert_eq!(containing_output(&outputs, window).map(|o| o.name.as_str()), Some("a"));
    }

    #[test]
    fn off_screen_window_still_gets_first_output() {
        let outputs = [output("a", 0, 1000, false), output("b", 1000, 1000, false)];
        let window = ScreenRect::from_origin_size(-5000, -5000, 10, 10);

        assert_eq!(containing_output(&outputs, window).map(|o| o.name.as_str()), Some("a"));
    }

    #[test]
    fn no_outputs() {
        assert!(containing_output(&[], ScreenRect::default()).is_none());
    }

    #[test]
    fn hdr_requires_option_display_and_format() {
        let hdr = DeviceOptions::ENABLE_HDR;

        assert_eq!(choose_color_space(hdr, true, PixelFormat::Rgb10a2Unorm), ColorSpace::Hdr10);
        assert_eq!(
            choose_color_space(hdr, true, PixelFormat::Rgba16Float),
            ColorSpace::ScRgbLinear
        );
        assert_eq!(choose_color_space(hdr, true, PixelFormat::Bgra8Unorm), ColorSpace::Srgb);
        assert_eq!(choose_color_space(hdr, false, PixelFormat::Rgb10a2Unorm), ColorSpace::Srgb);
        assert_eq!(
            choose_color_space(DeviceOptions::empty(), true, PixelFormat::Rgb10a2Unorm),
            ColorSpace::Srgb
        );
    }
}
