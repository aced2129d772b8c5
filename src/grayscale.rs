use image::{GrayImage, Luma, RgbImage};

/// Maps one color pixel to an intensity.
pub trait GrayscaleConversion {
    /// Returns the intensity of one pixel.
    fn apply(&self, red: u8, green: u8, blue: u8) -> u8;
}

impl<F> GrayscaleConversion for F
where
    F: Fn(u8, u8, u8) -> u8,
{
    fn apply(&self, red: u8, green: u8, blue: u8) -> u8 {
        self(red, green, blue)
    }
}

/// ITU-R BT.601 luma weights.
#[derive(Copy, Clone, Debug, Default)]
pub struct Luminance;

impl GrayscaleConversion for Luminance {
    fn apply(&self, red: u8, green: u8, blue: u8) -> u8 {
        let y = 0.299 * f64::from(red) + 0.587 * f64::from(green) + 0.114 * f64::from(blue);
        y.round().min(255.0) as u8
    }
}

/// Unweighted mean of the three channels.
#[derive(Copy, Clone, Debug, Default)]
pub struct Average;

impl GrayscaleConversion for Average {
    fn apply(&self, red: u8, green: u8, blue: u8) -> u8 {
        ((u16::from(red) + u16::from(green) + u16::from(blue)) / 3) as u8
    }
}

/// Converts a color image pixel by pixel.
pub fn to_grayscale<C>(image: &RgbImage, conversion: &C) -> GrayImage
where
    C: GrayscaleConversion + ?Sized,
{
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b] = image.get_pixel(x, y).0;
        Luma([conversion.apply(r, g, b)])
    })
}
