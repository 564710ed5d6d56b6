use std::path::Path;

use tch::{Device, Tensor};

use crate::error::Result;

// ITU-R BT.601 luma weights in 14 bit fixed point, as used by opencv's RGB to GRAY conversion
const LUMA: [u32; 3] = [4899, 9617, 1868];
const LUMA_SHIFT: u32 = 14;

/**
Load an image as a grey level tensor.

The EXIF orientation tag is not applied, so rotated photos are read in their stored orientation.
# Returns
* [H, W] float tensor with integral values in [0, 255]
 */
pub(crate) fn load_grayscale(path: &Path) -> Result<Tensor> {
    let rgb = image::open(path)?.to_rgb8();
    let (width, height) = rgb.dimensions();
    let gray = rgb
        .pixels()
        .map(|px| luma(px.0) as f32)
        .collect::<Vec<f32>>();
    Ok(Tensor::of_slice(&gray).view((height as i64, width as i64)))
}

fn luma([r, g, b]: [u8; 3]) -> u8 {
    let weighted = LUMA[0] * r as u32 + LUMA[1] * g as u32 + LUMA[2] * b as u32;
    ((weighted + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT) as u8
}

/**
Load an image resized to 224x224 and normalized with the imagenet statistics.
# Returns
* [1, 3, 224, 224] float tensor on `device`
 */
pub(crate) fn load_imagenet(path: &Path, device: Device) -> Result<Tensor> {
    let image = tch::vision::imagenet::load_image_and_resize224(path)?;
    Ok(image.unsqueeze(0).to_device(device))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::scratch_dir;
    use image::{Rgb, RgbImage};
    use tch::Kind;

    #[test]
    fn grayscale_uses_bt601_weights() {
        let dir = scratch_dir("grayscale");
        let path = dir.join("red.png");
        let mut img = RgbImage::from_pixel(3, 2, Rgb([255, 0, 0]));
        img.put_pixel(2, 1, Rgb([0, 0, 255]));
        img.save(&path).unwrap();

        let gray = load_grayscale(&path).unwrap();
        assert_eq!(gray.size(), vec![2, 3]);
        assert_eq!(gray.kind(), Kind::Float);
        assert_eq!(gray.double_value(&[0, 0]), 76.0);
        assert_eq!(gray.double_value(&[1, 2]), 29.0);
    }

    #[test]
    fn luma_rounds_in_fixed_point() {
        // 126.504 in floating point, 126 once the weights are quantized
        assert_eq!(luma([1, 215, 0]), 126);
        assert_eq!(luma([0, 0, 0]), 0);
        assert_eq!(luma([255, 255, 255]), 255);
    }

    #[test]
    fn white_stays_in_range() {
        let dir = scratch_dir("grayscale-white");
        let path = dir.join("white.png");
        RgbImage::from_pixel(1, 1, Rgb([255, 255, 255]))
            .save(&path)
            .unwrap();
        let gray = load_grayscale(&path).unwrap();
        assert_eq!(gray.double_value(&[0, 0]), 255.0);
    }

    #[test]
    fn unreadable_image_is_an_error() {
        let dir = scratch_dir("grayscale-bad");
        let path = dir.join("bad.png");
        std::fs::write(&path, b"nope").unwrap();
        assert!(load_grayscale(&path).is_err());
    }
}
