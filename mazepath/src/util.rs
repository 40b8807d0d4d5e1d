use std::path::Path;

use anyhow::Context;
use image::DynamicImage;
use log::info;

use crate::GridMap;

/// Classify every pixel of a decoded image. Images with alpha or a single gray
/// channel are converted to RGB first, so only true black ends up as a wall.
pub fn parse_img(img: &DynamicImage) -> Result<GridMap, anyhow::Error> {
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();

    let map = GridMap::from_pixels(width as usize, height as usize, |x, y| {
        *rgb.get_pixel(x as u32, y as u32)
    })?;

    Ok(map)
}

pub fn load_map(path: impl AsRef<Path>) -> Result<GridMap, anyhow::Error> {
    let path = path.as_ref();
    let img = image::open(path).with_context(|| format!("failed to open {}", path.display()))?;

    let map = parse_img(&img).with_context(|| format!("failed to parse {}", path.display()))?;
    info!(
        "loaded {}x{} maze from {}",
        map.width(),
        map.height(),
        path.display()
    );

    Ok(map)
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::{shortest_path, MapTrait, Point};
    use image::{GrayImage, Luma, Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_parse_rgb() {
        let mut img = RgbImage::from_pixel(4, 3, Rgb([255, 255, 255]));
        img.put_pixel(1, 0, Rgb([0, 0, 0]));
        img.put_pixel(1, 1, Rgb([0, 0, 0]));
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(3, 0, Rgb([0, 0, 255]));

        let map = parse_img(&DynamicImage::ImageRgb8(img)).unwrap();
        assert_eq!(map.width(), 4);
        assert_eq!(map.height(), 3);
        assert_eq!(map.to_string(), " X  \n X  \n    \n");

        // the colored markers are open, the path has to go under the wall
        let result = shortest_path(&map, Point::new(0, 0), Point::new(3, 0))
            .unwrap()
            .unwrap();
        assert_eq!(result.distance, 7);
    }

    #[test]
    fn test_parse_gray_and_alpha() {
        let mut gray = GrayImage::from_pixel(2, 2, Luma([200]));
        gray.put_pixel(0, 1, Luma([0]));
        gray.put_pixel(1, 1, Luma([1]));
        let map = parse_img(&DynamicImage::ImageLuma8(gray)).unwrap();
        assert!(!map.is_passable(Point::new(0, 1)));
        assert!(map.is_passable(Point::new(1, 1)));

        // alpha is ignored, black with any opacity is a wall
        let mut rgba = RgbaImage::from_pixel(2, 1, Rgba([255, 255, 255, 255]));
        rgba.put_pixel(1, 0, Rgba([0, 0, 0, 10]));
        let map = parse_img(&DynamicImage::ImageRgba8(rgba)).unwrap();
        assert!(map.is_passable(Point::new(0, 0)));
        assert!(!map.is_passable(Point::new(1, 0)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_map("does/not/exist.png").unwrap_err();
        assert!(err.to_string().contains("does/not/exist.png"));
    }
}
