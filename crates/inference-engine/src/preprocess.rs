//! Image preprocessing: resize, scale to [0,1], add batch dimension

use image_source::ClassifiedImage;
use tract_onnx::prelude::*;

use crate::config::{ModelConfig, TensorLayout};

/// Single-image batch with values in [0,1]
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTensor {
    array: tract_ndarray::Array4<f32>,
}

impl NormalizedTensor {
    /// All-zero (black) tensor of the configured shape
    pub fn zeros(config: &ModelConfig) -> Self {
        let [n, a, b, c] = config.input_shape();
        Self {
            array: tract_ndarray::Array4::zeros((n, a, b, c)),
        }
    }

    /// Tensor shape, batch dimension first
    pub fn shape(&self) -> &[usize] {
        self.array.shape()
    }

    /// Iterate all values in logical order
    pub fn values(&self) -> impl Iterator<Item = f32> + '_ {
        self.array.iter().copied()
    }

    /// Copy into a tract tensor for the model runtime
    pub fn to_tensor(&self) -> Tensor {
        self.array.clone().into_tensor()
    }
}

/// Scale 8-bit RGB values to [0,1] and add a batch dimension of 1.
///
/// The image is used at its current size; callers resize first.
pub fn normalize(image: &ClassifiedImage, layout: TensorLayout) -> NormalizedTensor {
    let rgb = image.pixels();
    let (w, h) = (rgb.width() as usize, rgb.height() as usize);

    let array = match layout {
        TensorLayout::Nhwc => tract_ndarray::Array4::from_shape_fn((1, h, w, 3), |(_, y, x, c)| {
            rgb.get_pixel(x as u32, y as u32)[c] as f32 / 255.0
        }),
        TensorLayout::Nchw => tract_ndarray::Array4::from_shape_fn((1, 3, h, w), |(_, c, y, x)| {
            rgb.get_pixel(x as u32, y as u32)[c] as f32 / 255.0
        }),
    };

    NormalizedTensor { array }
}

/// Resize to the model input size and normalize
pub fn preprocess(image: &ClassifiedImage, config: &ModelConfig) -> NormalizedTensor {
    let resized = image.resize_exact(
        config.input_width,
        config.input_height,
        config.resize_filter.filter_type(),
    );
    normalize(&resized, config.layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use image_source::ImageSource;
    use proptest::prelude::*;

    fn config() -> ModelConfig {
        ModelConfig::new("unused.onnx", vec!["a".into(), "b".into()])
    }

    fn solid(width: u32, height: u32, rgb: [u8; 3]) -> ClassifiedImage {
        ClassifiedImage::from_rgb(RgbImage::from_pixel(width, height, Rgb(rgb)), ImageSource::Upload)
            .unwrap()
    }

    #[test]
    fn test_nhwc_shape_and_values() {
        let tensor = preprocess(&solid(100, 50, [255, 0, 128]), &config());
        assert_eq!(tensor.shape(), &[1, 224, 224, 3]);

        let values: Vec<f32> = tensor.values().take(3).collect();
        assert_eq!(values[0], 1.0);
        assert_eq!(values[1], 0.0);
        assert!((values[2] - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_nchw_layout() {
        let mut config = config();
        config.layout = TensorLayout::Nchw;

        let tensor = preprocess(&solid(10, 10, [255, 0, 0]), &config);
        assert_eq!(tensor.shape(), &[1, 3, 224, 224]);

        let plane = 224 * 224;
        let values: Vec<f32> = tensor.values().collect();
        assert_eq!(values[0], 1.0);
        assert_eq!(values[plane], 0.0);
        assert_eq!(values[2 * plane], 0.0);
    }

    #[test]
    fn test_pixel_position_preserved() {
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(1, 0, Rgb([255, 255, 255]));
        let img = ClassifiedImage::from_rgb(img, ImageSource::Upload).unwrap();

        let tensor = normalize(&img, TensorLayout::Nhwc);
        let values: Vec<f32> = tensor.values().collect();
        // (y=0, x=1) starts at offset 3
        assert_eq!(&values[0..6], &[0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_zeros_matches_config_shape() {
        let tensor = NormalizedTensor::zeros(&config());
        assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
        assert!(tensor.values().all(|v| v == 0.0));
        assert_eq!(tensor.to_tensor().shape(), &[1, 224, 224, 3]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_values_in_unit_range(
            w in 1u32..64,
            h in 1u32..64,
            seed in any::<u64>(),
        ) {
            let img = RgbImage::from_fn(w, h, |x, y| {
                let v = seed.wrapping_mul(31).wrapping_add((x * 7 + y * 13) as u64);
                Rgb([v as u8, (v >> 8) as u8, (v >> 16) as u8])
            });
            let img = ClassifiedImage::from_rgb(img, ImageSource::Camera).unwrap();

            let tensor = preprocess(&img, &config());
            prop_assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
            prop_assert!(tensor.values().all(|v| (0.0..=1.0).contains(&v)));
        }
    }
}
