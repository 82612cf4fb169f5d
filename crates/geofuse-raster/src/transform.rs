//! North-up affine transform between pixel and projected coordinates.

use geofuse_common::BoundingBox;

/// Affine transform restricted to axis-aligned, north-up rasters.
///
/// The origin is the projected coordinate of the raster's top-left corner;
/// rows grow southward, columns grow eastward. Both pixel sizes are stored
/// positive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridTransform {
    /// Projected x of the top-left corner.
    pub origin_x: f64,
    /// Projected y of the top-left corner.
    pub origin_y: f64,
    /// Pixel width in projected units.
    pub pixel_width: f64,
    /// Pixel height in projected units.
    pub pixel_height: f64,
}

impl GridTransform {
    /// Transform mapping a bounding box onto a `width` x `height` pixel grid.
    pub fn from_bounds(bbox: &BoundingBox, width: u32, height: u32) -> Self {
        Self {
            origin_x: bbox.min_x,
            origin_y: bbox.max_y,
            pixel_width: bbox.width() / width as f64,
            pixel_height: bbox.height() / height as f64,
        }
    }

    /// Projected coordinates of a pixel's top-left corner.
    pub fn pixel_to_projected(&self, col: u32, row: u32) -> (f64, f64) {
        (
            self.origin_x + col as f64 * self.pixel_width,
            self.origin_y - row as f64 * self.pixel_height,
        )
    }

    /// The projected rectangle covered by a `width` x `height` grid under
    /// this transform.
    pub fn bounds(&self, width: u32, height: u32) -> BoundingBox {
        BoundingBox {
            min_x: self.origin_x,
            min_y: self.origin_y - height as f64 * self.pixel_height,
            max_x: self.origin_x + width as f64 * self.pixel_width,
            max_y: self.origin_y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_from_bounds_round_trip() {
        let bbox = BoundingBox::new(350_000.0, 5_673_000.0, 351_000.0, 5_674_000.0).unwrap();
        let t = GridTransform::from_bounds(&bbox, 1000, 1000);
        assert_relative_eq!(t.pixel_width, 1.0);
        assert_relative_eq!(t.pixel_height, 1.0);

        let back = t.bounds(1000, 1000);
        assert_relative_eq!(back.min_x, bbox.min_x);
        assert_relative_eq!(back.min_y, bbox.min_y);
        assert_relative_eq!(back.max_x, bbox.max_x);
        assert_relative_eq!(back.max_y, bbox.max_y);
    }

    #[test]
    fn test_pixel_to_projected_is_top_left_corner() {
        let bbox = BoundingBox::new(0.0, 0.0, 100.0, 50.0).unwrap();
        let t = GridTransform::from_bounds(&bbox, 10, 5);

        // Pixel (0, 0) maps to the top-left corner of the box.
        assert_eq!(t.pixel_to_projected(0, 0), (0.0, 50.0));
        // One pixel east/south moves by one pixel size.
        assert_eq!(t.pixel_to_projected(1, 1), (10.0, 40.0));
    }
}
