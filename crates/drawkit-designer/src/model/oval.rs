use lyon::math::{point, vector, Angle};
use lyon::path::{Path, Winding};

use super::BoxFrame;

/// Ellipse inscribed in the frame, rotated with it.
pub(crate) fn outline(frame: BoxFrame) -> Path {
    let mut builder = Path::builder();
    builder.add_ellipse(
        point(0.0, 0.0),
        vector(frame.half.x as f32, frame.half.y as f32),
        Angle::radians(0.0),
        Winding::Positive,
    );
    builder.build().transformed(&frame.transform())
}
