pub mod domain;
pub mod scale;
pub mod types;
pub mod value;

pub use domain::{
    SeriesDomain, category_domain, continuous_domain, numeric_extent, union_categories,
    union_continuous, widen_degenerate,
};
pub use scale::{BandScale, ContinuousScale, Scale, ScaleKind};
pub use types::{Padding, PixelRange, Viewport};
pub use value::{CategoryKey, Row, as_finite_number, display_value, field_value};
