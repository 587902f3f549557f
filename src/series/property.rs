use serde::{Deserialize, Serialize};

use crate::api::{InvalidationMask, InvalidationTopic};

/// Series inputs a caller (or the chart) can change.
///
/// Each property maps to the cheapest pass that makes the change visible:
/// anything that alters *what* is plotted re-enters the data phase, anything
/// that only alters *how* it is drawn re-enters the render phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeriesProperty {
    Data,
    XField,
    YField,
    XFieldName,
    YFieldName,
    Title,
    Fill,
    Stroke,
    StrokeWidth,
    Visible,
    Marker,
    HighlightStyle,
    /// Highlighted node moved into or out of this series.
    Highlight,
    TooltipEnabled,
    TooltipRenderer,
    /// Attached to or detached from a chart, or the chart replaced an axis.
    Attachment,
    /// The chart changed a scale domain or range.
    Scales,
}

impl SeriesProperty {
    #[must_use]
    pub const fn invalidation(self) -> InvalidationMask {
        match self {
            Self::Data => InvalidationMask::data(InvalidationTopic::Data),
            Self::XField | Self::YField => InvalidationMask::data(InvalidationTopic::Fields),
            Self::Attachment => InvalidationMask::data(InvalidationTopic::Attachment),
            Self::XFieldName | Self::YFieldName | Self::Title => {
                InvalidationMask::render(InvalidationTopic::Fields)
            }
            Self::Fill | Self::Stroke | Self::StrokeWidth => {
                InvalidationMask::render(InvalidationTopic::Style)
            }
            Self::Visible => InvalidationMask::render(InvalidationTopic::Visibility),
            Self::Marker => InvalidationMask::render(InvalidationTopic::Marker),
            Self::HighlightStyle | Self::Highlight => {
                InvalidationMask::render(InvalidationTopic::Highlight)
            }
            Self::Scales => InvalidationMask::render(InvalidationTopic::Layout),
            Self::TooltipEnabled | Self::TooltipRenderer => InvalidationMask::none(),
        }
    }
}
