//! Segment partitioning and display labelling

mod palette;
mod partition;

pub use palette::{PaletteEntry, SegmentPalette, BASELINE_COLOR, FALLBACK_COLOR};
pub use partition::{partition, Dimension, DimensionSelection, PartitionRequest, Segment, BASELINE_LABEL};
