pub mod formats;

pub use formats::{FrequencyLabel, Pair, Payload, SegmentKey, Stop, StopId};
