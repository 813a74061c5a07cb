use log::*;
use std::collections::BTreeSet;
use track_core::{FrameIndex, FramePair};

/// Lists the frame pairs to link, ordered by source frame and then by target frame.
///
/// `frames` must be ascending. A pair is included if neither frame is excluded and the
/// target frame is at most `max_interval` after the source frame.
pub fn generate_frame_pairs(
    frames: &[FrameIndex],
    excluded: &BTreeSet<FrameIndex>,
    max_interval: usize,
) -> Vec<FramePair> {
    let frames: Vec<FrameIndex> = frames
        .iter()
        .copied()
        .filter(|frame| !excluded.contains(frame))
        .collect();
    let mut pairs = vec![];
    for (i, &source) in frames.iter().enumerate() {
        for &target in frames[i + 1..]
            .iter()
            .take_while(|&&target| target - source <= max_interval)
        {
            let pair = FramePair { source, target };
            debug!("adding frame pair {}", pair);
            pairs.push(pair);
        }
    }
    pairs
}
