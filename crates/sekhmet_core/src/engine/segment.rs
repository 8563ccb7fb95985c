//! Segment processing: filling one lane's share of one slice.
//!
//! A segment is `segment_length` consecutive columns of a single lane. For
//! each column the processor draws a pseudo-random J, maps it to a reference
//! block inside the window of already-finalized memory, and compresses the
//! previous column with that reference. The window arithmetic is what keeps
//! concurrent lanes sound: cross-lane references never reach into the slice
//! currently being written.

use crate::address::AddressGenerator;
use crate::block::fill_block;
use crate::memory::MatrixView;
use crate::params::Variant;

/// Matrix geometry and schedule constants shared by all lane workers.
#[derive(Clone, Copy)]
pub(crate) struct Dimensions {
    pub lanes: u32,
    pub lane_length: u32,
    pub segment_length: u32,
    pub block_count: u32,
    pub passes: u32,
    pub variant: Variant,
}

/// Fill segment `(pass, slice, lane)`.
///
/// Unsafe matrix accesses below are covered by the [`MatrixView`] slice
/// discipline: this worker is the only writer of lane `lane` during the
/// current slice, and every read lands on a block finalized either in an
/// earlier slice or earlier in this very segment.
pub(crate) fn fill_segment(view: &MatrixView<'_>, dims: &Dimensions, pass: u32, slice: u32, lane: u32) {
    let mut generator = AddressGenerator::new(
        dims.variant,
        pass,
        slice,
        lane,
        dims.block_count,
        dims.passes,
    );

    // The first two columns of every lane are seeded from H0.
    let start_index = if pass == 0 && slice == 0 { 2 } else { 0 };

    for index in start_index..dims.segment_length {
        let column = slice * dims.segment_length + index;
        // Wraps only at column 0, which is skipped on pass 0.
        let prev_column = if column == 0 { dims.lane_length - 1 } else { column - 1 };

        let prev_idx = view.index(lane, prev_column);
        let prev_word = unsafe { view.first_word(prev_idx) };
        let j = generator.next(prev_word, index);

        let ref_lane = if pass == 0 && slice == 0 {
            lane
        } else {
            ((j >> 32) % dims.lanes as u64) as u32
        };
        let ref_column = reference_column(dims, pass, slice, index, ref_lane == lane, j as u32);

        let cur_idx = view.index(lane, column);
        let ref_idx = view.index(ref_lane, ref_column);
        // cur_idx never aliases prev_idx or ref_idx: prev is an earlier
        // column (or the lane tail on a wrap), and the reference window
        // excludes the column being written.
        unsafe {
            let prev = view.block(prev_idx);
            let reference = view.block(ref_idx);
            let current = view.block_mut(cur_idx);
            fill_block(prev, reference, current, pass > 0);
        }
    }
}

/// Map J's low word onto a concrete column of the reference lane.
///
/// The candidate window covers every block the current position may legally
/// read; the quadratic mapping `area - 1 - (area * (x^2 / 2^32)) / 2^32`
/// skews selection toward recently written blocks.
pub(crate) fn reference_column(
    dims: &Dimensions,
    pass: u32,
    slice: u32,
    index: u32,
    same_lane: bool,
    j_low: u32,
) -> u32 {
    let (start_position, slice_offset) = if pass == 0 {
        (0, slice * dims.segment_length)
    } else {
        (
            ((slice + 1) * dims.segment_length) % dims.lane_length,
            dims.lane_length - dims.segment_length,
        )
    };

    let reference_area_size = if same_lane {
        // Own lane additionally sees this segment's already-written prefix.
        slice_offset + index - 1
    } else if index == 0 {
        // A foreign lane's latest finalized block is still the previous
        // column's compression input here; exclude it.
        slice_offset - 1
    } else {
        slice_offset
    };

    let x = (j_low as u64 * j_low as u64) >> 32;
    let relative = reference_area_size as u64 - 1 - ((reference_area_size as u64 * x) >> 32);

    ((start_position as u64 + relative) % dims.lane_length as u64) as u32
}
