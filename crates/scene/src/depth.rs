use std::cmp::Ordering;

use foundation::math::{Vec2, precision::stable_total_cmp_f64};

use crate::building::BuildingRecord;

/// Painter ordering for the building and hit passes.
///
/// Ordering contract:
/// - ascending `min_height`, so ground-level bodies paint under perched ones
/// - then descending squared distance from the camera footpoint, far to near
/// - then descending `height`
/// - then ascending `id`, so the order is independent of insertion order
pub fn painter_cmp(a: &BuildingRecord, b: &BuildingRecord, sort_cam: Vec2) -> Ordering {
    stable_total_cmp_f64(a.min_height, b.min_height)
        .then_with(|| {
            stable_total_cmp_f64(b.center.sq_dist(sort_cam), a.center.sq_dist(sort_cam))
        })
        .then_with(|| stable_total_cmp_f64(b.height, a.height))
        .then_with(|| a.id.cmp(&b.id))
}

pub fn sort_for_painter(records: &mut [&BuildingRecord], sort_cam: Vec2) {
    records.sort_by(|a, b| painter_cmp(a, b, sort_cam));
}
