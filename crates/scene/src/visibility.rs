use foundation::bounds::Aabb2;

use crate::building::BuildingRecord;

/// Footprint-bounds visibility. Tall bodies lean past their bbox under
/// projection, so this errs towards keeping records whose bounds touch
/// the viewport at all.
pub fn is_visible(record: &BuildingRecord, viewport: &Aabb2) -> bool {
    record.bbox.intersects(viewport)
}
