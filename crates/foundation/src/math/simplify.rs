/// Default squared tolerance in pixels for footprint simplification.
pub const DEFAULT_SQ_TOLERANCE: f64 = 2.0;

fn sq_segment_dist(px: f64, py: f64, ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    let dx = bx - ax;
    let dy = by - ay;
    let (mut cx, mut cy) = (ax, ay);
    if dx != 0.0 || dy != 0.0 {
        let t = ((px - ax) * dx + (py - ay) * dy) / (dx * dx + dy * dy);
        if t > 1.0 {
            cx = bx;
            cy = by;
        } else if t > 0.0 {
            cx += dx * t;
            cy += dy * t;
        }
    }
    let dx = px - cx;
    let dy = py - cy;
    dx * dx + dy * dy
}

/// Douglas-Peucker simplification over a flat `[x0,y0,x1,y1,..]` buffer.
/// The first and last points are always kept, so a closed ring stays
/// closed. Iterative, no recursion.
pub fn simplify_ring(buffer: &[f64], sq_tolerance: f64) -> Vec<f64> {
    let len = buffer.len() / 2;
    if len < 3 {
        return buffer.to_vec();
    }

    let mut markers = vec![false; len];
    markers[0] = true;
    markers[len - 1] = true;

    let mut ranges = vec![(0usize, len - 1)];
    while let Some((first, last)) = ranges.pop() {
        let mut max_sq_dist = 0.0;
        let mut index = first;
        for i in first + 1..last {
            let sq_dist = sq_segment_dist(
                buffer[i * 2],
                buffer[i * 2 + 1],
                buffer[first * 2],
                buffer[first * 2 + 1],
                buffer[last * 2],
                buffer[last * 2 + 1],
            );
            if sq_dist > max_sq_dist {
                index = i;
                max_sq_dist = sq_dist;
            }
        }

        if max_sq_dist > sq_tolerance {
            markers[index] = true;
            ranges.push((first, index));
            ranges.push((index, last));
        }
    }

    let mut out = Vec::new();
    for (i, keep) in markers.iter().enumerate() {
        if *keep {
            out.push(buffer[i * 2]);
            out.push(buffer[i * 2 + 1]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_SQ_TOLERANCE, simplify_ring};

    #[test]
    fn drops_mid_edge_points() {
        // square with a redundant midpoint on each edge
        let ring = [
            0.0, 0.0, 5.0, 0.0, 10.0, 0.0, 10.0, 5.0, 10.0, 10.0, 5.0, 10.0, 0.0, 10.0, 0.0, 5.0,
            0.0, 0.0,
        ];
        let out = simplify_ring(&ring, DEFAULT_SQ_TOLERANCE);
        assert_eq!(
            out,
            vec![0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 10.0, 0.0, 0.0]
        );
    }

    #[test]
    fn keeps_points_beyond_tolerance() {
        let ring = [0.0, 0.0, 5.0, 3.0, 10.0, 0.0];
        let out = simplify_ring(&ring, DEFAULT_SQ_TOLERANCE);
        assert_eq!(out, ring.to_vec());
    }

    #[test]
    fn endpoints_always_survive() {
        let ring = [0.0, 0.0, 1.0, 0.1, 2.0, -0.1, 3.0, 0.0];
        let out = simplify_ring(&ring, DEFAULT_SQ_TOLERANCE);
        assert_eq!(out, vec![0.0, 0.0, 3.0, 0.0]);
    }

    #[test]
    fn idempotent_for_fixed_tolerance() {
        let ring = [
            0.0, 0.0, 1.0, 0.4, 2.3, 0.1, 4.0, 2.0, 5.5, 2.2, 8.0, 0.0, 4.0, -3.0, 0.0, 0.0,
        ];
        let once = simplify_ring(&ring, DEFAULT_SQ_TOLERANCE);
        let twice = simplify_ring(&once, DEFAULT_SQ_TOLERANCE);
        assert_eq!(once, twice);
    }

    #[test]
    fn tiny_inputs_pass_through() {
        assert_eq!(simplify_ring(&[], 2.0), Vec::<f64>::new());
        assert_eq!(simplify_ring(&[1.0, 2.0], 2.0), vec![1.0, 2.0]);
        assert_eq!(
            simplify_ring(&[1.0, 2.0, 3.0, 4.0], 2.0),
            vec![1.0, 2.0, 3.0, 4.0]
        );
    }
}
