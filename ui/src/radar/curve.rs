//! Closed path generators for the series outlines.

use super::geometry::Point;

/// Catmull-Rom style control point factor for a cardinal spline with
/// tension 0: `(1 - tension) / 6`.
const CARDINAL_K: f64 = 1.0 / 6.0;

/// Compact number formatting for path data and attributes: at most three
/// decimals, no trailing zeros, never `-0`.
pub fn num(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = (value * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    let text = format!("{rounded:.3}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    text.to_string()
}

fn point(p: Point) -> String {
    format!("{},{}", num(p.x), num(p.y))
}

/// `M p0 L p1 … Z`
pub fn linear_closed(points: &[Point]) -> String {
    let Some((first, rest)) = points.split_first() else {
        return String::new();
    };
    let mut path = format!("M{}", point(*first));
    for p in rest {
        path.push('L');
        path.push_str(&point(*p));
    }
    path.push('Z');
    path
}

/// Smooth closed curve through every point, one cubic segment per edge.
pub fn cardinal_closed(points: &[Point]) -> String {
    let n = points.len();
    match n {
        0 => return String::new(),
        1 | 2 => return linear_closed(points),
        _ => {}
    }

    let at = |i: isize| points[i.rem_euclid(n as isize) as usize];
    let mut path = format!("M{}", point(points[0]));
    for i in 0..n as isize {
        let p0 = at(i - 1);
        let p1 = at(i);
        let p2 = at(i + 1);
        let p3 = at(i + 2);
        let c1 = Point::new(p1.x + (p2.x - p0.x) * CARDINAL_K, p1.y + (p2.y - p0.y) * CARDINAL_K);
        let c2 = Point::new(p2.x - (p3.x - p1.x) * CARDINAL_K, p2.y - (p3.y - p1.y) * CARDINAL_K);
        path.push_str(&format!("C{},{},{}", point(c1), point(c2), point(p2)));
    }
    path.push('Z');
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Vec<Point> {
        vec![Point::new(0.0, -10.0), Point::new(8.66, 5.0), Point::new(-8.66, 5.0)]
    }

    #[test]
    fn num_trims_and_rounds() {
        assert_eq!(num(1.0), "1");
        assert_eq!(num(-0.0001), "0");
        assert_eq!(num(2.50049), "2.5");
        assert_eq!(num(-3.14159), "-3.142");
        assert_eq!(num(f64::NAN), "0");
    }

    #[test]
    fn linear_path_visits_every_vertex() {
        let path = linear_closed(&triangle());
        assert_eq!(path, "M0,-10L8.66,5L-8.66,5Z");
    }

    #[test]
    fn cardinal_path_has_one_segment_per_edge() {
        let path = cardinal_closed(&triangle());
        assert!(path.starts_with("M0,-10C"));
        assert!(path.ends_with('Z'));
        assert_eq!(path.matches('C').count(), 3);
        assert!(path.contains(",8.66,5C"));
    }

    #[test]
    fn empty_input_gives_empty_path() {
        assert!(linear_closed(&[]).is_empty());
        assert!(cardinal_closed(&[]).is_empty());
    }
}
