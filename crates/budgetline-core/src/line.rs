//! Budget-line geometry: orthogonal projection and feasible-segment clipping.

use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// A budget line `x / x_intercept + y / y_intercept = 1`.
///
/// The intercepts are the axis crossings of the line. Their reciprocals act
/// as prices under which every point on the line costs exactly one unit of
/// income. The feasible segment is the part of the line with both
/// coordinates non-negative, i.e. between the two [`endpoints`](Self::endpoints).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetLine {
    pub x_intercept: f64,
    pub y_intercept: f64,
}

/// Result of snapping one observed bundle onto its budget line.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    /// Closest feasible point to the observed bundle.
    pub adjusted: Point2<f64>,
    /// Implied income of the observed bundle at the line's prices.
    pub income_before: f64,
    /// Implied income of the adjusted bundle; 1 up to rounding.
    pub income_after: f64,
    /// Euclidean distance between the observed and adjusted bundles.
    pub abs_delta: f64,
    /// Whether the projection fell off the segment and an endpoint was used.
    pub clipped: bool,
}

impl BudgetLine {
    pub fn new(x_intercept: f64, y_intercept: f64) -> Self {
        Self {
            x_intercept,
            y_intercept,
        }
    }

    /// Price vector: reciprocals of the intercepts.
    #[inline]
    pub fn prices(&self) -> Vector2<f64> {
        Vector2::new(1.0 / self.x_intercept, 1.0 / self.y_intercept)
    }

    /// Implied income of `bundle` at this line's prices.
    #[inline]
    pub fn income(&self, bundle: Point2<f64>) -> f64 {
        let prices = self.prices();
        prices.x * bundle.x + prices.y * bundle.y
    }

    /// Segment endpoints `(0, y_intercept)` and `(x_intercept, 0)`.
    #[inline]
    pub fn endpoints(&self) -> [Point2<f64>; 2] {
        [
            Point2::new(0.0, self.y_intercept),
            Point2::new(self.x_intercept, 0.0),
        ]
    }

    /// Orthogonal projection of `bundle` onto the infinite line.
    pub fn project(&self, bundle: Point2<f64>) -> Point2<f64> {
        let prices = self.prices();
        let lambda = (self.income(bundle) - 1.0) / prices.norm_squared();
        Point2::new(bundle.x - lambda * prices.x, bundle.y - lambda * prices.y)
    }

    /// Whether `point` lies within the axis-aligned box spanned by the
    /// intercepts. For points on the line this is exactly the feasible
    /// segment.
    #[inline]
    pub fn is_feasible(&self, point: Point2<f64>) -> bool {
        point.x >= 0.0
            && point.x <= self.x_intercept
            && point.y >= 0.0
            && point.y <= self.y_intercept
    }

    /// Segment endpoint nearest to `bundle`.
    ///
    /// An exact tie selects `(0, y_intercept)`.
    pub fn nearest_endpoint(&self, bundle: Point2<f64>) -> Point2<f64> {
        let [first, second] = self.endpoints();
        let d1 = (bundle - first).norm_squared();
        let d2 = (bundle - second).norm_squared();
        if d1 <= d2 {
            first
        } else {
            second
        }
    }

    /// Snap `bundle` to the closest point on the feasible segment.
    ///
    /// The orthogonal projection minimizes Euclidean distance among all
    /// points with implied income 1. When it falls outside the segment, the
    /// endpoint nearest to the *observed* bundle is used instead: the goal
    /// is the closest feasible point to what was actually recorded, not to
    /// the infeasible projection.
    pub fn snap(&self, bundle: Point2<f64>) -> Adjustment {
        let income_before = self.income(bundle);
        let projected = self.project(bundle);

        let (adjusted, clipped) = if self.is_feasible(projected) {
            (projected, false)
        } else {
            (self.nearest_endpoint(bundle), true)
        };

        Adjustment {
            adjusted,
            income_before,
            income_after: self.income(adjusted),
            abs_delta: (adjusted.x - bundle.x).hypot(adjusted.y - bundle.y),
            clipped,
        }
    }
}
