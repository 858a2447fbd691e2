//! Structured validation of the tiling invariants.
//!
//! The engine keeps cover and no-overlap true by construction; the report
//! exists for the post-commit re-validation pass in size-range mode, for
//! snapshot restore, and for tests.

use serde::{Deserialize, Serialize};
use tessera_core::geometry::{Rect, Size, bounding_box};

use crate::registry::RegionId;

/// Severity for one invariant finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvariantSeverity {
    Error,
    Warning,
}

/// Stable code for invariant findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvariantCode {
    /// The union of region bounds is not the container rectangle.
    CoverMismatch,
    /// Two regions share area.
    Overlap,
    /// A region pokes outside the container.
    OutOfBounds,
    /// A region is below its minimum size.
    BelowMinimum,
    /// A region is above its (advisory) maximum size.
    AboveMaximum,
}

/// One actionable invariant finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvariantIssue {
    pub code: InvariantCode,
    pub severity: InvariantSeverity,
    pub region: Option<RegionId>,
    pub related_region: Option<RegionId>,
    pub message: String,
}

/// Structured invariant report over one container state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InvariantReport {
    pub issues: Vec<InvariantIssue>,
    /// Whether minimum sizes could not all be met because the container is
    /// too small for them.
    pub container_too_small: bool,
}

impl InvariantReport {
    /// Return true if any error-level finding exists.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.issues
            .iter()
            .any(|issue| issue.severity == InvariantSeverity::Error)
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Findings with a given code.
    pub fn with_code(&self, code: InvariantCode) -> impl Iterator<Item = &InvariantIssue> + '_ {
        self.issues.iter().filter(move |issue| issue.code == code)
    }
}

/// Geometry of one region as seen by the checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckedRegion {
    pub id: RegionId,
    pub bounds: Rect,
    /// `None` outside size-range mode.
    pub min: Option<Size>,
    pub max: Option<Size>,
}

/// Check cover, overlap, containment, and size limits.
///
/// Minimum violations are errors unless the container cannot fit the
/// minimums at all, in which case they are warnings and
/// `container_too_small` is set. Maximums are advisory and always warnings.
#[must_use]
pub fn check(container: Rect, regions: &[CheckedRegion]) -> InvariantReport {
    let mut report = InvariantReport::default();
    if regions.is_empty() {
        return report;
    }

    let rects: Vec<Rect> = regions.iter().map(|region| region.bounds).collect();
    let covered = bounding_box(&rects).unwrap_or_default();
    let area: i64 = rects.iter().map(Rect::area).sum();
    if covered != container || area != container.area() {
        report.issues.push(InvariantIssue {
            code: InvariantCode::CoverMismatch,
            severity: InvariantSeverity::Error,
            region: None,
            related_region: None,
            message: format!(
                "regions cover {covered:?} with area {area}, container is {container:?} with area {}",
                container.area()
            ),
        });
    }

    for (i, first) in regions.iter().enumerate() {
        if !container.contains_rect(&first.bounds) {
            report.issues.push(InvariantIssue {
                code: InvariantCode::OutOfBounds,
                severity: InvariantSeverity::Error,
                region: Some(first.id),
                related_region: None,
                message: format!("{:?} extends outside {container:?}", first.bounds),
            });
        }
        for second in &regions[i + 1..] {
            if let Some(shared) = first.bounds.intersection_opt(&second.bounds) {
                report.issues.push(InvariantIssue {
                    code: InvariantCode::Overlap,
                    severity: InvariantSeverity::Error,
                    region: Some(first.id),
                    related_region: Some(second.id),
                    message: format!("regions share {shared:?}"),
                });
            }
        }
    }

    let too_small = minimums_exceed_container(container, regions);
    report.container_too_small = too_small;
    for region in regions {
        let size = region.bounds.size();
        if let Some(min) = region.min {
            let below = (region.bounds.width > 0 && size.width < min.width)
                || (region.bounds.height > 0 && size.height < min.height);
            if below {
                report.issues.push(InvariantIssue {
                    code: InvariantCode::BelowMinimum,
                    severity: if too_small {
                        InvariantSeverity::Warning
                    } else {
                        InvariantSeverity::Error
                    },
                    region: Some(region.id),
                    related_region: None,
                    message: format!("size {size:?} is below minimum {min:?}"),
                });
            }
        }
        if let Some(max) = region.max
            && (size.width > max.width || size.height > max.height)
        {
            report.issues.push(InvariantIssue {
                code: InvariantCode::AboveMaximum,
                severity: InvariantSeverity::Warning,
                region: Some(region.id),
                related_region: None,
                message: format!("size {size:?} is above maximum {max:?}"),
            });
        }
    }

    report
}

/// Conservative test for "the container cannot honor every minimum": along
/// each axis, walk every line through the container and sum the minimums of
/// the regions it crosses. If any line needs more than the container
/// extent, minimums cannot all hold.
fn minimums_exceed_container(container: Rect, regions: &[CheckedRegion]) -> bool {
    use tessera_core::geometry::Axis;

    Axis::ALL.into_iter().any(|axis| {
        let cross = axis.cross();
        let mut probes: Vec<i32> = regions
            .iter()
            .filter(|region| region.bounds.extent(cross) > 0)
            .map(|region| region.bounds.near(cross))
            .collect();
        probes.sort_unstable();
        probes.dedup();
        probes.into_iter().any(|line| {
            let needed: i64 = regions
                .iter()
                .filter(|region| {
                    region.bounds.extent(axis) > 0
                        && region.bounds.near(cross) <= line
                        && line < region.bounds.far(cross)
                })
                .map(|region| i64::from(region.min.map_or(0, |min| min.along(axis))))
                .sum();
            needed > i64::from(container.extent(axis))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(raw: u64, bounds: Rect, min: i32) -> CheckedRegion {
        CheckedRegion {
            id: RegionId::new(raw).expect("non-zero"),
            bounds,
            min: Some(Size::new(min, min)),
            max: None,
        }
    }

    #[test]
    fn exact_cover_is_clean() {
        let report = check(
            Rect::new(0, 0, 300, 300),
            &[
                region(1, Rect::new(0, 0, 150, 300), 50),
                region(2, Rect::new(150, 0, 150, 300), 50),
            ],
        );
        assert!(report.is_clean(), "{report:?}");
    }

    #[test]
    fn gap_and_overlap_are_errors() {
        let report = check(
            Rect::new(0, 0, 300, 300),
            &[
                region(1, Rect::new(0, 0, 160, 300), 0),
                region(2, Rect::new(150, 0, 100, 300), 0),
            ],
        );
        assert!(report.has_errors());
        assert_eq!(report.with_code(InvariantCode::Overlap).count(), 1);
        assert_eq!(report.with_code(InvariantCode::CoverMismatch).count(), 1);
    }

    #[test]
    fn below_minimum_is_error_when_container_fits() {
        let report = check(
            Rect::new(0, 0, 300, 100),
            &[
                region(1, Rect::new(0, 0, 280, 100), 50),
                region(2, Rect::new(280, 0, 20, 100), 50),
            ],
        );
        let issue = report
            .with_code(InvariantCode::BelowMinimum)
            .next()
            .expect("finding");
        assert_eq!(issue.severity, InvariantSeverity::Error);
        assert!(!report.container_too_small);
    }

    #[test]
    fn below_minimum_is_warning_when_container_too_small() {
        let report = check(
            Rect::new(0, 0, 80, 100),
            &[
                region(1, Rect::new(0, 0, 50, 100), 50),
                region(2, Rect::new(50, 0, 30, 100), 50),
            ],
        );
        assert!(report.container_too_small);
        assert!(!report.has_errors());
        assert_eq!(report.with_code(InvariantCode::BelowMinimum).count(), 1);
    }

    #[test]
    fn maximum_is_advisory() {
        let mut wide = region(1, Rect::new(0, 0, 300, 100), 0);
        wide.max = Some(Size::new(200, 200));
        let report = check(Rect::new(0, 0, 300, 100), &[wide]);
        assert!(!report.has_errors());
        assert_eq!(report.with_code(InvariantCode::AboveMaximum).count(), 1);
    }
}
