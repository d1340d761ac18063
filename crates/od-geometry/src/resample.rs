//! Sample a classification back into a flat polyline.

use od_core::{CoreError, CoreResult, Polyline, Vertex};

use crate::segment::Classification;

/// Poses every `step` metres along each segment, joined without duplicating
/// shared segment boundaries.  Elevation is zero; the result carries plan
/// geometry only.
pub fn resample(classification: &Classification, step: f64) -> CoreResult<Polyline> {
    if !(step > 0.0) {
        return Err(CoreError::Config(format!("resample step must be positive, got {step}")));
    }
    let mut vertices: Vec<Vertex> = Vec::new();
    for seg in &classification.segments {
        let poses = seg.sample(step);
        let skip = usize::from(!vertices.is_empty());
        vertices.extend(poses.iter().skip(skip).map(|p| Vertex::new(p.x, p.y, 0.0)));
    }
    let mut line = Polyline::new(vertices)?;
    line.refit_elevation();
    Ok(line)
}
