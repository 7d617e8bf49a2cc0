use crate::types::DataPoint;

/// Euclidean norm of the sample's acceleration vector.
///
/// Returns `None` when any axis is absent or not finite. Callers skip such
/// samples entirely instead of feeding a substitute value to the detector,
/// so a dropped axis can never fake a threshold crossing.
pub fn magnitude(sample: &DataPoint) -> Option<f64> {
    let (x, y, z) = sample.axes()?;
    if !(x.is_finite() && y.is_finite() && z.is_finite()) {
        return None;
    }
    Some((x * x + y * y + z * z).sqrt())
}

/// 单轴显示格式：两位小数，缺失时为 N/A
pub fn format_axis(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.2}", v),
        _ => "N/A".to_string(),
    }
}
