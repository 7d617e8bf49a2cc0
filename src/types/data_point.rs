/// One accelerometer reading as delivered by a sample source.
///
/// Axes are optional because upstream publishers sometimes omit a field;
/// see [`crate::motion::magnitude`] for how such samples are treated.
#[derive(serde::Deserialize, serde::Serialize, Clone, Debug, Default, PartialEq)]
pub struct DataPoint {
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    #[serde(default)]
    pub z: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl DataPoint {
    pub fn new(x: f64, y: f64, z: f64, timestamp: i64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
            timestamp: Some(timestamp),
        }
    }

    /// 三轴都存在时返回 (x, y, z)
    pub fn axes(&self) -> Option<(f64, f64, f64)> {
        Some((self.x?, self.y?, self.z?))
    }
}
