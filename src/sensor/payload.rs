//! Response bodies served by the `/sensor` endpoint.

use rand::Rng;
use serde::Serialize;
use std::sync::Arc;

/// Character the simulated payload is filled with.
const BLOB_FILL: char = 'X';

/// Large immutable payload standing in for bulk sensor data.
///
/// Allocated once at startup and shared read-only between handlers.
#[derive(Clone)]
pub struct DataBlob(Arc<str>);

impl DataBlob {
    /// Allocates a blob of `len` identical characters.
    pub fn new(len: usize) -> Self {
        let data: String = std::iter::repeat(BLOB_FILL).take(len).collect();
        Self(Arc::from(data))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for DataBlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataBlob").field("len", &self.len()).finish()
    }
}

/// JSON body of a `/sensor` response.
///
/// Serialises as `{"data": "..."}` or `{"status": "ok"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SensorResponse<'a> {
    /// Occasional large reading.
    Blob { data: &'a str },
    /// Regular acknowledgement.
    Status { status: &'static str },
}

impl<'a> SensorResponse<'a> {
    /// Picks the blob with the given probability, the status body otherwise.
    pub fn choose<R: Rng>(rng: &mut R, probability: f64, blob: &'a DataBlob) -> Self {
        Self::from_draw(rng.gen::<f64>(), probability, blob)
    }

    /// Maps a uniform draw in [0, 1) to a response.
    pub fn from_draw(draw: f64, probability: f64, blob: &'a DataBlob) -> Self {
        if draw < probability {
            SensorResponse::Blob {
                data: blob.as_str(),
            }
        } else {
            SensorResponse::ok()
        }
    }

    /// The acknowledgement body.
    pub fn ok() -> Self {
        SensorResponse::Status { status: "ok" }
    }

    /// Returns true for the large-payload variant.
    pub fn is_blob(&self) -> bool {
        matches!(self, SensorResponse::Blob { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_blob_contents() {
        let blob = DataBlob::new(5_000_000);
        assert_eq!(blob.len(), 5_000_000);
        assert_eq!(blob.as_str().chars().count(), 5_000_000);
        assert!(blob.as_str().chars().all(|c| c == 'X'));
    }

    #[test]
    fn test_serialized_shapes() {
        let blob = DataBlob::new(3);
        let large = serde_json::to_value(SensorResponse::Blob { data: blob.as_str() }).unwrap();
        assert_eq!(large, serde_json::json!({ "data": "XXX" }));

        let ok = serde_json::to_value(SensorResponse::ok()).unwrap();
        assert_eq!(ok, serde_json::json!({ "status": "ok" }));
    }

    #[test]
    fn test_blob_frequency_converges() {
        let blob = DataBlob::new(8);
        let mut rng = ChaCha8Rng::seed_from_u64(0x5e45_0a11);
        let n = 10_000;

        let hits = (0..n)
            .filter(|_| SensorResponse::choose(&mut rng, 0.2, &blob).is_blob())
            .count();

        let fraction = hits as f64 / n as f64;
        assert!((fraction - 0.2).abs() <= 0.02, "fraction was {fraction}");
    }

    #[test]
    fn test_probability_bounds() {
        let blob = DataBlob::new(1);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(!SensorResponse::choose(&mut rng, 0.0, &blob).is_blob());
            assert!(SensorResponse::choose(&mut rng, 1.0, &blob).is_blob());
        }
    }

    proptest! {
        #[test]
        fn draw_below_probability_selects_blob(draw in 0.0f64..1.0, probability in 0.0f64..=1.0) {
            let blob = DataBlob::new(4);
            let response = SensorResponse::from_draw(draw, probability, &blob);
            prop_assert_eq!(response.is_blob(), draw < probability);
            if let SensorResponse::Blob { data } = response {
                prop_assert_eq!(data.len(), 4);
            }
        }
    }
}
