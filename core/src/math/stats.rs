pub struct StatsHelper;

impl StatsHelper {
    /// Unweighted arithmetic mean; `None` for an empty sequence.
    pub fn mean<I>(values: I) -> Option<f64>
    where
        I: IntoIterator<Item = f64>,
    {
        let (sum, count) = values
            .into_iter()
            .fold((0.0_f64, 0_usize), |(sum, count), v| (sum + v, count + 1));
        if count == 0 {
            return None;
        }
        Some(sum / count as f64)
    }

    /// Rounds half-up (towards positive infinity) to `decimals` places.
    pub fn round_to(value: f64, decimals: u32) -> f64 {
        let scale = 10_f64.powi(decimals as i32);
        (value * scale + 0.5).floor() / scale
    }
}
