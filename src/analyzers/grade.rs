use serde::Serialize;
use std::fmt;

/// Interpretation band for an NPS reading on the annual gauge.
///
/// | Range     | Band              |
/// |-----------|-------------------|
/// | >= 50     | Excellent         |
/// | 0 ..= 49  | Good              |
/// | < 0       | Needs Improvement |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NpsBand {
    Excellent,
    Good,
    NeedsImprovement,
}

impl NpsBand {
    /// Gauge bar colour used by the dashboard for this band.
    pub fn color(self) -> &'static str {
        match self {
            NpsBand::Excellent => "#00CC96",
            NpsBand::Good => "#FFA15A",
            NpsBand::NeedsImprovement => "#EF553B",
        }
    }
}

impl fmt::Display for NpsBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NpsBand::Excellent => "Excellent",
            NpsBand::Good => "Good",
            NpsBand::NeedsImprovement => "Needs Improvement",
        };
        f.write_str(label)
    }
}

pub fn grade(nps: i64) -> NpsBand {
    match nps {
        n if n >= 50 => NpsBand::Excellent,
        n if n >= 0 => NpsBand::Good,
        _ => NpsBand::NeedsImprovement,
    }
}
