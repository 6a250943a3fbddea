/// Host time signature (meter)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSignature {
    /// Number of beats per bar (numerator)
    pub numerator: u32,
    /// Note value that gets one beat (denominator: 4 = quarter, 8 = eighth)
    pub denominator: u32,
}

impl TimeSignature {
    /// Standard 4/4 time
    pub const FOUR_FOUR: TimeSignature = TimeSignature {
        numerator: 4,
        denominator: 4,
    };

    /// 3/4 time (waltz)
    pub const THREE_FOUR: TimeSignature = TimeSignature {
        numerator: 3,
        denominator: 4,
    };

    /// 6/8 time (compound duple meter)
    pub const SIX_EIGHT: TimeSignature = TimeSignature {
        numerator: 6,
        denominator: 8,
    };

    /// 2/2 time (cut time)
    pub const TWO_TWO: TimeSignature = TimeSignature {
        numerator: 2,
        denominator: 2,
    };

    pub fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// A zero numerator or denominator cannot describe a bar
    pub fn is_valid(&self) -> bool {
        self.numerator > 0 && self.denominator > 0
    }

    /// Bar length as a fraction of a whole note: numerator / denominator
    /// 4/4 = 1.0, 3/4 = 0.75, 6/8 = 0.75
    /// Invalid signatures report 1.0 so callers never scale by zero
    pub fn ratio(&self) -> f64 {
        if !self.is_valid() {
            return 1.0;
        }
        f64::from(self.numerator) / f64::from(self.denominator)
    }

    /// Quarter-note beats in one bar
    /// Formula: (numerator / denominator) * 4
    pub fn quarter_beats_per_bar(&self) -> f64 {
        self.ratio() * 4.0
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::FOUR_FOUR
    }
}
