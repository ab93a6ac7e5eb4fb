use serde::{Deserialize, Serialize};

use super::{MS_PER_DAY, MS_PER_HOUR};

/// Urgency bucket for a countdown. Variants are ordered from most to least
/// urgent, so `Ord` follows remaining time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Expired,
    /// Under one hour left.
    Urgent,
    /// Under one day left.
    Soon,
    Normal,
}

impl Tier {
    /// Display color as `0xRRGGBB`.
    pub fn color(self) -> u32 {
        match self {
            Tier::Expired => 0xef4444,
            Tier::Urgent => 0xf97316,
            Tier::Soon => 0x3b82f6,
            Tier::Normal => 0x10b981,
        }
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        let c = self.color();
        ((c >> 16) as u8, (c >> 8) as u8, c as u8)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Expired => "expired",
            Tier::Urgent => "urgent",
            Tier::Soon => "soon",
            Tier::Normal => "normal",
        }
    }
}

/// Map remaining milliseconds to a tier.
///
/// Exactly one hour is `Soon`, exactly one day is `Normal`.
pub fn classify(total_ms: i64) -> Tier {
    if total_ms <= 0 {
        Tier::Expired
    } else if total_ms < MS_PER_HOUR {
        Tier::Urgent
    } else if total_ms < MS_PER_DAY {
        Tier::Soon
    } else {
        Tier::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn boundaries() {
        assert_eq!(classify(i64::MIN), Tier::Expired);
        assert_eq!(classify(0), Tier::Expired);
        assert_eq!(classify(1), Tier::Urgent);
        assert_eq!(classify(MS_PER_HOUR - 1), Tier::Urgent);
        assert_eq!(classify(3_600_000), Tier::Soon);
        assert_eq!(classify(MS_PER_DAY - 1), Tier::Soon);
        assert_eq!(classify(86_400_000), Tier::Normal);
        assert_eq!(classify(i64::MAX), Tier::Normal);
    }

    #[test]
    fn colors_are_distinct() {
        let colors = [Tier::Expired, Tier::Urgent, Tier::Soon, Tier::Normal].map(Tier::color);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(Tier::Soon.rgb(), (0x3b, 0x82, 0xf6));
    }

    proptest! {
        #[test]
        fn classify_is_monotonic(a in any::<i64>(), b in any::<i64>()) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(classify(lo) <= classify(hi));
        }
    }
}
