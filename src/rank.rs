// src/rank.rs
//
// Banzuke rank strings (`Ye`, `O1w`, `M12e`, `Ms3w`, …) as comparable numbers.
// Lower is higher-ranked.

/// Numeric rank for comparison, `None` when the string is empty or unrecognized.
///
/// Y=0, O=1, S=2, K=3, M<n>=3+n, J<n>=20+n, Ms<n>=100+n, Sd<n>=200+n,
/// Jd<n>=300+n, Jk<n>=400+n. A missing number counts as 1.
pub fn rank_to_numeric(rank: &str) -> Option<u32> {
    let r = rank.trim().trim_end_matches(['e', 'w']);
    if r.is_empty() {
        return None;
    }

    // Two-letter prefixes first so `Ms` is not read as `M`.
    const TABLE: [(&str, u32); 9] = [
        ("Ms", 100), ("Sd", 200), ("Jd", 300), ("Jk", 400),
        ("Y", 0), ("O", 1), ("S", 2), ("K", 3), ("J", 20),
    ];

    if let Some(n) = r.strip_prefix('M').filter(|n| !n.starts_with('s')) {
        return Some(3 + number_or_one(n)?);
    }
    for (prefix, base) in TABLE {
        if let Some(n) = r.strip_prefix(prefix) {
            return match prefix {
                // Sanyaku numbering (S1, K2) does not change the tier.
                "Y" | "O" | "S" | "K" => Some(base),
                _ => Some(base + number_or_one(n)?),
            };
        }
    }
    None
}

fn number_or_one(n: &str) -> Option<u32> {
    if n.is_empty() { Some(1) } else { n.parse().ok() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanyaku() {
        assert_eq!(rank_to_numeric("Ye"), Some(0));
        assert_eq!(rank_to_numeric("O1w"), Some(1));
        assert_eq!(rank_to_numeric("S2e"), Some(2));
        assert_eq!(rank_to_numeric("Kw"), Some(3));
    }

    #[test]
    fn numbered_divisions() {
        assert_eq!(rank_to_numeric("M1e"), Some(4));
        assert_eq!(rank_to_numeric("M17w"), Some(20));
        assert_eq!(rank_to_numeric("J3e"), Some(23));
        assert_eq!(rank_to_numeric("Ms15w"), Some(115));
        assert_eq!(rank_to_numeric("Sd90e"), Some(290));
        assert_eq!(rank_to_numeric("Jd2w"), Some(302));
        assert_eq!(rank_to_numeric("Jk11e"), Some(411));
    }

    #[test]
    fn unrecognized() {
        assert_eq!(rank_to_numeric(""), None);
        assert_eq!(rank_to_numeric("  "), None);
        assert_eq!(rank_to_numeric("Bg1e"), None);
        assert_eq!(rank_to_numeric("Mx"), None);
    }
}
