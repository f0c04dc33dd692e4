use serde::Serialize;
use std::collections::BTreeMap;

use super::group::GroupKey;
use crate::lookup::PriceType;
use crate::parser::Restaurant;

/// Percentage share of each price tier within one group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceMix {
    pub group: String,
    pub total: usize,
    /// Percentages in `PriceType::ALL` order
    pub shares: [f64; 4],
}

impl PriceMix {
    pub fn share(&self, tier: PriceType) -> f64 {
        self.shares[tier_index(tier)]
    }
}

fn tier_index(tier: PriceType) -> usize {
    match tier {
        PriceType::Cheap => 0,
        PriceType::Normal => 1,
        PriceType::Expensive => 2,
        PriceType::Gourmet => 3,
    }
}

/// Price-tier distribution per group, groups in label order
pub fn price_mix(rows: &[&Restaurant], key: GroupKey) -> Vec<PriceMix> {
    let mut counts: BTreeMap<String, [usize; 4]> = BTreeMap::new();
    for r in rows {
        counts.entry(key.label(r)).or_default()[tier_index(r.price_type)] += 1;
    }

    counts
        .into_iter()
        .map(|(group, tiers)| {
            let total: usize = tiers.iter().sum();
            let shares = tiers.map(|c| c as f64 * 100.0 / total as f64);
            PriceMix {
                group,
                total,
                shares,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::tests::{refs, sample};

    #[test]
    fn test_mix_by_country() {
        let rows = sample();
        let mix = price_mix(&refs(&rows), GroupKey::Country);

        let groups: Vec<_> = mix.iter().map(|m| m.group.as_str()).collect();
        assert_eq!(groups, vec!["Brazil", "India", "United States of America"]);

        let india = &mix[1];
        assert_eq!(india.total, 4);
        assert_eq!(india.shares, [50.0, 25.0, 25.0, 0.0]);

        let brazil = &mix[0];
        assert_eq!(brazil.share(PriceType::Normal), 50.0);
        assert_eq!(brazil.share(PriceType::Gourmet), 50.0);
        assert_eq!(brazil.share(PriceType::Cheap), 0.0);
    }

    #[test]
    fn test_shares_sum_to_hundred() {
        let rows = sample();
        for m in price_mix(&refs(&rows), GroupKey::Cuisines) {
            let sum: f64 = m.shares.iter().sum();
            assert!((sum - 100.0).abs() < 1e-9, "{}: {}", m.group, sum);
        }
    }

    #[test]
    fn test_empty() {
        assert!(price_mix(&[], GroupKey::City).is_empty());
    }
}
