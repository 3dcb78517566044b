use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct ScoringProfile {
    pub id: String,
    pub name: String,
    pub description: String,
    pub weights: BTreeMap<String, f64>,
}

// Built-in profiles; the first one is the fallback when nothing resolves.
pub fn profiles() -> Vec<ScoringProfile> {
    vec![
        ScoringProfile {
            id: "balanced".to_string(),
            name: "Balanced Essentials".to_string(),
            description: "Even emphasis on hospitals, libraries, and retail.".to_string(),
            weights: weight_map(&[("Hospital", 0.4), ("Library", 0.3), ("Retail", 0.3)]),
        },
        ScoringProfile {
            id: "healthcare".to_string(),
            name: "Health & Safety".to_string(),
            description: "Prioritises quick access to hospitals and urgent care.".to_string(),
            weights: weight_map(&[("Hospital", 0.65), ("Library", 0.1), ("Retail", 0.25)]),
        },
        ScoringProfile {
            id: "families".to_string(),
            name: "Family Friendly".to_string(),
            description: "Highlights libraries and daily retail needs.".to_string(),
            weights: weight_map(&[("Hospital", 0.3), ("Library", 0.45), ("Retail", 0.25)]),
        },
    ]
}

// Precedence: non-empty custom weights, then the named profile, then the
// default profile.
pub fn resolve_weights(
    profile_id: Option<&str>,
    custom_weights: Option<&BTreeMap<String, f64>>,
) -> BTreeMap<String, f64> {
    if let Some(custom) = custom_weights {
        if !custom.is_empty() {
            return custom.clone();
        }
    }

    let mut available = profiles();
    if let Some(id) = profile_id {
        if let Some(idx) = available.iter().position(|profile| profile.id == id) {
            return available.swap_remove(idx).weights;
        }
    }

    available.swap_remove(0).weights
}

pub fn compute_score(counts: &BTreeMap<String, u32>, weights: &BTreeMap<String, f64>) -> f64 {
    let mut total_weight = 0.0;
    let mut weighted_sum = 0.0;

    for (category, weight) in weights {
        total_weight += weight;
        let count = counts.get(category).copied().unwrap_or(0);
        weighted_sum += count as f64 * weight;
    }

    if total_weight == 0.0 {
        return 0.0;
    }

    weighted_sum / total_weight
}

fn weight_map(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
    entries
        .iter()
        .map(|(category, weight)| (category.to_string(), *weight))
        .collect()
}
