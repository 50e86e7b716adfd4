use std::collections::BTreeSet;

use eframe::egui::Color32;

use crate::source::Node;

pub const FALLBACK_COLOR: Color32 = Color32::from_rgb(0x9b, 0x9b, 0x9b);

pub const CATEGORY_COLORS: [(&str, Color32); 7] = [
    ("Corporation", Color32::from_rgb(0x5b, 0x4f, 0xff)),
    ("Government Agency", Color32::from_rgb(0xff, 0xd7, 0x00)),
    ("Investment Firm", Color32::from_rgb(0xff, 0x6b, 0x9d)),
    ("Research Institution", Color32::from_rgb(0xff, 0xa5, 0x00)),
    ("Non-Profit", Color32::from_rgb(0x7b, 0x6f, 0xff)),
    ("Organization", Color32::from_rgb(0x00, 0xd4, 0xaa)),
    ("Unknown", Color32::from_rgb(0x8b, 0x8b, 0x8b)),
];

pub fn color_for(category: Option<&str>) -> Color32 {
    category
        .and_then(|category| {
            CATEGORY_COLORS
                .iter()
                .find(|(known, _)| *known == category)
                .map(|(_, color)| *color)
        })
        .unwrap_or(FALLBACK_COLOR)
}

/// Distinct categories present in `nodes`, sorted.
pub fn legend_entries(nodes: &[Node]) -> Vec<String> {
    nodes
        .iter()
        .filter_map(|node| node.category.as_deref())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(category: Option<&str>) -> Node {
        Node {
            id: format!("{category:?}"),
            name: String::new(),
            category: category.map(str::to_owned),
            weight: 5.0,
        }
    }

    #[test]
    fn known_categories_use_table() {
        for (category, color) in CATEGORY_COLORS {
            assert_eq!(color_for(Some(category)), color);
        }
    }

    #[test]
    fn unknown_and_absent_fall_back() {
        assert_eq!(color_for(None), FALLBACK_COLOR);
        assert_eq!(color_for(Some("")), FALLBACK_COLOR);
        assert_eq!(color_for(Some("Space Agency")), FALLBACK_COLOR);
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(color_for(Some("corporation")), FALLBACK_COLOR);
        assert_ne!(color_for(Some("Corporation")), FALLBACK_COLOR);
    }

    #[test]
    fn legend_is_sorted_and_unique() {
        let nodes = vec![
            node(Some("Organization")),
            node(None),
            node(Some("Corporation")),
            node(Some("Zeta Labs")),
            node(Some("Organization")),
            node(Some("Corporation")),
        ];

        assert_eq!(
            legend_entries(&nodes),
            vec!["Corporation", "Organization", "Zeta Labs"]
        );
    }

    #[test]
    fn legend_of_nothing_is_empty() {
        assert!(legend_entries(&[]).is_empty());
        assert!(legend_entries(&[node(None)]).is_empty());
    }
}
