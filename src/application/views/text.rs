// Incident report text analysis view
use crate::application::random_source::RandomSource;
use crate::domain::chart::{Bar, ChartBody, ChartData, TileData};
use crate::domain::page::{Page, PageView, TableData};
use chrono::NaiveDateTime;
use serde_json::json;

pub const INCIDENT_TYPES: [&str; 8] = [
    "Congestion",
    "Accident",
    "Pollution Spike",
    "Road Work",
    "Heavy Traffic",
    "Air Quality Alert",
    "Vehicle Breakdown",
    "Weather Impact",
];

const REPORT_COUNT: usize = 100;

const KEYWORD_MENTIONS: [(&str, i64); 12] = [
    ("heavy", 45),
    ("traffic", 42),
    ("pollution", 38),
    ("congestion", 35),
    ("delay", 28),
    ("accident", 25),
    ("alert", 22),
    ("slow", 20),
    ("vehicles", 18),
    ("emission", 15),
    ("road", 14),
    ("jam", 12),
];

/// Per-type report counts, least frequent first. Types with no reports are omitted.
pub fn incident_frequencies(rng: &mut dyn RandomSource) -> Vec<(&'static str, usize)> {
    let mut counts = [0usize; INCIDENT_TYPES.len()];
    for _ in 0..REPORT_COUNT {
        counts[rng.pick_index(INCIDENT_TYPES.len())] += 1;
    }

    let mut frequencies: Vec<(&'static str, usize)> = INCIDENT_TYPES
        .iter()
        .zip(counts)
        .filter(|(_, n)| *n > 0)
        .map(|(name, n)| (*name, n))
        .collect();
    frequencies.sort_by_key(|(_, n)| *n);
    frequencies
}

pub fn render_text_analysis(now: NaiveDateTime, rng: &mut dyn RandomSource) -> PageView {
    let mut view = PageView::new(
        Page::TextAnalysis,
        "Incident Report Text Analysis".to_string(),
        format!(
            "Analysis of {} incident reports | Generated: {}",
            REPORT_COUNT,
            now.format("%Y-%m-%d %H:%M")
        ),
        now,
    );

    let frequencies = incident_frequencies(rng);

    view.charts.push(
        ChartData::new(
            "incident_frequency",
            "Incident Type Frequency Analysis",
            ChartBody::Bar {
                horizontal: true,
                bars: frequencies
                    .iter()
                    .map(|(name, n)| Bar {
                        label: name.to_string(),
                        value: *n as f64,
                    })
                    .collect(),
                color_scale: "Reds".to_string(),
            },
        )
        .labels("Frequency Count", "Incident Type"),
    );

    view.tiles
        .push(TileData::new("total_incidents", "Total Incidents", "", REPORT_COUNT as f64, 0));
    if let Some((name, n)) = frequencies.last() {
        view.tiles.push(TileData::new(
            "most_common",
            &format!("Most Common: {}", name),
            "",
            *n as f64,
            0,
        ));
    }

    let mut keywords = KEYWORD_MENTIONS.to_vec();
    keywords.sort_by(|a, b| b.1.cmp(&a.1));
    let mut table = TableData::new(
        "keywords",
        "Top Keywords from Incident Reports",
        &["Keyword", "Mentions"],
    );
    for (keyword, mentions) in keywords {
        table.push_row(vec![json!(keyword), json!(mentions)]);
    }
    view.tables.push(table);

    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::clock::testing::at;
    use crate::application::random_source::ThreadRandom;
    use crate::application::random_source::testing::ScriptedRandom;

    #[test]
    fn test_frequencies_sum_to_report_count_and_ascend() {
        let frequencies = incident_frequencies(&mut ThreadRandom::seeded(17));
        assert_eq!(frequencies.iter().map(|(_, n)| n).sum::<usize>(), 100);
        assert!(frequencies.windows(2).all(|w| w[0].1 <= w[1].1));
    }

    #[test]
    fn test_unreported_types_are_omitted() {
        // 60 accidents, then the script runs dry and every pick is index 0
        let mut rng = ScriptedRandom::new(std::iter::repeat(1).take(60));
        let frequencies = incident_frequencies(&mut rng);
        assert_eq!(frequencies, vec![("Congestion", 40), ("Accident", 60)]);
    }

    #[test]
    fn test_view_tiles_and_keyword_order() {
        let mut rng = ScriptedRandom::new(std::iter::repeat(1).take(60));
        let view = render_text_analysis(at(8, 18, 0, 0), &mut rng);

        assert_eq!(view.tile("most_common").unwrap().title, "Most Common: Accident");
        let table = view.table("keywords").unwrap();
        assert_eq!(table.rows.len(), 12);
        assert_eq!(table.rows[0][0], json!("heavy"));
        assert_eq!(table.rows[11][0], json!("jam"));
    }
}
