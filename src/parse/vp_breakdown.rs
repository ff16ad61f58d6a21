//! Per-player VP breakdown sections.
//!
//! The end-of-game page repeats a `game-end-column` block per player, in
//! results-table order. Each block lists `game-end-column-vp` /
//! `game-end-column-text` div pairs: the VP value and what scored it.

use std::sync::OnceLock;

use regex::Regex;

use super::{parse_leading_int, ParseError};
use crate::models::{Award, Milestone, VpCard};
use crate::normalize::PlayerAliases;

const SECTION_MARKER: &str = r#"<div class="game-end-column">"#;
const VP_OPEN: &str = r#"<div class="game-end-column-vp">"#;
const TEXT_OPEN: &str = r#"<div class="game-end-column-text">"#;

/// One player's VP breakdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VpSection {
    pub vp_cards: Vec<VpCard>,
    pub milestones: Vec<Milestone>,
    pub awards: Vec<Award>,
}

fn pair_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?s)<div class="game-end-column-vp">(.*?)</div>(?:\s|<!--.*?-->)*<div class="game-end-column-text">(.*?)</div>"#,
        )
        .unwrap()
    })
}

fn span_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)</?span.*?>").unwrap())
}

fn funded_by_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\(funded by (.*?)\)").unwrap())
}

fn milestone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Claimed (.+?) milestone").unwrap())
}

fn award_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\d+)(?:st|nd|rd|th) place for (.+?) award \(funded by (.+?)\)").unwrap()
    })
}

/// Split the page into player sections and parse each one.
///
/// Anything before the first section marker is page chrome and is ignored.
pub fn parse_sections(
    html: &str,
    aliases: &PlayerAliases,
    game_id: &str,
) -> Result<Vec<VpSection>, ParseError> {
    html.split(SECTION_MARKER)
        .skip(1)
        .enumerate()
        .map(|(i, section)| parse_section(i, section, aliases, game_id))
        .collect()
}

fn parse_section(
    index: usize,
    section: &str,
    aliases: &PlayerAliases,
    game_id: &str,
) -> Result<VpSection, ParseError> {
    let pairs: Vec<(&str, &str)> = pair_re()
        .captures_iter(section)
        .map(|caps| {
            let vp = caps.get(1).map_or("", |m| m.as_str());
            let text = caps.get(2).map_or("", |m| m.as_str());
            (vp, text)
        })
        .collect();

    let vp_count = section.matches(VP_OPEN).count();
    let text_count = section.matches(TEXT_OPEN).count();
    if vp_count != pairs.len() || text_count != pairs.len() {
        return Err(ParseError::VpPairMismatch {
            section: index,
            vp_count,
            text_count,
            pairs: pairs.len(),
        });
    }

    let mut out = VpSection::default();

    for (vp, raw_label) in pairs {
        let label = clean_label(raw_label, aliases);

        if !raw_label.replace("&nbsp;", "").is_empty() {
            out.vp_cards
                .push(VpCard::new(parse_leading_int(vp), label.clone()));
        }

        if label.contains("funded") {
            if let Some(award) = extract_award(&label) {
                out.awards.push(award);
            }
        }

        if label.contains("milestone") {
            out.milestones.push(extract_milestone(&label, game_id));
        }
    }

    Ok(out)
}

/// Strip span markup, canonicalize the sponsor in "(funded by X)" and
/// collapse double spaces.
pub fn clean_label(raw: &str, aliases: &PlayerAliases) -> String {
    let label = span_re().replace_all(raw, "");
    let label = funded_by_re().replace(&label, |caps: &regex::Captures| {
        format!("(funded by {})", aliases.canonical(&caps[1]))
    });
    label.replace("  ", " ")
}

/// Milestone from "Claimed <name> milestone"; a label without a name
/// yields an empty, zero-point milestone.
pub fn extract_milestone(label: &str, game_id: &str) -> Milestone {
    match milestone_re().captures(label) {
        Some(caps) => Milestone {
            name: caps[1].to_string(),
            points: 5,
            game_id: game_id.to_string(),
        },
        None => Milestone {
            name: String::new(),
            points: 0,
            game_id: game_id.to_string(),
        },
    }
}

/// Award from "<n>th place for <name> award (funded by <sponsor>)".
pub fn extract_award(label: &str) -> Option<Award> {
    let caps = award_re().captures(label)?;
    let place: u32 = caps[1].parse().ok()?;

    Some(Award {
        place,
        name: caps[2].trim().to_string(),
        points: if place == 1 { 5 } else { 2 },
        funded_by: caps[3].trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::vp_section;
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn aliases() -> PlayerAliases {
        let mut t = BTreeMap::new();
        t.insert("Victor".to_string(), vec!["Vic".to_string()]);
        PlayerAliases::new(&t).unwrap()
    }

    #[test]
    fn test_award_scenario() {
        let label = clean_label("1st place for Banker award (funded by Vic)", &aliases());
        assert_eq!(label, "1st place for Banker award (funded by Victor)");

        let award = extract_award(&label).unwrap();
        assert_eq!(
            award,
            Award {
                place: 1,
                name: "Banker".to_string(),
                points: 5,
                funded_by: "Victor".to_string(),
            }
        );
    }

    #[test]
    fn test_second_place_award_points() {
        let award = extract_award("2nd place for Thermalist award (funded by Amy)").unwrap();
        assert_eq!(award.place, 2);
        assert_eq!(award.points, 2);
        assert_eq!(award.funded_by, "Amy");
    }

    #[test]
    fn test_award_non_match() {
        assert_eq!(extract_award("funded something else"), None);
    }

    #[test]
    fn test_extract_milestone() {
        let m = extract_milestone("Claimed Gardener milestone", "g1");
        assert_eq!(m.name, "Gardener");
        assert_eq!(m.points, 5);
        assert_eq!(m.game_id, "g1");

        let none = extract_milestone("milestone bonus", "g1");
        assert_eq!(none.name, "");
        assert_eq!(none.points, 0);
    }

    #[test]
    fn test_clean_label_strips_spans_and_double_spaces() {
        let label = clean_label(
            r#"<span class="card-name">Birds</span>  (3 animals)"#,
            &aliases(),
        );
        assert_eq!(label, "Birds (3 animals)");
    }

    #[test]
    fn test_parse_sections_allows_comment_placeholders() {
        let html = concat!(
            r#"<div class="game-end-column">"#,
            r#"<div class="game-end-column-row">"#,
            r#"<div class="game-end-column-vp">4</div><!----><div class="game-end-column-text">Birds</div>"#,
            "</div>",
            r#"<div class="game-end-column-row">"#,
            r#"<div class="game-end-column-vp">2</div>"#,
            "\n  <!--v-if-->\n  ",
            r#"<div class="game-end-column-text">Fish</div>"#,
            "</div></div>",
        );

        let sections = parse_sections(html, &aliases(), "g1").unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(
            sections[0].vp_cards,
            vec![VpCard::new(Some(4), "Birds"), VpCard::new(Some(2), "Fish")]
        );
    }

    #[test]
    fn test_parse_sections_classifies_entries() {
        let html = format!(
            "<div>chrome</div>{}{}",
            vp_section(&[
                ("5", "Claimed Mayor milestone"),
                ("5", "1st place for Miner award (funded by vic)"),
                ("2", "funded but unparseable"),
                ("0", "&nbsp;"),
                ("7", "Birds"),
            ]),
            vp_section(&[("1", "Tardigrades")]),
        );

        let sections = parse_sections(&html, &aliases(), "g9").unwrap();
        assert_eq!(sections.len(), 2);

        let first = &sections[0];
        assert_eq!(first.vp_cards.len(), 4);
        assert_eq!(first.vp_cards[3], VpCard::new(Some(7), "Birds"));
        assert_eq!(
            first.vp_cards[1].card_name,
            "1st place for Miner award (funded by Victor)"
        );
        assert_eq!(first.milestones.len(), 1);
        assert_eq!(first.milestones[0].name, "Mayor");
        assert_eq!(first.awards.len(), 1);
        assert_eq!(first.awards[0].name, "Miner");

        assert_eq!(sections[1].vp_cards, vec![VpCard::new(Some(1), "Tardigrades")]);
    }

    #[test]
    fn test_mismatched_pairs_is_error() {
        let html = format!(
            r#"{}<div class="game-end-column-vp">9</div>"#,
            vp_section(&[("3", "Fish")]),
        );
        // The stray value lands inside the (only) section.
        let err = parse_sections(&html, &aliases(), "").unwrap_err();
        assert_eq!(
            err,
            ParseError::VpPairMismatch {
                section: 0,
                vp_count: 2,
                text_count: 1,
                pairs: 1,
            }
        );
    }

    #[test]
    fn test_no_sections() {
        let sections = parse_sections("<html></html>", &aliases(), "").unwrap();
        assert!(sections.is_empty());
    }
}
