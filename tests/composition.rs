use std::collections::BTreeSet;

use resume_render::composer::{resolve_columns, three_column_widths, OrphanPolicy};
use resume_render::layout::{Block, LayoutNode};
use resume_render::richtext::{flatten_runs, parse_inline, LinkOptions};
use resume_render::sections::format_date;
use resume_render::settings::merge_values;
use resume_render::template::{self, LayoutType};
use resume_render::{ColorResolver, ColorTarget, ResumeDocument, ResumeRecord};
use serde_json::{json, Value};

fn full_resume() -> ResumeRecord {
    serde_json::from_value(json!({
        "basics": {
            "name": "Grace Hopper",
            "label": "Rear Admiral",
            "email": "grace@example.com",
            "summary": "Invented the **first** compiler.\n\n- Loves *COBOL*",
            "profiles": [{"network": "GitHub", "username": "grace", "url": "https://github.com/grace"}]
        },
        "work": [{"id": "navy", "name": "US Navy", "position": "Officer", "startDate": "1943-12", "endDate": "1986-08"}],
        "education": [{"institution": "Yale", "studyType": "PhD", "area": "Mathematics"}],
        "skills": [{"name": "Compilers", "keywords": ["A-0", "FLOW-MATIC"]}],
        "projects": [{"name": "UNIVAC I", "description": "Programming the [UNIVAC](https://example.com/univac)"}],
        "certificates": [{"name": "Distinguished Service Medal", "date": "1986"}],
        "languages": [{"language": "English", "fluency": "Native"}],
        "interests": [{"name": "Nanoseconds"}],
        "publications": [{"name": "The Education of a Computer", "releaseDate": "1952-05-02"}],
        "awards": [{"title": "National Medal of Technology", "date": "1991-09"}],
        "references": [{"name": "Howard Aiken", "reference": "Indispensable."}],
        "custom": [{"id": "talks", "name": "Talks", "items": [{"title": "Future Possibilities", "date": "1982"}]}]
    }))
    .expect("resume fixture")
}

fn section_ids(document: &ResumeDocument) -> Vec<String> {
    document
        .compose()
        .section_ids()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

#[test]
fn every_preset_places_each_populated_section_once() {
    let resume = full_resume();
    let mut order: Vec<&str> = resume_render::settings::DEFAULT_SECTION_ORDER.to_vec();
    order.push("talks");
    order.push("not-a-section");

    for preset in template::catalog() {
        let document = ResumeDocument::new(preset.clone(), resume.clone())
            .with_overrides(json!({"sectionOrder": order}));
        let ids = section_ids(&document);
        let unique: BTreeSet<_> = ids.iter().cloned().collect();
        assert_eq!(unique.len(), ids.len(), "{}: duplicates in {ids:?}", preset.id);

        let expected: BTreeSet<String> = order
            .iter()
            .filter(|id| **id != "not-a-section")
            .map(|id| (*id).to_owned())
            .collect();
        assert_eq!(unique, expected, "{}", preset.id);
        assert_eq!(document.compose().header_count(), 1, "{}", preset.id);
    }
}

#[test]
fn summary_only_resume_yields_one_section_and_the_header() {
    let resume: ResumeRecord =
        serde_json::from_value(json!({"basics": {"summary": "Just a summary."}})).unwrap();
    let mut preset = template::find("ats").unwrap().clone();
    preset.layout = LayoutType::SingleColumn;
    let composed = ResumeDocument::new(preset, resume).compose();

    assert_eq!(composed.section_ids(), ["summary"]);
    assert_eq!(composed.header_count(), 1);
    assert_eq!(composed.nodes.len(), 2);
    assert!(matches!(composed.nodes[0], LayoutNode::Header(_)));
}

#[test]
fn orphans_land_in_the_documented_column() {
    let settings = resume_render::settings::resolve(
        &Default::default(),
        &[&json!({
            "sectionOrder": ["work", "skills", "custom-thing"],
            "leftColumnSections": ["skills"],
            "middleColumnSections": [],
            "rightColumnSections": ["work"]
        })],
    );
    let three = template::find("multicolumn").unwrap();
    let assignment = resolve_columns(&settings, three, true, OrphanPolicy::for_layout(three.layout));
    assert_eq!(assignment.middle, ["custom-thing"]);

    let two = template::find("modern").unwrap();
    let assignment = resolve_columns(&settings, two, false, OrphanPolicy::for_layout(two.layout));
    assert_eq!(assignment.right, ["work", "custom-thing"]);
}

#[test]
fn three_column_widths_always_sum_to_one_hundred() {
    for left in (0..=120).step_by(7) {
        for middle in (0..=120).step_by(9) {
            let widths = three_column_widths(left as f64, middle as f64);
            let total: f64 = widths.iter().sum();
            assert!((total - 100.0).abs() < 1e-9);
            assert!(widths.iter().all(|width| *width > 0.0));
        }
    }
    assert_eq!(three_column_widths(60.0, 60.0), [60.0, 30.0, 10.0]);
}

#[test]
fn merge_is_last_write_wins_and_replaces_arrays() {
    let base = json!({"a": 1, "nested": {"x": 1, "y": 2}, "list": [1, 2, 3]});
    let first = json!({"nested": {"x": 10}, "list": [9]});
    let second = json!({"a": 2, "nested": {"y": null}});
    let merged = merge_values(&base, &[&first, &second]);
    assert_eq!(
        merged,
        json!({"a": 2, "nested": {"x": 10, "y": 2}, "list": [9]})
    );

    let left = json!({"p": 1});
    let right = json!({"q": 2});
    assert_eq!(
        merge_values(&base, &[&left, &right]),
        merge_values(&base, &[&right, &left])
    );
}

#[test]
fn rich_text_round_trip() {
    let spans = flatten_runs(
        &parse_inline("**bold** and *italic* and [t](http://x)"),
        &LinkOptions::default(),
    );
    let text: String = spans.iter().map(|span| span.text()).collect();
    assert_eq!(text, "bold and italic and t");
    for span in &spans {
        assert_eq!(span.is_bold(), span.text() == "bold");
        assert_eq!(span.is_italic(), span.text() == "italic");
        assert_eq!(span.is_link(), span.text() == "t");
    }

    let literal = flatten_runs(&parse_inline("**oops"), &LinkOptions::default());
    let text: String = literal.iter().map(|span| span.text()).collect();
    assert_eq!(text, "**oops");
    assert!(literal.iter().all(|span| !span.is_bold() && !span.is_italic()));
}

#[test]
fn dates_and_colors() {
    for value in ["", "present", "Present"] {
        assert_eq!(format_date(value), "Present");
    }
    let formatted = format_date("2023-01");
    assert!(formatted.contains("2023") && formatted.contains("Jan"));

    for target in ColorTarget::ALL {
        let allowed = ColorResolver::new("#123456", [target]);
        let denied = ColorResolver::new("#123456", Vec::<ColorTarget>::new());
        assert_eq!(allowed.get(target, "#fallback"), "#123456");
        assert_eq!(denied.get(target, "#fallback"), "#fallback");
    }
}

#[test]
fn rich_summary_becomes_paragraphs_and_lists() {
    let resume = full_resume();
    let composed = ResumeDocument::from_template_id("classic", resume).compose();
    let summary = composed.section("summary").expect("summary section");
    assert!(matches!(summary.blocks[0], Block::Paragraph(_)));
    assert!(matches!(summary.blocks[1], Block::Spacer(_)));
    match &summary.blocks[2] {
        Block::List(list) => assert_eq!(list.items[0].plain_text(), "Loves COBOL"),
        other => panic!("expected bullet list, got {other:?}"),
    }
}

#[test]
fn composed_tree_serializes() {
    let composed = ResumeDocument::from_template_id("creative", full_resume()).compose();
    let value: Value = serde_json::to_value(&composed).expect("serialize");
    assert!(value["nodes"][0]["ColumnSet"]["columns"].is_array());
    assert_eq!(composed.info.author, "Grace Hopper");
    assert_eq!(composed.info.keywords, ["Compilers"]);
}
