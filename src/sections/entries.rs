//! Per-kind section renderers.

use crate::layout::Block;
use crate::resume::{join_non_empty, CustomGroup};
use crate::richtext::Span;
use crate::settings::{ListStyle, SkillLayout};

use super::{item_key, EntryParts, SectionContext};

pub(super) fn summary(context: &SectionContext<'_>) -> Option<Vec<Block>> {
    let blocks = context.rich_blocks(
        &context.resume.basics.summary,
        context.settings.list_styles.summary,
    );
    (!blocks.is_empty()).then_some(blocks)
}

pub(super) fn work(context: &SectionContext<'_>) -> Option<Vec<Block>> {
    let style = context.settings.list_styles.work;
    let entries = context
        .resume
        .work
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let mut body = context.rich_blocks(&item.summary, style);
            body.extend(context.string_list(&item.highlights, style));
            context.entry(EntryParts {
                key: item_key("work", &item.id, index),
                title: &item.position,
                subtitle: item.name.clone(),
                location: &item.location,
                dates: context.date_range(&item.start_date, &item.end_date),
                url: &item.url,
                body,
            })
        })
        .collect();
    context.entries(entries)
}

pub(super) fn education(context: &SectionContext<'_>) -> Option<Vec<Block>> {
    let settings = context.settings;
    let options = &settings.section_options;
    let style = settings.list_styles.education;
    let entries = context
        .resume
        .education
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let degree = match (item.study_type.trim(), item.area.trim()) {
                ("", area) => area.to_owned(),
                (study_type, "") => study_type.to_owned(),
                (study_type, area) => format!("{} in {}", study_type, area),
            };
            let mut body = Vec::new();
            if options.show_education_score && !item.score.trim().is_empty() {
                body.push(Block::Paragraph(context.body_paragraph(vec![Span::new(
                    format!("Score: {}", item.score.trim()),
                )])));
            }
            body.extend(context.rich_blocks(&item.summary, style));
            if options.show_education_courses {
                body.extend(context.string_list(&item.courses, style));
            }
            context.entry(EntryParts {
                key: item_key("education", &item.id, index),
                title: &degree,
                subtitle: item.institution.clone(),
                location: &item.location,
                dates: context.date_range(&item.start_date, &item.end_date),
                url: &item.url,
                body,
            })
        })
        .collect();
    context.entries(entries)
}

pub(super) fn skills(context: &SectionContext<'_>) -> Option<Vec<Block>> {
    let settings = context.settings;
    let options = &settings.section_options;
    let skills: Vec<_> = context
        .resume
        .skills
        .iter()
        .filter(|skill| !skill.name.trim().is_empty() || !skill.keywords.is_empty())
        .collect();
    if skills.is_empty() {
        return None;
    }

    let label = |name: &str, level: &str| {
        if options.show_skill_level && !level.trim().is_empty() {
            format!("{} ({})", name.trim(), level.trim())
        } else {
            name.trim().to_owned()
        }
    };
    match options.skill_layout {
        SkillLayout::Inline => {
            let names = skills
                .iter()
                .map(|skill| label(&skill.name, &skill.level))
                .filter(|name| !name.is_empty())
                .collect::<Vec<_>>()
                .join(", ");
            Some(vec![Block::Paragraph(
                context.body_paragraph(vec![Span::new(names)]),
            )])
        }
        SkillLayout::List => {
            let items = skills
                .iter()
                .map(|skill| label(&skill.name, &skill.level))
                .filter(|name| !name.is_empty())
                .map(|name| context.body_paragraph(vec![Span::new(name)]))
                .collect();
            let style = match settings.list_styles.skills {
                ListStyle::None => ListStyle::Bullet,
                style => style,
            };
            context.items(items, style)
        }
        SkillLayout::Grouped => {
            let items = skills
                .iter()
                .map(|skill| {
                    let mut spans = Vec::new();
                    let name = label(&skill.name, &skill.level);
                    let keywords = join_non_empty(&skill.keywords, ", ");
                    if !name.is_empty() {
                        let separator = if keywords.is_empty() { "" } else { ": " };
                        spans.push(Span::new(format!("{}{}", name, separator)).bold());
                    }
                    if !keywords.is_empty() {
                        spans.push(Span::new(keywords));
                    }
                    context.body_paragraph(spans)
                })
                .collect();
            context.items(items, settings.list_styles.skills)
        }
    }
}

pub(super) fn projects(context: &SectionContext<'_>) -> Option<Vec<Block>> {
    let settings = context.settings;
    let style = settings.list_styles.projects;
    let entries = context
        .resume
        .projects
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let mut body = context.rich_blocks(&item.description, style);
            body.extend(context.string_list(&item.highlights, style));
            let keywords = join_non_empty(&item.keywords, " · ");
            if settings.section_options.show_project_keywords && !keywords.is_empty() {
                body.push(Block::Paragraph(
                    context.body_paragraph(vec![Span::new(keywords).italic()]),
                ));
            }
            context.entry(EntryParts {
                key: item_key("projects", &item.id, index),
                title: &item.name,
                subtitle: join_non_empty(&item.roles, ", "),
                location: "",
                dates: context.date_range(&item.start_date, &item.end_date),
                url: &item.url,
                body,
            })
        })
        .collect();
    context.entries(entries)
}

pub(super) fn certificates(context: &SectionContext<'_>) -> Option<Vec<Block>> {
    let entries = context
        .resume
        .certificates
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            context.entry(EntryParts {
                key: item_key("certificates", &item.id, index),
                title: &item.name,
                subtitle: item.issuer.clone(),
                dates: context.date(&item.date),
                url: &item.url,
                ..EntryParts::default()
            })
        })
        .collect();
    context.entries(entries)
}

pub(super) fn languages(context: &SectionContext<'_>) -> Option<Vec<Block>> {
    let settings = context.settings;
    let items = context
        .resume
        .languages
        .iter()
        .filter(|item| !item.language.trim().is_empty())
        .map(|item| {
            let fluency = item.fluency.trim();
            let mut spans = vec![Span::new(item.language.trim())];
            if settings.section_options.show_language_fluency && !fluency.is_empty() {
                spans[0] = spans[0].clone().bold();
                spans.push(Span::new(format!(": {}", fluency)));
            }
            context.body_paragraph(spans)
        })
        .collect();
    context.items(items, settings.list_styles.languages)
}

pub(super) fn interests(context: &SectionContext<'_>) -> Option<Vec<Block>> {
    let settings = context.settings;
    let items = context
        .resume
        .interests
        .iter()
        .filter(|item| !item.name.trim().is_empty())
        .map(|item| {
            let keywords = join_non_empty(&item.keywords, ", ");
            let mut spans = vec![Span::new(item.name.trim())];
            if settings.section_options.show_interest_keywords && !keywords.is_empty() {
                spans[0] = spans[0].clone().bold();
                spans.push(Span::new(format!(": {}", keywords)));
            }
            context.body_paragraph(spans)
        })
        .collect();
    context.items(items, settings.list_styles.interests)
}

pub(super) fn publications(context: &SectionContext<'_>) -> Option<Vec<Block>> {
    let show_summary = context.settings.section_options.show_publication_summary;
    let entries = context
        .resume
        .publications
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let body = if show_summary {
                context.rich_blocks(&item.summary, context.settings.list_styles.summary)
            } else {
                Vec::new()
            };
            context.entry(EntryParts {
                key: item_key("publications", &item.id, index),
                title: &item.name,
                subtitle: item.publisher.clone(),
                dates: context.date(&item.release_date),
                url: &item.url,
                body,
                ..EntryParts::default()
            })
        })
        .collect();
    context.entries(entries)
}

pub(super) fn awards(context: &SectionContext<'_>) -> Option<Vec<Block>> {
    let show_summary = context.settings.section_options.show_award_summary;
    let entries = context
        .resume
        .awards
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let body = if show_summary {
                context.rich_blocks(&item.summary, context.settings.list_styles.summary)
            } else {
                Vec::new()
            };
            context.entry(EntryParts {
                key: item_key("awards", &item.id, index),
                title: &item.title,
                subtitle: item.awarder.clone(),
                dates: context.date(&item.date),
                body,
                ..EntryParts::default()
            })
        })
        .collect();
    context.entries(entries)
}

pub(super) fn references(context: &SectionContext<'_>) -> Option<Vec<Block>> {
    let references: Vec<_> = context
        .resume
        .references
        .iter()
        .filter(|item| !item.name.trim().is_empty() || !item.reference.trim().is_empty())
        .collect();
    if references.is_empty() {
        return None;
    }
    if !context.settings.section_options.show_references {
        return Some(vec![Block::Paragraph(context.body_paragraph(vec![
            Span::new("Available upon request.").italic(),
        ]))]);
    }

    let entries = references
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let mut body = Vec::new();
            if !item.reference.trim().is_empty() {
                body.push(Block::Paragraph(context.body_paragraph(vec![
                    Span::new(item.reference.trim()).italic(),
                ])));
            }
            if !item.name.trim().is_empty() {
                body.push(Block::Paragraph(context.body_paragraph(vec![
                    Span::new(item.name.trim()).bold(),
                ])));
            }
            (!body.is_empty()).then(|| Block::Entry {
                key: item_key("references", &item.id, index),
                blocks: body,
            })
        })
        .collect();
    context.entries(entries)
}

pub(super) fn custom(context: &SectionContext<'_>, group: &CustomGroup) -> Option<Vec<Block>> {
    let style = context.settings.list_styles.custom;
    let entries = group
        .items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let dates = if item.start_date.trim().is_empty() && item.end_date.trim().is_empty() {
                context.date(&item.date)
            } else {
                context.date_range(&item.start_date, &item.end_date)
            };
            let mut body = context.rich_blocks(&item.summary, style);
            body.extend(context.string_list(&item.highlights, style));
            context.entry(EntryParts {
                key: item_key(&group.id, &item.id, index),
                title: &item.title,
                subtitle: item.subtitle.clone(),
                location: &item.location,
                dates,
                url: &item.url,
                body,
            })
        })
        .collect();
    context.entries(entries)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::color::ColorResolver;
    use crate::layout::{Block, LayoutNode};
    use crate::resume::ResumeRecord;
    use crate::sections::render;
    use crate::settings::{merge, LayoutSettings};

    fn blocks(id: &str, resume: serde_json::Value, overrides: serde_json::Value) -> Vec<Block> {
        let record: ResumeRecord = serde_json::from_value(resume).expect("resume");
        let settings = merge::resolve(&LayoutSettings::default(), &[&overrides]);
        match render(id, &record, &settings, &ColorResolver::default()) {
            Some(LayoutNode::Section(section)) => section.blocks,
            other => panic!("expected a section, got {other:?}"),
        }
    }

    fn text(blocks: &[Block]) -> Vec<String> {
        blocks.iter().map(Block::plain_text).collect()
    }

    #[test]
    fn grouped_skills_bold_the_name() {
        let blocks = blocks(
            "skills",
            json!({"skills": [{"name": "Rust", "level": "Expert", "keywords": ["tokio", "serde"]}]}),
            json!({}),
        );
        match &blocks[0] {
            Block::Paragraph(paragraph) => {
                assert_eq!(paragraph.plain_text(), "Rust: tokio, serde");
                assert!(paragraph.spans()[0].is_bold());
            }
            other => panic!("expected paragraph, got {other:?}"),
        }

        let with_level = blocks_for_levels();
        assert_eq!(with_level, ["Rust (Expert), Go"]);
    }

    fn blocks_for_levels() -> Vec<String> {
        text(&blocks(
            "skills",
            json!({"skills": [{"name": "Rust", "level": "Expert"}, {"name": "Go"}]}),
            json!({"sectionOptions": {"showSkillLevel": true, "skillLayout": "inline"}}),
        ))
    }

    #[test]
    fn education_combines_degree_and_area() {
        let blocks = blocks(
            "education",
            json!({"education": [{
                "institution": "MIT", "studyType": "BSc", "area": "Physics",
                "score": "4.0", "courses": ["Optics"]
            }]}),
            json!({"sectionOptions": {"showEducationCourses": true}}),
        );
        let text = text(&blocks).join("\n");
        assert!(text.contains("BSc in Physics"));
        assert!(text.contains("MIT"));
        assert!(text.contains("Score: 4.0"));
        assert!(text.contains("Optics"));
    }

    #[test]
    fn languages_toggle_fluency() {
        let resume = json!({"languages": [{"language": "French", "fluency": "Native"}]});
        assert_eq!(text(&blocks("languages", resume.clone(), json!({}))), ["French: Native"]);
        assert_eq!(
            text(&blocks(
                "languages",
                resume,
                json!({"sectionOptions": {"showLanguageFluency": false}})
            )),
            ["French"]
        );
    }

    #[test]
    fn hidden_references_collapse_to_a_note() {
        let resume = json!({"references": [{"name": "Grace", "reference": "Great."}]});
        let shown = text(&blocks("references", resume.clone(), json!({}))).join("\n");
        assert!(shown.contains("Great."));
        assert!(shown.contains("Grace"));

        let hidden = blocks(
            "references",
            resume,
            json!({"sectionOptions": {"showReferences": false}}),
        );
        assert_eq!(text(&hidden), ["Available upon request."]);
    }

    #[test]
    fn entries_are_spaced_and_keyed() {
        let blocks = blocks(
            "awards",
            json!({"awards": [{"title": "Best Paper", "date": "2019-05"}, {"title": "Fellow"}]}),
            json!({"entrySpacing": 4.0}),
        );
        assert_eq!(blocks.len(), 3);
        assert!(matches!(blocks[1], Block::Spacer(gap) if gap == 4.0));
        match &blocks[2] {
            Block::Entry { key, .. } => assert_eq!(key, "awards-1"),
            other => panic!("expected entry, got {other:?}"),
        }
    }

    #[test]
    fn dates_below_the_title() {
        let blocks = blocks(
            "certificates",
            json!({"certificates": [{"name": "CKA", "issuer": "CNCF", "date": "2021-04"}]}),
            json!({"sectionOptions": {"datePosition": "below"}}),
        );
        match &blocks[0] {
            Block::Entry { blocks, .. } => {
                assert_eq!(text(blocks), ["CKA", "CNCF", "Apr 2021"]);
            }
            other => panic!("expected entry, got {other:?}"),
        }
    }

    #[test]
    fn resume_fields_are_not_parsed_as_markup() {
        let blocks = blocks(
            "projects",
            json!({"projects": [{"name": "Planner", "keywords": ["A* search", "Rust"]}]}),
            json!({}),
        );
        let Block::Entry { blocks, .. } = &blocks[0] else {
            panic!("expected entry, got {:?}", blocks[0]);
        };
        let keywords = match blocks.last() {
            Some(Block::Paragraph(paragraph)) => paragraph,
            other => panic!("expected keyword paragraph, got {other:?}"),
        };
        assert_eq!(keywords.plain_text(), "A* search · Rust");
        assert!(keywords.spans().iter().all(|span| span.is_italic()));

        let languages = text(&blocks_of(
            "languages",
            json!({"languages": [{"language": "C*", "fluency": "**fluent"}]}),
        ));
        assert_eq!(languages, ["C*: **fluent"]);

        let references = text(&blocks_of(
            "references",
            json!({"references": [{"name": "*Grace*", "reference": "5* colleague"}]}),
        ));
        assert_eq!(references, ["5* colleague\n*Grace*"]);
    }

    fn blocks_of(id: &str, resume: serde_json::Value) -> Vec<Block> {
        blocks(id, resume, json!({}))
    }

    #[test]
    fn grouped_skills_follow_the_body_style() {
        let blocks = blocks(
            "skills",
            json!({"skills": [{"name": "Rust", "keywords": ["tokio"]}]}),
            json!({"body": {"italic": true, "color": "#123456"}}),
        );
        match &blocks[0] {
            Block::Paragraph(paragraph) => {
                assert!(paragraph.spans().iter().all(|span| span.is_italic()));
                assert!(paragraph.spans()[0].is_bold());
                assert_eq!(paragraph.color(), "#123456");
            }
            other => panic!("expected paragraph, got {other:?}"),
        }
    }
}
