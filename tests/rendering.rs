use resume_render::fonts;
use resume_render::template::{self, LayoutType};
use resume_render::{ResumeDocument, ResumeRecord};
use serde_json::json;
use sha2::{Digest, Sha256};

fn sample_resume() -> ResumeRecord {
    serde_json::from_value(json!({
        "basics": {
            "name": "Ada Lovelace",
            "label": "Analyst",
            "email": "ada@example.com",
            "url": "https://ada.dev",
            "summary": "Wrote the **first** published algorithm.\n\n- Notes on the *Analytical Engine*"
        },
        "work": [{
            "name": "Analytical Engine",
            "position": "Programmer",
            "startDate": "1842-01",
            "highlights": ["Translated Menabrea", "Added notes A through G"]
        }],
        "skills": [{"name": "Mathematics", "keywords": ["Bernoulli numbers"]}],
        "languages": [{"language": "English", "fluency": "Native"}]
    }))
    .expect("sample resume")
}

fn render(template_id: &str) -> Option<Vec<u8>> {
    if !fonts::default_fonts_available() {
        eprintln!(
            "Skipping: bundled fonts missing. Set {} or copy assets/fonts next to the binary.",
            fonts::FONTS_DIR_ENV
        );
        return None;
    }
    let bytes = ResumeDocument::from_template_id(template_id, sample_resume())
        .export()
        .expect("render sample resume")
        .bytes;
    Some(bytes)
}

/// Zeroes timestamps and generated identifiers so two renders can be compared.
fn scrub_pdf(bytes: &[u8]) -> Vec<u8> {
    const KEEP: &[u8] = b"<>/ \n\r\t";

    fn scrub_between(data: &mut [u8], start: &[u8], end: &[u8]) {
        let mut offset = 0;
        while let Some(found) = find(&data[offset..], start) {
            let from = offset + found + start.len();
            let Some(length) = find(&data[from..], end) else {
                break;
            };
            for byte in &mut data[from..from + length] {
                if !KEEP.contains(byte) {
                    *byte = b'0';
                }
            }
            offset = from + length + end.len();
        }
    }

    fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
        haystack
            .windows(needle.len())
            .position(|window| window == needle)
    }

    let mut normalized = bytes.to_vec();
    for (start, end) in [
        ("/CreationDate(", ")"),
        ("/ModDate(", ")"),
        ("/Producer(", ")"),
        ("/ID[", "]"),
        ("<xmp:CreateDate>", "</xmp:CreateDate>"),
        ("<xmp:ModifyDate>", "</xmp:ModifyDate>"),
        ("<xmp:MetadataDate>", "</xmp:MetadataDate>"),
        ("<xmpMM:DocumentID>", "</xmpMM:DocumentID>"),
        ("<xmpMM:InstanceID>", "</xmpMM:InstanceID>"),
        ("<xmpMM:VersionID>", "</xmpMM:VersionID>"),
    ] {
        scrub_between(&mut normalized, start.as_bytes(), end.as_bytes());
    }
    normalized
}

fn normalized_hash(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(scrub_pdf(bytes)).into()
}

#[test]
fn renders_a_pdf() {
    let Some(bytes) = render("classic") else {
        return;
    };
    assert!(bytes.starts_with(b"%PDF"), "output should be a PDF document");
}

#[test]
fn every_layout_renders() {
    if !fonts::default_fonts_available() {
        return;
    }
    for layout in LayoutType::ALL {
        let preset = template::catalog()
            .iter()
            .find(|preset| preset.layout == layout)
            .expect("catalog covers every layout");
        let bytes = ResumeDocument::new(preset.clone(), sample_resume())
            .with_overrides(json!({"showPageNumbers": true}))
            .export()
            .unwrap_or_else(|err| panic!("{:?} failed: {err}", layout))
            .bytes;
        assert!(!bytes.is_empty(), "{:?} produced no output", layout);
    }
}

#[test]
fn rendering_is_deterministic() {
    let (Some(first), Some(second)) = (render("modern"), render("modern")) else {
        return;
    };
    assert_eq!(first.len(), second.len(), "PDF sizes should match");
    assert_eq!(
        normalized_hash(&first),
        normalized_hash(&second),
        "renders must match after metadata normalization"
    );
}

#[cfg(feature = "metadata")]
#[test]
fn info_dictionary_carries_the_author() {
    let Some(bytes) = render("ats") else {
        return;
    };
    let document = lopdf::Document::load_mem(&bytes).expect("parse rendered PDF");
    let info_id = document
        .trailer
        .get(b"Info")
        .and_then(lopdf::Object::as_reference)
        .expect("info reference");
    let info = document
        .get_dictionary(info_id)
        .expect("info dictionary");
    let author = info
        .get(b"Author")
        .and_then(lopdf::Object::as_str)
        .expect("author entry");
    assert_eq!(author, b"Ada Lovelace");
}
