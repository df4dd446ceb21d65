//! Font discovery and loading.
//!
//! Families are looked up as `<Family>-<Face>.ttf` files (spaces removed from the family
//! name) in the first usable fonts directory: `$RESUME_RENDER_FONTS_DIR`, `assets/fonts`
//! next to the executable, then `assets/fonts` in the crate root.  The bundled Roboto
//! family is the fallback for every face a settings-selected family does not provide.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::Error;
use genpdf::fonts::{FontData, FontFamily};
use log::{debug, warn};

use crate::settings::FontSet;

/// Name of the bundled font family.
pub const DEFAULT_FONT_FAMILY_NAME: &str = "Roboto";

/// Environment variable overriding the fonts directory.
pub const FONTS_DIR_ENV: &str = "RESUME_RENDER_FONTS_DIR";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Face {
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl Face {
    const ALL: [Face; 4] = [Face::Regular, Face::Bold, Face::Italic, Face::BoldItalic];

    fn suffix(self) -> &'static str {
        match self {
            Face::Regular => "Regular",
            Face::Bold => "Bold",
            Face::Italic => "Italic",
            Face::BoldItalic => "BoldItalic",
        }
    }

    /// Faces to try, in order, when a family lacks this one.
    fn fallbacks(self) -> &'static [Face] {
        match self {
            Face::Regular => &[Face::Regular],
            Face::Bold => &[Face::Bold, Face::Regular],
            Face::Italic => &[Face::Italic, Face::Regular],
            Face::BoldItalic => &[Face::BoldItalic, Face::Bold, Face::Italic, Face::Regular],
        }
    }
}

fn face_path(directory: &Path, family: &str, face: Face) -> PathBuf {
    let stem: String = family.chars().filter(|c| !c.is_whitespace()).collect();
    directory.join(format!("{}-{}.ttf", stem, face.suffix()))
}

fn font_directory_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(path) = env::var(FONTS_DIR_ENV) {
        if !path.trim().is_empty() {
            candidates.push(PathBuf::from(path));
        }
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            let candidate = bin_dir.join("assets/fonts");
            if !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
    }

    let manifest_candidate = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts");
    if !candidates.contains(&manifest_candidate) {
        candidates.push(manifest_candidate);
    }

    candidates
}

fn missing_default_faces(directory: &Path) -> Vec<PathBuf> {
    Face::ALL
        .iter()
        .map(|face| face_path(directory, DEFAULT_FONT_FAMILY_NAME, *face))
        .filter(|candidate| !candidate.is_file())
        .collect()
}

/// Returns the first directory that holds the complete bundled family.
pub fn resolve_font_directory() -> Result<PathBuf, Error> {
    let mut attempts = Vec::new();

    for candidate in font_directory_candidates() {
        let exists = candidate.is_dir();
        let missing = missing_default_faces(&candidate);

        if exists && missing.is_empty() {
            return Ok(candidate);
        }

        let reason = if !exists {
            "directory missing".to_owned()
        } else {
            let names = missing
                .iter()
                .map(|path| path.file_name().unwrap_or_default().to_string_lossy())
                .collect::<Vec<_>>()
                .join(", ");
            format!("missing files [{}]", names)
        };
        attempts.push(format!("{} ({})", candidate.display(), reason));
    }

    Err(Error::new(
        format!(
            "Unable to locate the {} font family. Checked: {}. Set {} to a directory with the font files.",
            DEFAULT_FONT_FAMILY_NAME,
            attempts.join(", "),
            FONTS_DIR_ENV
        ),
        io::Error::new(io::ErrorKind::NotFound, "fonts directory not found"),
    ))
}

fn load_face(directory: &Path, family: &str, face: Face) -> Option<Result<FontData, Error>> {
    face.fallbacks().iter().find_map(|candidate| {
        let path = face_path(directory, family, *candidate);
        path.is_file().then(|| {
            FontData::load(&path, None).map_err(|err| {
                Error::new(
                    format!("Failed to load font file {}: {}", path.display(), err),
                    io::Error::new(io::ErrorKind::InvalidData, err.to_string()),
                )
            })
        })
    })
}

/// Loads one face of `family`, falling back to the bundled family when it is not installed.
fn load_face_or_default(directory: &Path, family: &str, face: Face) -> Result<FontData, Error> {
    if family != DEFAULT_FONT_FAMILY_NAME {
        match load_face(directory, family, face) {
            Some(Ok(data)) => return Ok(data),
            Some(Err(err)) => warn!("{}; using {} instead", err, DEFAULT_FONT_FAMILY_NAME),
            None => warn!(
                "Font family `{}` has no {} face in {}; using {} instead",
                family,
                face.suffix(),
                directory.display(),
                DEFAULT_FONT_FAMILY_NAME
            ),
        }
    }

    load_face(directory, DEFAULT_FONT_FAMILY_NAME, face).unwrap_or_else(|| {
        Err(Error::new(
            format!(
                "{} face of {} is missing",
                face.suffix(),
                DEFAULT_FONT_FAMILY_NAME
            ),
            io::Error::new(io::ErrorKind::NotFound, "font file not found"),
        ))
    })
}

/// Builds the genpdf family for a font selection.
///
/// Each slot of the genpdf family is filled from the family [`FontSet::resolve`] picks for
/// that weight/slant combination.
pub fn font_family_for(set: &FontSet) -> Result<FontFamily<FontData>, Error> {
    let directory = resolve_font_directory()?;
    debug!("Loading fonts {:?} from {}", set.families(), directory.display());

    Ok(FontFamily {
        regular: load_face_or_default(&directory, set.resolve(false, false), Face::Regular)?,
        bold: load_face_or_default(&directory, set.resolve(true, false), Face::Bold)?,
        italic: load_face_or_default(&directory, set.resolve(false, true), Face::Italic)?,
        bold_italic: load_face_or_default(&directory, set.resolve(true, true), Face::BoldItalic)?,
    })
}

/// Indicates whether the bundled family is present on disk.
pub fn default_fonts_available() -> bool {
    resolve_font_directory().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_paths_drop_spaces() {
        let path = face_path(Path::new("/fonts"), "Open Sans", Face::BoldItalic);
        assert_eq!(path, Path::new("/fonts/OpenSans-BoldItalic.ttf"));
    }

    #[test]
    fn bold_italic_falls_back_through_bold() {
        assert_eq!(
            Face::BoldItalic.fallbacks(),
            &[Face::BoldItalic, Face::Bold, Face::Italic, Face::Regular]
        );
        assert_eq!(Face::Regular.fallbacks(), &[Face::Regular]);
    }

    #[test]
    fn missing_family_is_not_found() {
        let directory = env::temp_dir().join("resume-render-no-fonts");
        assert!(load_face(&directory, "Nope", Face::Regular).is_none());
    }
}
