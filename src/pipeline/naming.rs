//! Output filenames: `base + [page infix] + suffix + extension`.
//!
//! Names depend only on the input name and the configuration. When two
//! inputs would produce the same name (`scan.png` and `scan.jpg` with PNG
//! output, say) the later one gets `_2`, `_3`, … before the extension, in
//! batch order, so nothing is overwritten and reruns produce the same names.

use crate::config::{NamingSuffix, PageNamingLayout};
use std::collections::HashSet;

/// `photo_inverted.png`
pub fn image_filename(base: &str, suffix: NamingSuffix, extension: &str) -> String {
    format!("{base}{}.{extension}", suffix.as_str())
}

/// `slide_page_2_inverted.png`, with `page` 1-indexed.
pub fn page_filename(
    base: &str,
    page: usize,
    layout: PageNamingLayout,
    suffix: NamingSuffix,
    extension: &str,
) -> String {
    image_filename(&layout.apply(base, page), suffix, extension)
}

/// `report_inverted`: the output base name, used as the PDF title.
pub fn document_title(base: &str, suffix: NamingSuffix) -> String {
    format!("{base}{}", suffix.as_str())
}

/// `report_inverted.pdf`
pub fn document_filename(base: &str, suffix: NamingSuffix) -> String {
    format!("{}.pdf", document_title(base, suffix))
}

/// Hands out filenames that are unique within one batch.
#[derive(Debug, Default)]
pub struct UniqueNames {
    taken: HashSet<String>,
}

impl UniqueNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve `name`, or the first free `stem_N.ext` (N ≥ 2) if it is taken.
    pub fn claim(&mut self, name: String) -> String {
        if self.taken.insert(name.clone()) {
            return name;
        }
        let (stem, ext) = match name.rfind('.') {
            Some(dot) if dot > 0 => (&name[..dot], &name[dot..]),
            _ => (name.as_str(), ""),
        };
        let mut n = 2;
        loop {
            let candidate = format!("{stem}_{n}{ext}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}
