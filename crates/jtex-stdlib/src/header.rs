//! Document header generation
//!
//! A converted JTeX document is usually a document body without a preamble.
//! [generate_header] wraps such a body into a complete LaTeX document.
//! Package imports in the body are moved into the preamble, and the necessary packages
//!     are loaded at the start of the document unless the document loaded them itself.

use std::sync::OnceLock;

use regex::Regex;

/// Header generation options.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HeaderOptions {
    pub document_class: String,
    pub class_options: Vec<String>,
    /// Packages that are loaded if the document does not load them.
    pub necessary_packages: Vec<String>,
}

impl Default for HeaderOptions {
    fn default() -> Self {
        HeaderOptions {
            document_class: "article".into(),
            class_options: vec!["12pt".into()],
            necessary_packages: vec![],
        }
    }
}

fn use_package_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"\\usepackage\s*(\[\s*[^\]]*\s*\])?\{\s*[^}]*\s*\}")
            .expect("the package import pattern is a valid regex")
    })
}

/// Wraps a document body in a generated header.
///
/// A body that already contains `\documentclass` is returned unchanged.
pub fn generate_header(body: &str, options: &HeaderOptions) -> String {
    if body.contains(r"\documentclass") {
        return body.to_string();
    }
    let regex = use_package_regex();
    let imports: Vec<&str> = regex.find_iter(body).map(|m| m.as_str()).collect();
    let body = regex.replace_all(body, "");

    let mut out = String::new();
    out.push_str("% This header was automatically generated by JTeX\n");
    out.push_str("% For more complex functionality, please generate the header yourself\n");
    if options.class_options.is_empty() {
        out.push_str(&format!["\\documentclass{{{}}}\n", options.document_class]);
    } else {
        out.push_str(&format![
            "\\documentclass[{}]{{{}}}\n",
            options.class_options.join(","),
            options.document_class
        ]);
    }
    for import in imports {
        out.push('\n');
        out.push_str(import);
    }
    out.push_str("\n\n\\makeatletter");
    out.push_str("\n\\AddToHook{begindocument/before}\n{");
    for package in &options.necessary_packages {
        out.push_str(&format!["\n\t\\@ifpackageloaded{{{package}}}{{\\relax}}\n\t{{"]);
        out.push_str(&format!["\n\t\t\\usepackage{{{package}}}\n\t}}"]);
    }
    out.push_str("\n}");
    out.push_str("\n\\makeatother\n");
    out.push_str("\n\\begin{document}\n\n");
    out.push_str(body.trim_start_matches('\n'));
    out.push_str("\n\n\\end{document}");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_with_class_are_unchanged() {
        let body = "\\documentclass{book}\n\\usepackage{a}\nText";
        assert_eq!(generate_header(body, &Default::default()), body);
    }

    #[test]
    fn full_header() {
        let body = "\n\\usepackage{amsmath, tikz}\n\\usepackage[utf8]{inputenc}\nHello $x$";
        let options = HeaderOptions {
            necessary_packages: vec!["amsmath".into()],
            ..Default::default()
        };
        let want = "% This header was automatically generated by JTeX\n\
            % For more complex functionality, please generate the header yourself\n\
            \\documentclass[12pt]{article}\n\
            \n\\usepackage{amsmath, tikz}\
            \n\\usepackage[utf8]{inputenc}\
            \n\n\\makeatletter\
            \n\\AddToHook{begindocument/before}\n{\
            \n\t\\@ifpackageloaded{amsmath}{\\relax}\n\t{\
            \n\t\t\\usepackage{amsmath}\n\t}\
            \n}\
            \n\\makeatother\n\
            \n\\begin{document}\n\n\
            \nHello $x$\
            \n\n\\end{document}";
        assert_eq!(generate_header(body, &options), want);
    }

    #[test]
    fn no_imports_and_custom_class() {
        let options = HeaderOptions {
            document_class: "report".into(),
            class_options: vec![],
            necessary_packages: vec![],
        };
        let got = generate_header("Text", &options);
        assert!(got.contains("\\documentclass{report}\n\n\n\\makeatletter"));
        assert!(got.contains("\\begin{document}\n\nText\n\n\\end{document}"));
    }

    #[test]
    fn import_regex() {
        let regex = use_package_regex();
        let found: Vec<&str> = regex
            .find_iter(r"a \usepackage {x} b \usepackage[ opt ]{ y, z } c \usepackage")
            .map(|m| m.as_str())
            .collect();
        assert_eq!(found, vec![r"\usepackage {x}", r"\usepackage[ opt ]{ y, z }"]);
    }
}
