use crate::workflows::checklist::domain::Program;
use regex::Regex;
use std::sync::OnceLock;

/// Folds free-text program names, in either catalog language, into the
/// known program tags. Unrecognised text is kept verbatim.
pub fn normalize_program(value: &str) -> Program {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Program::Unspecified;
    }

    program_patterns()
        .iter()
        .find(|(_, pattern)| pattern.is_match(trimmed))
        .map(|(program, _)| program.clone())
        .unwrap_or_else(|| Program::Other(trimmed.to_string()))
}

/// Spreadsheet-style truthiness: `true`, `1`, `y` and `yes`, case-insensitive.
pub(crate) fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "y" | "yes"
    )
}

pub(crate) fn normalize_header(value: &str) -> String {
    value
        .replace(['\u{feff}', '\u{200b}'], "")
        .trim()
        .to_ascii_lowercase()
}

fn program_patterns() -> &'static [(Program, Regex)] {
    static PATTERNS: OnceLock<Vec<(Program, Regex)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let table = [
            (
                Program::ProfessionalLlm,
                r"(?i)法碩|法學院.*在職|碩士在職|^llm\b|llm professional|professional (llm|track)",
            ),
            (Program::LawScience, r"(?i)法科|科際|interdisciplinary|law[- ]science"),
            (
                Program::LawMasters,
                r"(?i)(法律(學系)?|法律系).*碩士班|^碩士班$|law master'?s|^master'?s program$",
            ),
            (Program::ExternalCollege, r"(?i)外院|外系|跨院|external|other college"),
            (Program::Transfer, r"(?i)抵免|免修|transfer|waiver"),
        ];
        table
            .into_iter()
            .map(|(program, pattern)| {
                (program, Regex::new(pattern).expect("program pattern compiles"))
            })
            .collect()
    })
}

#[cfg(test)]
pub(crate) fn header_for_tests(value: &str) -> String {
    normalize_header(value)
}
