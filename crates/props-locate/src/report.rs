//! Found/missing reports written after a locate run.

use std::path::Path;

use crate::driver::LookupOutcome;

/// Lookup outcomes split by result, each half in plan order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LocateReport {
    pub found: Vec<LookupOutcome>,
    pub missing: Vec<LookupOutcome>,
}

impl LocateReport {
    pub fn from_outcomes(outcomes: Vec<LookupOutcome>) -> Self {
        let (found, missing) = outcomes.into_iter().partition(LookupOutcome::is_found);
        Self { found, missing }
    }

    /// Total number of keys looked up.
    pub fn total(&self) -> usize {
        self.found.len() + self.missing.len()
    }

    /// Report of found keys with their search output, if any were found.
    ///
    /// Starts with the search command of the first found key.
    pub fn found_text(&self) -> Option<String> {
        let first = self.found.first()?;
        let mut blocks = vec![format!("Searching command: {}\n\n", first.command)];
        for outcome in &self.found {
            let context = outcome.context.as_deref().unwrap_or_default();
            blocks.push(format!("{}\n{}\n", outcome.label, context));
        }
        Some(blocks.join("\n"))
    }

    /// Report listing missing keys, one per line, if any are missing.
    pub fn missing_text(&self) -> Option<String> {
        let first = self.missing.first()?;
        let mut lines = vec![format!("Searching command: {}\n\n", first.command)];
        lines.extend(self.missing.iter().map(|o| o.label.clone()));
        Some(lines.join("\n"))
    }
}

/// Report file names derived from the input file: `<name>_found.txt` and
/// `<name>_missing.txt`.
pub fn report_file_names(input: &Path) -> (String, String) {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "properties".to_string());
    (format!("{name}_found.txt"), format!("{name}_missing.txt"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(label: &str, context: Option<&str>) -> LookupOutcome {
        LookupOutcome {
            label: label.into(),
            command: format!("git grep -c \"{label}\""),
            context: context.map(str::to_string),
        }
    }

    #[test]
    fn splits_found_and_missing() {
        let report = LocateReport::from_outcomes(vec![
            outcome("a", Some("A.java:2\n")),
            outcome("b", None),
            outcome("c", Some("C.jsp:1\n")),
        ]);
        assert_eq!(report.found.len(), 2);
        assert_eq!(report.missing.len(), 1);
        assert_eq!(report.total(), 3);
    }

    #[test]
    fn found_report_layout() {
        let report = LocateReport::from_outcomes(vec![
            outcome("a", Some("A.java:2\n")),
            outcome("c", Some("C.jsp:1\n")),
        ]);
        assert_eq!(
            report.found_text().unwrap(),
            "Searching command: git grep -c \"a\"\n\n\na\nA.java:2\n\n\nc\nC.jsp:1\n\n"
        );
        assert!(report.missing_text().is_none());
    }

    #[test]
    fn missing_report_layout() {
        let report = LocateReport::from_outcomes(vec![outcome("x", None), outcome("y", None)]);
        assert_eq!(
            report.missing_text().unwrap(),
            "Searching command: git grep -c \"x\"\n\n\nx\ny"
        );
        assert!(report.found_text().is_none());
    }

    #[test]
    fn names_from_input_file() {
        let (found, missing) = report_file_names(Path::new("i18n/messages.properties"));
        assert_eq!(found, "messages.properties_found.txt");
        assert_eq!(missing, "messages.properties_missing.txt");
    }
}
