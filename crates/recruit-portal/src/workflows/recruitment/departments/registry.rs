use super::aliases::DEPARTMENT_ALIASES;
use super::{Department, DepartmentCode};
use std::collections::{BTreeSet, HashMap};

/// Immutable lookup tables for department identifiers.
///
/// Built once at startup and shared by reference; nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct DepartmentRegistry {
    departments: Vec<Department>,
    canonical: HashMap<&'static str, Department>,
    aliases: HashMap<&'static str, Department>,
    folded: HashMap<String, Department>,
}

impl Default for DepartmentRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl DepartmentRegistry {
    pub fn standard() -> Self {
        let departments = Department::ordered().to_vec();
        let canonical = departments
            .iter()
            .map(|department| (department.code(), *department))
            .collect::<HashMap<_, _>>();
        let aliases = DEPARTMENT_ALIASES.iter().copied().collect::<HashMap<_, _>>();

        let mut folded = HashMap::new();
        for (spelling, department) in canonical.iter().chain(aliases.iter()) {
            folded.entry(spelling.to_lowercase()).or_insert(*department);
        }

        Self {
            departments,
            canonical,
            aliases,
            folded,
        }
    }

    /// Resolve any spelling to its canonical code.
    ///
    /// Tried in order: canonical code, alias, alias ignoring case, then the same three after
    /// turning whitespace runs into hyphens, then again after turning underscores into hyphens.
    /// Input that matches nothing comes back unchanged as [`DepartmentCode::Unrecognized`].
    pub fn normalize(&self, raw: &str) -> DepartmentCode {
        let hyphenated = raw.split_whitespace().collect::<Vec<_>>().join("-");
        let underscored = hyphenated.replace('_', "-");

        let found = [raw.trim(), hyphenated.as_str(), underscored.as_str()]
            .into_iter()
            .find_map(|candidate| self.lookup(candidate));

        match found {
            Some(department) => DepartmentCode::Known(department),
            None => DepartmentCode::Unrecognized(raw.to_string()),
        }
    }

    fn lookup(&self, candidate: &str) -> Option<Department> {
        if candidate.is_empty() {
            return None;
        }

        self.canonical
            .get(candidate)
            .or_else(|| self.aliases.get(candidate))
            .or_else(|| self.folded.get(&candidate.to_lowercase()))
            .copied()
    }

    pub fn is_valid(&self, raw: &str) -> bool {
        self.normalize(raw).is_known()
    }

    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    pub fn all_codes(&self) -> BTreeSet<DepartmentCode> {
        self.departments
            .iter()
            .copied()
            .map(DepartmentCode::Known)
            .collect()
    }

    /// Normalize a list of raw identifiers, keeping the first occurrence of each code.
    pub fn normalize_all<I, S>(&self, raw: I) -> Vec<DepartmentCode>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = BTreeSet::new();
        raw.into_iter()
            .map(|value| self.normalize(value.as_ref()))
            .filter(|code| seen.insert(code.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> DepartmentRegistry {
        DepartmentRegistry::standard()
    }

    #[test]
    fn canonical_codes_resolve_to_themselves() {
        let registry = registry();
        for department in Department::ordered() {
            assert_eq!(
                registry.normalize(department.code()),
                DepartmentCode::Known(department)
            );
        }
    }

    #[test]
    fn every_alias_maps_to_a_registry_department() {
        let registry = registry();
        let codes = registry.all_codes();
        for (alias, department) in DEPARTMENT_ALIASES {
            let code = registry.normalize(alias);
            assert_eq!(code, DepartmentCode::Known(*department), "alias {alias}");
            assert!(codes.contains(&code));
        }
    }

    #[test]
    fn legacy_spellings_resolve() {
        let registry = registry();
        let cases = [
            ("aiMl", Department::AiMl),
            ("AIML", Department::AiMl),
            ("security", Department::Cybersec),
            ("management", Department::Events),
            ("Social Media", Department::SocialMedia),
            ("game_dev", Department::GameDev),
            ("OPEN_SOURCE", Department::OpenSource),
            ("  dev  ", Department::Dev),
            ("Event Management", Department::Events),
        ];
        for (raw, expected) in cases {
            assert_eq!(registry.normalize(raw), DepartmentCode::Known(expected), "{raw}");
        }
    }

    #[test]
    fn unknown_identifiers_pass_through_unchanged() {
        let registry = registry();
        assert_eq!(
            registry.normalize("Underwater Basket Weaving"),
            DepartmentCode::Unrecognized("Underwater Basket Weaving".to_string())
        );
        assert_eq!(
            registry.normalize(""),
            DepartmentCode::Unrecognized(String::new())
        );
        assert!(!registry.is_valid("finance"));
        assert!(registry.is_valid("cyber_security"));
    }

    #[test]
    fn normalize_is_idempotent() {
        let registry = registry();
        let samples = [
            "ai-ml", "aiMl", "SECURITY", "social media", "web_dev", "  ", "finance", "Game Dev",
            "ui_ux", "\u{feff}dev",
        ];
        for raw in samples {
            let once = registry.normalize(raw);
            let twice = registry.normalize(once.as_str());
            assert_eq!(once, twice, "{raw:?}");
        }
    }

    #[test]
    fn normalize_all_collapses_aliases_of_the_same_department() {
        let registry = registry();
        let codes = registry.normalize_all(["aiMl", "dev", "ai-ml", "development", "finance"]);
        assert_eq!(
            codes,
            vec![
                DepartmentCode::Known(Department::AiMl),
                DepartmentCode::Known(Department::Dev),
                DepartmentCode::Unrecognized("finance".to_string()),
            ]
        );
    }

    #[test]
    fn all_codes_lists_ten_departments() {
        assert_eq!(registry().all_codes().len(), 10);
    }
}
