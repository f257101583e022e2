use regex::Regex;

/// Translates a shell-style glob (`*`, `?`) into an anchored regex. The
/// output is always a valid pattern: everything else is escaped literally.
pub fn glob_to_regex(glob: &str) -> String {
    let mut pattern = String::from("^");
    for ch in glob.chars() {
        match ch {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            other => pattern.push_str(&regex::escape(&other.to_string())),
        }
    }
    pattern.push('$');
    pattern
}

/// Declarative required-file predicate evaluated against a directory's file
/// names during the search phase.
#[derive(Debug, Clone)]
pub enum FilePredicate {
    Name(String),
    Glob { pattern: String, regex: Regex },
    AnyOf(Vec<FilePredicate>),
    AllOf(Vec<FilePredicate>),
}

impl FilePredicate {
    pub fn name(file_name: &str) -> Self {
        FilePredicate::Name(file_name.to_string())
    }

    /// The default rules all key on exact file names; `glob` and `all_of`
    /// exist for ecosystems keyed by patterns or file combinations (msbuild
    /// `*.csproj`, conda `environment.yml` plus a lockfile).
    pub fn glob(pattern: &str) -> Self {
        let regex = Regex::new(&glob_to_regex(pattern))
            .expect("glob translation always yields a valid regex");
        FilePredicate::Glob {
            pattern: pattern.to_string(),
            regex,
        }
    }

    pub fn any_of(predicates: Vec<FilePredicate>) -> Self {
        FilePredicate::AnyOf(predicates)
    }

    pub fn all_of(predicates: Vec<FilePredicate>) -> Self {
        FilePredicate::AllOf(predicates)
    }

    pub fn matches(&self, file_names: &[String]) -> bool {
        match self {
            FilePredicate::Name(name) => file_names.iter().any(|f| f == name),
            FilePredicate::Glob { regex, .. } => file_names.iter().any(|f| regex.is_match(f)),
            FilePredicate::AnyOf(predicates) => predicates.iter().any(|p| p.matches(file_names)),
            FilePredicate::AllOf(predicates) => predicates.iter().all(|p| p.matches(file_names)),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            FilePredicate::Name(name) => name.clone(),
            FilePredicate::Glob { pattern, .. } => pattern.clone(),
            FilePredicate::AnyOf(predicates) => {
                let parts: Vec<String> = predicates.iter().map(|p| p.describe()).collect();
                format!("any of [{}]", parts.join(", "))
            }
            FilePredicate::AllOf(predicates) => {
                let parts: Vec<String> = predicates.iter().map(|p| p.describe()).collect();
                format!("all of [{}]", parts.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_name_predicate() {
        let predicate = FilePredicate::name("package.json");
        assert!(predicate.matches(&names(&["README.md", "package.json"])));
        assert!(!predicate.matches(&names(&["package-lock.json"])));
    }

    #[test]
    fn test_glob_predicate() {
        let predicate = FilePredicate::glob("*.csproj");
        assert!(predicate.matches(&names(&["App.csproj"])));
        assert!(!predicate.matches(&names(&["App.csproj.bak"])));
        // glob metacharacters only; dots are literal
        assert!(!FilePredicate::glob("go.mod").matches(&names(&["goXmod"])));
    }

    #[test]
    fn test_any_of_and_all_of() {
        let gradle = FilePredicate::any_of(vec![
            FilePredicate::name("build.gradle"),
            FilePredicate::name("build.gradle.kts"),
        ]);
        assert!(gradle.matches(&names(&["build.gradle.kts"])));

        let both = FilePredicate::all_of(vec![
            FilePredicate::name("package.json"),
            FilePredicate::name("package-lock.json"),
        ]);
        assert!(!both.matches(&names(&["package.json"])));
        assert!(both.matches(&names(&["package.json", "package-lock.json"])));
    }
}
