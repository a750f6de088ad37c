use anyhow::{Context, Result};
use policy::Policy;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct PolicyFile {
    #[serde(default)]
    policy: Vec<Policy>,
}

/// Render every `[[policy]]` table, separated by a blank line
pub fn render_file(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))?;
    let file: PolicyFile =
        toml::from_str(&content).with_context(|| format!("Invalid policies in {}", path.display()))?;
    if file.policy.is_empty() {
        log::warn!("no [[policy]] tables in {}", path.display());
    }
    Ok(policy::render_all(&file.policy)?)
}

pub fn run(path: &Path) -> Result<()> {
    println!("{}", render_file(path)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_render_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[[policy]]
effect = "permit"
principal = {{ operator = "==", entity = {{ type = "CF::User", id = "usr_1" }} }}

[policy.when]
structured = {{ resource = "resource.env", operator = "==", value = '"dev"' }}

[[policy]]
effect = "forbid"
"#
        )
        .unwrap();

        let text = render_file(file.path()).unwrap();
        assert!(text.starts_with("permit (\n    principal == CF::User::\"usr_1\",\n    action,\n    resource\n)"));
        assert!(text.contains("resource.env == \"dev\""));
        assert!(text.ends_with("forbid (\n    principal,\n    action,\n    resource\n);"));
    }

    #[test]
    fn test_invalid_condition_names_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[[policy]]\neffect = \"permit\"\nwhen = {{}}\n").unwrap();

        let err = render_file(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid policies"));
    }
}
