//! Renderer for Cedar policy text.
//!
//! Clauses are always written in the same order (effect, scopes, `when`,
//! `unless`) so the same policy renders to the same bytes.

use crate::error::Result;
use crate::types::{Condition, Policy, Scope};
use std::fmt::Write;

/// Indentation used for scope clauses.
const INDENT: &str = "    ";

/// Separator placed between policies in a policy set.
const POLICY_SEPARATOR: &str = "\n\n";

/// Render a single policy to Cedar text.
pub fn render(policy: &Policy) -> Result<String> {
    let mut output = String::new();

    write!(output, "{} (", policy.effect)?;
    write_scope(&mut output, "principal", policy.principal.as_ref())?;
    output.push(',');
    write_scope(&mut output, "action", policy.action.as_ref())?;
    output.push(',');
    write_scope(&mut output, "resource", policy.resource.as_ref())?;
    output.push_str("\n)");

    if let Some(condition) = &policy.when {
        write_condition(&mut output, "when", condition)?;
    }
    if let Some(condition) = &policy.unless {
        write_condition(&mut output, "unless", condition)?;
    }

    output.push(';');
    Ok(output)
}

/// Render a list of policies, separated by a blank line.
pub fn render_all(policies: &[Policy]) -> Result<String> {
    let rendered = policies.iter().map(render).collect::<Result<Vec<_>>>()?;
    Ok(rendered.join(POLICY_SEPARATOR))
}

/// Write one scope clause on its own line.
fn write_scope(output: &mut String, keyword: &str, scope: Option<&Scope>) -> Result<()> {
    write!(output, "\n{INDENT}{keyword}")?;
    if let Some(scope) = scope {
        write!(output, " {} {}", scope.operator, scope.entity)?;
    }
    Ok(())
}

/// Write a `when`/`unless` block.
fn write_condition(output: &mut String, keyword: &str, condition: &Condition) -> Result<()> {
    write!(output, "\n{keyword} {{\n")?;
    match condition {
        Condition::Text(text) => write!(output, " {text} ")?,
        Condition::Structured(c) => write!(output, "{} {} {}", c.resource, c.operator, c.value)?,
    }
    output.push_str("\n}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Effect, EntityRef};

    fn scoped_permit() -> Policy {
        Policy {
            principal: Some(Scope::eq(EntityRef::new("CF::User", "user1"))),
            action: Some(Scope::eq(EntityRef::new("Action::Access", "Request"))),
            resource: Some(Scope::eq(EntityRef::new("Test::Vault", "test1"))),
            ..Policy::new(Effect::Permit)
        }
    }

    #[test]
    fn test_render_effect_only() {
        let output = render(&Policy::new(Effect::Permit)).unwrap();
        assert_eq!(output, "permit (\n    principal,\n    action,\n    resource\n);");
    }

    #[test]
    fn test_render_forbid() {
        let output = render(&Policy::new(Effect::Forbid)).unwrap();
        assert!(output.starts_with("forbid (\n"));
    }

    #[test]
    fn test_render_fully_scoped() {
        let output = render(&scoped_permit()).unwrap();
        assert_eq!(
            output,
            "permit (\n    principal == CF::User::\"user1\",\n    action == Action::Access::\"Request\",\n    resource == Test::Vault::\"test1\"\n);"
        );
    }

    #[test]
    fn test_render_partial_scope() {
        let policy = Policy {
            resource: Some(Scope::new("in", EntityRef::new("AWS::OrgUnit", "ou-123"))),
            ..Policy::new(Effect::Permit)
        };
        let output = render(&policy).unwrap();
        assert_eq!(
            output,
            "permit (\n    principal,\n    action,\n    resource in AWS::OrgUnit::\"ou-123\"\n);"
        );
    }

    #[test]
    fn test_render_when_text() {
        let policy = Policy {
            when: Some(Condition::text("resource.tag == \"prod\"")),
            ..Policy::new(Effect::Permit)
        };
        let output = render(&policy).unwrap();
        assert!(output.ends_with(")\nwhen {\n resource.tag == \"prod\" \n};"));
    }

    #[test]
    fn test_render_structured_condition() {
        let policy = Policy {
            unless: Some(Condition::structured("principal.department", "==", "\"finance\"")),
            ..Policy::new(Effect::Forbid)
        };
        let output = render(&policy).unwrap();
        assert!(output.ends_with("\nunless {\nprincipal.department == \"finance\"\n};"));
    }

    #[test]
    fn test_when_precedes_unless() {
        let policy = Policy {
            when: Some(Condition::text("a")),
            unless: Some(Condition::text("b")),
            ..scoped_permit()
        };
        let output = render(&policy).unwrap();
        let when_at = output.find("when {").unwrap();
        let unless_at = output.find("unless {").unwrap();
        assert!(when_at < unless_at);
        assert!(output.ends_with("\nwhen {\n a \n}\nunless {\n b \n};"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let policy = Policy {
            when: Some(Condition::text("context.duration < 3600")),
            ..scoped_permit()
        };
        assert_eq!(render(&policy).unwrap(), render(&policy.clone()).unwrap());
    }

    #[test]
    fn test_render_all_joins_with_blank_line() {
        let output = render_all(&[Policy::new(Effect::Permit), Policy::new(Effect::Forbid)]).unwrap();
        assert_eq!(output.matches(";\n\nforbid (").count(), 1);
    }

    #[test]
    fn test_render_all_empty() {
        assert_eq!(render_all(&[]).unwrap(), "");
    }
}
