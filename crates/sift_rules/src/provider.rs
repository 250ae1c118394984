//! Rule providers: the source of recognition rules for a type.
//!
//! The engine asks a [`RuleProvider`] for the rules of each type it needs and
//! never looks at descriptors itself. [`DescriptorProvider`] is the default,
//! deriving rules from each type's [`Interpretable`](crate::Interpretable)
//! descriptor with this precedence:
//!
//! 1. an override pattern supplied by the caller or a parameter
//! 2. the type-level default pattern
//! 3. the pattern derived from the shape (enumeration names)
//!
//! and [`BuildError`] when none applies.

use std::sync::Arc;

use regex::escape;

use crate::descriptor::{EnumShape, RecordShape, Shape, UnionShape};
use crate::error::BuildError;
use crate::param::ParameterDescriptor;
use crate::rule::RecognitionRule;
use crate::ty::{TypeKey, TypeRef};
use crate::value::{Args, Constructor};

/// Supplies recognition rules for a type.
pub trait RuleProvider: Send + Sync {
    /// Rules for `ty`, in the order they are to be tried.
    ///
    /// An empty list is not an error here; the caller decides how to treat it.
    fn rules_for(
        &self,
        ty: &TypeRef,
        override_pattern: Option<&str>,
    ) -> Result<Vec<RecognitionRule>, BuildError>;

    /// Whether `ty` is a closed union, which cannot take an override pattern.
    fn is_closed_union(&self, ty: &TypeRef) -> bool;
}

/// Derives rules from descriptor tables.
#[derive(Clone, Copy, Debug, Default)]
pub struct DescriptorProvider;

impl RuleProvider for DescriptorProvider {
    fn rules_for(
        &self,
        ty: &TypeRef,
        override_pattern: Option<&str>,
    ) -> Result<Vec<RecognitionRule>, BuildError> {
        let owner = ty.key();
        match (ty.shape(), override_pattern) {
            (Shape::Union(_), Some(pattern)) => Err(BuildError::OverrideOnUnion {
                type_name: owner.name(),
                pattern: pattern.to_owned(),
            }),
            (Shape::Opaque, _) => opaque_rules(ty, override_pattern),
            (shape, _) => {
                let mut rules = Vec::new();
                shape_rules(owner, shape, override_pattern, &mut rules)?;
                Ok(rules)
            }
        }
    }

    fn is_closed_union(&self, ty: &TypeRef) -> bool {
        ty.shape().is_union()
    }
}

fn shape_rules(
    owner: TypeKey,
    shape: Shape,
    override_pattern: Option<&str>,
    rules: &mut Vec<RecognitionRule>,
) -> Result<(), BuildError> {
    match shape {
        Shape::Record(record) => record_rules(owner, record, override_pattern, rules),
        Shape::Enumeration(constants) => {
            rules.push(enum_rule(owner, constants, override_pattern)?);
            Ok(())
        }
        Shape::Union(union) => union_rules(owner, union, rules),
        Shape::Opaque => {
            tracing::warn!(
                owner = owner.name(),
                "opaque variant contributes no rules"
            );
            Ok(())
        }
    }
}

fn record_rules(
    owner: TypeKey,
    record: RecordShape,
    override_pattern: Option<&str>,
    rules: &mut Vec<RecognitionRule>,
) -> Result<(), BuildError> {
    let pattern = override_pattern.or(record.pattern.as_deref());
    match (record.primary, pattern) {
        (Some(primary), Some(pattern)) => {
            rules.push(RecognitionRule::new(
                owner,
                pattern,
                primary.params,
                primary.construct,
            )?);
        }
        (None, Some(pattern)) => {
            tracing::debug!(
                owner = owner.name(),
                pattern,
                "pattern without a primary form is ignored"
            );
        }
        (_, None) => {}
    }
    for (pattern, form) in record.alternatives {
        rules.push(RecognitionRule::new(
            owner,
            &pattern,
            form.params,
            form.construct,
        )?);
    }
    Ok(())
}

fn enum_rule(
    owner: TypeKey,
    constants: EnumShape,
    override_pattern: Option<&str>,
) -> Result<RecognitionRule, BuildError> {
    let pattern = match override_pattern.or(constants.pattern.as_deref()) {
        Some(pattern) => pattern.to_owned(),
        None => names_pattern(&constants.names),
    };
    RecognitionRule::new(
        owner,
        &pattern,
        vec![ParameterDescriptor::scalar::<String>("value")],
        constants.construct,
    )
}

/// Case-insensitive alternation of the escaped constant names.
fn names_pattern(names: &[&str]) -> String {
    let alternation = names
        .iter()
        .map(|name| escape(name))
        .collect::<Vec<_>>()
        .join("|");
    format!("(?i:{alternation})")
}

/// Depth-first concatenation of the variants' rules, in declaration order.
fn union_rules(
    owner: TypeKey,
    union: UnionShape,
    rules: &mut Vec<RecognitionRule>,
) -> Result<(), BuildError> {
    for variant in union.variants {
        let before = rules.len();
        shape_rules(owner, variant.shape, None, rules)?;
        tracing::trace!(
            owner = owner.name(),
            variant = variant.name,
            rules = rules.len() - before,
            "flattened union variant"
        );
    }
    Ok(())
}

/// An opaque type can only be matched through its registered interpreter,
/// narrowed by an override pattern.
fn opaque_rules(
    ty: &TypeRef,
    override_pattern: Option<&str>,
) -> Result<Vec<RecognitionRule>, BuildError> {
    let Some(pattern) = override_pattern else {
        return Err(BuildError::Unresolvable {
            type_name: ty.name(),
        });
    };
    let inner = ParameterDescriptor::Scalar {
        name: "value".to_owned(),
        ty: *ty,
        pattern: None,
    };
    let passthrough: Constructor = Arc::new(|mut args: Args| args.take_any());
    Ok(vec![RecognitionRule::new(
        ty.key(),
        pattern,
        vec![inner],
        passthrough,
    )?])
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
