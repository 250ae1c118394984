//! Type-erased values flowing between interpreters and constructors.
//!
//! Interpreters produce `AnyValue`s. A rule's constructor receives the decoded
//! parameter values as `Args` and downcasts each one back to the type its
//! parameter descriptor declared.

use std::any::{type_name, Any};
use std::sync::Arc;

/// A decoded value of some target type.
pub type AnyValue = Box<dyn Any + Send>;

/// Builds a target value from decoded parameter values.
pub type Constructor = Arc<dyn Fn(Args) -> Result<AnyValue, Rejection> + Send + Sync>;

/// Gathers decoded collection items, in input order, into a container value.
pub type Collector = fn(Vec<AnyValue>) -> Result<AnyValue, Rejection>;

/// Why a constructor refused to build a value.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// Domain-level refusal, e.g. a failed range check.
    #[error("{0}")]
    Domain(String),
    /// No enumeration constant matches the (already pattern-matched) text.
    #[error("no constant matches `{input}`")]
    UnknownConstant { input: String },
    /// A parameter value was missing or of a different type than declared.
    #[error("argument {index} is not a `{expected}`")]
    Argument { index: usize, expected: &'static str },
}

impl Rejection {
    pub fn new(reason: impl Into<String>) -> Self {
        Rejection::Domain(reason.into())
    }
}

impl From<String> for Rejection {
    fn from(reason: String) -> Self {
        Rejection::Domain(reason)
    }
}

impl From<&str> for Rejection {
    fn from(reason: &str) -> Self {
        Rejection::Domain(reason.to_owned())
    }
}

/// Ordered parameter values handed to a constructor.
///
/// Values are taken front to back, in parameter declaration order.
pub struct Args {
    values: std::vec::IntoIter<AnyValue>,
    position: usize,
}

impl Args {
    pub fn new(values: Vec<AnyValue>) -> Self {
        Args {
            values: values.into_iter(),
            position: 0,
        }
    }

    /// Number of values not yet taken.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }

    /// Take the next value as a `T`.
    pub fn take<T: 'static>(&mut self) -> Result<T, Rejection> {
        let index = self.position;
        self.take_any()?
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| Rejection::Argument {
                index,
                expected: type_name::<T>(),
            })
    }

    /// Take the next value without downcasting it.
    pub fn take_any(&mut self) -> Result<AnyValue, Rejection> {
        let index = self.position;
        self.position += 1;
        self.values.next().ok_or(Rejection::Argument {
            index,
            expected: "value",
        })
    }
}

/// Collect downcast items into `C`.
///
/// Monomorphized per container/item pair and stored as a [`Collector`].
pub fn collect_into<C, T>(items: Vec<AnyValue>) -> Result<AnyValue, Rejection>
where
    C: FromIterator<T> + Send + 'static,
    T: 'static,
{
    let collected = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            item.downcast::<T>()
                .map(|value| *value)
                .map_err(|_| Rejection::Argument {
                    index,
                    expected: type_name::<T>(),
                })
        })
        .collect::<Result<C, _>>()?;
    Ok(Box::new(collected))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
