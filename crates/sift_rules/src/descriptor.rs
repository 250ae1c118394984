//! Descriptor tables: the declared shape of each interpretable type.
//!
//! A type opts in by implementing [`Interpretable`] and returning a typed
//! [`Descriptor`] built from one of:
//!
//! - [`Record`] - an optional primary [`Form`] used with the type-level (or an
//!   override) pattern, plus alternative forms each carrying their own pattern
//! - [`Enumeration`] - a closed set of named constants
//! - [`Union`] - a closed set of variants, tried in declaration order
//!
//! Types without a table (primitives, foreign types) have an
//! [`opaque`](Descriptor::opaque) descriptor and are interpreted only by
//! registered interpreters.
//!
//! The typed builders erase into [`Shape`], which is all the rule provider
//! ever sees.

use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use regex::RegexSet;

use crate::param::ParameterDescriptor;
use crate::value::{AnyValue, Args, Constructor, Rejection};

/// A type with a descriptor table.
pub trait Interpretable: Sized + Send + 'static {
    fn descriptor() -> Descriptor<Self>;
}

/// Erased shape of a type.
pub enum Shape {
    Record(RecordShape),
    Union(UnionShape),
    Enumeration(EnumShape),
    Opaque,
}

/// Ordered parameters plus the constructor they feed.
#[derive(Clone)]
pub struct FormShape {
    pub params: Vec<ParameterDescriptor>,
    pub construct: Constructor,
}

pub struct RecordShape {
    /// Type-level pattern for the primary form.
    pub pattern: Option<String>,
    pub primary: Option<FormShape>,
    /// Forms with their own patterns, in declaration order.
    pub alternatives: Vec<(String, FormShape)>,
}

pub struct EnumShape {
    /// Replaces the generated alternation of constant names.
    pub pattern: Option<String>,
    pub names: Vec<&'static str>,
    /// Takes the matched text as its single `String` argument.
    pub construct: Constructor,
}

pub struct UnionShape {
    pub variants: Vec<VariantShape>,
}

/// One variant of a union. Its shape's constructors already produce the
/// union type.
pub struct VariantShape {
    pub name: &'static str,
    pub shape: Shape,
}

type ValueMap = Arc<dyn Fn(AnyValue) -> Result<AnyValue, Rejection> + Send + Sync>;

impl Shape {
    pub fn is_union(&self) -> bool {
        matches!(self, Shape::Union(_))
    }

    /// Compose every constructor in this shape with `map`.
    fn map_values(self, map: &ValueMap) -> Shape {
        match self {
            Shape::Record(record) => Shape::Record(RecordShape {
                pattern: record.pattern,
                primary: record.primary.map(|form| form.map_values(map)),
                alternatives: record
                    .alternatives
                    .into_iter()
                    .map(|(pattern, form)| (pattern, form.map_values(map)))
                    .collect(),
            }),
            Shape::Enumeration(constants) => Shape::Enumeration(EnumShape {
                pattern: constants.pattern,
                names: constants.names,
                construct: map_constructor(constants.construct, map),
            }),
            Shape::Union(union) => Shape::Union(UnionShape {
                variants: union
                    .variants
                    .into_iter()
                    .map(|variant| VariantShape {
                        name: variant.name,
                        shape: variant.shape.map_values(map),
                    })
                    .collect(),
            }),
            Shape::Opaque => Shape::Opaque,
        }
    }
}

impl FormShape {
    fn map_values(self, map: &ValueMap) -> FormShape {
        FormShape {
            params: self.params,
            construct: map_constructor(self.construct, map),
        }
    }
}

fn map_constructor(construct: Constructor, map: &ValueMap) -> Constructor {
    let map = Arc::clone(map);
    Arc::new(move |args: Args| construct(args).and_then(|value| map(value)))
}

impl fmt::Debug for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Record(record) => f
                .debug_struct("Record")
                .field("pattern", &record.pattern)
                .field("primary", &record.primary)
                .field("alternatives", &record.alternatives)
                .finish(),
            Shape::Union(union) => f
                .debug_list()
                .entries(union.variants.iter().map(|v| (v.name, &v.shape)))
                .finish(),
            Shape::Enumeration(constants) => f
                .debug_struct("Enumeration")
                .field("pattern", &constants.pattern)
                .field("names", &constants.names)
                .finish_non_exhaustive(),
            Shape::Opaque => f.write_str("Opaque"),
        }
    }
}

impl fmt::Debug for FormShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Typed wrapper around a [`Shape`] whose constructors produce `T`.
pub struct Descriptor<T> {
    shape: Shape,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Descriptor<T> {
    fn from_shape(shape: Shape) -> Self {
        Descriptor {
            shape,
            _marker: PhantomData,
        }
    }

    /// No descriptor table: the type must be registered to be interpreted.
    pub fn opaque() -> Self {
        Self::from_shape(Shape::Opaque)
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn into_shape(self) -> Shape {
        self.shape
    }
}

impl<T> fmt::Debug for Descriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Descriptor").field(&self.shape).finish()
    }
}

/// Ordered parameters and a constructor producing `T`.
pub struct Form<T> {
    shape: FormShape,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + 'static> Form<T> {
    /// `construct` receives one value per parameter, in order.
    pub fn new<P, F>(params: P, construct: F) -> Self
    where
        P: IntoIterator<Item = ParameterDescriptor>,
        F: Fn(Args) -> Result<T, Rejection> + Send + Sync + 'static,
    {
        Form {
            shape: FormShape {
                params: params.into_iter().collect(),
                construct: Arc::new(move |args: Args| {
                    construct(args).map(|value| Box::new(value) as AnyValue)
                }),
            },
            _marker: PhantomData,
        }
    }
}

/// Record-like type: a primary form and/or alternative forms.
pub struct Record<T> {
    shape: RecordShape,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + 'static> Record<T> {
    /// A record without a type-level pattern. Its primary form, if any, is
    /// only used when an override pattern is supplied.
    pub fn new() -> Self {
        Record {
            shape: RecordShape {
                pattern: None,
                primary: None,
                alternatives: Vec::new(),
            },
            _marker: PhantomData,
        }
    }

    /// A record whose primary form matches `pattern` by default.
    pub fn with_pattern(pattern: impl Into<String>) -> Self {
        let mut record = Self::new();
        record.shape.pattern = Some(pattern.into());
        record
    }

    #[must_use]
    pub fn primary(mut self, form: Form<T>) -> Self {
        self.shape.primary = Some(form.shape);
        self
    }

    #[must_use]
    pub fn alternative(mut self, pattern: impl Into<String>, form: Form<T>) -> Self {
        self.shape.alternatives.push((pattern.into(), form.shape));
        self
    }
}

impl<T: Send + 'static> Default for Record<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Record<T>> for Descriptor<T> {
    fn from(record: Record<T>) -> Self {
        Descriptor::from_shape(Shape::Record(record.shape))
    }
}

/// Closed set of named constants, matched case-insensitively by name.
///
/// Lookup uses the regex engine's Unicode case folding, so any text the
/// generated name pattern accepts names a constant.
pub struct Enumeration<T> {
    shape: EnumShape,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Clone + Send + Sync + 'static> Enumeration<T> {
    pub fn new(constants: impl IntoIterator<Item = (&'static str, T)>) -> Self {
        let constants: Arc<[(&'static str, T)]> = constants.into_iter().collect();
        let names: Vec<&'static str> = constants.iter().map(|(name, _)| *name).collect();
        // Same case folding as the generated `(?i:..)` alternation
        let matcher = RegexSet::new(
            names
                .iter()
                .map(|name| format!(r"(?i:\A{}\z)", regex::escape(name))),
        )
        .map_err(|err| err.to_string());
        let construct: Constructor = Arc::new(move |mut args: Args| -> Result<AnyValue, Rejection> {
            let text: String = args.take()?;
            let matcher = matcher.as_ref().map_err(|message| Rejection::new(message.clone()))?;
            matcher
                .matches(&text)
                .iter()
                .next()
                .map(|index| Box::new(constants[index].1.clone()) as AnyValue)
                .ok_or(Rejection::UnknownConstant { input: text })
        });
        Enumeration {
            shape: EnumShape {
                pattern: None,
                names,
                construct,
            },
            _marker: PhantomData,
        }
    }

    /// Replace the generated name alternation. The whole match (or its single
    /// capture) is still looked up by constant name.
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.shape.pattern = Some(pattern.into());
        self
    }
}

impl<T> From<Enumeration<T>> for Descriptor<T> {
    fn from(constants: Enumeration<T>) -> Self {
        Descriptor::from_shape(Shape::Enumeration(constants.shape))
    }
}

/// Closed set of variants, each contributing its own rules.
pub struct Union<T> {
    shape: UnionShape,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + 'static> Union<T> {
    pub fn new() -> Self {
        Union {
            shape: UnionShape {
                variants: Vec::new(),
            },
            _marker: PhantomData,
        }
    }

    /// A variant wrapping another interpretable type: `V`'s rules, with each
    /// decoded `V` passed through `wrap`.
    #[must_use]
    pub fn variant<V: Interpretable>(
        mut self,
        name: &'static str,
        wrap: impl Fn(V) -> T + Send + Sync + 'static,
    ) -> Self {
        let map: ValueMap = Arc::new(move |value: AnyValue| -> Result<AnyValue, Rejection> {
            let inner = value
                .downcast::<V>()
                .map_err(|_| Rejection::Argument {
                    index: 0,
                    expected: type_name::<V>(),
                })?;
            Ok(Box::new(wrap(*inner)) as AnyValue)
        });
        self.shape.variants.push(VariantShape {
            name,
            shape: V::descriptor().into_shape().map_values(&map),
        });
        self
    }

    /// A variant declared inline, whose constructors produce `T` directly.
    #[must_use]
    pub fn variant_with(mut self, name: &'static str, descriptor: impl Into<Descriptor<T>>) -> Self {
        self.shape.variants.push(VariantShape {
            name,
            shape: descriptor.into().into_shape(),
        });
        self
    }
}

impl<T: Send + 'static> Default for Union<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Union<T>> for Descriptor<T> {
    fn from(union: Union<T>) -> Self {
        Descriptor::from_shape(Shape::Union(union.shape))
    }
}

macro_rules! opaque_interpretable {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Interpretable for $ty {
                fn descriptor() -> Descriptor<Self> {
                    Descriptor::opaque()
                }
            }
        )*
    };
}

// Decoded by the leaf interpreters every context is seeded with.
opaque_interpretable!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char, String,
);

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
