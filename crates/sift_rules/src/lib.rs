//! Type descriptors and recognition rules.
//!
//! A type takes part in interpretation by describing itself:
//!
//! - `Interpretable::descriptor()` returns a typed `Descriptor` (a record, an
//!   enumeration or a closed union)
//! - a `RuleProvider` turns descriptors into compiled `RecognitionRule`s,
//!   applying override patterns
//! - constructors receive decoded parameter values as type-erased `Args`
//!
//! Nothing here matches input; that is the interpreter engine's job.

mod descriptor;
mod error;
mod param;
mod provider;
mod rule;
mod ty;
mod value;

pub use descriptor::{
    Descriptor, EnumShape, Enumeration, Form, FormShape, Interpretable, Record, RecordShape,
    Shape, Union, UnionShape, VariantShape,
};
pub use error::BuildError;
pub use param::{Param, ParameterDescriptor, DEFAULT_SEPARATOR};
pub use provider::{DescriptorProvider, RuleProvider};
pub use rule::{compile_anchored, RecognitionRule};
pub use ty::{TypeKey, TypeRef};
pub use value::{collect_into, AnyValue, Args, Collector, Constructor, Rejection};
