use pretty_assertions::assert_eq;
use sift::{
    BuildError, Descriptor, Error, Form, Interpretable, InterpretationContext,
    InterpretationError, Param, Record, Union,
};

use crate::common::counting_context;

/// Self-referential: `1 -> 2 -> 3`.
#[derive(Debug, PartialEq)]
enum Chain {
    Link(i64, Box<Chain>),
    End(i64),
}

impl Chain {
    fn values(&self) -> Vec<i64> {
        let mut values = Vec::new();
        let mut current = self;
        loop {
            match current {
                Chain::Link(value, next) => {
                    values.push(*value);
                    current = next.as_ref();
                }
                Chain::End(value) => {
                    values.push(*value);
                    return values;
                }
            }
        }
    }
}

impl Interpretable for Chain {
    fn descriptor() -> Descriptor<Self> {
        Record::new()
            .alternative(
                r"(-?\d+) -> (.+)",
                Form::new(
                    [Param::scalar::<i64>("value"), Param::scalar::<Chain>("next")],
                    |mut args| {
                        let value = args.take()?;
                        let next: Chain = args.take()?;
                        Ok(Chain::Link(value, Box::new(next)))
                    },
                ),
            )
            .alternative(
                r"(-?\d+)",
                Form::new([Param::scalar::<i64>("value")], |mut args| {
                    Ok(Chain::End(args.take()?))
                }),
            )
            .into()
    }
}

/// Mutually referential with `Term`: `"..."` around a term.
#[derive(Debug, PartialEq)]
struct Quoted(Box<Term>);

impl Interpretable for Quoted {
    fn descriptor() -> Descriptor<Self> {
        Record::with_pattern(r#""(.*)""#)
            .primary(Form::new([Param::scalar::<Term>("term")], |mut args| {
                let term: Term = args.take()?;
                Ok(Quoted(Box::new(term)))
            }))
            .into()
    }
}

#[derive(Debug, PartialEq)]
enum Term {
    Number(i64),
    Quoted(Quoted),
}

impl Interpretable for Term {
    fn descriptor() -> Descriptor<Self> {
        Union::new()
            .variant_with(
                "number",
                Record::new().alternative(
                    r"(-?\d+)",
                    Form::new([Param::scalar::<i64>("n")], |mut args| {
                        Ok(Term::Number(args.take()?))
                    }),
                ),
            )
            .variant("quoted", Term::Quoted)
            .into()
    }
}

/// Needs `Beta`, which needs `Alpha` back, and `Broken`, which has no rules.
#[derive(Debug)]
struct Alpha;

impl Interpretable for Alpha {
    fn descriptor() -> Descriptor<Self> {
        Record::with_pattern(r"a(.*)\|(.*)")
            .primary(Form::new(
                [Param::scalar::<Beta>("beta"), Param::scalar::<Broken>("broken")],
                |_| Ok(Alpha),
            ))
            .into()
    }
}

#[derive(Debug, PartialEq)]
enum Beta {
    End,
    Alpha,
}

impl Interpretable for Beta {
    fn descriptor() -> Descriptor<Self> {
        Record::new()
            .alternative(
                "b",
                Form::new([Param::scalar::<String>("b")], |_| Ok(Beta::End)),
            )
            .alternative(
                "b(.+)",
                Form::new([Param::scalar::<Alpha>("alpha")], |_| Ok(Beta::Alpha)),
            )
            .into()
    }
}

#[derive(Debug)]
struct Broken;

impl Interpretable for Broken {
    fn descriptor() -> Descriptor<Self> {
        Record::new().into()
    }
}

#[test]
fn self_referential_type_zero_and_one_level_deep() {
    let context = InterpretationContext::new();
    let chain = context.interpreter::<Chain>().unwrap();
    assert_eq!(chain.interpret("5").unwrap(), Chain::End(5));
    assert_eq!(
        chain.interpret("1 -> 2").unwrap(),
        Chain::Link(1, Box::new(Chain::End(2)))
    );
    assert_eq!(chain.interpret("1 -> 2 -> -3").unwrap().values(), vec![1, 2, -3]);
}

#[test]
fn recursive_type_is_built_once() {
    let (context, provider) = counting_context();
    let first = context.interpreter::<Chain>().unwrap();
    let second = context.interpreter::<Chain>().unwrap();
    assert!(first.same_as(&second));
    assert_eq!(provider.requests_for::<Chain>(), 1);
}

#[test]
fn mutually_referential_types() {
    let context = InterpretationContext::new();
    assert_eq!(context.interpret::<Term>("7").unwrap(), Term::Number(7));
    assert_eq!(
        context.interpret::<Term>(r#""7""#).unwrap(),
        Term::Quoted(Quoted(Box::new(Term::Number(7))))
    );
    assert_eq!(
        context.interpret::<Quoted>(r#"""-1"""#).unwrap(),
        Quoted(Box::new(Term::Quoted(Quoted(Box::new(Term::Number(-1))))))
    );
}

#[test]
fn handle_outlives_its_context() {
    let chain = InterpretationContext::new().interpreter::<Chain>().unwrap();
    assert_eq!(chain.interpret("1 -> 2 -> 3").unwrap().values(), vec![1, 2, 3]);
}

#[test]
fn deep_nesting_decodes() {
    let depth = 1_000;
    let input = (0..depth)
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(" -> ");
    let chain = sift::interpret::<Chain>(&input).unwrap();
    assert_eq!(chain.values(), (0..depth).collect::<Vec<i64>>());
}

#[test]
fn deferred_interpreter_of_failed_construction_is_unresolved() {
    let context = InterpretationContext::new();
    assert_eq!(
        context.interpreter::<Alpha>().unwrap_err(),
        BuildError::NoRules {
            type_name: std::any::type_name::<Broken>()
        }
    );

    // Beta finished inside Alpha's failed construction
    let beta = context.interpreter::<Beta>().unwrap();
    assert_eq!(beta.interpret("b").unwrap(), Beta::End);
    assert_eq!(
        beta.interpret("ba|").unwrap_err(),
        InterpretationError::Unresolved {
            type_name: std::any::type_name::<Alpha>()
        }
    );
    assert!(matches!(
        context.interpret::<Alpha>("ab|x"),
        Err(Error::Build(BuildError::NoRules { .. }))
    ));
}

#[test]
fn concurrent_requests_share_one_interpreter() {
    let context = InterpretationContext::new();
    let handles = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..8)
            .map(|n| {
                let context = &context;
                scope.spawn(move || {
                    let chain = context.interpreter::<Chain>().unwrap();
                    let input = format!("{n} -> {}", n + 1);
                    assert_eq!(chain.interpret(&input).unwrap().values(), vec![n, n + 1]);
                    chain
                })
            })
            .collect();
        workers
            .into_iter()
            .map(|worker| worker.join().unwrap())
            .collect::<Vec<_>>()
    });

    let installed = context.interpreter::<Chain>().unwrap();
    assert!(handles.iter().all(|handle| handle.same_as(&installed)));
}
