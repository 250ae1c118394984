use pretty_assertions::assert_eq;
use sift::{
    BuildError, Descriptor, Error, Form, Interpretable, InterpretationContext,
    InterpretationError, Param, Record, Rejection,
};

use crate::common::{Animal, Point};

#[derive(Debug, PartialEq)]
struct Sentence {
    animal: String,
    furniture: String,
}

impl Interpretable for Sentence {
    fn descriptor() -> Descriptor<Self> {
        Record::with_pattern(r"The (\w+) sat on the (\w+)")
            .primary(Form::new(
                [
                    Param::scalar::<String>("animal"),
                    Param::scalar::<String>("furniture"),
                ],
                |mut args| {
                    Ok(Sentence {
                        animal: args.take()?,
                        furniture: args.take()?,
                    })
                },
            ))
            .into()
    }
}

#[derive(Debug, PartialEq)]
struct AnimalSentence {
    animal: Animal,
    furniture: String,
}

impl Interpretable for AnimalSentence {
    fn descriptor() -> Descriptor<Self> {
        Record::with_pattern(r"[tT]he (\w+) sat on the (\w+)")
            .primary(Form::new(
                [
                    Param::scalar::<Animal>("animal"),
                    Param::scalar::<String>("furniture"),
                ],
                |mut args| {
                    Ok(AnimalSentence {
                        animal: args.take()?,
                        furniture: args.take()?,
                    })
                },
            ))
            .into()
    }
}

#[derive(Debug, PartialEq)]
struct Person {
    first: String,
    last: String,
}

impl Interpretable for Person {
    fn descriptor() -> Descriptor<Self> {
        Record::with_pattern(r"(\w+) (\w+)")
            .primary(Form::new(
                [Param::scalar::<String>("first"), Param::scalar::<String>("last")],
                |mut args| {
                    Ok(Person {
                        first: args.take()?,
                        last: args.take()?,
                    })
                },
            ))
            .into()
    }
}

#[derive(Debug, PartialEq)]
struct Quote {
    speaker: Person,
    sentence: AnimalSentence,
}

impl Interpretable for Quote {
    fn descriptor() -> Descriptor<Self> {
        Record::with_pattern(r#"(.*) said, "(.*)""#)
            .primary(Form::new(
                [
                    Param::scalar::<Person>("speaker"),
                    Param::scalar::<AnimalSentence>("sentence"),
                ],
                |mut args| {
                    Ok(Quote {
                        speaker: args.take()?,
                        sentence: args.take()?,
                    })
                },
            ))
            .into()
    }
}

#[derive(Debug, PartialEq)]
struct Line {
    from: Point,
    to: Point,
}

impl Interpretable for Line {
    fn descriptor() -> Descriptor<Self> {
        Record::with_pattern(r"From (.*) to (.*)")
            .primary(Form::new(
                [
                    Param::scalar::<Point>("from").with_pattern(r"x=(-?\d+), y=(-?\d+)"),
                    Param::scalar::<Point>("to"),
                ],
                |mut args| {
                    Ok(Line {
                        from: args.take()?,
                        to: args.take()?,
                    })
                },
            ))
            .into()
    }
}

#[derive(Debug, PartialEq)]
struct Cat(String);

impl Interpretable for Cat {
    fn descriptor() -> Descriptor<Self> {
        Record::new()
            .alternative(
                "cat",
                Form::new([Param::scalar::<String>("word")], |mut args| {
                    Ok(Cat(args.take()?))
                }),
            )
            .into()
    }
}

#[derive(Debug, PartialEq)]
enum Reading {
    Plain(u32),
    Tens(u32),
}

impl Interpretable for Reading {
    fn descriptor() -> Descriptor<Self> {
        Record::new()
            .alternative(
                r"(\d+)",
                Form::new([Param::scalar::<u32>("n")], |mut args| {
                    Ok(Reading::Plain(args.take()?))
                }),
            )
            .alternative(
                r"(\d+)0",
                Form::new([Param::scalar::<u32>("n")], |mut args| {
                    Ok(Reading::Tens(args.take()?))
                }),
            )
            .into()
    }
}

#[derive(Debug)]
struct Lopsided;

impl Interpretable for Lopsided {
    fn descriptor() -> Descriptor<Self> {
        Record::with_pattern(r"(\d+)-(\d+)")
            .primary(Form::new(
                [
                    Param::scalar::<u8>("a"),
                    Param::scalar::<u8>("b"),
                    Param::scalar::<u8>("c"),
                ],
                |_| Ok(Lopsided),
            ))
            .into()
    }
}

#[derive(Debug, PartialEq)]
enum Percentage {
    Bounded(u32),
    Any(u32),
}

impl Interpretable for Percentage {
    fn descriptor() -> Descriptor<Self> {
        Record::new()
            .alternative(
                r"(\d+)%",
                Form::new([Param::scalar::<u32>("value")], |mut args| {
                    let value: u32 = args.take()?;
                    if value > 100 {
                        return Err(Rejection::new(format!("{value} exceeds 100")));
                    }
                    Ok(Percentage::Bounded(value))
                }),
            )
            .alternative(
                r"(\d+)%",
                Form::new([Param::scalar::<u32>("value")], |mut args| {
                    Ok(Percentage::Any(args.take()?))
                }),
            )
            .into()
    }
}

#[derive(Debug, PartialEq)]
struct Pet {
    name: String,
    age: String,
}

impl Interpretable for Pet {
    fn descriptor() -> Descriptor<Self> {
        Record::with_pattern(r"(\w+)(?:, aged (\d+))?")
            .primary(Form::new(
                [Param::scalar::<String>("name"), Param::scalar::<String>("age")],
                |mut args| {
                    Ok(Pet {
                        name: args.take()?,
                        age: args.take()?,
                    })
                },
            ))
            .into()
    }
}

#[test]
fn record_with_string_fields() {
    assert_eq!(
        sift::interpret::<Sentence>("The cat sat on the mat").unwrap(),
        Sentence {
            animal: "cat".to_owned(),
            furniture: "mat".to_owned(),
        }
    );
}

#[test]
fn record_with_enumeration_field() {
    let context = InterpretationContext::new();
    for (input, animal) in [
        ("The cat sat on the mat", Animal::Cat),
        ("The GOLDFISH sat on the mat", Animal::Goldfish),
        ("the Dog sat on the mat", Animal::Dog),
    ] {
        assert_eq!(
            context.interpret::<AnimalSentence>(input).unwrap(),
            AnimalSentence {
                animal,
                furniture: "mat".to_owned(),
            }
        );
    }

    let err = context
        .interpret::<AnimalSentence>("The axolotl sat on the mat")
        .unwrap_err();
    assert_eq!(
        err,
        Error::Interpretation(InterpretationError::NoMatch {
            type_name: std::any::type_name::<Animal>(),
            input: "axolotl".to_owned(),
        })
    );
}

#[test]
fn record_with_record_fields() {
    assert_eq!(
        sift::interpret::<Quote>(r#"Arthur Putey said, "the dog sat on the couch""#).unwrap(),
        Quote {
            speaker: Person {
                first: "Arthur".to_owned(),
                last: "Putey".to_owned(),
            },
            sentence: AnimalSentence {
                animal: Animal::Dog,
                furniture: "couch".to_owned(),
            },
        }
    );
}

#[test]
fn point_end_to_end() {
    let context = InterpretationContext::new();
    assert_eq!(
        context.interpret::<Point>("(23, -6)").unwrap(),
        Point { x: 23, y: -6 }
    );
    assert!(matches!(
        context.interpret::<Point>("23,-6"),
        Err(Error::Interpretation(InterpretationError::NoMatch { .. }))
    ));
}

#[test]
fn parameter_level_override() {
    assert_eq!(
        sift::interpret::<Line>("From x=-7, y=0 to (120,-5)").unwrap(),
        Line {
            from: Point { x: -7, y: 0 },
            to: Point { x: 120, y: -5 },
        }
    );
    // The override replaces the default pattern for `from` only
    assert!(sift::interpret::<Line>("From (1,2) to (3,4)").is_err());
}

#[test]
fn caller_override_replaces_default_pattern() {
    let context = InterpretationContext::new();
    let slashed = context
        .interpreter_with_pattern::<Point>(r"(-?\d+)/(-?\d+)")
        .unwrap();
    assert_eq!(slashed.interpret("3/-4").unwrap(), Point { x: 3, y: -4 });
    assert!(slashed.try_interpret("(3, -4)").unwrap().is_none());

    let plain = context.interpreter::<Point>().unwrap();
    assert!(!plain.same_as(&slashed));
}

#[test]
fn pattern_must_cover_entire_input() {
    let context = InterpretationContext::new();
    assert_eq!(context.interpret::<Cat>("cat").unwrap(), Cat("cat".to_owned()));
    assert_eq!(context.try_interpret::<Cat>("concatenate").unwrap(), None);
}

#[test]
fn first_declared_rule_wins() {
    let context = InterpretationContext::new();
    assert_eq!(context.interpret::<Reading>("50").unwrap(), Reading::Plain(50));
}

#[test]
fn capture_groups_must_match_parameters() {
    let err = sift::interpret::<Lopsided>("1-2").unwrap_err();
    assert!(matches!(
        err,
        Error::Interpretation(InterpretationError::Arity {
            groups: 2,
            params: 3,
            ..
        })
    ));
}

#[test]
fn constructor_rejection_stops_dispatch() {
    let context = InterpretationContext::new();
    assert_eq!(
        context.interpret::<Percentage>("40%").unwrap(),
        Percentage::Bounded(40)
    );
    let err = context.interpret::<Percentage>("140%").unwrap_err();
    assert_eq!(
        err,
        Error::Interpretation(InterpretationError::Rejected {
            type_name: std::any::type_name::<Percentage>(),
            input: "140%".to_owned(),
            reason: "140 exceeds 100".to_owned(),
        })
    );
}

#[test]
fn optional_group_binds_empty_text() {
    let context = InterpretationContext::new();
    assert_eq!(
        context.interpret::<Pet>("Rex, aged 4").unwrap(),
        Pet {
            name: "Rex".to_owned(),
            age: "4".to_owned(),
        }
    );
    assert_eq!(
        context.interpret::<Pet>("Rex").unwrap(),
        Pet {
            name: "Rex".to_owned(),
            age: String::new(),
        }
    );
}

#[test]
fn invalid_pattern_is_build_error() {
    struct Broken;
    impl Interpretable for Broken {
        fn descriptor() -> Descriptor<Self> {
            Record::with_pattern("(unclosed")
                .primary(Form::new([Param::scalar::<String>("s")], |_| Ok(Broken)))
                .into()
        }
    }

    let context = InterpretationContext::new();
    assert!(matches!(
        context.interpreter::<Broken>(),
        Err(BuildError::InvalidPattern { .. })
    ));
}
