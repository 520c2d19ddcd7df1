//! Integration tests for fact extraction over JSON-authored IR.

use irmark_core::diagnostics::CollectingSink;
use irmark_core::id::{ClassId, ElementId, Id, NodeKind};
use irmark_core::registry::{DataRegistry, RegistryError};
use irmark_ir::nodes::{Component, IrNode, Member};
use irmark_ir::{extract_component, ComputerFns, DataExtractor, Root, ShapeComputer};
use serde_json::{json, Value};

// ============================================================================
// Helpers
// ============================================================================

/// A component with one library holding `classes` and top-level `members`.
fn component(classes: Value, members: Value) -> Component {
    serde_json::from_value(json!({
        "libraries": [{
            "uri": "file:///test.dart",
            "classes": classes,
            "members": members,
        }]
    }))
    .expect("valid IR")
}

/// A top-level `main` whose body is `statements`.
fn main_with(statements: Value) -> Component {
    component(
        json!([]),
        json!([{
            "name": "main",
            "kind": "method",
            "offset": 5,
            "range": { "start": 0, "end": 500 },
            "function": {
                "offset": 9,
                "body": { "type": "Block", "offset": 12, "statements": statements }
            }
        }]),
    )
}

fn extract(component: &Component) -> DataRegistry<String> {
    let mut sink = CollectingSink::new();
    let registry = extract_component(&ShapeComputer, component, &mut sink).expect("no duplicates");
    assert!(sink.is_empty());
    registry
}

fn value<'r>(registry: &'r DataRegistry<String>, id: Id) -> Option<&'r str> {
    registry.get(&id).map(|fact| fact.value.as_str())
}

/// Node ids in order, as `kind:offset`.
fn node_ids(registry: &DataRegistry<String>) -> Vec<String> {
    registry
        .sorted()
        .into_iter()
        .filter(|fact| matches!(fact.id, Id::Node(_)))
        .map(|fact| fact.id.to_string())
        .collect()
}

fn var_get(offset: u32, name: Option<&str>) -> Value {
    json!({ "type": "VariableGet", "offset": offset, "variable": { "name": name } })
}

// ============================================================================
// Members and classes
// ============================================================================

#[test]
fn getter_and_setter_get_distinct_element_ids() {
    let component = component(
        json!([{
            "name": "A",
            "offset": 6,
            "range": { "start": 0, "end": 80 },
            "members": [
                { "name": "x", "kind": "getter", "offset": 20, "range": { "start": 12, "end": 30 } },
                { "name": "x", "kind": "setter", "offset": 40, "range": { "start": 32, "end": 60 } }
            ]
        }]),
        json!([]),
    );
    let registry = extract(&component);

    assert_eq!(value(&registry, ClassId::new("A", false).into()), Some("class"));
    assert_eq!(value(&registry, ElementId::member("A", "x").into()), Some("getter"));
    assert_eq!(value(&registry, ElementId::member("A", "x=").into()), Some("setter"));
    assert_eq!(registry.len(), 3);

    let setter = registry.get(&ElementId::member("A", "x=").into()).unwrap();
    assert_eq!(setter.span.start, 32);
    assert_eq!(setter.span.end, 60);
    assert_eq!(setter.object, "setter x");
}

#[test]
fn global_flag_does_not_affect_lookup() {
    let component = component(
        json!([]),
        json!([{ "name": "f", "kind": "method", "offset": 0, "range": { "start": 0, "end": 9 } }]),
    );
    let registry = extract(&component);
    assert!(registry.contains(&ElementId::new(None, "f", true).into()));
}

#[test]
fn constructor_field_formal_declares_but_does_not_read() {
    // class P { int x; P(this.x) : y = x; }
    let component = component(
        json!([{
            "name": "P",
            "offset": 6,
            "range": { "start": 0, "end": 60 },
            "members": [{
                "name": "",
                "kind": "constructor",
                "offset": 20,
                "range": { "start": 20, "end": 50 },
                "function": {
                    "offset": 21,
                    "parameters": [{ "offset": 27, "name": "x" }]
                },
                "initializers": [{
                    "offset": 32,
                    "field": "y",
                    "value": {
                        "type": "VariableGet",
                        "offset": 36,
                        "variable": { "name": "x", "site": "field_formal" }
                    }
                }]
            }]
        }]),
        json!([]),
    );
    let registry = extract(&component);

    assert_eq!(value(&registry, Id::node(27, NodeKind::Node)), Some("VariableDeclaration(x)"));
    assert!(!registry.contains(&Id::node(36, NodeKind::Node)));
    assert_eq!(
        value(&registry, ElementId::member("P", "").into()),
        Some("constructor(x)")
    );
}

// ============================================================================
// Loops and labels
// ============================================================================

#[test]
fn for_in_emits_four_ids_at_statement_offset() {
    // for (var x in list) print(x);
    let registry = extract(&main_with(json!([{
        "type": "ForIn",
        "offset": 20,
        "variable": { "offset": 29, "name": "x" },
        "iterable": var_get(34, Some("list")),
        "body": {
            "type": "Expression",
            "offset": 40,
            "expression": {
                "type": "StaticInvocation",
                "offset": 40,
                "target": "print",
                "arguments": { "positional": [var_get(46, Some("x"))] }
            }
        }
    }])));

    assert_eq!(value(&registry, Id::node(20, NodeKind::Node)), Some("ForInStatement"));
    assert_eq!(value(&registry, Id::node(20, NodeKind::Iterator)), Some("iterator"));
    assert_eq!(value(&registry, Id::node(20, NodeKind::Current)), Some("current"));
    assert_eq!(value(&registry, Id::node(20, NodeKind::MoveNext)), Some("moveNext"));
    assert_eq!(
        node_ids(&registry),
        vec![
            "node:20",
            "iterator:20",
            "current:20",
            "moveNext:20",
            "node:29",
            "node:34",
            "node:46"
        ]
    );
}

#[test]
fn labeled_block_is_addressed_at_body_offset() {
    // outer: { break outer; }
    let registry = extract(&main_with(json!([{
        "type": "Labeled",
        "offset": 20,
        "body": {
            "type": "Block",
            "offset": 27,
            "statements": [{ "type": "Break", "offset": 29 }]
        }
    }])));

    let fact = registry.get(&Id::node(27, NodeKind::Node)).unwrap();
    assert_eq!(fact.value, "LabeledStatement");
    assert!(!registry.contains(&Id::node(20, NodeKind::Node)));
    assert!(registry.contains(&Id::node(29, NodeKind::Node)));
}

#[test]
fn labeled_expression_statement_is_addressed_at_body_offset() {
    // done: print(1);
    let registry = extract(&main_with(json!([{
        "type": "Labeled",
        "offset": 20,
        "body": {
            "type": "Expression",
            "offset": 26,
            "expression": {
                "type": "StaticInvocation",
                "offset": 26,
                "target": "print",
                "arguments": { "positional": [{ "type": "Literal", "offset": 32, "value": "1" }] }
            }
        }
    }])));

    assert_eq!(node_ids(&registry), vec!["node:26"]);
    assert_eq!(value(&registry, Id::node(26, NodeKind::Node)), Some("LabeledStatement"));
}

#[test]
fn labeled_loop_is_not_addressed() {
    // outer: while (c) {}
    let registry = extract(&main_with(json!([{
        "type": "Labeled",
        "offset": 20,
        "body": {
            "type": "While",
            "offset": 27,
            "condition": { "type": "Literal", "offset": 34, "value": "true" },
            "body": { "type": "Block", "offset": 40 }
        }
    }])));

    assert_eq!(node_ids(&registry), vec!["node:27"]);
    assert_eq!(value(&registry, Id::node(27, NodeKind::Node)), Some("WhileStatement"));
}

#[test]
fn labeled_switch_is_not_addressed() {
    // outer: switch (1) {}
    let registry = extract(&main_with(json!([{
        "type": "Labeled",
        "offset": 40,
        "body": {
            "type": "Switch",
            "offset": 47,
            "expression": { "type": "Literal", "offset": 55, "value": "1" }
        }
    }])));

    assert_eq!(node_ids(&registry), vec!["node:47"]);
    assert_eq!(value(&registry, Id::node(47, NodeKind::Node)), Some("SwitchStatement"));
}

#[test]
fn labeled_loop_body_is_not_addressed() {
    // while (c) { continue; } with the body wrapped in a continue label
    let registry = extract(&main_with(json!([{
        "type": "While",
        "offset": 20,
        "condition": { "type": "Literal", "offset": 27, "value": "true" },
        "body": {
            "type": "Labeled",
            "offset": 33,
            "body": {
                "type": "Block",
                "offset": 33,
                "statements": [{ "type": "Break", "offset": 35 }]
            }
        }
    }])));

    assert_eq!(node_ids(&registry), vec!["node:20", "node:35"]);
}

#[test]
fn do_and_for_loops_are_addressed() {
    let registry = extract(&main_with(json!([
        {
            "type": "Do",
            "offset": 20,
            "body": { "type": "Block", "offset": 23 },
            "condition": { "type": "Literal", "offset": 33, "value": "false" }
        },
        {
            "type": "For",
            "offset": 40,
            "variables": [{
                "offset": 49,
                "name": "i",
                "initializer": { "type": "Literal", "offset": 53, "value": "0" }
            }],
            "condition": {
                "type": "MethodInvocation",
                "offset": 58,
                "receiver": var_get(56, Some("i")),
                "name": "<",
                "arguments": { "positional": [{ "type": "Literal", "offset": 60, "value": "3" }] }
            },
            "updates": [{
                "type": "VariableSet",
                "offset": 63,
                "variable": { "name": "i" },
                "value": {
                    "type": "MethodInvocation",
                    "offset": 64,
                    "receiver": var_get(63, Some("i")),
                    "name": "+",
                    "arguments": { "positional": [{ "type": "Literal", "offset": 66, "value": "1" }] }
                }
            }],
            "body": { "type": "Empty", "offset": 70 }
        }
    ])));

    assert_eq!(
        node_ids(&registry),
        vec![
            "node:20", "node:40", "node:49", "node:56", "invoke:58", "node:63", "update:63",
            "invoke:64"
        ]
    );
}

// ============================================================================
// Switch
// ============================================================================

#[test]
fn switch_cases_use_first_expression_offset() {
    // switch (x) { case 1: case 2: break; default: break; }
    let registry = extract(&main_with(json!([{
        "type": "Switch",
        "offset": 20,
        "expression": var_get(28, Some("x")),
        "cases": [
            {
                "offset": 33,
                "expressions": [
                    { "type": "Literal", "offset": 38, "value": "1" },
                    { "type": "Literal", "offset": 46, "value": "2" }
                ],
                "body": { "type": "Break", "offset": 49 }
            },
            {
                "offset": 56,
                "body": { "type": "Break", "offset": 65 }
            }
        ]
    }])));

    assert_eq!(value(&registry, Id::node(38, NodeKind::Node)), Some("SwitchCase"));
    assert!(!registry.contains(&Id::node(33, NodeKind::Node)));
    assert!(!registry.contains(&Id::node(56, NodeKind::Node)));
    assert_eq!(
        node_ids(&registry),
        vec!["node:20", "node:28", "node:38", "node:49", "node:65"]
    );
}

#[test]
fn continue_switch_is_addressed() {
    let registry = extract(&main_with(json!([{
        "type": "Switch",
        "offset": 20,
        "expression": var_get(28, Some("x")),
        "cases": [{
            "offset": 33,
            "expressions": [{ "type": "Literal", "offset": 38, "value": "1" }],
            "body": { "type": "ContinueSwitch", "offset": 41 }
        }]
    }])));
    assert_eq!(
        value(&registry, Id::node(41, NodeKind::Node)),
        Some("ContinueSwitchStatement")
    );
}

// ============================================================================
// Invocations
// ============================================================================

#[test]
fn null_aware_access_records_only_the_property_get() {
    // list?.length, desugared to: let #t = list in #t == null ? null : #t.length
    let registry = extract(&main_with(json!([{
        "type": "Expression",
        "offset": 20,
        "expression": {
            "type": "Let",
            "offset": 20,
            "variable": { "offset": 20, "name": null, "initializer": var_get(20, Some("list")) },
            "body": {
                "type": "Conditional",
                "offset": 24,
                "condition": {
                    "type": "MethodInvocation",
                    "offset": 24,
                    "receiver": var_get(20, None),
                    "name": "==",
                    "arguments": { "positional": [{ "type": "Literal", "offset": 24, "value": "null" }] }
                },
                "then": { "type": "Literal", "offset": 24, "value": "null" },
                "otherwise": {
                    "type": "PropertyGet",
                    "offset": 26,
                    "receiver": var_get(20, None),
                    "name": "length"
                }
            }
        }
    }])));

    assert_eq!(node_ids(&registry), vec!["node:20", "node:26"]);
    assert_eq!(value(&registry, Id::node(20, NodeKind::Node)), Some("VariableGet(list)"));
    assert_eq!(value(&registry, Id::node(26, NodeKind::Node)), Some("PropertyGet(length)"));
    assert!(!registry.contains(&Id::node(24, NodeKind::Invoke)));
}

#[test]
fn synthetic_equality_is_not_descended() {
    // #t == b, where #t is a desugaring temporary
    let registry = extract(&main_with(json!([{
        "type": "Expression",
        "offset": 30,
        "expression": {
            "type": "MethodInvocation",
            "offset": 33,
            "receiver": var_get(30, None),
            "name": "==",
            "arguments": { "positional": [var_get(34, Some("b"))] }
        }
    }])));

    assert!(node_ids(&registry).is_empty());
    assert!(!registry.contains(&Id::node(33, NodeKind::Invoke)));
    assert!(!registry.contains(&Id::node(34, NodeKind::Node)));
}

#[test]
fn named_equality_is_an_invocation() {
    // a == b
    let registry = extract(&main_with(json!([{
        "type": "Expression",
        "offset": 30,
        "expression": {
            "type": "MethodInvocation",
            "offset": 32,
            "receiver": var_get(30, Some("a")),
            "name": "==",
            "arguments": { "positional": [var_get(35, Some("b"))] }
        }
    }])));

    assert_eq!(node_ids(&registry), vec!["node:30", "invoke:32", "node:35"]);
}

#[test]
fn synthetic_variable_set_is_not_addressed_but_value_is_walked() {
    // #t = a
    let registry = extract(&main_with(json!([{
        "type": "Expression",
        "offset": 20,
        "expression": {
            "type": "VariableSet",
            "offset": 20,
            "variable": { "name": null },
            "value": var_get(24, Some("a"))
        }
    }])));

    assert_eq!(node_ids(&registry), vec!["node:24"]);
    assert!(!registry.contains(&Id::node(20, NodeKind::Update)));
}

#[test]
fn local_function_call_is_addressed_at_receiver() {
    // int f(x) => x; f(1);
    let registry = extract(&main_with(json!([
        {
            "type": "FunctionDeclaration",
            "offset": 24,
            "variable": { "offset": 24, "name": "f" },
            "function": {
                "offset": 24,
                "parameters": [{ "offset": 26, "name": "x" }],
                "body": { "type": "Return", "offset": 29, "expression": var_get(32, Some("x")) }
            }
        },
        {
            "type": "Expression",
            "offset": 35,
            "expression": {
                "type": "MethodInvocation",
                "offset": 36,
                "receiver": {
                    "type": "VariableGet",
                    "offset": 35,
                    "variable": { "name": "f", "site": "local_function" }
                },
                "name": "call",
                "arguments": { "positional": [var_get(37, Some("y"))] }
            }
        }
    ])));

    assert_eq!(
        value(&registry, Id::node(24, NodeKind::Node)),
        Some("FunctionDeclaration(f)")
    );
    assert_eq!(value(&registry, Id::node(35, NodeKind::Invoke)), Some("MethodInvocation(call)"));
    assert!(!registry.contains(&Id::node(35, NodeKind::Node)));
    assert!(!registry.contains(&Id::node(36, NodeKind::Invoke)));
    assert_eq!(
        node_ids(&registry),
        vec!["node:24", "node:26", "node:32", "invoke:35", "node:37"]
    );
}

#[test]
fn index_operators_use_node_and_update() {
    // m[k]; m[k] = v;
    let registry = extract(&main_with(json!([
        {
            "type": "Expression",
            "offset": 20,
            "expression": {
                "type": "MethodInvocation",
                "offset": 21,
                "receiver": var_get(20, Some("m")),
                "name": "[]",
                "arguments": { "positional": [var_get(22, Some("k"))] }
            }
        },
        {
            "type": "Expression",
            "offset": 30,
            "expression": {
                "type": "MethodInvocation",
                "offset": 31,
                "receiver": var_get(30, Some("m")),
                "name": "[]=",
                "arguments": { "positional": [var_get(32, Some("k")), var_get(37, Some("v"))] }
            }
        }
    ])));

    assert_eq!(value(&registry, Id::node(21, NodeKind::Node)), Some("MethodInvocation([])"));
    assert_eq!(value(&registry, Id::node(31, NodeKind::Update)), Some("MethodInvocation([]=)"));
    assert!(!registry.contains(&Id::node(21, NodeKind::Invoke)));
}

#[test]
fn property_set_load_library_and_closures() {
    let registry = extract(&main_with(json!([
        {
            "type": "Expression",
            "offset": 20,
            "expression": {
                "type": "PropertySet",
                "offset": 22,
                "receiver": var_get(20, Some("o")),
                "name": "x",
                "value": {
                    "type": "FunctionExpression",
                    "offset": 26,
                    "function": { "offset": 26, "body": { "type": "Block", "offset": 29 } }
                }
            }
        },
        {
            "type": "Expression",
            "offset": 40,
            "expression": { "type": "LoadLibrary", "offset": 42, "import": "lib" }
        }
    ])));

    assert_eq!(node_ids(&registry), vec!["node:20", "update:22", "node:26", "invoke:42"]);
}

// ============================================================================
// Computers and failure modes
// ============================================================================

#[test]
fn absent_values_record_nothing() {
    let component = main_with(json!([{ "type": "Break", "offset": 20 }]));
    let computer = ComputerFns::new(
        |_: &Id, _: &Member| None::<String>,
        |id: &Id, _: IrNode<'_>| (id.offset() == Some(20)).then(|| "brk".to_string()),
    );
    let mut sink = CollectingSink::new();
    let registry = extract_component(&computer, &component, &mut sink).unwrap();

    assert_eq!(registry.len(), 1);
    assert_eq!(value(&registry, Id::node(20, NodeKind::Node)), Some("brk"));
}

#[test]
fn duplicate_offsets_are_reported_and_fail() {
    // Two property reads claiming the same offset.
    let component = main_with(json!([{
        "type": "Expression",
        "offset": 20,
        "expression": {
            "type": "PropertyGet",
            "offset": 24,
            "receiver": {
                "type": "PropertyGet",
                "offset": 24,
                "receiver": { "type": "This", "offset": 20 },
                "name": "a"
            },
            "name": "b"
        }
    }]));
    let mut sink = CollectingSink::new();
    let err = extract_component(&ShapeComputer, &component, &mut sink).unwrap_err();

    match err {
        RegistryError::DuplicateId { id, .. } => assert_eq!(id, Id::node(24, NodeKind::Node)),
    }
    let diagnostics = sink.into_diagnostics();
    assert_eq!(diagnostics.len(), 2);
    assert!(diagnostics[0].message.contains("PropertyGet(a)@24"));
    assert!(diagnostics[1].message.contains("PropertyGet(b)@24"));
}

/// Library `file:///b.dart` with class `B { get v; }` and top-level `f`.
fn two_level_component() -> Component {
    serde_json::from_value(json!({
        "libraries": [{
            "uri": "file:///b.dart",
            "classes": [{
                "name": "B",
                "offset": 6,
                "range": { "start": 0, "end": 40 },
                "members": [{
                    "name": "v",
                    "kind": "getter",
                    "offset": 14,
                    "range": { "start": 10, "end": 30 },
                    "function": { "offset": 15, "body": { "type": "Break", "offset": 22 } }
                }]
            }],
            "members": [
                { "name": "f", "kind": "method", "offset": 45, "range": { "start": 42, "end": 60 } }
            ]
        }]
    }))
    .expect("valid IR")
}

#[test]
fn library_root_threads_uri_and_class() {
    let component = two_level_component();
    let library = &component.libraries[0];

    let mut registry = DataRegistry::new();
    let mut sink = CollectingSink::new();
    DataExtractor::new(&ShapeComputer, &mut registry, &mut sink)
        .run(library)
        .unwrap();

    assert_eq!(registry.len(), 4);
    assert_eq!(value(&registry, ElementId::member("B", "v").into()), Some("getter"));
    assert_eq!(value(&registry, ElementId::top_level("f").into()), Some("method()"));
    assert!(!registry.contains(&ElementId::member("B", "f").into()));
    for fact in registry.iter() {
        assert_eq!(fact.span.uri, "file:///b.dart");
    }
}

#[test]
fn class_root_uses_given_uri() {
    let component = two_level_component();
    let class = &component.libraries[0].classes[0];

    let mut registry = DataRegistry::new();
    let mut sink = CollectingSink::new();
    DataExtractor::new(&ShapeComputer, &mut registry, &mut sink)
        .run(Root::Class {
            uri: "file:///elsewhere.dart",
            class,
        })
        .unwrap();

    assert_eq!(value(&registry, ClassId::new("B", false).into()), Some("class"));
    assert_eq!(value(&registry, ElementId::member("B", "v").into()), Some("getter"));
    assert!(registry.contains(&Id::node(22, NodeKind::Node)));
    assert!(!registry.contains(&ElementId::top_level("f").into()));
    assert_eq!(registry.len(), 3);

    let getter = registry.get(&ElementId::member("B", "v").into()).unwrap();
    assert_eq!(getter.span.uri, "file:///elsewhere.dart");
    assert_eq!((getter.span.start, getter.span.end), (10, 30));
}

#[test]
fn member_root_uses_given_class() {
    let component = component(
        json!([{
            "name": "A",
            "offset": 6,
            "range": { "start": 0, "end": 40 },
            "members": [{
                "name": "m",
                "kind": "method",
                "offset": 12,
                "range": { "start": 10, "end": 30 },
                "function": { "offset": 13, "body": { "type": "Break", "offset": 20 } }
            }]
        }]),
        json!([]),
    );
    let library = &component.libraries[0];
    let member = &library.classes[0].members[0];

    let mut registry = DataRegistry::new();
    let mut sink = CollectingSink::new();
    DataExtractor::new(&ShapeComputer, &mut registry, &mut sink)
        .run(Root::Member {
            uri: &library.uri,
            class_name: Some("A"),
            member,
        })
        .unwrap();

    assert_eq!(value(&registry, ElementId::member("A", "m").into()), Some("method()"));
    assert!(registry.contains(&Id::node(20, NodeKind::Node)));
    assert!(!registry.contains(&ClassId::new("A", false).into()));
    assert_eq!(registry.len(), 2);
}

#[test]
#[should_panic(expected = "no source offset on BreakStatement")]
fn missing_offset_is_a_programming_error() {
    let component = main_with(json!([{ "type": "Break" }]));
    let _ = extract_component(&ShapeComputer, &component, &mut CollectingSink::new());
}
