//! parser module tests

use super::*;
use pretty_assertions::assert_eq;

fn only_stmt(source: &str) -> Stmt {
    let mut module = parse(source).unwrap();
    assert_eq!(module.body.len(), 1);
    module.body.remove(0)
}

fn expr_of(source: &str) -> Expr {
    match only_stmt(source).kind {
        StmtKind::Expr(e) => e,
        other => panic!("expected expression statement, got {other:?}"),
    }
}

fn bin(left: Expr, op: BinOp, right: Expr) -> Expr {
    Expr::BinOp {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}

#[test]
fn test_parse_simple_assignment() {
    let stmt = only_stmt("x = 10");
    assert_eq!(stmt.line, 1);
    assert_eq!(
        stmt.kind,
        StmtKind::Assign {
            targets: vec![Expr::name("x")],
            value: Expr::Int(10),
        }
    );
}

#[test]
fn test_parse_chained_assignment_keeps_targets() {
    let stmt = only_stmt("a = b = 1");
    let StmtKind::Assign { targets, value } = stmt.kind else {
        panic!("expected assignment");
    };
    assert_eq!(targets, vec![Expr::name("a"), Expr::name("b")]);
    assert_eq!(value, Expr::Int(1));
}

#[test]
fn test_parse_function_def_with_decorator() {
    let code = r#"
@vbmeta(x=Integer, y=Integer, rettype=Integer)
def add(x, y):
    return x + y
"#;
    let stmt = only_stmt(code);
    assert_eq!(stmt.line, 3);
    let StmtKind::FunctionDef(def) = stmt.kind else {
        panic!("expected function definition");
    };
    assert_eq!(def.name, "add");
    assert_eq!(def.params, vec!["x".to_string(), "y".to_string()]);
    assert_eq!(def.decorators.len(), 1);
    let Expr::Call { keywords, .. } = &def.decorators[0] else {
        panic!("expected decorator call");
    };
    assert_eq!(keywords.len(), 3);
    assert_eq!(keywords[2].arg, "rettype");
    assert_eq!(
        def.body[0].kind,
        StmtKind::Return(Some(bin(Expr::name("x"), BinOp::Add, Expr::name("y"))))
    );
}

#[test]
fn test_parse_elif_nests_in_orelse() {
    let code = r#"
def sign(x):
    if x < 0:
        return -1
    elif x == 0:
        return 0
    else:
        return 1
"#;
    let StmtKind::FunctionDef(def) = only_stmt(code).kind else {
        panic!("expected function definition");
    };
    let StmtKind::If { body, orelse, .. } = &def.body[0].kind else {
        panic!("expected if");
    };
    assert_eq!(body.len(), 1);
    assert_eq!(orelse.len(), 1);
    assert_eq!(orelse[0].line, 5);
    let StmtKind::If {
        test,
        orelse: inner_else,
        ..
    } = &orelse[0].kind
    else {
        panic!("expected nested if for elif");
    };
    assert_eq!(
        *test,
        Expr::Compare {
            left: Box::new(Expr::name("x")),
            ops: vec![CmpOp::Eq],
            comparators: vec![Expr::Int(0)],
        }
    );
    assert_eq!(inner_else[0].kind, StmtKind::Return(Some(Expr::Int(1))));
}

#[test]
fn test_parse_for_range() {
    let code = "for i in range(1, 10):\n    total += i\n";
    let StmtKind::For { target, iter, body } = only_stmt(code).kind else {
        panic!("expected for");
    };
    assert_eq!(target, Expr::name("i"));
    assert_eq!(
        iter,
        Expr::Call {
            func: Box::new(Expr::name("range")),
            args: vec![Expr::Int(1), Expr::Int(10)],
            keywords: vec![],
        }
    );
    assert_eq!(
        body[0].kind,
        StmtKind::AugAssign {
            target: Expr::name("total"),
            op: BinOp::Add,
            value: Expr::name("i"),
        }
    );
}

#[test]
fn test_operator_precedence() {
    // 1 + 2 * 3 ** 2
    assert_eq!(
        expr_of("1 + 2 * 3 ** 2"),
        bin(
            Expr::Int(1),
            BinOp::Add,
            bin(Expr::Int(2), BinOp::Mult, bin(Expr::Int(3), BinOp::Pow, Expr::Int(2)))
        )
    );
    // left associative subtraction
    assert_eq!(
        expr_of("a - b - c"),
        bin(bin(Expr::name("a"), BinOp::Sub, Expr::name("b")), BinOp::Sub, Expr::name("c"))
    );
    // power is right associative
    assert_eq!(
        expr_of("a ** b ** c"),
        bin(Expr::name("a"), BinOp::Pow, bin(Expr::name("b"), BinOp::Pow, Expr::name("c")))
    );
}

#[test]
fn test_bool_ops_are_n_ary() {
    let Expr::BoolOp { op, values } = expr_of("a and b and c") else {
        panic!("expected bool op");
    };
    assert_eq!(op, BoolOp::And);
    assert_eq!(values.len(), 3);

    let Expr::BoolOp { op, values } = expr_of("a or b and c") else {
        panic!("expected bool op");
    };
    assert_eq!(op, BoolOp::Or);
    assert!(matches!(values[1], Expr::BoolOp { op: BoolOp::And, .. }));
}

#[test]
fn test_chained_and_membership_comparisons() {
    let Expr::Compare { ops, comparators, .. } = expr_of("a < b <= c") else {
        panic!("expected comparison");
    };
    assert_eq!(ops, vec![CmpOp::Lt, CmpOp::LtE]);
    assert_eq!(comparators.len(), 2);

    let Expr::Compare { ops, .. } = expr_of("a not in b") else {
        panic!("expected comparison");
    };
    assert_eq!(ops, vec![CmpOp::NotIn]);

    let Expr::Compare { ops, .. } = expr_of("a is not None") else {
        panic!("expected comparison");
    };
    assert_eq!(ops, vec![CmpOp::IsNot]);
}

#[test]
fn test_unary_and_not() {
    assert_eq!(
        expr_of("-x"),
        Expr::UnaryOp {
            op: UnaryOp::USub,
            operand: Box::new(Expr::name("x")),
        }
    );
    assert_eq!(
        expr_of("not done"),
        Expr::UnaryOp {
            op: UnaryOp::Not,
            operand: Box::new(Expr::name("done")),
        }
    );
    // keyword prefixes stay names
    assert_eq!(expr_of("notes"), Expr::name("notes"));
    assert_eq!(expr_of("index"), Expr::name("index"));
}

#[test]
fn test_literals() {
    assert_eq!(
        expr_of("[1, 2, 3, 4.4]"),
        Expr::List(vec![Expr::Int(1), Expr::Int(2), Expr::Int(3), Expr::Float(4.4)])
    );
    assert_eq!(
        expr_of("{'hello': 1, \"world\": 2}"),
        Expr::Dict(vec![
            (Expr::Str("hello".to_string()), Expr::Int(1)),
            (Expr::Str("world".to_string()), Expr::Int(2)),
        ])
    );
    assert_eq!(expr_of("'it\\'s'"), Expr::Str("it's".to_string()));
    assert_eq!(expr_of("(1, 2)"), Expr::Tuple(vec![Expr::Int(1), Expr::Int(2)]));
    assert_eq!(expr_of("(1)"), Expr::Int(1));
    assert_eq!(expr_of("(1,)"), Expr::Tuple(vec![Expr::Int(1)]));
}

#[test]
fn test_list_comprehension() {
    let Expr::ListComp { elt, generators } =
        expr_of("[2*z for z in range(1,20) if z>3 and z<=9 and z%2==0]")
    else {
        panic!("expected list comprehension");
    };
    assert_eq!(*elt, bin(Expr::Int(2), BinOp::Mult, Expr::name("z")));
    assert_eq!(generators.len(), 1);
    assert_eq!(generators[0].target, Expr::name("z"));
    assert_eq!(generators[0].ifs.len(), 1);
    assert!(matches!(
        generators[0].ifs[0],
        Expr::BoolOp { op: BoolOp::And, ref values } if values.len() == 3
    ));
}

#[test]
fn test_comprehension_keeps_every_generator_and_filter() {
    let Expr::ListComp { generators, .. } = expr_of("[x for x in a if x if y for y in b]") else {
        panic!("expected list comprehension");
    };
    assert_eq!(generators.len(), 2);
    assert_eq!(generators[0].ifs.len(), 2);
}

#[test]
fn test_trailers() {
    assert_eq!(
        expr_of("self.people[1].name"),
        Expr::Attribute {
            value: Box::new(Expr::Subscript {
                value: Box::new(Expr::Attribute {
                    value: Box::new(Expr::name("self")),
                    attr: "people".to_string(),
                }),
                index: Box::new(Expr::Int(1)),
            }),
            attr: "name".to_string(),
        }
    );
}

#[test]
fn test_class_with_methods() {
    let code = r#"
class Person(object):
    """A person."""
    def __init__(self, name):
        self.name = name

    def greet(self):
        return self.name
"#;
    let stmt = only_stmt(code);
    let StmtKind::ClassDef(class) = stmt.kind else {
        panic!("expected class");
    };
    assert_eq!(class.name, "Person");
    assert_eq!(class.bases, vec![Expr::name("object")]);
    assert_eq!(class.body.len(), 3);
    assert!(matches!(class.body[0].kind, StmtKind::Expr(Expr::Str(_))));
    assert_eq!(class.body[2].line, 7);
}

#[test]
fn test_multiline_bracket_expression() {
    let code = "a = [1,\n     2,\n     3]\nb = 2\n";
    let module = parse(code).unwrap();
    assert_eq!(module.body.len(), 2);
    assert_eq!(module.body[1].line, 4);
}

#[test]
fn test_inline_body_and_semicolons() {
    let code = "if x: y = 1; z = 2\n";
    let StmtKind::If { body, .. } = only_stmt(code).kind else {
        panic!("expected if");
    };
    assert_eq!(body.len(), 2);
}

#[test]
fn test_unsupported_statements_still_parse() {
    let code = r#"
import math
while x:
    break
try:
    pass
except ValueError as e:
    continue
finally:
    pass
"#;
    let module = parse(code).unwrap();
    assert!(matches!(module.body[0].kind, StmtKind::Import(_)));
    assert!(matches!(module.body[1].kind, StmtKind::While { .. }));
    let StmtKind::Try {
        handlers, finalbody, ..
    } = &module.body[2].kind
    else {
        panic!("expected try");
    };
    assert_eq!(handlers[0].name.as_deref(), Some("e"));
    assert_eq!(finalbody.len(), 1);
}

#[test]
fn test_syntax_error_reports_line() {
    let err = parse("x = 1\ny = [1:2]\n").unwrap_err();
    assert!(matches!(err, PyVbaError::ParseError { line: 2, .. }));

    let err = parse("x = lambda a: a\n").unwrap_err();
    assert_eq!(err.line(), 1);
}

#[test]
fn test_missing_block_is_error() {
    let err = parse("def f():\nx = 1\n").unwrap_err();
    assert!(matches!(err, PyVbaError::ParseError { line: 1, .. }));
}

#[test]
fn test_bad_indentation() {
    let err = parse("    x = 1\n").unwrap_err();
    assert!(matches!(err, PyVbaError::ParseError { line: 1, .. }));

    let code = "def f():\n    if x:\n        y = 1\n      z = 2\n";
    let err = parse(code).unwrap_err();
    let PyVbaError::ParseError { line, message } = err else {
        panic!("expected parse error");
    };
    assert_eq!(line, 4);
    assert!(message.contains("unindent"));
}

#[test]
fn test_stray_else_is_error() {
    let err = parse("else:\n    x = 1\n").unwrap_err();
    assert!(matches!(err, PyVbaError::ParseError { line: 1, .. }));
}

#[test]
fn test_for_else_is_unsupported() {
    let code = "for i in range(0, 2):\n    pass\nelse:\n    pass\n";
    let err = parse(code).unwrap_err();
    assert!(matches!(err, PyVbaError::UnsupportedConstruct { line: 3, .. }));
}
