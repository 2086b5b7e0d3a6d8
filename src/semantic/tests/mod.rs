//! semantic module tests

use super::*;
use crate::emitter::Render;
use crate::parser::parse;
use pretty_assertions::assert_eq;

fn translate_code(source: &str) -> Result<ProceduralModule> {
    translate(&parse(source).unwrap())
}

fn procedure_text(source: &str, name: &str) -> String {
    let module = translate_code(source).unwrap();
    module
        .procedure(name)
        .unwrap_or_else(|| panic!("no procedure {name}"))
        .to_code()
}

fn class_text(module: &ProceduralModule, name: &str) -> String {
    module
        .support_modules
        .iter()
        .find(|m| m.name == name)
        .unwrap_or_else(|| panic!("no class module {name}"))
        .to_code()
}

// --- functions and statements ---

#[test]
fn test_annotated_function() {
    let code = r#"
@vbmeta(x=Integer, y=Integer, rettype=Integer)
def add(x, y):
    return x + y
"#;
    assert_eq!(
        procedure_text(code, "add"),
        "Public Function add(x As Integer, y As Integer) As Integer
    add = x + y
    Exit Function
End Function"
    );
}

#[test]
fn test_unannotated_function_is_variant() {
    let code = "def ident(v):\n    return v\n";
    assert_eq!(
        procedure_text(code, "ident"),
        "Public Function ident(v As Variant) As Variant
    ident = v
    Exit Function
End Function"
    );
}

#[test]
fn test_list_literal_and_index_shift() {
    let code = r#"
@vbmeta(rettype=Integer)
def arraytest():
    a = [1, 2, 3, 4.4]
    return a[0] + a[2]
"#;
    assert_eq!(
        procedure_text(code, "arraytest"),
        "Public Function arraytest() As Integer
    Dim a As Collection
    Set a = NewCollection(1, 2, 3, 4.4)
    arraytest = a(0 + 1) + a(2 + 1)
    Exit Function
End Function"
    );
}

#[test]
fn test_dict_literal_and_string_key() {
    let code = r#"
@vbmeta(rettype=Integer)
def dicttest():
    d = {'hello': 1, 'world': 2}
    return d['hello']
"#;
    assert_eq!(
        procedure_text(code, "dicttest"),
        "Public Function dicttest() As Integer
    Dim d As Dictionary
    Set d = NewDictionary(\"hello\", 1, \"world\", 2)
    dicttest = d(\"hello\")
    Exit Function
End Function"
    );
}

#[test]
fn test_elif_ladder() {
    let code = r#"
@vbmeta(x=Integer, rettype=Integer)
def sign(x):
    if x < 0:
        return -1
    elif x == 0:
        return 0
    else:
        return 1
"#;
    assert_eq!(
        procedure_text(code, "sign"),
        "Public Function sign(x As Integer) As Integer
    If x < 0 Then
        sign = -1
        Exit Function
    ElseIf x = 0 Then
        sign = 0
        Exit Function
    Else
        sign = 1
        Exit Function
    End If
End Function"
    );
}

#[test]
fn test_counted_loop() {
    let code = r#"
@vbmeta(rettype=Integer)
def total():
    t = 0
    for i in range(1, 10):
        t += i
    return t
"#;
    assert_eq!(
        procedure_text(code, "total"),
        "Public Function total() As Integer
    Dim t As Integer
    Dim i As Integer
    t = 0
    For i = 1 To 9
        t = t + i
    Next i
    total = t
    Exit Function
End Function"
    );
}

#[test]
fn test_loop_with_expression_bound_and_param_var() {
    let code = r#"
@vbmeta(n=Integer, i=Integer)
def walk(n, i):
    for i in range(0, n):
        pass
"#;
    let text = procedure_text(code, "walk");
    assert!(text.contains("For i = 0 To n - 1"), "{text}");
    assert!(!text.contains("Dim i"), "{text}");
}

#[test]
fn test_locals_keep_first_type() {
    let code = "def f():\n    x = 1\n    x = 'a'\n";
    assert_eq!(
        procedure_text(code, "f"),
        "Public Function f() As Variant
    Dim x As Integer
    x = 1
    x = \"a\"
End Function"
    );
}

#[test]
fn test_assignment_form_follows_recorded_type() {
    let code = r#"
def g():
    return 1

def f():
    c = [1]
    c = g()
    v = g()
    v = [2]
"#;
    let text = procedure_text(code, "f");
    assert!(text.contains("    Set c = g()"), "{text}");
    assert!(text.contains("    Set v = NewCollection(2)"), "{text}");
    assert!(text.contains("    v = g()"), "{text}");
}

#[test]
fn test_bare_return_and_call_statement() {
    let code = r#"
def log(m):
    pass

def f(x):
    log(x)
    return
"#;
    assert_eq!(
        procedure_text(code, "f"),
        "Public Function f(x As Variant) As Variant
    log x
    Exit Function
End Function"
    );
}

#[test]
fn test_call_is_typed_by_callee() {
    let code = r#"
@vbmeta(rettype=Collection)
def make():
    return [1]

def f():
    c = make()
"#;
    let text = procedure_text(code, "f");
    assert!(text.contains("Dim c As Collection"), "{text}");
    assert!(text.contains("Set c = make()"), "{text}");
}

#[test]
fn test_operators() {
    let code = r#"
def f(a, b):
    x = a ** 2 - b % 3
    y = not a or b and a != b
    z = (a + b) * -a
"#;
    let text = procedure_text(code, "f");
    assert!(text.contains("x = a ^ 2 - b Mod 3"), "{text}");
    assert!(text.contains("y = Not a Or b And a <> b"), "{text}");
    assert!(text.contains("z = (a + b) * -a"), "{text}");
}

#[test]
fn test_string_literal_quotes_doubled() {
    let code = "def f():\n    s = 'say \"hi\"'\n";
    assert!(procedure_text(code, "f").contains("s = \"say \"\"hi\"\"\""));
}

#[test]
fn test_docstrings_and_none() {
    let code = r#"
"""Module docstring."""

def f():
    """Function docstring."""
    x = None
"#;
    assert_eq!(
        procedure_text(code, "f"),
        "Public Function f() As Variant
    Dim x As Object
    Set x = Nothing
End Function"
    );
}

#[test]
fn test_integer_and_string_keys() {
    let code = r#"
@vbmeta(i=Integer, k=String, xs=Collection, d=Dictionary)
def f(i, k, xs, d):
    a = xs[i]
    b = d[k]
"#;
    let text = procedure_text(code, "f");
    assert!(text.contains("a = xs(i + 1)"), "{text}");
    assert!(text.contains("b = d(k)"), "{text}");
}

#[test]
fn test_dictionary_integer_keys_are_not_shifted() {
    let code = r#"
@vbmeta(i=Integer)
def f(i):
    d = {1: 'a', -1: 'b'}
    xs = [1, 2]
    return d[1] + d[i] + d[-1] + xs[1]
"#;
    let text = procedure_text(code, "f");
    assert!(text.contains("f = d(1) + d(i) + d(-1) + xs(1 + 1)"), "{text}");
}

#[test]
fn test_helpers_appended_once() {
    let module = translate_code("def f():\n    pass\n").unwrap();
    assert_eq!(module.raw_code, vec![COLLECTION_LITERAL_HELPERS.to_string()]);
    assert!(module.class_support_module.is_none());
}

#[test]
fn test_module_name_option() {
    let module = parse("class A(object):\n    def __init__(self):\n        pass\n").unwrap();
    let options = TranslateOptions {
        module_name: "Sheet".to_string(),
    };
    let vb = translate_with_options(&module, &options).unwrap();
    assert_eq!(vb.name, "Sheet");
    assert_eq!(vb.class_support_module.unwrap().name, "Sheetcls_support");
}

#[test]
fn test_options_deserialize_with_default() {
    let options: TranslateOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(options, TranslateOptions::default());
    assert_eq!(options.module_name, DEFAULT_MODULE_NAME);
}

// --- comprehensions ---

#[test]
fn test_range_comprehension_helper() {
    let code = r#"
@vbmeta(rettype=Collection)
def evens():
    return [2*z for z in range(1,20) if z>3 and z<=9 and z%2==0]
"#;
    let module = translate_code(code).unwrap();
    let names: Vec<_> = module.code.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["evens", "evens_listcomp_0"]);
    assert_eq!(
        module.code[0].to_code(),
        "Public Function evens() As Collection
    Set evens = evens_listcomp_0()
    Exit Function
End Function"
    );
    assert_eq!(
        module.code[1].to_code(),
        "Private Function evens_listcomp_0() As Collection
    Dim z As Integer
    Set evens_listcomp_0 = New Collection
    For z = 1 To 19
        If z > 3 And z <= 9 And z Mod 2 = 0 Then
            evens_listcomp_0.Add 2 * z
        End If
    Next z
End Function"
    );
}

#[test]
fn test_comprehension_captures_in_first_occurrence_order() {
    let code = r#"
@vbmeta(k=Integer, xs=Collection, rettype=Collection)
def scaled(k, xs):
    return [x * k for x in xs if x > k]
"#;
    let module = translate_code(code).unwrap();
    assert!(module.code[0].to_code().contains("Set scaled = scaled_listcomp_0(k, xs)"));
    assert_eq!(
        module.code[1].to_code(),
        "Private Function scaled_listcomp_0(k As Integer, xs As Collection) As Collection
    Dim x As Variant
    Set scaled_listcomp_0 = New Collection
    For Each x In xs
        If x > k Then
            scaled_listcomp_0.Add x * k
        End If
    Next x
End Function"
    );
}

#[test]
fn test_comprehension_over_call_result() {
    let code = r#"
@vbmeta(rettype=Collection)
def make():
    return [1, 2]

def f(n):
    a = [x + n for x in make()]
    b = [x for x in range(0, n)]
"#;
    let module = translate_code(code).unwrap();
    let f = module.procedure("f").unwrap().to_code();
    assert!(f.contains("Set a = f_listcomp_0(n, make())"), "{f}");
    assert!(f.contains("Set b = f_listcomp_1(n)"), "{f}");
    let helper = module.procedure("f_listcomp_0").unwrap();
    assert_eq!(helper.params[1].name, "items__");
    assert_eq!(helper.params[1].ty, VbType::collection());
    assert!(helper.to_code().contains("For Each x In items__"));
    let counted = module.procedure("f_listcomp_1").unwrap().to_code();
    assert!(counted.contains("For x = 0 To n - 1"), "{counted}");
}

#[test]
fn test_nested_comprehension_helpers_follow_their_function() {
    let code = "def f(xs, ys):\n    return [[y for y in ys] for x in xs]\n";
    let module = translate_code(code).unwrap();
    let names: Vec<_> = module.code.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["f", "f_listcomp_0", "f_listcomp_0_listcomp_0"]);
}

#[test]
fn test_comprehension_limits() {
    for (code, line) in [
        ("def f(a, b):\n    return [x for x in a for y in b]\n", 2),
        ("def f(a):\n    return [x for x in a if x if x]\n", 2),
        ("def f(a):\n    return [1 for (x, y) in a]\n", 2),
    ] {
        let err = translate_code(code).unwrap_err();
        assert!(
            matches!(err, PyVbaError::UnsupportedConstruct { line: l, .. } if l == line),
            "{code}: {err}"
        );
    }
}

// --- classes ---

const PEOPLE: &str = r#"
class Person(object):
    @vbmeta(name=String)
    def __init__(self, name):
        self.name = name

    @vbmeta(rettype=String)
    def greet(self):
        return 'Hi ' + self.name

class Company(object):
    @vbmeta(people=Collection)
    def __init__(self, people):
        self.people = people

@vbmeta(rettype=String)
def second_name():
    c = Company([Person('Ann'), Person('Bob')])
    return c.people[1].name
"#;

#[test]
fn test_class_module() {
    let module = translate_code(PEOPLE).unwrap();
    assert_eq!(
        class_text(&module, "Person"),
        "VERSION 1.0 CLASS
BEGIN
    MultiUse = -1 'True
END
Attribute VB_Name = \"Person\"
Attribute VB_GlobalNameSpace = False
Attribute VB_Creatable = False
Attribute VB_PredeclaredId = False
Attribute VB_Exposed = False

Public name As String

Public Function init__(name As String) As Variant
    Me.name = name
End Function

Public Function greet() As String
    greet = \"Hi \" + Me.name
    Exit Function
End Function"
    );
    assert!(class_text(&module, "Company").contains("Set Me.people = people"));
}

#[test]
fn test_constructors_in_support_module() {
    let module = translate_code(PEOPLE).unwrap();
    let support = module.class_support_module.as_ref().unwrap();
    assert_eq!(support.name, "PyMaincls_support");
    assert_eq!(
        support.to_code(),
        "Attribute VB_Name = \"PyMaincls_support\"

Option Explicit

Public Function Person_ctor_(name As String) As Person
    Set Person_ctor_ = New Person
    Person_ctor_.init__ name
End Function

Public Function Company_ctor_(people As Collection) As Company
    Set Company_ctor_ = New Company
    Company_ctor_.init__ people
End Function"
    );
}

#[test]
fn test_constructor_calls_and_field_types() {
    let text = procedure_text(PEOPLE, "second_name");
    assert_eq!(
        text,
        "Public Function second_name() As String
    Dim c As Company
    Set c = Company_ctor_(NewCollection(Person_ctor_(\"Ann\"), Person_ctor_(\"Bob\")))
    second_name = c.people(1 + 1).name
    Exit Function
End Function"
    );
}

#[test]
fn test_class_used_before_definition_and_without_init() {
    let code = r#"
def f():
    e = Empty()
    p = Point(1)

class Empty(object):
    pass

class Point(object):
    def __init__(self, x):
        self.x = x
"#;
    let module = translate_code(code).unwrap();
    let text = module.procedure("f").unwrap().to_code();
    assert!(text.contains("Dim e As Empty"), "{text}");
    assert!(text.contains("Set e = New Empty"), "{text}");
    assert!(text.contains("Set p = Point_ctor_(1)"), "{text}");

    let err = translate_code("def f():\n    e = Empty(1)\nclass Empty(object):\n    pass\n").unwrap_err();
    assert!(matches!(err, PyVbaError::UnsupportedConstruct { line: 2, .. }));
}

#[test]
fn test_method_calls_and_self() {
    let code = r#"
class Counter(object):
    @vbmeta(start=Integer)
    def __init__(self, start):
        self.count = start

    @vbmeta(rettype=Integer)
    def value(self):
        return self.count

    def bump(self, by):
        self.count += by
        return [self.count * v for v in range(0, by)]

@vbmeta(c=Counter, rettype=Integer)
def read(c):
    c.bump(2)
    return c.value() + 1
"#;
    let module = translate_code(code).unwrap();
    let counter = class_text(&module, "Counter");
    assert!(counter.contains("Public count As Integer"), "{counter}");
    assert!(counter.contains("    Me.count = Me.count + by"), "{counter}");
    assert!(counter.contains("Set bump = bump_listcomp_0(by)"), "{counter}");
    assert!(counter.contains("Private Function bump_listcomp_0(by As Variant) As Collection"), "{counter}");
    assert!(counter.contains("bump_listcomp_0.Add Me.count * v"), "{counter}");

    let read = module.procedure("read").unwrap().to_code();
    assert!(read.contains("    c.bump 2"), "{read}");
    assert!(read.contains("    read = c.value() + 1"), "{read}");
}

#[test]
fn test_method_on_new_instance() {
    let code = r#"
class T(object):
    def m(self):
        return 1

def f():
    return T().m()
"#;
    let text = procedure_text(code, "f");
    assert!(text.contains("    f = (New T).m()"), "{text}");
}

#[test]
fn test_renamed_self_parameter() {
    let code = "class A(object):\n    def __init__(this, v):\n        this.v = v\n";
    let module = translate_code(code).unwrap();
    assert!(class_text(&module, "A").contains("Me.v = v"));
}

// --- errors ---

fn error_of(source: &str) -> PyVbaError {
    translate_code(source).unwrap_err()
}

#[test]
fn test_unregistered_nodes_have_no_handler() {
    for (code, node) in [
        ("def f(x):\n    while x:\n        pass\n", "While"),
        ("def f():\n    try:\n        pass\n    finally:\n        pass\n", "Try"),
        ("def f():\n    import os\n", "Import"),
        ("def f():\n    for i in range(0, 2):\n        break\n", "Break"),
        ("def f():\n    x = (1, 2)\n", "Tuple"),
    ] {
        let err = error_of(code);
        assert!(
            matches!(err, PyVbaError::NoHandler { node: ref n, .. } if n == node),
            "{code}: {err}"
        );
    }
}

#[test]
fn test_no_handler_reports_statement_line() {
    let err = error_of("def f(x):\n    y = 1\n    while x:\n        pass\n");
    assert_eq!(err.line(), 3);
}

#[test]
fn test_unsupported_constructs() {
    for (code, line) in [
        ("x = 1\n", 1),
        ("def f():\n    a = b = 1\n", 2),
        ("def f():\n    def g():\n        pass\n", 2),
        ("def f(a, b):\n    return a // b\n", 2),
        ("def f(a, b, c):\n    return a < b < c\n", 2),
        ("def f(a, b):\n    return a in b\n", 2),
        ("def f(a):\n    return g(key=a)\n", 2),
        ("def f(a):\n    for x in a:\n        pass\n", 2),
        ("def f(a):\n    return a[-1]\n", 2),
        ("def f(a):\n    return a[1.5]\n", 2),
        ("def f(a, k):\n    return a[k]\n", 2),
        ("def f(a):\n    a, b = 1, 2\n", 2),
        ("def f(a):\n    a + 1\n", 2),
        ("def f():\n    return range(0, 3)\n", 2),
        ("class A(Base):\n    pass\n", 1),
        ("class A(object):\n    x = 1\n", 2),
        ("class A(object):\n    def m(self):\n        self = 1\n", 3),
        ("def total():\n    total = 1\n    return total\n", 2),
        ("def total():\n    Total = 1\n", 2),
        ("def total(n):\n    for TOTAL in range(0, n):\n        pass\n", 2),
        ("def total(Total):\n    pass\n", 1),
        ("class A(object):\n    def size(self, size):\n        pass\n", 2),
    ] {
        let err = error_of(code);
        assert!(
            matches!(err, PyVbaError::UnsupportedConstruct { line: l, .. } if l == line),
            "{code}: {err}"
        );
    }
}

#[test]
fn test_unknown_annotation_type() {
    let err = error_of("@vbmeta(rettype=Widget)\ndef f():\n    pass\n");
    assert!(matches!(err, PyVbaError::UnknownType { ref name, line: 2 } if name == "Widget"));
}

#[test]
fn test_translation_is_deterministic() {
    let module = parse(PEOPLE).unwrap();
    let first = translate(&module).unwrap();
    let second = translate(&module).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_code(), second.to_code());
}
