use gop_ast::ast::{Decl, Expr, Ident, ObjKind, Object, Spec};
use gop_ast::fromgo::{ast_file, check_ident, ConvertOptions};
use gop_ast::format_file;
use std::any::Any;
use std::sync::Arc;

/// Parse `from` as Go, convert it and print it as Go+.
fn convert(from: &str) -> String {
    let file = go_parser::parse_file("foo.go", from).unwrap();
    let gop = ast_file(Some(&file), ConvertOptions::empty());
    format_file(&gop).unwrap()
}

fn roundtrip(src: &str) {
    let out = convert(src);
    assert_eq!(out, src, "\nResult:\n{}\nExpected:\n{}\n", out, src);
}

#[test]
fn roundtrip_basic() {
    roundtrip(
        r#"package main

import "fmt"

type a struct {
	v   map[int]chan int
	arr *[2]func()
	i   interface{}
}

var b = &a{
	arr: &[2]func(){
		nil,
		func() {},
	},
}

const c = (10 + 20) * 2

var d = b.arr[1]

var e = b.arr[:1]

var f = a.i.(func() (int))()

func foo(v ...interface{}) {}
"#,
    );
}

#[test]
fn roundtrip_method() {
    roundtrip(
        r#"package main

type foo int

func (a foo) Str() (string) {}
"#,
    );
}

#[test]
fn roundtrip_program() {
    roundtrip(
        r#"package main

import (
	"fmt"
	"os"
)

// Point is a 2D point.
type Point struct {
	X, Y int // coordinates
	Name string
}

func (p *Point) Move(dx, dy int) {
	p.X += dx
	p.Y += dy
}

func main() {
	pts := []Point{
		{X: 1, Y: 2},
		{X: 3, Y: 4},
	}
	for i, p := range pts {
		if i%2 == 0 {
			fmt.Println(p.Name)
		}
	}
	os.Exit(0)
}
"#,
    );
}

#[test]
fn roundtrip_const_group_comments() {
    roundtrip(
        r#"package main

const (
	A = iota // first
	B        // second
	Cde
)

var x, y = 1, 2
"#,
    );
}

#[test]
fn roundtrip_control_flow() {
    roundtrip(
        r#"package main

func classify(v interface{}, ch chan int) string {
	switch t := v.(type) {
	case int:
		if t < 0 {
			return "negative"
		}
	case string:
		return t
	}
	select {
	case n := <-ch:
		_ = n
	default:
	}
	return ""
}
"#,
    );
}

#[test]
fn formatting_normalizes_spacing() {
    let out = convert("package main\nvar   x=1+2\nfunc f( a int )( int ){return a}\n");
    assert_eq!(
        out,
        "package main\n\nvar x = 1 + 2\n\nfunc f(a int) (int) { return a }\n"
    );
}

#[test]
fn converted_idents_link_back() {
    let file = go_parser::parse_file("foo.go", "package main\n\ntype foo int\n\nvar v foo\n").unwrap();
    let gop = ast_file(Some(&file), ConvertOptions::empty());
    let Decl::Gen(g) = &gop.decls[1] else {
        panic!("expected a var declaration");
    };
    let Spec::Value(v) = &g.specs[0] else {
        panic!("expected a value spec");
    };
    let Some(Expr::Ident(ty)) = &v.ty else {
        panic!("expected a named type");
    };
    assert_eq!(ty.obj.as_ref().unwrap().kind, ObjKind::Typ);
    let base = check_ident(ty).expect("bound ident links back");
    assert_eq!(base.name, "foo");
}

#[test]
fn check_ident_on_synthesized_idents() {
    assert!(check_ident(&Ident::new("x")).is_none());

    let mut obj = Object::new(ObjKind::Var, "x");
    obj.data = Some(Arc::new(go_parser::ast::Ident::new(go_parser::span::Pos::NONE, "x")) as Arc<dyn Any + Send + Sync>);
    let mut id = Ident::new("x");
    id.obj = Some(Arc::new(obj));
    assert!(check_ident(&id).is_some());
}

#[test]
fn shared_tree_converts_on_two_threads() {
    let src = "package main\n\ntype foo int\n\nvar x foo\n\nfunc main() {\n\tprintln(x)\n}\n";
    let file = Arc::new(go_parser::parse_file("foo.go", src).unwrap());
    let handles: Vec<_> = (0..2)
        .map(|_| {
            let file = Arc::clone(&file);
            std::thread::spawn(move || {
                let gop = ast_file(Some(&file), ConvertOptions::empty());
                let Decl::Gen(decl) = &gop.decls[1] else {
                    panic!("expected a var declaration");
                };
                let Spec::Value(v) = &decl.specs[0] else {
                    panic!("expected a value spec");
                };
                let Some(Expr::Ident(ty)) = &v.ty else {
                    panic!("expected a named type");
                };
                assert_eq!(check_ident(ty).map(|id| id.name.as_str()), Some("foo"));
                format_file(&gop).unwrap()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), src);
    }
}
