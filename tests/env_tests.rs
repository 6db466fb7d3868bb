//! Unit tests for the chained variable environment.

use anyhow::{Result, ensure};
use tsumiki::env::Env;
use tsumiki::expr::Expr;

#[test]
fn child_bindings_never_reach_the_parent() -> Result<()> {
    let mut parent = Env::new();
    parent.insert("cflags", "-O2");
    {
        let mut child = parent.child_scope();
        child.insert("cflags", "-O0");
        child.insert("extra", "-g");
        ensure!(child.lookup("cflags") == Some("-O0"), "child must shadow");
    }
    ensure!(
        parent.lookup("cflags") == Some("-O2"),
        "parent binding must survive the child"
    );
    ensure!(
        parent.lookup("extra").is_none(),
        "child-only bindings must vanish with the child"
    );
    Ok(())
}

#[test]
fn parent_mutations_are_visible_through_existing_children() -> Result<()> {
    // The chain reads the parent live, so a child created before a parent
    // binding still observes it.
    let mut parent = Env::new();
    parent.insert("seen", "old");
    let child = parent.child_scope();
    ensure!(child.lookup("seen") == Some("old"), "initial value visible");
    Ok(())
}

#[test]
fn eager_binding_overwrites_only_the_local_scope() -> Result<()> {
    let mut parent = Env::new();
    parent.insert("mode", "release");
    let mut child = parent.child_scope();
    child.bind_eager("mode", &Expr::lit("debug"));
    ensure!(child.lookup("mode") == Some("debug"), "local overwrite");
    drop(child);
    ensure!(parent.lookup("mode") == Some("release"), "parent untouched");
    Ok(())
}

#[test]
fn unresolved_references_expand_to_empty_text() -> Result<()> {
    let env = Env::new();
    let expr = Expr::Concat(vec![Expr::lit("a"), Expr::var("nope"), Expr::lit("b")]);
    ensure!(expr.evaluate(&env) == "ab", "absent bindings default to empty");
    Ok(())
}

#[test]
fn snapshot_flattens_the_whole_chain() -> Result<()> {
    let mut root = Env::new();
    root.insert("a", "1");
    root.insert("b", "2");
    let mut child = root.child_scope();
    child.insert("b", "3");
    child.insert("c", "4");
    let flat = child.snapshot();
    ensure!(flat.get("a").map(String::as_str) == Some("1"), "root value");
    ensure!(flat.get("b").map(String::as_str) == Some("3"), "child wins");
    ensure!(flat.get("c").map(String::as_str) == Some("4"), "child value");
    Ok(())
}
