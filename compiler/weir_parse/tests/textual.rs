//! Parse/print round-trip and failure-path tests for the textual form.

use pretty_assertions::assert_eq;
use weir_diagnostic::{Diagnostic, ErrorCode};
use weir_hir::{print_module, Module, OpKind};
use weir_parse::parse_module;
use weir_types::Context;

fn parse_ok(ctx: &Context, source: &str) -> Module {
    match parse_module(ctx, source) {
        Ok(module) => module,
        Err(diags) => panic!("expected parse to succeed, got: {diags:?}"),
    }
}

fn parse_err(ctx: &Context, source: &str) -> Vec<Diagnostic> {
    match parse_module(ctx, source) {
        Ok(_) => panic!("expected parse to fail"),
        Err(diags) => diags,
    }
}

/// Print → parse → print is a fixpoint.
fn assert_round_trip(source: &str) {
    let ctx = Context::new();
    let module = parse_ok(&ctx, source);
    let printed = print_module(&ctx, &module);
    let reparsed = parse_ok(&ctx, &printed);
    let reprinted = print_module(&ctx, &reparsed);
    assert_eq!(printed, reprinted);
}

#[test]
fn round_trip_declaration() {
    assert_round_trip("func @checksum bit<16> (bit<16>, bool)\n");
}

#[test]
fn round_trip_definition_with_control_flow() {
    assert_round_trip(
        r#"
func @clamp bit<8> (%x: bit<8>, %limit: bit<8>) {
  %over = cmp gt, %x, %limit
  %r = ternary %over, true {
    yield %limit
  }, false {
    yield %x
  }
  return %r
}
"#,
    );
}

#[test]
fn round_trip_scope_if_and_call() {
    assert_round_trip(
        r#"
func @helper bit<8> (bit<8>)
func @main (%x: bit<8>, %flag: bool) {
  %tmp = variable : bit<8>
  %v = read %tmp
  if %flag {
    %y = call @helper(%v)
  } else {
    scope {
      %c = const 1 : bit<8>
    }
  }
  return
}
"#,
    );
}

#[test]
fn round_trip_annotation_payload() {
    let ctx = Context::new();
    let module = parse_ok(&ctx, "func @apply (bit<8>) \"p4runtime.id=7\"");
    let printed = print_module(&ctx, &module);
    assert_eq!(printed, "func @apply (bit<8>) \"p4runtime.id=7\"\n");
    assert_round_trip(&printed);
}

#[test]
fn round_trip_struct_and_func_types() {
    assert_round_trip(
        "func @route struct<dst: bit<32>, port: bit<9>> (struct<dst: bit<32>, port: bit<9>>, func<bit<8> (bit<8>)>)\n",
    );
}

#[test]
fn terminator_omission_round_trip() {
    let ctx = Context::new();
    let module = parse_ok(
        &ctx,
        "func @f () { scope { %0 = const true; yield } return }",
    );
    let printed = print_module(&ctx, &module);

    // The zero-operand yield is omitted in the scope body.
    assert!(printed.contains("scope {\n    %true = const true\n  }"), "{printed}");

    // Reparsing resynthesizes an identical one-block region with one
    // constant and one zero-operand yield.
    let reparsed = parse_ok(&ctx, &printed);
    let Some(func) = reparsed.funcs().next() else {
        panic!("expected one function");
    };
    let Some(body) = func.body.as_ref() else {
        panic!("expected a definition");
    };
    let Some(scope_op) = body
        .region_ops(body.entry_region())
        .map(|op| body.op(op))
        .find(|op| matches!(op.kind, OpKind::Scope { .. }))
    else {
        panic!("expected a scope op");
    };
    let OpKind::Scope { region } = scope_op.kind else {
        panic!("expected a scope");
    };
    let blocks = &body.region(region).blocks;
    assert_eq!(blocks.len(), 1);
    let ops: Vec<_> = body.block(blocks[0]).ops.iter().map(|&o| body.op(o)).collect();
    assert_eq!(ops.len(), 2);
    assert!(matches!(ops[0].kind, OpKind::Const { .. }));
    assert!(matches!(ops[1].kind, OpKind::Yield));
    assert!(ops[1].operands.is_empty());
}

#[test]
fn multi_block_regions_spell_terminators() {
    let ctx = Context::new();
    // Explicitly terminated multi-block region is accepted.
    parse_ok(
        &ctx,
        r#"
func @ok () {
  scope {
    yield
    ^bb1:
      yield
  }
  return
}
"#,
    );

    // Omitting a terminator in a multi-block region is rejected.
    let diags = parse_err(
        &ctx,
        r#"
func @bad () {
  scope {
    yield
    ^bb1:
      %x = const true
  }
  return
}
"#,
    );
    assert_eq!(diags[0].code, ErrorCode::E1004);
    assert!(diags[0].message.contains("multi-block region must not omit terminator"));
}

#[test]
fn duplicate_struct_fields_all_reported() {
    let ctx = Context::new();
    let diags = parse_err(
        &ctx,
        "func @f (struct<a: bool, a: bit<8>, b: bool, b: bit<4>>)",
    );
    let dup_count = diags
        .iter()
        .filter(|d| d.code == ErrorCode::E1003)
        .count();
    assert_eq!(dup_count, 2);
    assert!(diags.iter().any(|d| d.message.contains("'a'")));
    assert!(diags.iter().any(|d| d.message.contains("'b'")));
}

#[test]
fn unknown_type_mnemonic() {
    let ctx = Context::new();
    let diags = parse_err(&ctx, "func @f (wibble)");
    assert_eq!(diags[0].code, ErrorCode::E1002);
}

#[test]
fn return_type_mismatch_cites_both_types() {
    let ctx = Context::new();
    let diags = parse_err(
        &ctx,
        r#"
func @f bit<16> (%x: bit<32>) {
  return %x
}
"#,
    );
    assert_eq!(diags[0].code, ErrorCode::E3012);
    assert!(diags[0].message.contains("bit<32>"));
    assert!(diags[0].message.contains("bit<16>"));
}

#[test]
fn return_in_void_function() {
    let ctx = Context::new();
    // Bare return in a void function is fine.
    parse_ok(&ctx, "func @f () { return }");

    // Returning a value from a void function is not.
    let diags = parse_err(
        &ctx,
        r#"
func @g (%x: bit<8>) {
  return %x
}
"#,
    );
    assert_eq!(diags[0].code, ErrorCode::E3012);
}

#[test]
fn call_verification_failures() {
    let ctx = Context::new();

    // Wrong argument count.
    let diags = parse_err(
        &ctx,
        r#"
func @two bit<8> (bit<8>, bit<8>)
func @f (%x: bit<8>) {
  %r = call @two(%x)
  return
}
"#,
    );
    assert_eq!(diags[0].code, ErrorCode::E4002);

    // Capturing a result from a void call.
    let diags = parse_err(
        &ctx,
        r#"
func @voidfn (bit<8>)
func @f (%x: bit<8>) {
  %r = call @voidfn(%x)
  return
}
"#,
    );
    assert_eq!(diags[0].code, ErrorCode::E4005);

    // Capturing a result from an action call.
    let diags = parse_err(
        &ctx,
        r#"
func action @drop (%x: bit<8>) {
  return
}
func @f (%x: bit<8>) {
  %r = call @drop(%x)
  return
}
"#,
    );
    assert_eq!(diags[0].code, ErrorCode::E4004);

    // Unknown callee.
    let diags = parse_err(
        &ctx,
        r#"
func @f () {
  call @missing()
  return
}
"#,
    );
    assert_eq!(diags[0].code, ErrorCode::E4001);
}

#[test]
fn action_constraints() {
    let ctx = Context::new();

    // Actions must not declare results.
    let diags = parse_err(&ctx, "func action @a bit<8> (%x: bit<8>) { return }");
    assert_eq!(diags[0].code, ErrorCode::E1006);

    // Actions must have a body.
    let diags = parse_err(&ctx, "func action @a (bit<8>)");
    assert_eq!(diags[0].code, ErrorCode::E1007);
}

#[test]
fn explicit_void_return_normalizes() {
    let ctx = Context::new();
    let module = parse_ok(&ctx, "func @f void (bit<8>)");
    let Some(func) = module.funcs().next() else {
        panic!("expected one function");
    };
    assert!(func.ret.is_none());
    // A void signature prints with no return type at all.
    let printed = print_module(&ctx, &module);
    assert_eq!(printed, "func @f (bit<8>)\n");
}

#[test]
fn undefined_value_name() {
    let ctx = Context::new();
    let diags = parse_err(&ctx, "func @f () { return %ghost }");
    assert_eq!(diags[0].code, ErrorCode::E1010);
}

#[test]
fn shift_and_concat_through_text() {
    let ctx = Context::new();
    parse_ok(
        &ctx,
        r#"
func @f bit<12> (%a: bit<4>, %b: bit<8>) {
  %r = concat %a, %b : bit<12>
  return %r
}
"#,
    );

    let diags = parse_err(
        &ctx,
        r#"
func @g bit<11> (%a: bit<4>, %b: bit<8>) {
  %r = concat %a, %b : bit<11>
  return %r
}
"#,
    );
    assert_eq!(diags[0].code, ErrorCode::E3004);

    let diags = parse_err(
        &ctx,
        r#"
func @h (%a: bit<16>, %n: int<4>) {
  %r = shl %a, %n
  return
}
"#,
    );
    assert_eq!(diags[0].code, ErrorCode::E3006);
}

#[test]
fn binding_on_resultless_op_rejected() {
    let ctx = Context::new();
    let diags = parse_err(
        &ctx,
        r#"
func @f (%c: bool) {
  %r = if %c { yield }
  return
}
"#,
    );
    assert_eq!(diags[0].code, ErrorCode::E1012);
}
