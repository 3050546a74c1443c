//! Python parser adapter.
//!
//! Parses source with tree-sitter + tree-sitter-python and lowers the
//! concrete syntax tree into the CPython-`ast`-shaped [`SyntaxNode`] tree
//! the graph builder consumes: `Module`, `FunctionDef`, `Assign`, `Call`,
//! `Name` (with a Load/Store/Del context child), `Constant`, and so on.
//! Grammar kinds without a mapping pass through under their raw kind name
//! and get generic labels downstream.

use crate::domain::ast::SyntaxNode;
use crate::error::VizError;
use crate::ports::AstParser;
use tree_sitter::{Node, Parser};

/// Parses Python source into a [`SyntaxNode`] tree.
pub struct PythonAstParser;

impl AstParser for PythonAstParser {
    fn parse(&self, source: &str) -> Result<SyntaxNode, VizError> {
        if source.is_empty() {
            return Err(VizError::EmptyInput);
        }

        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| VizError::Syntax(e.to_string()))?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| VizError::Syntax("parser produced no tree".to_string()))?;

        let root = tree.root_node();
        if root.has_error() {
            return Err(syntax_error(root));
        }
        Ok(lower(root, source, Ctx::Load))
    }
}

/// Locate the first error in the tree and report its position.
fn syntax_error(root: Node) -> VizError {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            let pos = node.start_position();
            return VizError::Syntax(format!(
                "invalid syntax at line {}, column {}",
                pos.row + 1,
                pos.column + 1
            ));
        }
        for i in (0..node.child_count()).rev() {
            if let Some(child) = node.child(i) {
                stack.push(child);
            }
        }
    }
    VizError::Syntax("invalid syntax".to_string())
}

/// Expression context, propagated top-down: assignment and loop targets
/// store, `del` targets delete, everything else loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ctx {
    Load,
    Store,
    Del,
}

impl Ctx {
    fn marker(self) -> SyntaxNode {
        SyntaxNode::new(match self {
            Ctx::Load => "Load",
            Ctx::Store => "Store",
            Ctx::Del => "Del",
        })
    }
}

fn text<'a>(node: Node, src: &'a str) -> &'a str {
    node.utf8_text(src.as_bytes()).unwrap_or_default()
}

/// Named children with comments dropped.
fn named_children<'a>(node: Node<'a>) -> Vec<Node<'a>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
        .collect()
}

fn lower_all(nodes: Vec<Node>, src: &str, ctx: Ctx) -> Vec<SyntaxNode> {
    nodes.into_iter().map(|n| lower(n, src, ctx)).collect()
}

/// Statements of a block node.
fn lower_block(node: Option<Node>, src: &str) -> Vec<SyntaxNode> {
    match node {
        Some(block) => lower_all(named_children(block), src, Ctx::Load),
        None => Vec::new(),
    }
}

fn has_async_keyword(node: Node) -> bool {
    (0..node.child_count()).any(|i| node.child(i).is_some_and(|c| c.kind() == "async"))
}

fn lower(node: Node, src: &str, ctx: Ctx) -> SyntaxNode {
    match node.kind() {
        "module" => SyntaxNode::new("Module")
            .with_children("body", lower_all(named_children(node), src, Ctx::Load)),

        "function_definition" => {
            let type_name = if has_async_keyword(node) {
                "AsyncFunctionDef"
            } else {
                "FunctionDef"
            };
            let mut def = SyntaxNode::new(type_name);
            if let Some(name) = node.child_by_field_name("name") {
                def = def.with_scalar("name", text(name, src));
            }
            if let Some(params) = node.child_by_field_name("parameters") {
                def = def.with_child("args", lower_parameters(params, src));
            }
            if let Some(ret) = node.child_by_field_name("return_type") {
                def = def.with_child("returns", lower(ret, src, Ctx::Load));
            }
            def.with_children("body", lower_block(node.child_by_field_name("body"), src))
        }

        "class_definition" => {
            let mut class = SyntaxNode::new("ClassDef");
            if let Some(name) = node.child_by_field_name("name") {
                class = class.with_scalar("name", text(name, src));
            }
            if let Some(bases) = node.child_by_field_name("superclasses") {
                class = class
                    .with_children("bases", lower_all(named_children(bases), src, Ctx::Load));
            }
            class.with_children("body", lower_block(node.child_by_field_name("body"), src))
        }

        "decorated_definition" => {
            let mut def = match node.child_by_field_name("definition") {
                Some(inner) => lower(inner, src, Ctx::Load),
                None => SyntaxNode::new("decorated_definition"),
            };
            let decorators: Vec<SyntaxNode> = named_children(node)
                .into_iter()
                .filter(|n| n.kind() == "decorator")
                .filter_map(|d| named_children(d).into_iter().next())
                .map(|expr| lower(expr, src, Ctx::Load))
                .collect();
            if !decorators.is_empty() {
                def = def.with_children("decorator_list", decorators);
            }
            def
        }

        "expression_statement" => {
            let children = named_children(node);
            match children.as_slice() {
                [only] if matches!(only.kind(), "assignment" | "augmented_assignment") => {
                    lower(*only, src, Ctx::Load)
                }
                [only] => SyntaxNode::new("Expr").with_child("value", lower(*only, src, Ctx::Load)),
                _ => SyntaxNode::new("Expr")
                    .with_children("value", lower_all(children, src, Ctx::Load)),
            }
        }

        "assignment" => {
            let left = node.child_by_field_name("left");
            let right = node.child_by_field_name("right");
            let annotation = node.child_by_field_name("type");
            match (left, right, annotation) {
                (Some(l), None, Some(ann)) => SyntaxNode::new("AnnAssign")
                    .with_child("target", lower(l, src, Ctx::Store))
                    .with_child("annotation", lower(ann, src, Ctx::Load)),
                (l, r, ann) => {
                    let mut assign = SyntaxNode::new("Assign");
                    if let Some(l) = l {
                        assign =
                            assign.with_children("targets", vec![lower(l, src, Ctx::Store)]);
                    }
                    if let Some(ann) = ann {
                        assign = assign.with_child("annotation", lower(ann, src, Ctx::Load));
                    }
                    if let Some(r) = r {
                        assign = assign.with_child("value", lower(r, src, Ctx::Load));
                    }
                    assign
                }
            }
        }

        "augmented_assignment" => {
            let mut assign = SyntaxNode::new("AugAssign");
            if let Some(l) = node.child_by_field_name("left") {
                assign = assign.with_child("target", lower(l, src, Ctx::Store));
            }
            if let Some(op) = node.child_by_field_name("operator") {
                assign = assign.with_child("op", SyntaxNode::new(aug_op_name(text(op, src))));
            }
            if let Some(r) = node.child_by_field_name("right") {
                assign = assign.with_child("value", lower(r, src, Ctx::Load));
            }
            assign
        }

        "call" => {
            let mut call = SyntaxNode::new("Call");
            if let Some(func) = node.child_by_field_name("function") {
                call = call.with_child("func", lower(func, src, Ctx::Load));
            }
            if let Some(args) = node.child_by_field_name("arguments") {
                call = call.with_children("args", lower_all(named_children(args), src, Ctx::Load));
            }
            call
        }

        "keyword_argument" => {
            let mut kw = SyntaxNode::new("keyword");
            if let Some(name) = node.child_by_field_name("name") {
                kw = kw.with_scalar("arg", text(name, src));
            }
            if let Some(value) = node.child_by_field_name("value") {
                kw = kw.with_child("value", lower(value, src, Ctx::Load));
            }
            kw
        }

        "identifier" => SyntaxNode::new("Name")
            .with_scalar("id", text(node, src))
            .with_child("ctx", ctx.marker()),

        "attribute" => {
            let mut attr = SyntaxNode::new("Attribute");
            if let Some(object) = node.child_by_field_name("object") {
                attr = attr.with_child("value", lower(object, src, Ctx::Load));
            }
            if let Some(name) = node.child_by_field_name("attribute") {
                attr = attr.with_scalar("attr", text(name, src));
            }
            attr.with_child("ctx", ctx.marker())
        }

        "subscript" => {
            let mut sub = SyntaxNode::new("Subscript");
            if let Some(value) = node.child_by_field_name("value") {
                sub = sub.with_child("value", lower(value, src, Ctx::Load));
            }
            if let Some(index) = node.child_by_field_name("subscript") {
                sub = sub.with_child("slice", lower(index, src, Ctx::Load));
            }
            sub.with_child("ctx", ctx.marker())
        }

        "string" => lower_string(node, src),

        "concatenated_string" => {
            let parts = lower_all(named_children(node), src, Ctx::Load);
            if parts.iter().all(|p| p.type_name == "Constant") {
                let merged: String = parts
                    .iter()
                    .filter_map(|p| p.scalar("value"))
                    .collect();
                SyntaxNode::new("Constant").with_scalar("value", merged)
            } else {
                SyntaxNode::new("JoinedStr").with_children("values", parts)
            }
        }

        "integer" | "float" => {
            SyntaxNode::new("Constant").with_scalar("value", text(node, src))
        }
        "true" => SyntaxNode::new("Constant").with_scalar("value", "True"),
        "false" => SyntaxNode::new("Constant").with_scalar("value", "False"),
        "none" => SyntaxNode::new("Constant").with_scalar("value", "None"),
        "ellipsis" => SyntaxNode::new("Constant").with_scalar("value", "Ellipsis"),

        "binary_operator" => {
            let mut binop = SyntaxNode::new("BinOp");
            if let Some(l) = node.child_by_field_name("left") {
                binop = binop.with_child("left", lower(l, src, Ctx::Load));
            }
            if let Some(op) = node.child_by_field_name("operator") {
                binop = binop.with_child("op", SyntaxNode::new(bin_op_name(text(op, src))));
            }
            if let Some(r) = node.child_by_field_name("right") {
                binop = binop.with_child("right", lower(r, src, Ctx::Load));
            }
            binop
        }

        "boolean_operator" => {
            let op = node
                .child_by_field_name("operator")
                .map(|op| if text(op, src) == "and" { "And" } else { "Or" })
                .unwrap_or("And");
            let mut values = Vec::new();
            if let Some(l) = node.child_by_field_name("left") {
                values.push(lower(l, src, Ctx::Load));
            }
            if let Some(r) = node.child_by_field_name("right") {
                values.push(lower(r, src, Ctx::Load));
            }
            SyntaxNode::new("BoolOp")
                .with_child("op", SyntaxNode::new(op))
                .with_children("values", values)
        }

        "not_operator" => {
            let mut unary = SyntaxNode::new("UnaryOp").with_child("op", SyntaxNode::new("Not"));
            if let Some(arg) = node.child_by_field_name("argument") {
                unary = unary.with_child("operand", lower(arg, src, Ctx::Load));
            }
            unary
        }

        "unary_operator" => {
            let op = node
                .child_by_field_name("operator")
                .map(|op| match text(op, src) {
                    "-" => "USub",
                    "+" => "UAdd",
                    _ => "Invert",
                })
                .unwrap_or("USub");
            let mut unary = SyntaxNode::new("UnaryOp").with_child("op", SyntaxNode::new(op));
            if let Some(arg) = node.child_by_field_name("argument") {
                unary = unary.with_child("operand", lower(arg, src, Ctx::Load));
            }
            unary
        }

        "comparison_operator" => {
            let operands = named_children(node);
            let mut compare = SyntaxNode::new("Compare");
            let mut iter = operands.into_iter();
            if let Some(first) = iter.next() {
                compare = compare.with_child("left", lower(first, src, Ctx::Load));
            }
            let mut cursor = node.walk();
            let ops: Vec<SyntaxNode> = node
                .children_by_field_name("operators", &mut cursor)
                .map(|op| SyntaxNode::new(cmp_op_name(text(op, src))))
                .collect();
            if !ops.is_empty() {
                compare = compare.with_children("ops", ops);
            }
            compare.with_children("comparators", lower_all(iter.collect(), src, Ctx::Load))
        }

        "tuple" | "pattern_list" | "expression_list" => SyntaxNode::new("Tuple")
            .with_children("elts", lower_all(named_children(node), src, ctx))
            .with_child("ctx", ctx.marker()),

        "list" => SyntaxNode::new("List")
            .with_children("elts", lower_all(named_children(node), src, ctx))
            .with_child("ctx", ctx.marker()),

        "set" => SyntaxNode::new("Set")
            .with_children("elts", lower_all(named_children(node), src, Ctx::Load)),

        "dictionary" => {
            let mut keys = Vec::new();
            let mut values = Vec::new();
            for entry in named_children(node) {
                match entry.kind() {
                    "pair" => {
                        if let Some(k) = entry.child_by_field_name("key") {
                            keys.push(lower(k, src, Ctx::Load));
                        }
                        if let Some(v) = entry.child_by_field_name("value") {
                            values.push(lower(v, src, Ctx::Load));
                        }
                    }
                    _ => values.push(lower(entry, src, Ctx::Load)),
                }
            }
            SyntaxNode::new("Dict")
                .with_children("keys", keys)
                .with_children("values", values)
        }

        "parenthesized_expression" => match named_children(node).into_iter().next() {
            Some(inner) => lower(inner, src, ctx),
            None => SyntaxNode::new("Tuple").with_child("ctx", ctx.marker()),
        },

        "conditional_expression" => {
            // a if b else c — named children arrive in source order.
            let children = named_children(node);
            let mut ifexp = SyntaxNode::new("IfExp");
            let mut iter = children.into_iter();
            if let Some(body) = iter.next() {
                ifexp = ifexp.with_child("body", lower(body, src, Ctx::Load));
            }
            if let Some(test) = iter.next() {
                ifexp = ifexp.with_child("test", lower(test, src, Ctx::Load));
            }
            if let Some(orelse) = iter.next() {
                ifexp = ifexp.with_child("orelse", lower(orelse, src, Ctx::Load));
            }
            ifexp
        }

        "lambda" => {
            let mut lambda = SyntaxNode::new("Lambda");
            if let Some(params) = node.child_by_field_name("parameters") {
                lambda = lambda.with_child("args", lower_parameters(params, src));
            }
            if let Some(body) = node.child_by_field_name("body") {
                lambda = lambda.with_child("body", lower(body, src, Ctx::Load));
            }
            lambda
        }

        "await" => match named_children(node).into_iter().next() {
            Some(inner) => SyntaxNode::new("Await").with_child("value", lower(inner, src, Ctx::Load)),
            None => SyntaxNode::new("Await"),
        },

        "yield" => SyntaxNode::new("Yield")
            .with_children("value", lower_all(named_children(node), src, Ctx::Load)),

        "return_statement" => {
            let mut ret = SyntaxNode::new("Return");
            if let Some(value) = named_children(node).into_iter().next() {
                ret = ret.with_child("value", lower(value, src, Ctx::Load));
            }
            ret
        }

        "pass_statement" => SyntaxNode::new("Pass"),
        "break_statement" => SyntaxNode::new("Break"),
        "continue_statement" => SyntaxNode::new("Continue"),

        "if_statement" => {
            let mut if_node = SyntaxNode::new("If");
            if let Some(test) = node.child_by_field_name("condition") {
                if_node = if_node.with_child("test", lower(test, src, Ctx::Load));
            }
            if_node = if_node.with_children(
                "body",
                lower_block(node.child_by_field_name("consequence"), src),
            );
            let mut orelse = Vec::new();
            let mut cursor = node.walk();
            for alt in node.children_by_field_name("alternative", &mut cursor) {
                match alt.kind() {
                    "elif_clause" => orelse.push(lower(alt, src, Ctx::Load)),
                    "else_clause" => {
                        orelse.extend(lower_block(alt.child_by_field_name("body"), src))
                    }
                    _ => orelse.push(lower(alt, src, Ctx::Load)),
                }
            }
            if !orelse.is_empty() {
                if_node = if_node.with_children("orelse", orelse);
            }
            if_node
        }

        "elif_clause" => {
            let mut if_node = SyntaxNode::new("If");
            if let Some(test) = node.child_by_field_name("condition") {
                if_node = if_node.with_child("test", lower(test, src, Ctx::Load));
            }
            if_node.with_children(
                "body",
                lower_block(node.child_by_field_name("consequence"), src),
            )
        }

        "while_statement" => {
            let mut while_node = SyntaxNode::new("While");
            if let Some(test) = node.child_by_field_name("condition") {
                while_node = while_node.with_child("test", lower(test, src, Ctx::Load));
            }
            while_node = while_node
                .with_children("body", lower_block(node.child_by_field_name("body"), src));
            if let Some(alt) = node.child_by_field_name("alternative") {
                while_node = while_node
                    .with_children("orelse", lower_block(alt.child_by_field_name("body"), src));
            }
            while_node
        }

        "for_statement" => {
            let type_name = if has_async_keyword(node) { "AsyncFor" } else { "For" };
            let mut for_node = SyntaxNode::new(type_name);
            if let Some(target) = node.child_by_field_name("left") {
                for_node = for_node.with_child("target", lower(target, src, Ctx::Store));
            }
            if let Some(iterable) = node.child_by_field_name("right") {
                for_node = for_node.with_child("iter", lower(iterable, src, Ctx::Load));
            }
            for_node = for_node
                .with_children("body", lower_block(node.child_by_field_name("body"), src));
            if let Some(alt) = node.child_by_field_name("alternative") {
                for_node = for_node
                    .with_children("orelse", lower_block(alt.child_by_field_name("body"), src));
            }
            for_node
        }

        "delete_statement" => SyntaxNode::new("Delete")
            .with_children("targets", lower_all(named_children(node), src, Ctx::Del)),

        "raise_statement" => SyntaxNode::new("Raise")
            .with_children("exc", lower_all(named_children(node), src, Ctx::Load)),

        "assert_statement" => SyntaxNode::new("Assert")
            .with_children("test", lower_all(named_children(node), src, Ctx::Load)),

        "global_statement" => {
            let names: Vec<&str> = named_children(node)
                .into_iter()
                .map(|n| text(n, src))
                .collect();
            SyntaxNode::new("Global").with_scalar("names", names.join(", "))
        }

        "nonlocal_statement" => {
            let names: Vec<&str> = named_children(node)
                .into_iter()
                .map(|n| text(n, src))
                .collect();
            SyntaxNode::new("Nonlocal").with_scalar("names", names.join(", "))
        }

        "import_statement" => SyntaxNode::new("Import")
            .with_children("names", lower_aliases(node, src)),

        "import_from_statement" => {
            let mut import = SyntaxNode::new("ImportFrom");
            if let Some(module) = node.child_by_field_name("module_name") {
                import = import.with_scalar("module", text(module, src));
            }
            let names: Vec<SyntaxNode> = named_children(node)
                .into_iter()
                .skip(1) // module_name is the first named child
                .map(|n| lower_alias(n, src))
                .collect();
            import.with_children("names", names)
        }

        "with_statement" => {
            let mut with_node = SyntaxNode::new("With");
            let items: Vec<SyntaxNode> = named_children(node)
                .into_iter()
                .filter(|n| n.kind() == "with_clause")
                .flat_map(|clause| named_children(clause))
                .map(|item| {
                    let mut withitem = SyntaxNode::new("withitem");
                    if let Some(value) = item.child_by_field_name("value") {
                        withitem =
                            withitem.with_child("context_expr", lower(value, src, Ctx::Load));
                    }
                    if let Some(alias) = item.child_by_field_name("alias") {
                        withitem =
                            withitem.with_child("optional_vars", lower(alias, src, Ctx::Store));
                    }
                    withitem
                })
                .collect();
            with_node = with_node.with_children("items", items);
            with_node.with_children("body", lower_block(node.child_by_field_name("body"), src))
        }

        "try_statement" => {
            let mut try_node = SyntaxNode::new("Try").with_children(
                "body",
                lower_block(node.child_by_field_name("body"), src),
            );
            let mut handlers = Vec::new();
            let mut orelse = Vec::new();
            let mut finalbody = Vec::new();
            for clause in named_children(node) {
                match clause.kind() {
                    "except_clause" | "except_group_clause" => {
                        let mut handler = SyntaxNode::new("ExceptHandler");
                        let mut parts = named_children(clause).into_iter();
                        // Everything before the block is the exception
                        // pattern (type, optional alias).
                        let mut body = Vec::new();
                        for part in parts.by_ref() {
                            if part.kind() == "block" {
                                body = lower_all(named_children(part), src, Ctx::Load);
                                break;
                            }
                            handler = handler.with_child("type", lower(part, src, Ctx::Load));
                        }
                        handlers.push(handler.with_children("body", body));
                    }
                    "else_clause" => {
                        orelse.extend(lower_block(clause.child_by_field_name("body"), src))
                    }
                    "finally_clause" => {
                        finalbody.extend(lower_block(
                            named_children(clause).into_iter().find(|n| n.kind() == "block"),
                            src,
                        ))
                    }
                    _ => {}
                }
            }
            if !handlers.is_empty() {
                try_node = try_node.with_children("handlers", handlers);
            }
            if !orelse.is_empty() {
                try_node = try_node.with_children("orelse", orelse);
            }
            if !finalbody.is_empty() {
                try_node = try_node.with_children("finalbody", finalbody);
            }
            try_node
        }

        "list_comprehension" | "set_comprehension" | "dictionary_comprehension"
        | "generator_expression" => {
            let type_name = match node.kind() {
                "list_comprehension" => "ListComp",
                "set_comprehension" => "SetComp",
                "dictionary_comprehension" => "DictComp",
                _ => "GeneratorExp",
            };
            let mut comp = SyntaxNode::new(type_name);
            if let Some(body) = node.child_by_field_name("body") {
                comp = comp.with_child("elt", lower(body, src, Ctx::Load));
            }
            let generators: Vec<SyntaxNode> = named_children(node)
                .into_iter()
                .filter(|n| matches!(n.kind(), "for_in_clause" | "if_clause"))
                .map(|clause| lower_comprehension_clause(clause, src))
                .collect();
            comp.with_children("generators", generators)
        }

        // Unmapped grammar kinds degrade to a generic node labelled with
        // the raw kind name.
        _ => SyntaxNode::new(node.kind())
            .with_children("children", lower_all(named_children(node), src, Ctx::Load)),
    }
}

/// A `string` node: plain contents become one Constant; interpolated
/// f-strings become a JoinedStr of Constant and FormattedValue parts.
fn lower_string(node: Node, src: &str) -> SyntaxNode {
    let children = named_children(node);
    let interpolated = children.iter().any(|c| c.kind() == "interpolation");
    if !interpolated {
        let value: String = children
            .iter()
            .filter(|c| matches!(c.kind(), "string_content" | "escape_sequence"))
            .map(|c| text(*c, src))
            .collect();
        return SyntaxNode::new("Constant").with_scalar("value", value);
    }
    let parts: Vec<SyntaxNode> = children
        .into_iter()
        .filter_map(|c| match c.kind() {
            "string_content" | "escape_sequence" => {
                Some(SyntaxNode::new("Constant").with_scalar("value", text(c, src)))
            }
            "interpolation" => {
                let inner = c
                    .child_by_field_name("expression")
                    .or_else(|| named_children(c).into_iter().next());
                inner.map(|expr| {
                    SyntaxNode::new("FormattedValue")
                        .with_child("value", lower(expr, src, Ctx::Load))
                })
            }
            _ => None,
        })
        .collect();
    SyntaxNode::new("JoinedStr").with_children("values", parts)
}

/// Lower a `parameters` node into an `arguments` node of `arg` children.
fn lower_parameters(node: Node, src: &str) -> SyntaxNode {
    let args: Vec<SyntaxNode> = named_children(node)
        .into_iter()
        .map(|param| match param.kind() {
            "identifier" => SyntaxNode::new("arg").with_scalar("arg", text(param, src)),
            "typed_parameter" | "typed_default_parameter" | "default_parameter" => {
                let mut arg = SyntaxNode::new("arg");
                let name = param
                    .child_by_field_name("name")
                    .or_else(|| named_children(param).into_iter().next());
                if let Some(name) = name {
                    arg = arg.with_scalar("arg", text(name, src));
                }
                if let Some(annotation) = param.child_by_field_name("type") {
                    arg = arg.with_child("annotation", lower(annotation, src, Ctx::Load));
                }
                if let Some(default) = param.child_by_field_name("value") {
                    arg = arg.with_child("default", lower(default, src, Ctx::Load));
                }
                arg
            }
            "list_splat_pattern" | "dictionary_splat_pattern" => {
                let mut arg = SyntaxNode::new("arg");
                if let Some(name) = named_children(param).into_iter().next() {
                    arg = arg.with_scalar("arg", text(name, src));
                }
                arg
            }
            _ => lower(param, src, Ctx::Load),
        })
        .collect();
    SyntaxNode::new("arguments").with_children("args", args)
}

fn lower_comprehension_clause(clause: Node, src: &str) -> SyntaxNode {
    match clause.kind() {
        "for_in_clause" => {
            let mut comp = SyntaxNode::new("comprehension");
            if let Some(target) = clause.child_by_field_name("left") {
                comp = comp.with_child("target", lower(target, src, Ctx::Store));
            }
            if let Some(iterable) = clause.child_by_field_name("right") {
                comp = comp.with_child("iter", lower(iterable, src, Ctx::Load));
            }
            comp
        }
        _ => SyntaxNode::new("comprehension")
            .with_children("ifs", lower_all(named_children(clause), src, Ctx::Load)),
    }
}

fn lower_aliases(node: Node, src: &str) -> Vec<SyntaxNode> {
    named_children(node)
        .into_iter()
        .map(|n| lower_alias(n, src))
        .collect()
}

fn lower_alias(node: Node, src: &str) -> SyntaxNode {
    match node.kind() {
        "aliased_import" => {
            let mut alias = SyntaxNode::new("alias");
            if let Some(name) = node.child_by_field_name("name") {
                alias = alias.with_scalar("name", text(name, src));
            }
            if let Some(asname) = node.child_by_field_name("alias") {
                alias = alias.with_scalar("asname", text(asname, src));
            }
            alias
        }
        "wildcard_import" => SyntaxNode::new("alias").with_scalar("name", "*"),
        _ => SyntaxNode::new("alias").with_scalar("name", text(node, src)),
    }
}

fn bin_op_name(op: &str) -> &'static str {
    match op {
        "+" => "Add",
        "-" => "Sub",
        "*" => "Mult",
        "/" => "Div",
        "//" => "FloorDiv",
        "%" => "Mod",
        "**" => "Pow",
        "<<" => "LShift",
        ">>" => "RShift",
        "|" => "BitOr",
        "^" => "BitXor",
        "&" => "BitAnd",
        "@" => "MatMult",
        _ => "BinOp",
    }
}

fn aug_op_name(op: &str) -> &'static str {
    bin_op_name(op.trim_end_matches('='))
}

fn cmp_op_name(op: &str) -> &'static str {
    match op {
        "==" => "Eq",
        "!=" => "NotEq",
        "<" => "Lt",
        "<=" => "LtE",
        ">" => "Gt",
        ">=" => "GtE",
        "is" => "Is",
        "is not" => "IsNot",
        "in" => "In",
        "not in" => "NotIn",
        _ => "Compare",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ast::FieldValue;

    fn parse(source: &str) -> SyntaxNode {
        PythonAstParser.parse(source).unwrap()
    }

    #[test]
    fn test_empty_source_is_rejected() {
        assert!(matches!(
            PythonAstParser.parse(""),
            Err(VizError::EmptyInput)
        ));
    }

    #[test]
    fn test_invalid_syntax_is_rejected() {
        assert!(matches!(
            PythonAstParser.parse("def ("),
            Err(VizError::Syntax(_))
        ));
    }

    #[test]
    fn test_module_root() {
        let ast = parse("pass\n");
        assert_eq!(ast.type_name, "Module");
        let kinds: Vec<&str> = ast.children().map(|c| c.type_name.as_str()).collect();
        assert_eq!(kinds, vec!["Pass"]);
    }

    #[test]
    fn test_assignment_targets_store() {
        let ast = parse("x = 1\n");
        let assign = ast.children().next().unwrap();
        assert_eq!(assign.type_name, "Assign");
        let target = assign.children().next().unwrap();
        assert_eq!(target.type_name, "Name");
        assert_eq!(target.scalar("id"), Some("x"));
        let ctx = target.children().next().unwrap();
        assert_eq!(ctx.type_name, "Store");
        let value = assign.children().nth(1).unwrap();
        assert_eq!(value.type_name, "Constant");
        assert_eq!(value.scalar("value"), Some("1"));
    }

    #[test]
    fn test_function_definition_carries_name() {
        let ast = parse("def foo():\n    pass\n");
        let def = ast.children().next().unwrap();
        assert_eq!(def.type_name, "FunctionDef");
        assert_eq!(def.scalar("name"), Some("foo"));
        assert!(def.children().any(|c| c.type_name == "Pass"));
    }

    #[test]
    fn test_async_function_definition() {
        let ast = parse("async def fetch():\n    pass\n");
        let def = ast.children().next().unwrap();
        assert_eq!(def.type_name, "AsyncFunctionDef");
    }

    #[test]
    fn test_call_with_string_constant() {
        let ast = parse("print('hi')\n");
        let expr = ast.children().next().unwrap();
        assert_eq!(expr.type_name, "Expr");
        let call = expr.children().next().unwrap();
        assert_eq!(call.type_name, "Call");
        let func = call.children().next().unwrap();
        assert_eq!(func.scalar("id"), Some("print"));
        let arg = call.children().nth(1).unwrap();
        assert_eq!(arg.type_name, "Constant");
        assert_eq!(arg.scalar("value"), Some("hi"));
    }

    #[test]
    fn test_del_targets_get_del_context() {
        let ast = parse("del x\n");
        let delete = ast.children().next().unwrap();
        assert_eq!(delete.type_name, "Delete");
        let target = delete.children().next().unwrap();
        let ctx = target.children().next().unwrap();
        assert_eq!(ctx.type_name, "Del");
    }

    #[test]
    fn test_binary_operator_maps_op_node() {
        let ast = parse("y = x + 1\n");
        let assign = ast.children().next().unwrap();
        let binop = assign.children().nth(1).unwrap();
        assert_eq!(binop.type_name, "BinOp");
        let kinds: Vec<&str> = binop.children().map(|c| c.type_name.as_str()).collect();
        assert_eq!(kinds, vec!["Name", "Add", "Constant"]);
    }

    #[test]
    fn test_class_definition() {
        let ast = parse("class Foo(Base):\n    pass\n");
        let class = ast.children().next().unwrap();
        assert_eq!(class.type_name, "ClassDef");
        assert_eq!(class.scalar("name"), Some("Foo"));
        assert!(class.children().any(|c| c.type_name == "Name"));
    }

    #[test]
    fn test_unknown_kind_passes_through() {
        // match statements have no dedicated lowering; the raw grammar
        // kind must survive.
        let ast = parse("match x:\n    case 1:\n        pass\n");
        let stmt = ast.children().next().unwrap();
        assert_eq!(stmt.type_name, "match_statement");
    }

    #[test]
    fn test_parameters_become_arg_nodes() {
        let ast = parse("def f(a, b=1):\n    pass\n");
        let def = ast.children().next().unwrap();
        let args = def.children().next().unwrap();
        assert_eq!(args.type_name, "arguments");
        let names: Vec<Option<&str>> = args.children().map(|a| a.scalar("arg")).collect();
        assert_eq!(names, vec![Some("a"), Some("b")]);
    }

    #[test]
    fn test_fields_hold_expected_shapes() {
        let ast = parse("x = 1\n");
        let assign = ast.children().next().unwrap();
        let targets = assign
            .fields
            .iter()
            .find(|f| f.name == "targets")
            .unwrap();
        assert!(matches!(&targets.value, FieldValue::Children(c) if c.len() == 1));
    }
}
