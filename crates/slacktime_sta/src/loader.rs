//! Netlist loader: the translator from gate-level netlist text to a
//! [`TimingGraph`] plus its startpoint and endpoint sets.
//!
//! Recognizes both input styles from the external interface contract:
//! continuous assignments (`assign lhs = <expr>;`, classified per
//! [`crate::expr`]) and primitive instantiations with named port
//! connections (`.PortName(net)`). Known primitive port conventions:
//! single-output gates (`NOT`, `AND`, `OR`, `NAND`, `NOR`, `XOR`, `XNOR`,
//! `BUF`) use `.A`/`.B`/`.Y`; `DFF` uses `.D`/`.Q`/`.CLK` (the clock pin is
//! accepted but not wired — no clock network is modeled); `MUX2` uses
//! `.S`/`.A`/`.B`/`.Y` with `Y = S ? B : A`; `full_adder` uses
//! `.A`/`.B`/`.CIN`/`.SUM`/`.COUT`.
//!
//! Loading happens in two passes so that statement order never affects the
//! resulting graph: the first pass walks every statement and allocates a
//! vertex for everything it *produces* (assignment left-hand sides,
//! instance output ports, DFF Q-sides), populating a name-to-vertex symbol
//! table before any edge exists. The second pass re-walks the same
//! statements and wires edges by resolving each *consumed* identifier
//! against that now-complete table. A signal referenced but never produced
//! is [`StaError::UndefinedSignal`], regardless of which pass would have
//! noticed first.
//!
//! Net names are interned through [`slacktime_common::Interner`] before
//! being used as symbol-table keys: the same bit-indexed signal is often
//! referenced by dozens of fan-out edges, and an [`Ident`] is a cheap `u32`
//! to hash and compare instead of re-hashing the string each time.

use crate::error::StaError;
use crate::expr::{classify, parse_expr, ClassifiedGate, Operand};
use crate::graph::{GateTag, Role, TimingGraph};
use crate::ids::VertexId;
use crate::lexer::{tokenize, Token, TokenKind};
use slacktime_common::{Ident, Interner};
use slacktime_config::GateDelayTable;
use slacktime_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink, Label};
use slacktime_source::{FileId, Span};
use std::collections::{HashMap, HashSet};

/// The result of loading a netlist: the graph plus its startpoint and
/// endpoint vertex sets, in first-encountered order.
#[derive(Debug, Clone)]
pub struct LoadedNetlist {
    /// The built timing graph.
    pub graph: TimingGraph,
    /// Startpoint vertices (primary inputs and flip-flop Q-sides).
    pub startpoints: Vec<VertexId>,
    /// Endpoint vertices (primary outputs and flip-flop D-sides).
    pub endpoints: Vec<VertexId>,
}

#[derive(Debug, Clone)]
enum Stmt {
    Assign { lhs: String, expr_start: usize, span: Span },
    Instance { type_name: String, instance_name: String, ports: Vec<(String, String)>, span: Span },
}

/// A netlist-scoped symbol table mapping interned net names to the vertex
/// that produces them.
struct Symbols<'a> {
    interner: &'a Interner,
    by_ident: HashMap<Ident, VertexId>,
}

impl<'a> Symbols<'a> {
    fn new(interner: &'a Interner) -> Self {
        Self { interner, by_ident: HashMap::new() }
    }

    fn declare(&mut self, name: &str, id: VertexId) {
        self.by_ident.insert(self.interner.get_or_intern(name), id);
    }

    fn lookup(&self, name: &str) -> Option<VertexId> {
        self.by_ident.get(&self.interner.get_or_intern(name)).copied()
    }

    fn require(&self, name: &str) -> Result<VertexId, StaError> {
        self.lookup(name).ok_or_else(|| StaError::UndefinedSignal(name.to_string()))
    }

    fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }
}

/// Builds a [`TimingGraph`] from `source`, a gate-level netlist.
///
/// Non-fatal findings (unknown primitives, un-decomposed composites) are
/// emitted into `sink` as warnings rather than aborting the load.
pub fn build_graph(source: &str, file: FileId, sink: &DiagnosticSink) -> Result<LoadedNetlist, StaError> {
    let tokens = tokenize(source, file).map_err(|(msg, _span)| StaError::MalformedNetlist(msg))?;
    let (inputs, outputs, statements) = parse_statements(&tokens)?;

    let delays = GateDelayTable::defaults();
    let interner = Interner::new();
    let mut graph = TimingGraph::new();
    let mut symbols = Symbols::new(&interner);
    let mut startpoints = Vec::new();
    let mut endpoints = Vec::new();

    for name in &inputs {
        let id = graph.add_vertex(name.clone(), Role::PrimaryInput, GateTag::Primary, 0.0);
        symbols.declare(name, id);
        startpoints.push(id);
    }

    declare(&statements, &tokens, &outputs, &delays, &mut graph, &mut symbols, &mut endpoints, sink)?;
    wire(&statements, &tokens, &mut graph, &symbols, sink)?;

    for id in graph.vertex_ids().collect::<Vec<_>>() {
        let v = graph.vertex(id);
        if v.role == Role::FlipFlopQ && !startpoints.contains(&id) {
            startpoints.push(id);
        }
        if v.role == Role::FlipFlopD && !endpoints.contains(&id) {
            endpoints.push(id);
        }
    }

    detect_cycles(&graph)?;

    Ok(LoadedNetlist { graph, startpoints, endpoints })
}

/// Parses the token stream into declarations and a flat statement list,
/// preserving source order. Module header and `wire` declarations are
/// consumed but otherwise unused — undeclared nets implied by use are
/// accepted per the format contract.
fn parse_statements(tokens: &[Token]) -> Result<(Vec<String>, HashSet<String>, Vec<Stmt>), StaError> {
    let mut inputs = Vec::new();
    let mut outputs = HashSet::new();
    let mut statements = Vec::new();
    let mut pos = 0usize;

    if matches!(tokens[pos].kind, TokenKind::KwModule) {
        while !matches!(tokens[pos].kind, TokenKind::Semi | TokenKind::Eof) {
            pos += 1;
        }
        if matches!(tokens[pos].kind, TokenKind::Semi) {
            pos += 1;
        }
    }

    while !matches!(tokens[pos].kind, TokenKind::Eof) {
        match &tokens[pos].kind {
            TokenKind::KwEndmodule => {
                pos += 1;
            }
            TokenKind::KwInput | TokenKind::KwOutput | TokenKind::KwWire => {
                let is_input = matches!(tokens[pos].kind, TokenKind::KwInput);
                let is_output = matches!(tokens[pos].kind, TokenKind::KwOutput);
                pos += 1;
                loop {
                    let name = expect_ident(tokens, &mut pos)?;
                    if is_input {
                        inputs.push(name);
                    } else if is_output {
                        outputs.insert(name);
                    }
                    match tokens[pos].kind {
                        TokenKind::Comma => {
                            pos += 1;
                        }
                        TokenKind::Semi => {
                            pos += 1;
                            break;
                        }
                        _ => {
                            return Err(StaError::MalformedNetlist(
                                "expected ',' or ';' in declaration".to_string(),
                            ))
                        }
                    }
                }
            }
            TokenKind::KwAssign => {
                let span = tokens[pos].span;
                pos += 1;
                let lhs = expect_ident(tokens, &mut pos)?;
                expect(tokens, &mut pos, &TokenKind::Equals)?;
                let expr_start = pos;
                while !matches!(tokens[pos].kind, TokenKind::Semi | TokenKind::Eof) {
                    pos += 1;
                }
                expect(tokens, &mut pos, &TokenKind::Semi)?;
                statements.push(Stmt::Assign { lhs, expr_start, span });
            }
            TokenKind::Ident(_) => {
                let span = tokens[pos].span;
                let type_name = expect_ident(tokens, &mut pos)?;
                let instance_name = expect_ident(tokens, &mut pos)?;
                expect(tokens, &mut pos, &TokenKind::LParen)?;
                let mut ports = Vec::new();
                if !matches!(tokens[pos].kind, TokenKind::RParen) {
                    loop {
                        expect(tokens, &mut pos, &TokenKind::Dot)?;
                        let port_name = expect_ident(tokens, &mut pos)?;
                        expect(tokens, &mut pos, &TokenKind::LParen)?;
                        let net = expect_ident(tokens, &mut pos)?;
                        expect(tokens, &mut pos, &TokenKind::RParen)?;
                        ports.push((port_name, net));
                        match tokens[pos].kind {
                            TokenKind::Comma => {
                                pos += 1;
                            }
                            TokenKind::RParen => break,
                            _ => {
                                return Err(StaError::MalformedNetlist(
                                    "expected ',' or ')' in instance port list".to_string(),
                                ))
                            }
                        }
                    }
                }
                expect(tokens, &mut pos, &TokenKind::RParen)?;
                expect(tokens, &mut pos, &TokenKind::Semi)?;
                statements.push(Stmt::Instance { type_name, instance_name, ports, span });
            }
            other => {
                return Err(StaError::MalformedNetlist(format!(
                    "unexpected token {other:?} at top level"
                )))
            }
        }
    }

    Ok((inputs, outputs, statements))
}

fn expect_ident(tokens: &[Token], pos: &mut usize) -> Result<String, StaError> {
    match &tokens[*pos].kind {
        TokenKind::Ident(name) => {
            let name = name.clone();
            *pos += 1;
            Ok(name)
        }
        other => Err(StaError::MalformedNetlist(format!("expected identifier, found {other:?}"))),
    }
}

fn expect(tokens: &[Token], pos: &mut usize, want: &TokenKind) -> Result<(), StaError> {
    if &tokens[*pos].kind == want {
        *pos += 1;
        Ok(())
    } else {
        Err(StaError::MalformedNetlist(format!(
            "expected {want:?}, found {:?}",
            tokens[*pos].kind
        )))
    }
}

fn lookup_port<'a>(ports: &'a [(String, String)], name: &str) -> Option<&'a str> {
    ports.iter().find(|(p, _)| p == name).map(|(_, net)| net.as_str())
}

fn role_for(name: &str, outputs: &HashSet<String>) -> Role {
    if outputs.contains(name) {
        Role::PrimaryOutput
    } else {
        Role::InternalCombinational
    }
}

/// First pass: allocates a vertex for every name a statement produces.
#[allow(clippy::too_many_arguments)]
fn declare(
    statements: &[Stmt],
    tokens: &[Token],
    outputs: &HashSet<String>,
    delays: &GateDelayTable,
    graph: &mut TimingGraph,
    symbols: &mut Symbols,
    endpoints: &mut Vec<VertexId>,
    sink: &DiagnosticSink,
) -> Result<(), StaError> {
    let delay = |tag: GateTag| delays.get(tag.as_str()).unwrap_or(0.0);

    for stmt in statements {
        match stmt {
            Stmt::Assign { lhs, expr_start, .. } => {
                let mut pos = *expr_start;
                let expr = parse_expr(tokens, &mut pos)
                    .map_err(|(msg, _span)| StaError::MalformedNetlist(msg))?;
                let classified = classify(&expr).map_err(StaError::MalformedNetlist)?;
                declare_output(lhs, role_for(lhs, outputs), graph, symbols, endpoints);
                let lhs_id = symbols.require(lhs)?;
                match classified {
                    ClassifiedGate::Unary { tag, .. } => set_gate(graph, lhs_id, tag, delay(tag)),
                    ClassifiedGate::Binary { tag, .. } => set_gate(graph, lhs_id, tag, delay(tag)),
                    ClassifiedGate::Mux { .. } => {
                        let sel_n = format!("{lhs}$mux_sel_n");
                        let and_f = format!("{lhs}$mux_and_f");
                        let and_t = format!("{lhs}$mux_and_t");
                        declare_internal(&sel_n, GateTag::Mux2Not, delay(GateTag::Mux2Not), graph, symbols);
                        declare_internal(&and_f, GateTag::Mux2And, delay(GateTag::Mux2And), graph, symbols);
                        declare_internal(&and_t, GateTag::Mux2And, delay(GateTag::Mux2And), graph, symbols);
                        set_gate(graph, lhs_id, GateTag::Mux2Or, delay(GateTag::Mux2Or));
                    }
                }
            }
            Stmt::Instance { type_name, instance_name, ports, span } => {
                declare_instance(type_name, instance_name, ports, outputs, delays, graph, symbols, endpoints, sink, *span)?;
            }
        }
    }
    Ok(())
}

/// Declares `name` as a to-be-tagged vertex (placeholder tag `Assign`,
/// overwritten by [`set_gate`] once classification is known). A vertex
/// already present (e.g. re-declared by two statements) is left as-is.
fn declare_output(name: &str, role: Role, graph: &mut TimingGraph, symbols: &mut Symbols, endpoints: &mut Vec<VertexId>) {
    if symbols.contains(name) {
        return;
    }
    let id = graph.add_vertex(name.to_string(), role, GateTag::Assign, 0.0);
    symbols.declare(name, id);
    if role == Role::PrimaryOutput {
        endpoints.push(id);
    }
}

fn declare_internal(name: &str, tag: GateTag, delay_ns: f64, graph: &mut TimingGraph, symbols: &mut Symbols) {
    if symbols.contains(name) {
        return;
    }
    let id = graph.add_vertex(name.to_string(), Role::InternalCombinational, tag, delay_ns);
    symbols.declare(name, id);
}

/// Overwrites a previously-declared placeholder vertex's gate tag and
/// delay now that classification is known. `TimingGraph` has no in-place
/// mutator for this, so the vertex is patched by index.
fn set_gate(graph: &mut TimingGraph, id: VertexId, tag: GateTag, delay_ns: f64) {
    graph.vertices[id.as_index()].gate = tag;
    graph.vertices[id.as_index()].delay_ns = delay_ns;
}

#[allow(clippy::too_many_arguments)]
fn declare_instance(
    type_name: &str,
    instance_name: &str,
    ports: &[(String, String)],
    outputs: &HashSet<String>,
    delays: &GateDelayTable,
    graph: &mut TimingGraph,
    symbols: &mut Symbols,
    endpoints: &mut Vec<VertexId>,
    sink: &DiagnosticSink,
    span: Span,
) -> Result<(), StaError> {
    let delay = |tag: GateTag| delays.get(tag.as_str()).unwrap_or(0.0);

    match type_name {
        "NOT" | "BUF" | "AND" | "OR" | "NAND" | "NOR" | "XOR" | "XNOR" => {
            let tag = match type_name {
                "NOT" => GateTag::Not,
                "BUF" => GateTag::Buf,
                "AND" => GateTag::And,
                "OR" => GateTag::Or,
                "NAND" => GateTag::Nand,
                "NOR" => GateTag::Nor,
                "XOR" => GateTag::Xor,
                "XNOR" => GateTag::Xnor,
                _ => unreachable!(),
            };
            let net = lookup_port(ports, "Y").ok_or_else(|| {
                StaError::MalformedNetlist(format!("instance `{instance_name}` has no .Y output port"))
            })?;
            declare_output(net, role_for(net, outputs), graph, symbols, endpoints);
            set_gate(graph, symbols.require(net)?, tag, delay(tag));
        }
        "DFF" => {
            lookup_port(ports, "D").ok_or_else(|| {
                StaError::MalformedNetlist(format!("DFF instance `{instance_name}` has no .D port"))
            })?;
            let q_net = lookup_port(ports, "Q").ok_or_else(|| {
                StaError::MalformedNetlist(format!("DFF instance `{instance_name}` has no .Q port"))
            })?;
            let d_id = graph.add_vertex(format!("{instance_name}.D"), Role::FlipFlopD, GateTag::Dff, delay(GateTag::Dff));
            let q_id = graph.add_vertex(format!("{instance_name}.Q"), Role::FlipFlopQ, GateTag::Dff, delay(GateTag::Dff));
            endpoints.push(d_id);
            symbols.declare(q_net, q_id);
            symbols.declare(&format!("{instance_name}.D"), d_id);
        }
        "MUX2" => {
            let y_net = lookup_port(ports, "Y").ok_or_else(|| {
                StaError::MalformedNetlist(format!("MUX2 instance `{instance_name}` has no .Y output port"))
            })?;
            declare_output(y_net, role_for(y_net, outputs), graph, symbols, endpoints);
            let sel_n = format!("{instance_name}.sel_n");
            let and_f = format!("{instance_name}.and_f");
            let and_t = format!("{instance_name}.and_t");
            declare_internal(&sel_n, GateTag::Mux2Not, delay(GateTag::Mux2Not), graph, symbols);
            declare_internal(&and_f, GateTag::Mux2And, delay(GateTag::Mux2And), graph, symbols);
            declare_internal(&and_t, GateTag::Mux2And, delay(GateTag::Mux2And), graph, symbols);
            set_gate(graph, symbols.require(y_net)?, GateTag::Mux2Or, delay(GateTag::Mux2Or));
        }
        "full_adder" => {
            let sum_net = lookup_port(ports, "SUM").ok_or_else(|| {
                StaError::MalformedNetlist(format!("full_adder instance `{instance_name}` has no .SUM port"))
            })?;
            let cout_net = lookup_port(ports, "COUT").ok_or_else(|| {
                StaError::MalformedNetlist(format!("full_adder instance `{instance_name}` has no .COUT port"))
            })?;
            declare_output(sum_net, role_for(sum_net, outputs), graph, symbols, endpoints);
            declare_output(cout_net, role_for(cout_net, outputs), graph, symbols, endpoints);
            set_gate(graph, symbols.require(sum_net)?, GateTag::Unknown, delay(GateTag::Unknown));
            set_gate(graph, symbols.require(cout_net)?, GateTag::Unknown, delay(GateTag::Unknown));
            sink.emit(
                Diagnostic::warning(
                    DiagnosticCode::new(Category::Warning, 210),
                    format!("composite primitive `full_adder` instance `{instance_name}` left unexpanded"),
                    span,
                )
                .with_label(Label::primary(span, "SUM and COUT both tagged UNKNOWN here"))
                .with_note("no per-gate decomposition is defined for full_adder; SUM/COUT carry zero attributed delay"),
            );
        }
        _ => {
            let net = lookup_port(ports, "Y").ok_or_else(|| {
                StaError::MalformedNetlist(format!(
                    "unknown primitive `{type_name}` instance `{instance_name}` has no .Y output port"
                ))
            })?;
            declare_output(net, role_for(net, outputs), graph, symbols, endpoints);
            set_gate(graph, symbols.require(net)?, GateTag::Unknown, delay(GateTag::Unknown));
            sink.emit(
                Diagnostic::warning(
                    DiagnosticCode::new(Category::Warning, 201),
                    format!("unknown primitive `{type_name}` used by instance `{instance_name}`"),
                    span,
                )
                .with_label(Label::primary(span, "no gate rule recognizes this primitive"))
                .with_note("its output is tagged UNKNOWN and carries zero attributed delay"),
            );
        }
    }
    Ok(())
}

/// Second pass: wires every consumed identifier to the vertex that
/// produces it, synthesizing NOT vertices for mixed-polarity AND/OR and
/// mux operands (memoized per source signal so repeated `~x` reuses one
/// inverter).
fn wire(statements: &[Stmt], tokens: &[Token], graph: &mut TimingGraph, symbols: &Symbols, _sink: &DiagnosticSink) -> Result<(), StaError> {
    let mut not_cache: HashMap<String, VertexId> = HashMap::new();
    let mut const_cache: HashMap<bool, VertexId> = HashMap::new();

    for stmt in statements {
        match stmt {
            Stmt::Assign { lhs, expr_start, .. } => {
                let mut pos = *expr_start;
                let expr = parse_expr(tokens, &mut pos).map_err(|(msg, _span)| StaError::MalformedNetlist(msg))?;
                let classified = classify(&expr).map_err(StaError::MalformedNetlist)?;
                let lhs_id = symbols.require(lhs)?;
                match classified {
                    ClassifiedGate::Unary { operand, .. } => {
                        let src = resolve_leaf(&operand, graph, symbols, &mut const_cache)?;
                        graph.add_edge(src, lhs_id);
                    }
                    ClassifiedGate::Binary { tag, lhs: a, rhs: b } => {
                        let absorbs_polarity =
                            matches!(tag, GateTag::Nand | GateTag::Nor | GateTag::Xor | GateTag::Xnor);
                        let src_a = if absorbs_polarity {
                            resolve_leaf(&a, graph, symbols, &mut const_cache)?
                        } else {
                            resolve_with_inversion(&a, graph, symbols, &mut not_cache, &mut const_cache)?
                        };
                        let src_b = if absorbs_polarity {
                            resolve_leaf(&b, graph, symbols, &mut const_cache)?
                        } else {
                            resolve_with_inversion(&b, graph, symbols, &mut not_cache, &mut const_cache)?
                        };
                        graph.add_edge(src_a, lhs_id);
                        graph.add_edge(src_b, lhs_id);
                    }
                    ClassifiedGate::Mux { sel, when_true, when_false } => {
                        wire_mux(lhs, &sel, &when_true, &when_false, graph, symbols, &mut not_cache, &mut const_cache)?;
                    }
                }
            }
            Stmt::Instance { type_name, instance_name, ports, .. } => {
                wire_instance(type_name, instance_name, ports, graph, symbols)?;
            }
        }
    }
    Ok(())
}

fn resolve_leaf(
    operand: &Operand,
    graph: &mut TimingGraph,
    symbols: &Symbols,
    const_cache: &mut HashMap<bool, VertexId>,
) -> Result<VertexId, StaError> {
    if let Some(name) = &operand.ident {
        symbols.require(name)
    } else {
        let value = operand.constant.unwrap_or(false);
        Ok(*const_cache.entry(value).or_insert_with(|| {
            graph.add_vertex(format!("1'b{}", value as u8), Role::InternalCombinational, GateTag::Primary, 0.0)
        }))
    }
}

/// Resolves an operand the way a plain AND/OR gate wires it: inverted
/// operands get a synthetic NOT vertex (memoized by source signal name)
/// feeding into the gate, since AND/OR's own tag does not absorb polarity.
fn resolve_with_inversion(
    operand: &Operand,
    graph: &mut TimingGraph,
    symbols: &Symbols,
    not_cache: &mut HashMap<String, VertexId>,
    const_cache: &mut HashMap<bool, VertexId>,
) -> Result<VertexId, StaError> {
    let base = resolve_leaf(operand, graph, symbols, const_cache)?;
    if !operand.negated {
        return Ok(base);
    }
    let key = operand.ident.clone().unwrap_or_default();
    if let Some(&id) = not_cache.get(&key) {
        return Ok(id);
    }
    let not_id = graph.add_vertex(
        format!("{key}$not"),
        Role::InternalCombinational,
        GateTag::Not,
        GateDelayTable::defaults().get("NOT").unwrap_or(0.01),
    );
    graph.add_edge(base, not_id);
    not_cache.insert(key, not_id);
    Ok(not_id)
}

#[allow(clippy::too_many_arguments)]
fn wire_mux(
    lhs: &str,
    sel: &Operand,
    when_true: &Operand,
    when_false: &Operand,
    graph: &mut TimingGraph,
    symbols: &Symbols,
    not_cache: &mut HashMap<String, VertexId>,
    const_cache: &mut HashMap<bool, VertexId>,
) -> Result<(), StaError> {
    // `~s ? t : f` is `s ? f : t`; normalize so the select feeds the gate
    // unmodified (sel's own polarity is absorbed by swapping branches).
    let (sel, when_true, when_false) = if sel.negated {
        (Operand { negated: false, ..sel.clone() }, when_false.clone(), when_true.clone())
    } else {
        (sel.clone(), when_true.clone(), when_false.clone())
    };

    let sel_id = resolve_leaf(&sel, graph, symbols, const_cache)?;
    let true_id = resolve_with_inversion(&when_true, graph, symbols, not_cache, const_cache)?;
    let false_id = resolve_with_inversion(&when_false, graph, symbols, not_cache, const_cache)?;

    let sel_n_id = symbols.require(&format!("{lhs}$mux_sel_n"))?;
    let and_f_id = symbols.require(&format!("{lhs}$mux_and_f"))?;
    let and_t_id = symbols.require(&format!("{lhs}$mux_and_t"))?;
    let y_id = symbols.require(lhs)?;

    graph.add_edge(sel_id, sel_n_id);
    graph.add_edge(sel_n_id, and_f_id);
    graph.add_edge(false_id, and_f_id);
    graph.add_edge(sel_id, and_t_id);
    graph.add_edge(true_id, and_t_id);
    graph.add_edge(and_f_id, y_id);
    graph.add_edge(and_t_id, y_id);
    Ok(())
}

fn wire_instance(type_name: &str, instance_name: &str, ports: &[(String, String)], graph: &mut TimingGraph, symbols: &Symbols) -> Result<(), StaError> {
    match type_name {
        "NOT" | "BUF" => {
            let a = lookup_port(ports, "A")
                .ok_or_else(|| StaError::MalformedNetlist(format!("instance `{instance_name}` has no .A input port")))?;
            let y = lookup_port(ports, "Y").expect("checked in declare pass");
            let a_id = symbols.require(a)?;
            graph.add_edge(a_id, symbols.require(y)?);
        }
        "AND" | "OR" | "NAND" | "NOR" | "XOR" | "XNOR" => {
            let a = lookup_port(ports, "A")
                .ok_or_else(|| StaError::MalformedNetlist(format!("instance `{instance_name}` has no .A input port")))?;
            let b = lookup_port(ports, "B")
                .ok_or_else(|| StaError::MalformedNetlist(format!("instance `{instance_name}` has no .B input port")))?;
            let y = lookup_port(ports, "Y").expect("checked in declare pass");
            let a_id = symbols.require(a)?;
            let b_id = symbols.require(b)?;
            let y_id = symbols.require(y)?;
            graph.add_edge(a_id, y_id);
            graph.add_edge(b_id, y_id);
        }
        "DFF" => {
            let d = lookup_port(ports, "D").expect("checked in declare pass");
            let d_id = symbols.require(d)?;
            let d_side = symbols.require(&format!("{instance_name}.D"))?;
            graph.add_edge(d_id, d_side);
        }
        "MUX2" => {
            let s = lookup_port(ports, "S")
                .ok_or_else(|| StaError::MalformedNetlist(format!("MUX2 instance `{instance_name}` has no .S select port")))?;
            let a = lookup_port(ports, "A")
                .ok_or_else(|| StaError::MalformedNetlist(format!("MUX2 instance `{instance_name}` has no .A port")))?;
            let b = lookup_port(ports, "B")
                .ok_or_else(|| StaError::MalformedNetlist(format!("MUX2 instance `{instance_name}` has no .B port")))?;
            let y = lookup_port(ports, "Y").expect("checked in declare pass");

            let s_id = symbols.require(s)?;
            let a_id = symbols.require(a)?;
            let b_id = symbols.require(b)?;
            let sel_n_id = symbols.require(&format!("{instance_name}.sel_n"))?;
            let and_f_id = symbols.require(&format!("{instance_name}.and_f"))?;
            let and_t_id = symbols.require(&format!("{instance_name}.and_t"))?;
            let y_id = symbols.require(y)?;

            graph.add_edge(s_id, sel_n_id);
            graph.add_edge(sel_n_id, and_f_id);
            graph.add_edge(a_id, and_f_id);
            graph.add_edge(s_id, and_t_id);
            graph.add_edge(b_id, and_t_id);
            graph.add_edge(and_f_id, y_id);
            graph.add_edge(and_t_id, y_id);
        }
        "full_adder" => {
            let sum_id = symbols.require(lookup_port(ports, "SUM").expect("checked in declare pass"))?;
            let cout_id = symbols.require(lookup_port(ports, "COUT").expect("checked in declare pass"))?;
            for port_name in ["A", "B", "CIN"] {
                if let Some(net) = lookup_port(ports, port_name) {
                    let id = symbols.require(net)?;
                    graph.add_edge(id, sum_id);
                    graph.add_edge(id, cout_id);
                }
            }
        }
        _ => {
            let y = lookup_port(ports, "Y").expect("checked in declare pass");
            let y_id = symbols.require(y)?;
            for (port_name, net) in ports {
                if port_name == "Y" {
                    continue;
                }
                let id = symbols.require(net)?;
                graph.add_edge(id, y_id);
            }
        }
    }
    Ok(())
}

fn detect_cycles(graph: &TimingGraph) -> Result<(), StaError> {
    crate::topo::topo_order(graph).map(|_| ())
}
